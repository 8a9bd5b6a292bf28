//! Health endpoint body.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub store: ComponentCheck,
    pub cache: ComponentCheck,
}

impl HealthChecks {
    pub fn overall(&self) -> ServiceStatus {
        if self.store.status == ComponentStatus::Ok && self.cache.status == ComponentStatus::Ok {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Degraded
        }
    }
}

/// Outcome of probing one backend, with the probe's round trip.
#[derive(Debug, Serialize)]
pub struct ComponentCheck {
    pub status: ComponentStatus,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentCheck {
    pub fn passed(latency_ms: u64) -> Self {
        Self {
            status: ComponentStatus::Ok,
            latency_ms,
            error: None,
        }
    }

    pub fn failed(latency_ms: u64, error: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Error,
            latency_ms,
            error: Some(error.into()),
        }
    }
}
