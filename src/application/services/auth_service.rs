//! Session token issuing and authentication.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::services::AuthorDirectory;
use crate::domain::entities::User;
use crate::domain::repositories::{DocumentStore, SetOptions, collections, server_timestamp};
use crate::error::AppError;
use crate::utils::id_generator::generate_session_token;

type HmacSha256 = Hmac<Sha256>;

/// Session record stored at `sessions/{token hash}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    uid: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    revoked: bool,
}

/// Service for issuing and validating bearer session tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. Read access to the store is not enough to verify or forge
/// tokens without the server-side secret.
pub struct AuthService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    authors: Arc<AuthorDirectory<S>>,
    signing_secret: String,
}

impl<S: DocumentStore + ?Sized> AuthService<S> {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when existing tokens were issued.
    pub fn new(store: Arc<S>, authors: Arc<AuthorDirectory<S>>, signing_secret: String) -> Self {
        Self {
            store,
            authors,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Issues a new session for `user` and returns the raw bearer token.
    ///
    /// The user's profile in `users/{uid}` is upserted (merge) with the supplied
    /// display name and email, and any cached display name is dropped.
    pub async fn issue_session(&self, user: &User) -> Result<String, AppError> {
        if user.uid.trim().is_empty() {
            return Err(AppError::bad_request(
                "User id is required",
                json!({ "field": "uid" }),
            ));
        }

        let mut profile = serde_json::Map::new();
        if let Some(name) = &user.display_name {
            profile.insert("displayName".into(), json!(name));
        }
        if let Some(email) = &user.email {
            profile.insert("email".into(), json!(email));
        }
        if !profile.is_empty() {
            self.store
                .set_document(
                    collections::USERS,
                    &user.uid,
                    serde_json::Value::Object(profile),
                    SetOptions::merge(),
                )
                .await?;
            self.authors.invalidate(&user.uid).await;
        }

        let token = generate_session_token();
        self.store
            .set_document(
                collections::SESSIONS,
                &self.hash_token(&token),
                json!({
                    "uid": user.uid,
                    "displayName": user.display_name,
                    "email": user.email,
                    "createdAt": server_timestamp(),
                    "revoked": false,
                }),
                SetOptions::default(),
            )
            .await?;

        info!(uid = %user.uid, "session issued");
        Ok(token)
    }

    /// Resolves a raw bearer token to the session's user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] if the token is unknown or revoked, and
    /// [`AppError::Transport`] on store failures.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let token_hash = self.hash_token(token);

        let record = match self
            .store
            .get_document(collections::SESSIONS, &token_hash)
            .await?
        {
            Some(doc) => doc.decode::<SessionRecord>(collections::SESSIONS)?,
            None => {
                debug!("unknown session token");
                return Err(invalid_session());
            }
        };

        if record.revoked {
            debug!(uid = %record.uid, "revoked session token");
            return Err(invalid_session());
        }

        Ok(User {
            uid: record.uid,
            display_name: record.display_name,
            email: record.email,
        })
    }

    /// Revokes a session so its token no longer authenticates.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token was never issued.
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        self.store
            .update_document(
                collections::SESSIONS,
                &self.hash_token(token),
                json!({ "revoked": true }),
            )
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::NotFound { .. } => {
                    AppError::not_found("Session not found", json!({}))
                }
                other => other,
            })?;

        info!("session revoked");
        Ok(())
    }
}

fn invalid_session() -> AppError {
    AppError::unauthenticated(
        "Unauthenticated",
        json!({ "reason": "Invalid or revoked session token" }),
    )
}
