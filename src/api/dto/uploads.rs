//! DTOs for the cover upload endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters of `POST /api/uploads`.
#[derive(Debug, Deserialize, Validate)]
pub struct UploadParams {
    /// Original file name; sanitized before storage.
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}
