//! Wire types for the Drive v3 REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing a remote file, as returned by the files endpoints.
///
/// Only the fields this service projects are modeled. `mimeType` and
/// `modifiedTime` are optional because not every call requests them -
/// create and update responses carry `id` and `name` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(rename = "modifiedTime", default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
}

/// Envelope around a file listing.
#[derive(Debug, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// Successful response from the OAuth token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Error envelope the API wraps failures in: `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}
