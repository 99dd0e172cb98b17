//! HTTP client for the Drive v3 files API.
//!
//! One [`DriveClient`] is created at startup and shared (behind an `Arc`) by
//! every request handler. All operations are scoped to the single folder the
//! service is configured with. The client performs no retries and carries a
//! single transport-wide timeout; failures are reported through
//! [`DriveError`] and collapsed into a generic server error at the HTTP
//! boundary.

use bytes::{Bytes, BytesMut};
use reqwest::header::{self, HeaderMap};
use reqwest::StatusCode;
use tracing::debug;
use uuid::Uuid;

use crate::config::DriveConfig;

use super::auth::{ServiceAccountKey, TokenProvider};
use super::models::{ApiErrorEnvelope, DriveFile, FileList};

/// Field projection requested from listing calls.
const LIST_FIELDS: &str = "files(id, name, mimeType, modifiedTime)";

/// Field projection requested from create/update calls.
const FILE_FIELDS: &str = "id, name";

/// Failures surfaced by the Drive client.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    /// Transport-level failure (connect, timeout, decode).
    #[error("drive request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("drive API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// Access-token acquisition failed.
    #[error("failed to obtain access token: {0}")]
    Token(String),

    /// The service-account key material could not be used.
    #[error("invalid service account key: {0}")]
    Key(String),
}

/// Authenticated handle to the files API, scoped to one folder.
pub struct DriveClient {
    http: reqwest::Client,
    auth: TokenProvider,
    folder_id: String,
    api_base: String,
    upload_base: String,
    download_chunk_size: usize,
}

impl DriveClient {
    pub fn new(key: &ServiceAccountKey, folder_id: impl Into<String>, config: &DriveConfig) -> Result<Self, DriveError> {
        let http = reqwest::Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            http,
            auth: TokenProvider::new(key)?,
            folder_id: folder_id.into(),
            api_base: config.api_base_url.as_str().trim_end_matches('/').to_string(),
            upload_base: config.upload_base_url.as_str().trim_end_matches('/').to_string(),
            download_chunk_size: config.download_chunk_size,
        })
    }

    /// List the non-trashed files in the configured folder, optionally
    /// narrowed to names containing `.{extension}`.
    ///
    /// Returns whatever single page the API yields by default - there is no
    /// pagination loop here.
    pub async fn list(&self, extension: Option<&str>) -> Result<Vec<DriveFile>, DriveError> {
        let mut query = format!("'{}' in parents and trashed = false", self.folder_id);
        if let Some(extension) = extension {
            query.push_str(&format!(" and name contains '.{extension}'"));
        }

        debug!(query = %query, "Listing folder contents");

        let token = self.auth.token(&self.http).await?;
        let response = self
            .http
            .get(format!("{}/files", self.api_base))
            .bearer_auth(&token)
            .query(&[("q", query.as_str()), ("spaces", "drive"), ("fields", LIST_FIELDS)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let listing: FileList = response.json().await?;
        Ok(listing.files)
    }

    /// Fetch a file's content into memory.
    ///
    /// The transfer runs as a bounded loop of ranged requests, each pulling
    /// at most `download_chunk_size` bytes, accumulating into a growable
    /// buffer until the `Content-Range` total is reached. A plain `200`
    /// means the server sent the whole body in one round trip.
    pub async fn download(&self, file_id: &str) -> Result<Bytes, DriveError> {
        let url = format!("{}/files/{}", self.api_base, file_id);
        let chunk_size = self.download_chunk_size as u64;
        let mut buf = BytesMut::new();
        let mut offset: u64 = 0;

        loop {
            let token = self.auth.token(&self.http).await?;
            let range_end = offset + chunk_size - 1;
            let response = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(&[("alt", "media")])
                .header(header::RANGE, format!("bytes={offset}-{range_end}"))
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.bytes().await?;
                    if buf.is_empty() {
                        return Ok(body);
                    }
                    buf.extend_from_slice(&body);
                    return Ok(buf.freeze());
                }
                StatusCode::RANGE_NOT_SATISFIABLE => {
                    // Zero-length file, or every byte already consumed.
                    return Ok(buf.freeze());
                }
                StatusCode::PARTIAL_CONTENT => {
                    let total = content_range_total(response.headers());
                    let body = response.bytes().await?;
                    if body.is_empty() {
                        return Ok(buf.freeze());
                    }
                    offset += body.len() as u64;
                    buf.extend_from_slice(&body);

                    debug!(file_id = %file_id, received = offset, total = ?total, "Download chunk complete");

                    match total {
                        Some(total) if offset >= total => return Ok(buf.freeze()),
                        Some(_) => {}
                        // Without a parseable total, a short chunk marks the end.
                        None if (body.len() as u64) < chunk_size => return Ok(buf.freeze()),
                        None => {}
                    }
                }
                _ => return Err(Self::api_error(response).await),
            }
        }
    }

    /// Fetch a file's display name.
    pub async fn file_name(&self, file_id: &str) -> Result<String, DriveError> {
        #[derive(serde::Deserialize)]
        struct FileName {
            name: String,
        }

        let token = self.auth.token(&self.http).await?;
        let response = self
            .http
            .get(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&token)
            .query(&[("fields", "name")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let file: FileName = response.json().await?;
        Ok(file.name)
    }

    /// Create a file in the configured folder from an in-memory payload.
    ///
    /// Uses the `multipart/related` upload protocol: a JSON metadata part
    /// pinning the name and parent folder, followed by the media part.
    pub async fn upload(&self, name: &str, mime_type: &str, content: Bytes) -> Result<DriveFile, DriveError> {
        let boundary = format!("drivectl-{}", Uuid::new_v4().simple());
        let metadata = serde_json::json!({
            "name": name,
            "parents": [self.folder_id],
        });

        let mut body = Vec::with_capacity(content.len() + 512);
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n").as_bytes(),
        );
        body.extend_from_slice(format!("--{boundary}\r\nContent-Type: {mime_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(&content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        debug!(name = %name, mime_type = %mime_type, bytes = content.len(), "Uploading file");

        let token = self.auth.token(&self.http).await?;
        let response = self
            .http
            .post(format!("{}/files", self.upload_base))
            .bearer_auth(&token)
            .query(&[("uploadType", "multipart"), ("fields", FILE_FIELDS)])
            .header(header::CONTENT_TYPE, format!("multipart/related; boundary={boundary}"))
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Permanently delete a file.
    pub async fn delete(&self, file_id: &str) -> Result<(), DriveError> {
        let token = self.auth.token(&self.http).await?;
        let response = self
            .http
            .delete(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }

    /// Update a file's display name, returning the new identifier/name pair.
    pub async fn rename(&self, file_id: &str, new_name: &str) -> Result<DriveFile, DriveError> {
        let token = self.auth.token(&self.http).await?;
        let response = self
            .http
            .patch(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&token)
            .query(&[("fields", FILE_FIELDS)])
            .json(&serde_json::json!({ "name": new_name }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Turn a non-success response into a [`DriveError::Api`], extracting
    /// the message from the standard error envelope when present and falling
    /// back to the raw body otherwise.
    async fn api_error(response: reqwest::Response) -> DriveError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);

        DriveError::Api { status, message }
    }
}

/// Parse the total size out of a `Content-Range: bytes <start>-<end>/<total>`
/// header. Returns `None` for a missing header or a `*` total.
fn content_range_total(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_RANGE)?
        .to_str()
        .ok()?
        .rsplit('/')
        .next()?
        .parse()
        .ok()
}
