use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::drive::DriveFile;

/// Query parameters for listing files
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListFilesQuery {
    /// File extension filter, e.g. `pdf`. Matches names containing
    /// `.{extension}`.
    pub extension: Option<String>,
}

/// Query parameters for renaming a file
#[derive(Debug, Deserialize, IntoParams)]
pub struct RenameQuery {
    /// New file name
    pub new_name: String,
}

/// A single file entry in a listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(rename = "modifiedTime", skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
}

impl FileResponse {
    pub fn from_drive(file: &DriveFile) -> Self {
        Self {
            id: file.id.clone(),
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            modified_time: file.modified_time,
        }
    }
}

/// Response for file listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    pub count: usize,
    pub files: Vec<FileResponse>,
}

/// Response for file upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub id: String,
    pub name: String,
}

/// Response for file rename
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RenameResponse {
    pub id: String,
    pub new_name: String,
}

/// Generic message response (root greeting, delete confirmation)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
