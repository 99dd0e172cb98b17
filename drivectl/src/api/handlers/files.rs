use crate::AppState;
use crate::api::models::files::{
    FileListResponse, FileResponse, ListFilesQuery, MessageResponse, RenameQuery, RenameResponse, UploadResponse,
};
use crate::errors::{Error, Result};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    summary = "Service greeting",
    responses(
        (status = 200, description = "Service is up", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "drivectl is up - serving a single Drive folder over HTTP".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    summary = "List files",
    description = "List the non-trashed files in the configured folder, optionally filtered by extension.",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Listing of the folder", body = FileListResponse),
        (status = 500, description = "Remote service error")
    )
)]
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<FileListResponse>> {
    let files = state.drive.list(query.extension.as_deref()).await?;
    let files: Vec<FileResponse> = files.iter().map(FileResponse::from_drive).collect();

    Ok(Json(FileListResponse {
        count: files.len(),
        files,
    }))
}

#[utoipa::path(
    get,
    path = "/download/{file_id}",
    tag = "files",
    summary = "Download file",
    description = "Fetch a file's content and stream it back as an attachment named after the remote file.",
    params(
        ("file_id" = String, Path, description = "Remote identifier of the file to download")
    ),
    responses(
        (status = 200, description = "The file content as an attachment stream"),
        (status = 500, description = "Remote service error")
    )
)]
pub async fn download_file(State(state): State<AppState>, Path(file_id): Path<String>) -> Result<Response> {
    let content = state.drive.download(&file_id).await?;
    let filename = state.drive.file_name(&file_id).await?;

    tracing::info!(file_id = %file_id, filename = %filename, bytes = content.len(), "Serving download");

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename={filename}")),
    ];

    Ok((headers, content).into_response())
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    summary = "Upload file",
    description = "Upload a file into the configured folder. Expects a multipart form with a `file` field.",
    request_body(
        content_type = "multipart/form-data",
        description = "File payload"
    ),
    responses(
        (status = 200, description = "File created", body = UploadResponse),
        (status = 400, description = "Missing or unreadable `file` field"),
        (status = 500, description = "Remote service error")
    )
)]
pub async fn upload_file(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<UploadResponse>> {
    let mut payload: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string).unwrap_or_else(|| "upload.bin".to_string());
                let declared_type = field.content_type().map(str::to_string);
                let content = field.bytes().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read file payload: {e}"),
                })?;

                // The remote API requires a media MIME type; fall back to a
                // guess from the filename when the part declares none.
                let content_type = declared_type
                    .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().to_string());

                payload = Some((filename, content_type, content));
            }
            _ => {
                // Ignore unknown fields (forward compatibility)
            }
        }
    }

    let (filename, content_type, content) = payload.ok_or_else(|| Error::BadRequest {
        message: "Missing required field: 'file'".to_string(),
    })?;

    tracing::info!(filename = %filename, content_type = %content_type, bytes = content.len(), "Uploading file");

    let created = state.drive.upload(&filename, &content_type, content).await?;

    Ok(Json(UploadResponse {
        id: created.id,
        name: created.name,
    }))
}

#[utoipa::path(
    delete,
    path = "/delete/{file_id}",
    tag = "files",
    summary = "Delete file",
    params(
        ("file_id" = String, Path, description = "Remote identifier of the file to delete")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 500, description = "Remote service error")
    )
)]
pub async fn delete_file(State(state): State<AppState>, Path(file_id): Path<String>) -> Result<Json<MessageResponse>> {
    state.drive.delete(&file_id).await?;

    Ok(Json(MessageResponse {
        message: format!("File {file_id} deleted successfully"),
    }))
}

#[utoipa::path(
    patch,
    path = "/rename/{file_id}",
    tag = "files",
    summary = "Rename file",
    params(
        ("file_id" = String, Path, description = "Remote identifier of the file to rename"),
        RenameQuery
    ),
    responses(
        (status = 200, description = "File renamed", body = RenameResponse),
        (status = 400, description = "Missing new_name query parameter"),
        (status = 500, description = "Remote service error")
    )
)]
pub async fn rename_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    Query(query): Query<RenameQuery>,
) -> Result<Json<RenameResponse>> {
    let updated = state.drive.rename(&file_id, &query.new_name).await?;

    Ok(Json(RenameResponse {
        id: updated.id,
        new_name: updated.name,
    }))
}
