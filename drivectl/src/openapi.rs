//! OpenAPI documentation configuration.
//!
//! The rendered documentation is served at `/docs`.

use utoipa::OpenApi;

use crate::api::models::files::{FileListResponse, FileResponse, MessageResponse, RenameResponse, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "drivectl",
        description = "A thin control surface over a single Drive folder: list, download, upload, delete, and rename files."
    ),
    paths(
        crate::api::handlers::files::root,
        crate::api::handlers::files::list_files,
        crate::api::handlers::files::download_file,
        crate::api::handlers::files::upload_file,
        crate::api::handlers::files::delete_file,
        crate::api::handlers::files::rename_file,
    ),
    components(schemas(
        FileResponse,
        FileListResponse,
        UploadResponse,
        RenameResponse,
        MessageResponse,
    )),
    tags(
        (name = "service", description = "Service status"),
        (name = "files", description = "Operations on the scoped folder")
    )
)]
pub struct ApiDoc;
