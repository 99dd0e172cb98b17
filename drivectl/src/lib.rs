//! # drivectl: an HTTP gateway to a single Drive folder
//!
//! `drivectl` exposes one remote Drive folder through a small REST API:
//! list, download, upload, delete, and rename. It performs no logic of its
//! own beyond request translation - each endpoint accepts HTTP parameters,
//! issues a call against the Drive v3 API, and reshapes the result into a
//! JSON body. All state lives in the remote service.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer. At startup a service-account key is loaded, a single
//! authenticated [`drive::DriveClient`] is constructed, and both are shared
//! with every request handler through [`AppState`]. Access tokens are minted
//! from the key and cached inside the client, so concurrent requests reuse
//! one credential rather than re-authenticating per call.
//!
//! Remote failures are collapsed into a generic server error carrying the
//! remote message verbatim (see [`errors`]); the only 4xx responses are for
//! requests the framework rejects before a remote call is made.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use drivectl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = drivectl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     drivectl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module. The two required settings are the
//! service-account key path (`GOOGLE_SERVICE_ACCOUNT_FILE`) and the folder
//! identifier (`GOOGLE_DRIVE_FOLDER_ID`); the process refuses to start
//! without them.

pub mod api;
pub mod config;
pub mod drive;
pub mod errors;
mod openapi;
pub mod telemetry;

#[cfg(test)]
mod test;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::drive::{DriveClient, ServiceAccountKey};

/// Application state shared across all request handlers.
///
/// Holds the one long-lived authenticated Drive client and the loaded
/// configuration. Created once at startup; handlers receive it by value
/// through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub drive: Arc<DriveClient>,
    pub config: Config,
}

/// Build the application router with all endpoints and middleware.
///
/// - the six API routes of the service, plus `/healthz` and `/docs`
/// - a body limit on `/upload` sized from `max_upload_bytes`
/// - request/response tracing at INFO
pub fn build_router(state: AppState) -> Router {
    // Upload gets its own body limit; the other routes keep axum's default.
    let upload_router = Router::new().route(
        "/upload",
        post(api::handlers::files::upload_file).layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
    );

    let api_routes = Router::new()
        .route("/", get(api::handlers::files::root))
        .route("/files", get(api::handlers::files::list_files))
        .route("/download/{file_id}", get(api::handlers::files::download_file))
        .route("/delete/{file_id}", delete(api::handlers::files::delete_file))
        .route("/rename/{file_id}", patch(api::handlers::files::rename_file))
        .merge(upload_router)
        .with_state(state);

    api_routes
        .route("/healthz", get(|| async { "OK" }))
        .merge(Scalar::with_url("/docs", openapi::ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns the router and configuration.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] loads the service-account key,
///    builds the authenticated client, and assembles the router. A missing
///    or unreadable key is fatal here - before the server binds.
/// 2. **Serve**: [`Application::serve`] binds the TCP port and handles
///    requests until the shutdown future resolves.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let key_path = config
            .service_account_file
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("service_account_file is not configured"))?;
        let folder_id = config
            .folder_id
            .clone()
            .ok_or_else(|| anyhow::anyhow!("folder_id is not configured"))?;

        let key = ServiceAccountKey::from_file(key_path)?;
        info!(client_email = %key.client_email, folder_id = %folder_id, "Drive client configured");

        let drive = DriveClient::new(&key, folder_id, &config.drive)?;

        let state = AppState {
            drive: Arc::new(drive),
            config: config.clone(),
        };
        let router = build_router(state);

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("drivectl listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}
