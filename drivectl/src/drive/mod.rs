//! Client for the external Drive storage API.
//!
//! This module owns everything that talks to the remote service:
//!
//! - [`auth`]: service-account JWT signing and access-token caching
//! - [`client`]: the file operations (list, download, upload, delete, rename)
//! - [`models`]: wire types for the v3 REST surface
//!
//! The rest of the crate only sees [`DriveClient`] and [`DriveError`].

pub mod auth;
pub mod client;
pub mod models;

pub use auth::ServiceAccountKey;
pub use client::{DriveClient, DriveError};
pub use models::DriveFile;
