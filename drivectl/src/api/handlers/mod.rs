//! HTTP request handlers for all API endpoints.
//!
//! Each handler extracts its parameters, issues one call against the shared
//! [`crate::drive::DriveClient`] (download issues two: content, then name),
//! and reshapes the result into the response models. Handlers return
//! [`crate::errors::Error`], which converts to the JSON error body at the
//! boundary.

pub mod files;
