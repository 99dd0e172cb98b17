//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The configuration file path defaults to `config.yaml` but can
//! be specified via the `-f` flag or the `DRIVECTL_CONFIG` environment
//! variable; a missing file is not an error, since every setting can come
//! from the environment.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources
//! override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `DRIVECTL_`
//!    override YAML values (`__` separates nested keys, e.g.
//!    `DRIVECTL_DRIVE__REQUEST_TIMEOUT=10s`)
//! 3. **`GOOGLE_SERVICE_ACCOUNT_FILE` / `GOOGLE_DRIVE_FOLDER_ID`** - the
//!    canonical deployment variables, accepted unprefixed
//!
//! Both the service-account key path and the folder identifier are required;
//! if either is missing after merging, [`Config::load`] fails and the
//! process does not start.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Simple CLI args - just for specifying the config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "DRIVECTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Path to the service-account key JSON file. Required.
    /// Usually supplied via GOOGLE_SERVICE_ACCOUNT_FILE.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_file: Option<PathBuf>,
    /// Identifier of the remote folder all operations are scoped to. Required.
    /// Usually supplied via GOOGLE_DRIVE_FOLDER_ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// Remote API endpoints and transport tuning
    pub drive: DriveConfig,
    /// Maximum accepted request body size for uploads, in bytes
    pub max_upload_bytes: usize,
}

/// Remote API endpoints and transport settings.
///
/// The base URLs exist so tests can point the client at a local mock; the
/// defaults are the public endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveConfig {
    /// Base URL of the metadata/content API
    pub api_base_url: Url,
    /// Base URL of the media upload API
    pub upload_base_url: Url,
    /// Timeout applied to every outbound request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Granularity of the ranged download loop, in bytes
    pub download_chunk_size: usize,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse("https://www.googleapis.com/drive/v3").unwrap(),
            upload_base_url: Url::parse("https://www.googleapis.com/upload/drive/v3").unwrap(),
            request_timeout: Duration::from_secs(30),
            download_chunk_size: 8 * 1024 * 1024, // 8 MiB
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            service_account_file: None,
            folder_id: None,
            drive: DriveConfig::default(),
            max_upload_bytes: 100 * 1024 * 1024, // 100 MiB
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("DRIVECTL_").ignore(&["CONFIG"]).split("__"))
            // The canonical deployment variables, accepted unprefixed
            .merge(
                Env::raw()
                    .only(&["GOOGLE_SERVICE_ACCOUNT_FILE"])
                    .map(|_| "service_account_file".into()),
            )
            .merge(Env::raw().only(&["GOOGLE_DRIVE_FOLDER_ID"]).map(|_| "folder_id".into()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.service_account_file.is_none() {
            anyhow::bail!(
                "Config validation: service_account_file is not set. \
                 Set the GOOGLE_SERVICE_ACCOUNT_FILE environment variable or add \
                 service_account_file to the config file."
            );
        }

        if self.folder_id.as_deref().is_none_or(str::is_empty) {
            anyhow::bail!(
                "Config validation: folder_id is not set. \
                 Set the GOOGLE_DRIVE_FOLDER_ID environment variable or add \
                 folder_id to the config file."
            );
        }

        if self.drive.download_chunk_size == 0 {
            anyhow::bail!("Config validation: drive.download_chunk_size cannot be 0.");
        }

        if self.max_upload_bytes == 0 {
            anyhow::bail!("Config validation: max_upload_bytes cannot be 0.");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
