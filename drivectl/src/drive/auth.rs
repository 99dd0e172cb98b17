//! Service-account authentication against the Google OAuth token endpoint.
//!
//! Access tokens are minted by signing an RS256 JWT with the service
//! account's private key and exchanging it at the key's `token_uri`. The
//! resulting token is cached and reused by every Drive call until it comes
//! within [`TOKEN_REFRESH_MARGIN`] of expiry, so concurrent requests share
//! one credential rather than re-authenticating per call.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::client::DriveError;
use super::models::TokenResponse;

/// OAuth scope granting full access to Drive files.
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// How long before expiry a cached token is considered stale.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Assertion lifetime requested from the token endpoint (the maximum the
/// endpoint accepts).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The subset of a service-account key file this service needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Load and parse a service-account key from a JSON file.
    ///
    /// Called once at startup; a missing or malformed key file is a fatal
    /// configuration error.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read service account key file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse service account key file {}", path.display()))
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Mints and caches access tokens for a single service account.
pub struct TokenProvider {
    client_email: String,
    token_uri: String,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(key: &ServiceAccountKey) -> Result<Self, DriveError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| DriveError::Key(e.to_string()))?;

        Ok(Self {
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    /// Return a valid access token, fetching a fresh one if the cache is
    /// empty or about to expire.
    pub async fn token(&self, http: &reqwest::Client) -> Result<String, DriveError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN {
                return Ok(token.value.clone());
            }
        }

        debug!("Access token missing or stale, requesting a new one");
        let assertion = self.sign_assertion()?;

        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Token(format!("token endpoint returned {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::Token(format!("failed to decode token response: {e}")))?;

        let expires_at = Instant::now() + Duration::from_secs(token.expires_in);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }

    fn sign_assertion(&self) -> Result<String, DriveError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: DRIVE_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| DriveError::Token(format!("failed to sign assertion: {e}")))
    }
}
