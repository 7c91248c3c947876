//! Token handling for the brokerage API.
//!
//! The OAuth browser dance is delegated to the provider's own tooling;
//! this module loads the resulting token file, hands out the bearer
//! token, and makes a single refresh attempt when the access token has
//! expired and refresh credentials are available. Anything beyond that
//! is an [`crate::Error::Auth`] — re-run the external auth tool.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Treat tokens as expired this long before nominal expiry; clock skew margin.
const EXPIRY_BUFFER_SECS: i64 = 60;

#[derive(Deserialize)]
struct TokenFile {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Bearer and refresh tokens loaded from the local token file.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenStore {
    /// Load the token file.
    ///
    /// An expired token still loads; callers check [`TokenStore::is_fresh`]
    /// and either refresh or fail.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] when the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Auth(format!(
                "cannot read token file {}: {e}. Run your provider's auth tool first",
                path.display()
            ))
        })?;
        let file: TokenFile = serde_json::from_str(&raw)
            .map_err(|e| Error::Auth(format!("invalid token file {}: {e}", path.display())))?;

        debug!(path = %path.display(), "loaded access token");
        Ok(Self {
            path: path.to_path_buf(),
            access_token: SecretString::from(file.access_token),
            refresh_token: file.refresh_token.map(SecretString::from),
            expires_at: file.expires_at,
        })
    }

    /// Build a store from a raw token (used by tests).
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            path: PathBuf::new(),
            access_token: SecretString::from(token.into()),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// The bearer token value for the Authorization header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }

    /// Whether the access token is still usable (with a skew buffer).
    /// Tokens without an expiry are assumed fresh.
    pub fn is_fresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() < expires_at - Duration::seconds(EXPIRY_BUFFER_SECS),
            None => true,
        }
    }

    /// Fail if the token has expired.
    pub fn ensure_fresh(&self) -> Result<()> {
        if self.is_fresh() {
            return Ok(());
        }
        Err(Error::Auth(format!(
            "access token expired at {}. Re-run your provider's auth tool",
            self.expires_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".into())
        )))
    }

    /// One refresh-token exchange against the provider's OAuth endpoint.
    ///
    /// On success the new tokens are written back to the token file.
    /// Never retried: a second attempt with the same refresh token would
    /// fail the same way.
    pub async fn refresh(
        &mut self,
        base_url: &str,
        client_id: &str,
        client_secret: &SecretString,
    ) -> Result<()> {
        let refresh_token = self.refresh_token.as_ref().ok_or_else(|| {
            Error::Auth(
                "access token expired and no refresh token is available. \
                 Re-run your provider's auth tool"
                    .into(),
            )
        })?;

        let response = reqwest::Client::new()
            .post(format!("{base_url}/v1/oauth/token"))
            .basic_auth(client_id, Some(client_secret.expose_secret()))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.expose_secret()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Auth(format!(
                "token refresh failed (status {status}). Re-run your provider's auth tool"
            )));
        }

        let body: RefreshResponse = response.json().await?;
        self.access_token = SecretString::from(body.access_token);
        if let Some(new_refresh) = body.refresh_token {
            self.refresh_token = Some(SecretString::from(new_refresh));
        }
        self.expires_at = body
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));

        self.persist()?;
        info!("access token refreshed");
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        let contents = json!({
            "access_token": self.access_token.expose_secret(),
            "refresh_token": self.refresh_token.as_ref().map(ExposeSecret::expose_secret),
            "expires_at": self.expires_at,
        });
        fs::write(&self.path, serde_json::to_string_pretty(&contents)?)?;
        Ok(())
    }
}
