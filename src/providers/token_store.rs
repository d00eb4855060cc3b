// ABOUTME: File-backed OAuth credential provider with automatic token refresh
// ABOUTME: Reads stored tokens, refreshes expired ones, and persists the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed OAuth token store.
//!
//! Tokens are persisted as JSON at a configurable path between runs. When the
//! stored access token has expired and a refresh token exists, the provider
//! exchanges it at the OAuth token endpoint and writes the new token back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::core::{Credential, CredentialProvider, ProviderError, ProviderResult};

/// Google OAuth token exchange endpoint
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// OAuth client secrets, the relevant subset of a downloaded client file
#[derive(Debug, Clone, Deserialize)]
struct ClientSecrets {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    token_uri: Option<String>,
}

/// Wrapper layout of a client secrets file (`installed` or `web` application)
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

/// Response body of a successful token refresh
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Credential provider backed by a JSON token file.
pub struct FileCredentialProvider {
    token_path: PathBuf,
    credentials_path: PathBuf,
    http: reqwest::Client,
}

impl FileCredentialProvider {
    /// Create a provider reading tokens from `token_path` and client secrets
    /// from `credentials_path`.
    #[must_use]
    pub fn new(token_path: PathBuf, credentials_path: PathBuf, http: reqwest::Client) -> Self {
        Self {
            token_path,
            credentials_path,
            http,
        }
    }

    fn read_stored_credential(&self) -> ProviderResult<Option<Credential>> {
        if !self.token_path.exists() {
            debug!(path = %self.token_path.display(), "no stored token file");
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.token_path)?;
        let credential: Credential = serde_json::from_str(&raw)?;
        Ok(Some(credential))
    }

    fn write_stored_credential(&self, credential: &Credential) -> ProviderResult<()> {
        let raw = serde_json::to_string_pretty(credential)?;
        std::fs::write(&self.token_path, raw)?;
        Ok(())
    }

    fn read_client_secrets(&self) -> ProviderResult<ClientSecrets> {
        let raw = std::fs::read_to_string(&self.credentials_path)?;
        let file: ClientSecretsFile = serde_json::from_str(&raw)?;
        file.installed.or(file.web).ok_or_else(|| {
            ProviderError::Auth(format!(
                "client secrets file {} has no installed or web section",
                self.credentials_path.display()
            ))
        })
    }

    async fn refresh(&self, refresh_token: &str) -> ProviderResult<Credential> {
        let secrets = self.read_client_secrets()?;
        let endpoint = secrets
            .token_uri
            .unwrap_or_else(|| TOKEN_ENDPOINT.to_owned());

        let response = self
            .http
            .post(&endpoint)
            .form(&[
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Auth(format!(
                "token refresh rejected (status {status}): {message}"
            )));
        }

        let body: RefreshResponse = response.json().await?;
        let expires_at = body
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));

        Ok(Credential {
            access_token: body.access_token,
            refresh_token: body
                .refresh_token
                .or_else(|| Some(refresh_token.to_owned())),
            expires_at,
        })
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn get_credentials(&self) -> ProviderResult<Option<Credential>> {
        let Some(stored) = self.read_stored_credential()? else {
            return Ok(None);
        };

        if stored.valid() {
            return Ok(Some(stored));
        }

        let Some(refresh_token) = stored.refresh_token.as_deref() else {
            warn!("stored token expired and no refresh token is available");
            return Ok(None);
        };

        info!("access token expired, refreshing");
        let refreshed = self.refresh(refresh_token).await?;
        if let Err(error) = self.write_stored_credential(&refreshed) {
            // A failed write only costs an extra refresh on the next call
            warn!(%error, "could not persist refreshed token");
        }
        Ok(Some(refreshed))
    }
}

/// Build a provider from configured paths with a dedicated HTTP client.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be constructed.
pub fn file_provider_from_paths(
    token_path: &Path,
    credentials_path: &Path,
    timeout: std::time::Duration,
) -> ProviderResult<FileCredentialProvider> {
    let http = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(FileCredentialProvider::new(
        token_path.to_path_buf(),
        credentials_path.to_path_buf(),
        http,
    ))
}
