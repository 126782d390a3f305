use std::path::Path;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::errors::RosterError;

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Installed-app OAuth client, the `installed` object of `credentials.json`
/// as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct CredentialsFile {
    installed: Credentials,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `BackupError` if the file cannot be read or `ParseError` if it
    /// is not a valid credentials file.
    pub async fn load(path: &Path) -> Result<Self, RosterError> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| RosterError::BackupError(format!("read {}: {}", path.display(), e)))?;
        let file: CredentialsFile = serde_json::from_str(&text)?;
        Ok(file.installed)
    }

    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map_or("urn:ietf:wg:oauth:2.0:oob", String::as_str)
    }
}

/// Token material persisted in `token.json` after the one-time authorization
/// flow. Unknown response fields (expiry etc.) are dropped; the refresh token
/// is what keeps backups working long-term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl StoredToken {
    /// Load the stored token; `Ok(None)` when the file does not exist yet
    /// (authorization has not been run).
    ///
    /// # Errors
    ///
    /// Returns an error for any read failure other than absence, or when the
    /// file is not valid token JSON.
    pub async fn load(path: &Path) -> Result<Option<Self>, RosterError> {
        match fs::read_to_string(path).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RosterError::BackupError(format!(
                "read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// # Errors
    ///
    /// Returns `BackupError` if the token file cannot be written.
    pub async fn store(&self, path: &Path) -> Result<(), RosterError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)
            .await
            .map_err(|e| RosterError::BackupError(format!("write {}: {}", path.display(), e)))?;
        info!("Token stored to {}", path.display());
        Ok(())
    }
}

/// Consent URL the operator must visit to obtain an authorization code.
#[must_use]
pub fn build_authorize_url(creds: &Credentials) -> String {
    let client_id = &creds.client_id;
    let redirect_uri = utf8_percent_encode(creds.redirect_uri(), NON_ALPHANUMERIC).to_string();
    let scope = utf8_percent_encode(DRIVE_SCOPE, NON_ALPHANUMERIC).to_string();
    format!(
        "{AUTH_ENDPOINT}?client_id={client_id}&redirect_uri={redirect_uri}&response_type=code&scope={scope}&access_type=offline"
    )
}

/// Exchange an out-of-band authorization code for tokens.
///
/// # Errors
///
/// Returns an error if the HTTP call fails or Google rejects the code.
pub async fn exchange_code(
    http: &HttpClient,
    creds: &Credentials,
    code: &str,
) -> Result<StoredToken, RosterError> {
    let payload = [
        ("code", code.to_string()),
        ("client_id", creds.client_id.clone()),
        ("client_secret", creds.client_secret.clone()),
        ("redirect_uri", creds.redirect_uri().to_string()),
        ("grant_type", "authorization_code".to_string()),
    ];

    let resp = http
        .post(TOKEN_ENDPOINT)
        .form(&payload)
        .send()
        .await
        .map_err(|e| RosterError::HttpError(format!("token exchange request: {e}")))?;

    let body: Value = resp
        .json()
        .await
        .map_err(|e| RosterError::HttpError(format!("token exchange parse: {e}")))?;

    if let Some(err) = body.get("error").and_then(Value::as_str) {
        return Err(RosterError::BackupError(format!(
            "token exchange rejected: {err}"
        )));
    }

    let token: StoredToken = serde_json::from_value(body)?;
    Ok(token)
}

/// Trade a stored refresh token for a fresh access token.
///
/// # Errors
///
/// Returns an error if the HTTP call fails or the response carries no
/// access token.
pub async fn refresh_access_token(
    http: &HttpClient,
    creds: &Credentials,
    refresh_token: &str,
) -> Result<String, RosterError> {
    let payload = [
        ("client_id", creds.client_id.clone()),
        ("client_secret", creds.client_secret.clone()),
        ("refresh_token", refresh_token.to_string()),
        ("grant_type", "refresh_token".to_string()),
    ];

    let resp = http
        .post(TOKEN_ENDPOINT)
        .form(&payload)
        .send()
        .await
        .map_err(|e| RosterError::HttpError(format!("token refresh request: {e}")))?;

    let body: Value = resp
        .json()
        .await
        .map_err(|e| RosterError::HttpError(format!("token refresh parse: {e}")))?;

    body.get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| RosterError::BackupError("token refresh: no access_token".to_string()))
}

/// One-time manual flow: exchange the code and persist `token.json` for
/// future backups. Surfaced by the `get-token` binary, never invoked during
/// normal request handling.
///
/// # Errors
///
/// Returns an error if the credentials are unreadable, the exchange fails,
/// or the token file cannot be written.
pub async fn authorize(
    http: &HttpClient,
    credentials_file: &Path,
    token_file: &Path,
    code: &str,
) -> Result<(), RosterError> {
    let creds = Credentials::load(credentials_file).await?;
    let token = exchange_code(http, &creds, code).await?;
    token.store(token_file).await
}
