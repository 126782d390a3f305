use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use tokio::fs;
use tracing::info;

use super::BackupUploader;
use super::oauth::{self, Credentials, StoredToken};
use crate::core::config::AppConfig;
use crate::errors::RosterError;

const FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_ENDPOINT: &str = "https://www.googleapis.com/upload/drive/v3/files";

/// Uploads the backing file to a Google Drive folder under a timestamped
/// name. Credentials and token are re-read from disk on every call so a
/// freshly authorized token is picked up without a restart.
pub struct DriveBackup {
    http: HttpClient,
    credentials_file: PathBuf,
    token_file: PathBuf,
    folder_id: String,
}

impl DriveBackup {
    #[must_use]
    pub fn new(
        credentials_file: impl Into<PathBuf>,
        token_file: impl Into<PathBuf>,
        folder_id: impl Into<String>,
    ) -> Self {
        Self {
            http: HttpClient::new(),
            credentials_file: credentials_file.into(),
            token_file: token_file.into(),
            folder_id: folder_id.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationError` when no Drive folder id is configured;
    /// uploads have nowhere to go without one.
    pub fn from_config(config: &AppConfig) -> Result<Self, RosterError> {
        let folder_id = config.drive_folder_id.clone().ok_or_else(|| {
            RosterError::ValidationError("DRIVE_FOLDER_ID is not set".to_string())
        })?;
        Ok(Self::new(
            &config.credentials_file,
            &config.token_file,
            folder_id,
        ))
    }

    /// Remote object name: `data-<ISO8601 with ':' and '.' replaced>.json`.
    #[must_use]
    pub fn object_name(now: DateTime<Utc>) -> String {
        let stamp = now
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("data-{stamp}.json")
    }

    /// Resolve a usable access token, refreshing it when a refresh token is
    /// stored (Drive access tokens expire after an hour).
    async fn access_token(&self) -> Result<String, RosterError> {
        let creds = Credentials::load(&self.credentials_file).await?;
        let Some(token) = StoredToken::load(&self.token_file).await? else {
            let url = oauth::build_authorize_url(&creds);
            info!("Authorize this app by visiting this url: {}", url);
            return Err(RosterError::AuthorizationRequired(url));
        };

        if let Some(refresh_token) = &token.refresh_token {
            return oauth::refresh_access_token(&self.http, &creds, refresh_token).await;
        }
        Ok(token.access_token)
    }
}

#[async_trait]
impl BackupUploader for DriveBackup {
    async fn backup(&self, data_file: &Path) -> Result<String, RosterError> {
        let access_token = self.access_token().await?;

        let contents = fs::read(data_file)
            .await
            .map_err(|e| RosterError::BackupError(format!("read {}: {}", data_file.display(), e)))?;
        let name = Self::object_name(Utc::now());

        // Two-step upload: create the file entry in the target folder, then
        // send the media bytes for it.
        let metadata = json!({
            "name": name,
            "parents": [self.folder_id],
        });
        let resp = self
            .http
            .post(FILES_ENDPOINT)
            .bearer_auth(&access_token)
            .json(&metadata)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(RosterError::BackupError(format!(
                "drive create failed: {}",
                resp.status()
            )));
        }
        let body: Value = resp.json().await?;
        let file_id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| RosterError::ParseError("drive create: missing file id".to_string()))?
            .to_string();

        let resp = self
            .http
            .patch(format!("{UPLOAD_ENDPOINT}/{file_id}?uploadType=media"))
            .bearer_auth(&access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(contents)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(RosterError::BackupError(format!(
                "drive upload failed: {}",
                resp.status()
            )));
        }

        info!("Backup uploaded, file id {}", file_id);
        Ok(file_id)
    }
}
