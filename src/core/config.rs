use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub credentials_file: PathBuf,
    pub token_file: PathBuf,
    /// Target folder for backups. Only the upload path needs it; the token
    /// flow works without one.
    pub drive_folder_id: Option<String>,
}

impl AppConfig {
    /// Read configuration from the environment. The file paths default to
    /// the process working directory.
    ///
    /// # Errors
    ///
    /// Currently infallible; keeps `Result` so future required settings can
    /// be validated here.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            data_file: env::var("DATA_FILE")
                .unwrap_or_else(|_| "data.json".to_string())
                .into(),
            credentials_file: env::var("GOOGLE_CREDENTIALS_FILE")
                .unwrap_or_else(|_| "credentials.json".to_string())
                .into(),
            token_file: env::var("GOOGLE_TOKEN_FILE")
                .unwrap_or_else(|_| "token.json".to_string())
                .into(),
            drive_folder_id: env::var("DRIVE_FOLDER_ID").ok(),
        })
    }
}
