use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to parse document: {0}")]
    ParseError(String),

    #[error("Failed to persist datastore: {0}")]
    PersistError(String),

    #[error("Failed to upload backup: {0}")]
    BackupError(String),

    #[error("Backup authorization required, visit: {0}")]
    AuthorizationRequired(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<reqwest::Error> for RosterError {
    fn from(error: reqwest::Error) -> Self {
        RosterError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(error: serde_json::Error) -> Self {
        RosterError::ParseError(error.to_string())
    }
}

impl From<std::io::Error> for RosterError {
    fn from(error: std::io::Error) -> Self {
        RosterError::PersistError(error.to_string())
    }
}
