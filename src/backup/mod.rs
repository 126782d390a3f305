pub mod drive;
pub mod oauth;

pub use drive::DriveBackup;
pub use oauth::{Credentials, StoredToken, authorize, build_authorize_url};

use std::path::Path;

use async_trait::async_trait;

use crate::errors::RosterError;

/// Off-box copy of the backing file for disaster recovery. The datastore
/// invokes this opportunistically (startup + pre-write) and treats failures
/// as log-and-continue; the primary store's durability never depends on the
/// remote service being reachable.
#[async_trait]
pub trait BackupUploader: Send + Sync {
    /// Upload the on-disk backing file, returning the remote object id.
    ///
    /// # Errors
    ///
    /// Returns `AuthorizationRequired` when no stored token exists (manual
    /// operator action, not retried automatically), or `BackupError`/
    /// `HttpError` when the upload itself fails.
    async fn backup(&self, data_file: &Path) -> Result<String, RosterError>;
}
