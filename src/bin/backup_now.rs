//! Trigger an immediate backup of the backing file, outside any write.

use anyhow::Result;
use rosterdb::backup::{BackupUploader, DriveBackup};
use rosterdb::core::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    rosterdb::setup_logging();
    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    let uploader = DriveBackup::from_config(&config)?;
    let file_id = uploader.backup(&config.data_file).await?;
    info!("Backup complete, file id {}", file_id);

    Ok(())
}
