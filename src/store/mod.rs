use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::backup::BackupUploader;
use crate::core::models::Document;
use crate::errors::RosterError;

/// Single point of truth for the in-memory [`Document`].
///
/// One async mutex serializes every `read`/`write`/`update`; at most one
/// operation is in its critical section at any instant within this process.
/// There is no cross-process coordination: two processes opening the same
/// backing file can still lose updates.
///
/// Persistence uses atomic replace (write a sibling temp file, rename over
/// the target), so a crash mid-write leaves either the old or the new file,
/// never a partial mix.
pub struct Datastore {
    path: PathBuf,
    backup: Option<Arc<dyn BackupUploader>>,
    doc: Mutex<Document>,
}

impl Datastore {
    /// Open the datastore, creating the backing file with the empty document
    /// shape if it does not exist yet, and fire the startup backup attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be created. A failed
    /// startup backup is logged and does not fail the open.
    pub async fn open(
        path: impl Into<PathBuf>,
        backup: Option<Arc<dyn BackupUploader>>,
    ) -> Result<Self, RosterError> {
        let path = path.into();
        if !fs::try_exists(&path).await? {
            let initial = serde_json::to_string_pretty(&Document::default())?;
            fs::write(&path, initial).await?;
            info!("Created empty datastore at {}", path.display());
        }

        let store = Self {
            path,
            backup,
            doc: Mutex::new(Document::default()),
        };
        store.read().await;
        store.backup_attempt("startup").await;
        Ok(store)
    }

    /// Reload the document from disk and return a snapshot of it.
    ///
    /// A missing, empty, or unparsable backing file falls back to the empty
    /// document; a collection that is absent or not a sequence is replaced
    /// with an empty one. Both repairs are logged, not surfaced.
    pub async fn read(&self) -> Document {
        let mut doc = self.doc.lock().await;
        *doc = self.load_from_disk().await;
        doc.clone()
    }

    /// Persist the current in-memory document.
    ///
    /// A pre-write backup attempt runs first (outside the document lock, see
    /// `backup_attempt`); its failure is logged and never blocks the write.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if serialization or the temp-write/rename
    /// fails. The previous on-disk content is intact in that case.
    pub async fn write(&self) -> Result<(), RosterError> {
        self.backup_attempt("pre-write").await;
        let doc = self.doc.lock().await;
        self.persist(&doc).await
    }

    /// Read-modify-write under a single lock hold: reload the document from
    /// disk, apply `f`, and persist atomically. No other caller can observe
    /// the document between the reload and the persist, so mutations are
    /// never seen partially applied.
    ///
    /// # Errors
    ///
    /// Propagates an error from `f` (nothing is persisted then), or
    /// `PersistError` if the document cannot be written back.
    pub async fn update<T, F>(&self, f: F) -> Result<T, RosterError>
    where
        T: Send,
        F: FnOnce(&mut Document) -> Result<T, RosterError> + Send,
    {
        self.backup_attempt("pre-write").await;
        let mut doc = self.doc.lock().await;
        *doc = self.load_from_disk().await;
        let out = f(&mut *doc)?;
        self.persist(&doc).await?;
        Ok(out)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn load_from_disk(&self) -> Document {
        match fs::read_to_string(&self.path).await {
            Ok(text) => parse_document(&text),
            Err(e) => {
                warn!(
                    "Could not read {}: {}; falling back to an empty document",
                    self.path.display(),
                    e
                );
                Document::default()
            }
        }
    }

    async fn persist(&self, doc: &Document) -> Result<(), RosterError> {
        let text = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Best-effort backup of the current on-disk state. Runs before the
    /// document lock is taken so a slow upload never throttles other
    /// datastore callers; the on-disk file is always complete thanks to
    /// atomic replace, so uploading it concurrently is safe.
    async fn backup_attempt(&self, stage: &str) {
        let Some(uploader) = &self.backup else {
            return;
        };
        info!("Running {} backup", stage);
        match uploader.backup(&self.path).await {
            Ok(id) => info!("{} backup uploaded, file id {}", stage, id),
            Err(e) => error!("{} backup failed: {}", stage, e),
        }
    }
}

/// Parse the backing file text, repairing whatever does not match the
/// expected document shape instead of erroring.
fn parse_document(text: &str) -> Document {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!("Backing file is not valid JSON: {}; starting empty", e);
            return Document::default();
        }
    };

    let Value::Object(mut map) = value else {
        warn!("Backing file is not a JSON object; starting empty");
        return Document::default();
    };

    Document {
        users: take_collection(&mut map, "users"),
        groups: take_collection(&mut map, "groups"),
        students: take_collection(&mut map, "students"),
    }
}

fn take_collection<T: DeserializeOwned>(
    map: &mut serde_json::Map<String, Value>,
    key: &str,
) -> Vec<T> {
    match map.remove(key) {
        Some(Value::Array(items)) => {
            // Salvage record by record: one bad entry must not take the
            // rest of the collection with it.
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                match serde_json::from_value(item) {
                    Ok(record) => records.push(record),
                    Err(e) => warn!("Dropping malformed {} record: {}", key, e),
                }
            }
            records
        }
        Some(_) => {
            warn!("Collection {} is not a sequence; resetting", key);
            Vec::new()
        }
        None => Vec::new(),
    }
}
