/// rosterdb - the storage core of a small school/group-roster application.
///
/// This crate implements the pieces of the roster backend that live below the
/// HTTP layer:
/// 1. A mutex-guarded JSON-file datastore with atomic-replace persistence
/// 2. A best-effort Google Drive backup uploader (startup + pre-write)
/// 3. The roster domain operations (users, groups, students) built on top
///
/// # Architecture
///
/// The system uses:
/// - A single JSON document (`users`, `groups`, `students`) on disk
/// - Tokio for the async runtime and the datastore mutex
/// - reqwest for the Drive OAuth and upload calls
/// - serde/serde_json for the document and credential formats
///
/// HTTP routing, sessions, and email verification are external collaborators;
/// they consume the `domains` functions and are not part of this crate.
///
/// # Example
///
/// ```no_run
/// use rosterdb::Datastore;
/// use rosterdb::domains::groups;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Set up structured logging
///     rosterdb::setup_logging();
///
///     // Open the backing file (created if missing); no backup uploader here
///     let store = Datastore::open("data.json", None).await?;
///
///     let group = groups::create_group(&store, "Math club", 0.0).await?;
///     println!("created group {}", group.id);
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod backup;
pub mod core;
pub mod domains;
pub mod errors;
pub mod store;

pub use errors::RosterError;
pub use store::Datastore;

/// Configure structured logging with JSON format.
///
/// This function sets up tracing-subscriber with a JSON formatter so the
/// operator console output is machine-collectable. It should be called once
/// at the start of each binary.
///
/// # Example
///
/// ```
/// // Initialize structured logging at process start
/// rosterdb::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}
