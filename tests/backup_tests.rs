use chrono::{TimeZone, Utc};
use rosterdb::backup::{BackupUploader, Credentials, DriveBackup, StoredToken, build_authorize_url};
use rosterdb::core::config::AppConfig;
use rosterdb::errors::RosterError;
use tempfile::TempDir;
use url::Url;

const CREDENTIALS_JSON: &str = r#"{
  "installed": {
    "client_id": "client-123.apps.googleusercontent.com",
    "client_secret": "secret",
    "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob", "http://localhost"]
  }
}"#;

fn write_credentials(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("credentials.json");
    std::fs::write(&path, CREDENTIALS_JSON).unwrap();
    path
}

#[test]
fn test_object_name_replaces_colons_and_dots() {
    let when = Utc
        .with_ymd_and_hms(2026, 8, 25, 12, 34, 56)
        .unwrap()
        .checked_add_signed(chrono::Duration::milliseconds(789))
        .unwrap();

    let name = DriveBackup::object_name(when);
    assert_eq!(name, "data-2026-08-25T12-34-56-789Z.json");
    assert!(!name.contains(':'));
    // The only dot left is the extension separator.
    assert_eq!(name.matches('.').count(), 1);
}

#[tokio::test]
async fn test_authorize_url_carries_client_and_scope() {
    let dir = TempDir::new().unwrap();
    let creds = Credentials::load(&write_credentials(&dir)).await.unwrap();

    let url = Url::parse(&build_authorize_url(&creds)).unwrap();
    assert_eq!(url.host_str(), Some("accounts.google.com"));

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(pairs.contains(&(
        "client_id".to_string(),
        "client-123.apps.googleusercontent.com".to_string()
    )));
    assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
    assert!(pairs.contains(&(
        "scope".to_string(),
        "https://www.googleapis.com/auth/drive.file".to_string()
    )));
    // First redirect URI wins, like the original installed-app flow.
    assert!(pairs.contains(&(
        "redirect_uri".to_string(),
        "urn:ietf:wg:oauth:2.0:oob".to_string()
    )));
}

#[tokio::test]
async fn test_backup_without_token_requires_authorization() {
    let dir = TempDir::new().unwrap();
    let credentials_file = write_credentials(&dir);
    let data_file = dir.path().join("data.json");
    std::fs::write(&data_file, "{}").unwrap();

    let uploader = DriveBackup::new(credentials_file, dir.path().join("token.json"), "folder-1");

    match uploader.backup(&data_file).await {
        Err(RosterError::AuthorizationRequired(url)) => {
            assert!(url.contains("accounts.google.com"));
        }
        other => panic!("expected AuthorizationRequired, got {other:?}"),
    }
}

#[tokio::test]
async fn test_backup_without_credentials_fails() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("data.json");
    std::fs::write(&data_file, "{}").unwrap();

    let uploader = DriveBackup::new(
        dir.path().join("credentials.json"),
        dir.path().join("token.json"),
        "folder-1",
    );

    assert!(matches!(
        uploader.backup(&data_file).await,
        Err(RosterError::BackupError(_))
    ));
}

#[test]
fn test_folder_id_needed_for_uploads_but_not_token_flow() {
    // The token-exchange tooling only touches the credential paths; a
    // missing folder id must surface when constructing the uploader, not
    // when reading configuration.
    let config = AppConfig {
        data_file: "data.json".into(),
        credentials_file: "credentials.json".into(),
        token_file: "token.json".into(),
        drive_folder_id: None,
    };
    assert!(matches!(
        DriveBackup::from_config(&config),
        Err(RosterError::ValidationError(_))
    ));

    let config = AppConfig {
        drive_folder_id: Some("folder-1".to_string()),
        ..config
    };
    assert!(DriveBackup::from_config(&config).is_ok());
}

#[tokio::test]
async fn test_stored_token_load_absent_is_none() {
    let dir = TempDir::new().unwrap();
    let token = StoredToken::load(&dir.path().join("token.json"))
        .await
        .unwrap();
    assert!(token.is_none());
}

#[tokio::test]
async fn test_stored_token_round_trip_keeps_refresh_token() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");

    let token = StoredToken {
        access_token: "ya29.abc".to_string(),
        refresh_token: Some("1//refresh".to_string()),
        scope: Some("https://www.googleapis.com/auth/drive.file".to_string()),
        token_type: Some("Bearer".to_string()),
    };
    token.store(&path).await.unwrap();

    let loaded = StoredToken::load(&path).await.unwrap().unwrap();
    assert_eq!(loaded.access_token, "ya29.abc");
    assert_eq!(loaded.refresh_token.as_deref(), Some("1//refresh"));
}
