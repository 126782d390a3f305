//! One-time operator flow to authorize Drive backups.
//!
//! Without an argument it prints the consent URL; with the code obtained
//! from that page it exchanges and stores `token.json`.

use anyhow::Result;
use reqwest::Client as HttpClient;
use rosterdb::backup::{Credentials, authorize, build_authorize_url};
use rosterdb::core::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    rosterdb::setup_logging();
    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    match std::env::args().nth(1) {
        None => {
            let creds = Credentials::load(&config.credentials_file).await?;
            println!(
                "Authorize this app by visiting this url: {}",
                build_authorize_url(&creds)
            );
            println!("Then run: get-token <CODE>");
        }
        Some(code) => {
            let http = HttpClient::new();
            authorize(&http, &config.credentials_file, &config.token_file, &code).await?;
        }
    }

    Ok(())
}
