//! Schema bootstrap utility.
//!
//! Creates the SQLite schema and optionally seeds an initial subscriber-area
//! permission from `SEED_ADMIN_EMAIL`. Run once before first deploy.

use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use log::info;
use log::warn;

use tiergate::config::Config;
use tiergate::logging::setup_logging;
use tiergate::model::AdminActor;
use tiergate::repository::Repository;
use tiergate::service::Services;
use tiergate::service::permission_service::GrantOutcome;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::new();
    setup_logging(&config)?;

    info!("Initializing store database at {}...", config.db_path);
    let db = Arc::new(Repository::new(&config.db_url, &config.db_path).await?);
    db.init().await?;
    info!("Schema ready.");

    if let Ok(email) = std::env::var("SEED_ADMIN_EMAIL") {
        let services = Services::new(db);
        let root = AdminActor::root("init-store");
        match services.permissions.grant(&root, &email).await? {
            GrantOutcome::Granted => info!("Seeded permission for {email}"),
            GrantOutcome::Reactivated => info!("Reactivated permission for {email}"),
            GrantOutcome::AlreadyGranted => warn!("{email} already holds a permission"),
        }
    }

    Ok(())
}
