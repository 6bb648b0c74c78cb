//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! orchard-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ORCHARD_DATABASE_URL` - `PostgreSQL` connection string

use tracing::info;

use orchard_store::config::StoreConfig;
use orchard_store::db;

/// Run store database migrations.
///
/// # Errors
///
/// Returns an error if the environment is incomplete, the database cannot be
/// reached, or a migration fails.
pub async fn store() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = StoreConfig::from_env()?;

    info!("Connecting to store database...");
    let pool = db::create_pool(&config.database_url).await?;

    info!("Running store migrations...");
    sqlx::migrate!("../store/migrations").run(&pool).await?;

    info!("Store migrations complete!");
    Ok(())
}
