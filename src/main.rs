//! Bootstrap binary: prepares the database and seeds the starting catalog.

use dotenvy::dotenv;
use pastry_backoffice::{
    config::{catalog, database},
    errors::Result,
    seed,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();

    // 3. Connect and bootstrap the schema
    let db = database::create_connection().await?;
    database::create_tables(&db).await?;
    database::create_indexes(&db).await?;
    info!("Database ready at {}", database::get_database_url());

    // 4. Seed the starting catalog when a config file is present
    let config_path = std::env::var("SEED_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if std::path::Path::new(&config_path).exists() {
        let config = catalog::load_config(&config_path)?;
        let summary = seed::apply(&db, &config).await?;
        if summary.is_empty() {
            info!("Seed catalog already in place; nothing to create.");
        } else {
            info!(
                "Seeded starting catalog: {} users, {} categories, {} tags, {} ingredients",
                summary.users, summary.categories, summary.tags, summary.ingredients
            );
        }
    } else {
        warn!("No seed config found at {config_path}; starting with an empty catalog.");
    }

    Ok(())
}
