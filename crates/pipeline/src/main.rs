use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geoloc_db::repositories::GeolocationRepo;
use geoloc_db::DbConfig;
use geoloc_pipeline::{import_file, WriteHooks};

/// Import a geolocation CSV dump into Postgres in a single transaction.
#[derive(Debug, Parser)]
#[command(name = "geoloc-import", version)]
struct Args {
    /// CSV file with an
    /// `ip_address,country_code,country,city,latitude,longitude,mystery_value` header.
    #[arg(short = 'p', long, env = "IMPORT_FILE_PATH", default_value = "data_dump.csv")]
    file_path: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geoloc_pipeline=info,geoloc_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // --- Database ---
    let config = DbConfig::from_env().context("Failed to load database configuration")?;
    let pool = geoloc_db::create_pool(&config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    geoloc_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Import ---
    let result = import_file(&pool, &args.file_path, &WriteHooks::default()).await;
    if result.is_ok() {
        match GeolocationRepo::count(&pool).await {
            Ok(stored) => tracing::info!(stored, "Geolocations now in store"),
            Err(e) => tracing::warn!(error = %e, "Could not count stored geolocations"),
        }
    }
    geoloc_db::close_pool(&pool).await;

    let report =
        result.with_context(|| format!("Import of {} failed", args.file_path.display()))?;
    println!("{report}");
    Ok(())
}
