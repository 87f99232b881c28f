//! Migration runner: `cargo run --bin migration -- up` (also `down`,
//! `status`, `fresh`). Reads the store URL from the layered config.
use brigade_engine::config;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let command = env::args().nth(1).unwrap_or_else(|| "up".to_string());

    let db = match Database::connect(cfg.database_url()).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to {}: {}", cfg.database_url(), e);
            std::process::exit(1);
        }
    };

    let result = match command.as_str() {
        "up" => migrations::Migrator::up(&db, None).await,
        "down" => migrations::Migrator::down(&db, None).await,
        "fresh" => migrations::Migrator::fresh(&db).await,
        "status" => migrations::Migrator::status(&db).await,
        other => {
            error!("Unknown command '{}'; expected up, down, fresh or status", other);
            std::process::exit(2);
        }
    };

    match result {
        Ok(()) => info!("Migration command '{}' completed", command),
        Err(e) => {
            error!("Migration command '{}' failed: {}", command, e);
            std::process::exit(1);
        }
    }
}
