//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` (from the environment or `.env`) and runs the standard
//! SeaORM migration commands: `up`, `down`, `status`, `fresh`, `refresh`, `reset`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info,sea_orm_migration=info")
        .init();

    tracing::info!("Running bloglist migrations");

    cli::run_cli(migration::Migrator).await;
}
