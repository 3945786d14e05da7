//! Schema migration CLI for the Quill database.
//!
//! Reads `DATABASE_URL` (optionally from `.env`) and accepts the usual
//! sea-orm-migration subcommands: `up`, `down`, `status`, `fresh`, `reset`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info,sea_orm_migration=info")
        .with_target(false)
        .init();

    cli::run_cli(migration::Migrator).await;
}
