//! Migration CLI tool.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    if migration::is_production() && migration::is_destructive(std::env::args().skip(1)) {
        tracing::error!("Destructive migration commands are not allowed in production");
        std::process::exit(1);
    }

    cli::run_cli(migration::Migrator).await;
}
