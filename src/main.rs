// src/main.rs
use std::env;
use expense_tracker::config::Config;
use expense_tracker::database::db::{connection, migrate, queries};
use expense_tracker::{backend, cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "server" {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "expense_tracker=info,tower_http=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();

        tracing::info!(database = %config.database_url, "starting backend server");
        let pool = connection::get_db_pool(&config.database_url, config.max_connections).await?;
        migrate::run_migrations(&pool).await?;
        queries::seed_fixed_categories(&pool).await?;

        backend::run_server(pool, &config).await?;
    } else {
        // no subscriber here: log lines would tear the alternate screen
        cli::run(&config).await?;
    }
    Ok(())
}
