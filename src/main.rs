use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Server;

use todo_api::{config::Config, db, route::create_router, AppState};

// Entry point of the application
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    // Connect to the database and make sure the tables exist
    let pool = db::connect(&config)
        .await
        .context("Failed to connect to the database")?;
    db::init_schema(&pool)
        .await
        .context("Failed to create the database schema")?;

    let addr = SocketAddr::new(config.host, config.port);
    let app = create_router(Arc::new(AppState::new(pool, config)));

    tracing::info!(%addr, "Server started successfully");

    Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
