//! copyscan API server — plagiarism detection over HTTP.
//!
//! Exposes the check pipeline, whole-document comparison, and SEO keyword
//! extraction as a JSON API.

mod app;
mod error;
mod routes;

use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use copyscan_shared::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "copyscan=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config().wrap_err("failed to load configuration")?;
    let state = app::build_state(&config)?;
    let router = app::build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(%addr, "starting copyscan API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;

    axum::serve(listener, router).await.wrap_err("server error")?;

    Ok(())
}
