//! GitHub Portfolio Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.
//!
//! See `README.md` for quickstart.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use github_portfolio_service::config::ai::AiConfig;
use github_portfolio_service::config::github::GithubConfig;
use github_portfolio_service::metrics::Metrics;
use github_portfolio_service::{build_service, create_router, AppState};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - PORTFOLIO_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("PORTFOLIO_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("github_portfolio_service=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables GITHUB_TOKEN / GROQ_API_KEY / *_CONFIG_PATH overrides.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let github_cfg = GithubConfig::from_toml();
    let ai_cfg = AiConfig::load_or_disabled();

    let metrics = Metrics::init(github_cfg.profile_ttl_secs);

    let service = build_service(&github_cfg, &ai_cfg);
    let state = AppState::new(Arc::new(service));
    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}
