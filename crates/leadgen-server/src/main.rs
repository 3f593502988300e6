mod api;
mod middleware;

use std::sync::Arc;

use leadgen_search::{AuthClient, CompanySearch, PgStore};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::ApiKeyState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = leadgen_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = leadgen_db::PoolConfig::from_app_config(&config);
    let pool = leadgen_db::connect_pool(&config.database_url, pool_config).await?;
    leadgen_db::run_migrations(&pool).await?;

    if !config.identity_enabled() {
        tracing::warn!("SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY not set; search history disabled");
    }
    let identity = AuthClient::from_config(&config)?;
    let search = CompanySearch::from_config(&config, PgStore::new(pool.clone()), identity)?;

    let api_keys = ApiKeyState::from_config(&config)?;
    let app = build_app(
        AppState {
            pool,
            search: Arc::new(search),
        },
        api_keys,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "leadgen-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
