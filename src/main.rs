use mimalloc::MiMalloc;
use taxi_service::config::Config;
use taxi_service::db::FleetStorage;
use taxi_service::router::{FleetState, fleet_router};
use taxi_service::service::accounts::ensure_initial_driver;
use taxi_service::templates::Templates;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        listen_addr = %cfg.basic.listen_addr,
        loglevel = %cfg.basic.loglevel,
        insecure_cookie = cfg.basic.insecure_cookie
    );

    let storage = FleetStorage::connect(&cfg.basic.database_url).await?;

    if let Some((username, password)) = cfg.admin_credentials() {
        ensure_initial_driver(&storage, username, password).await?;
    }

    let templates = Templates::new()?;
    let state = FleetState::new(
        storage,
        templates,
        &cfg.basic.secret_key,
        cfg.basic.insecure_cookie,
    );
    let app = fleet_router(state);

    let listener = TcpListener::bind(&cfg.basic.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
