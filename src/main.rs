use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use vax_dashboard::{AppState, Config, DashboardController, open_store, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let store = open_store(&config.backend).await?;

    let mut dashboard = DashboardController::new(store, config.totals);
    dashboard.initialize().await;

    let app = router(AppState::new(dashboard));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
