use trackfolio_server::api::app_router;
use trackfolio_server::config::Config;
use trackfolio_server::{build_state, init_tracing, shutdown};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // before tracing so RUST_LOG and TF_LOG_FORMAT from .env apply
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::from_env();
    let (state, scheduler) = build_state(&config).await?;

    let (trigger, shutdown_signal) = shutdown::channel();
    tokio::spawn(shutdown::listen_for_shutdown(trigger));

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal.wait())
        .await?;

    scheduler.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}
