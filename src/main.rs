use dotenvy::dotenv;
use kinder::logging::init_tracing;
use kinder::metrics::{init_metrics, metrics_app};
use kinder::router::init_router;
use kinder::state::init_app_state;
use kinder_config::ServerConfig;
use kinder_db::run_migrations;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();
    let state = init_app_state().await;

    run_migrations(&state.db).await?;
    info!("Database migrations applied");

    if let Some(handle) = init_metrics()? {
        let metrics_addr = server_config.metrics_addr();
        let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr).await?;
        info!("Metrics available at http://{}/metrics", metrics_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let app = init_router(state);

    let addr = server_config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Scalar UI available at http://{}/scalar", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
