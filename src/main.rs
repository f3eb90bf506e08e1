use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use umrah_ledger::{api, create_pool, AppConfig, BatchReportService, DaybookService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // local-time log format
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    let pool = create_pool(&config.database.url).await?;
    info!("Database pool created");

    let daybook_service = Arc::new(DaybookService::new(pool.clone()));
    let batch_service = Arc::new(BatchReportService::new(pool));

    let daybook_routes = Router::new()
        .route("/api/reports/daybook", get(api::cash_daybook))
        .route("/api/reports/daybook/csv", get(api::cash_daybook_csv))
        .with_state(daybook_service);

    let batch_routes = Router::new()
        .route("/api/reports/batch/:batch_id", get(api::batch_report))
        .with_state(batch_service);

    let app = Router::new()
        .route("/health", get(api::health_check))
        .merge(daybook_routes)
        .merge(batch_routes)
        .layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET /api/reports/daybook          - Cash daybook (JSON)");
    info!("  GET /api/reports/daybook/csv      - Cash daybook (CSV export)");
    info!("  GET /api/reports/batch/:batch_id  - Batch ledger report");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
