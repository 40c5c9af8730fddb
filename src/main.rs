use buying_dashboard::api::{self, Services};
use buying_dashboard::{
    create_pool, AppConfig, DashboardService, HistoryService, LedgerReader, LedgerWriter,
    OverflowValidator, PgLedger, SupplierService,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!(
        "Starting server on {}:{}, history limit {}",
        config.server.host, config.server.port, config.dashboard.history_limit
    );

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created (max {} connections)", config.database.max_connections);

    let ledger = Arc::new(PgLedger::new(pool));
    let reader: Arc<dyn LedgerReader> = ledger.clone();
    let writer: Arc<dyn LedgerWriter> = ledger;

    let services = Services {
        dashboard: Arc::new(DashboardService::new(reader.clone())),
        history: Arc::new(HistoryService::new(
            reader.clone(),
            config.dashboard.history_limit,
            config.dashboard.site_url.clone(),
        )),
        supplier: Arc::new(SupplierService::new(reader.clone(), writer)),
        overflow: Arc::new(OverflowValidator::with_item_group_exemption(reader)),
    };

    let app = api::router(services).layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/{{purchase-orders|sales-orders|material-requests}}/:name/dashboard");
    info!("  GET  /api/items/:item_code/{{last-purchases|last-sales}}");
    info!("  POST /api/purchase-orders/consolidate");
    info!("  POST /api/purchase-orders/:name/supplier");
    info!("  POST /api/hooks/{{purchase-receipt|purchase-invoice}}/check-overflow");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
