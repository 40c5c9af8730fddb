pub mod handlers;

pub use handlers::*;

use crate::service::{DashboardService, HistoryService, OverflowValidator, SupplierService};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 各路由组使用的服务
#[derive(Clone)]
pub struct Services {
    pub dashboard: Arc<DashboardService>,
    pub history: Arc<HistoryService>,
    pub supplier: Arc<SupplierService>,
    pub overflow: Arc<OverflowValidator>,
}

/// 构建路由: 每组路由绑定自己的服务, 最后合并
pub fn router(services: Services) -> Router {
    let dashboard_routes = Router::new()
        .route("/api/purchase-orders/consolidate", post(handlers::consolidate_items))
        .route("/api/purchase-orders/:name/dashboard", get(handlers::purchase_order_dashboard))
        .route("/api/purchase-orders/:name/progress", get(handlers::purchase_order_progress))
        .route("/api/purchase-orders/:name/summary", get(handlers::purchase_order_summary))
        .route("/api/sales-orders/:name/dashboard", get(handlers::sales_order_dashboard))
        .route("/api/sales-orders/:name/progress", get(handlers::sales_order_progress))
        .route("/api/sales-orders/:name/summary", get(handlers::sales_order_summary))
        .route("/api/material-requests/:name/dashboard", get(handlers::material_request_dashboard))
        .route("/api/material-requests/:name/summary", get(handlers::material_request_summary))
        .with_state(services.dashboard);

    let history_routes = Router::new()
        .route("/api/items/:item_code/last-purchases", get(handlers::last_purchases))
        .route("/api/items/:item_code/last-sales", get(handlers::last_sales))
        .with_state(services.history);

    let supplier_routes = Router::new()
        .route("/api/purchase-orders/:name/supplier", post(handlers::update_supplier))
        .with_state(services.supplier);

    let hook_routes = Router::new()
        .route("/api/hooks/:doctype/check-overflow", post(handlers::check_overflow))
        .with_state(services.overflow);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(dashboard_routes)
        .merge(history_routes)
        .merge(supplier_routes)
        .merge(hook_routes)
}
