use crate::error::AppError;
use crate::models::{
    ConsolidationResult, MaterialRequestDashboard, OrderKind, OrderProgressDashboard, OrderSummary,
    PurchaseOrderDashboard, SalesOrderDashboard,
};
use crate::service::{
    DashboardService, HistoryService, OverflowCheck, OverflowValidator, ReceivingDocument,
    SupplierService, SupplierUpdate,
};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// 通用响应体
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::OverDelivery { .. } => StatusCode::EXPECTATION_FAILED,
            AppError::Database(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("请求失败: {}", self);
        }

        let response = ApiResponse {
            success: false,
            message: self.to_string(),
        };
        (status, Json(response)).into_response()
    }
}

/// 请求体: 按订单编号或原始明细合并
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ConsolidateRequest {
    Order { purchase_order: String },
    Records { items: Vec<Value> },
}

/// 请求体: 新供应商
#[derive(Debug, Deserialize)]
pub struct SupplierRequest {
    pub supplier: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn purchase_order_dashboard(
    State(service): State<Arc<DashboardService>>,
    Path(name): Path<String>,
) -> Json<Option<PurchaseOrderDashboard>> {
    Json(service.purchase_order_status_dashboard(&name).await)
}

pub async fn purchase_order_progress(
    State(service): State<Arc<DashboardService>>,
    Path(name): Path<String>,
) -> Json<Option<OrderProgressDashboard>> {
    Json(service.purchase_order_progress(&name).await)
}

pub async fn purchase_order_summary(
    State(service): State<Arc<DashboardService>>,
    Path(name): Path<String>,
) -> Json<Option<OrderSummary>> {
    Json(service.order_summary(OrderKind::PurchaseOrder, &name).await)
}

pub async fn sales_order_dashboard(
    State(service): State<Arc<DashboardService>>,
    Path(name): Path<String>,
) -> Json<Option<SalesOrderDashboard>> {
    Json(service.sales_order_status_dashboard(&name).await)
}

pub async fn sales_order_progress(
    State(service): State<Arc<DashboardService>>,
    Path(name): Path<String>,
) -> Json<Option<OrderProgressDashboard>> {
    Json(service.sales_order_progress(&name).await)
}

pub async fn sales_order_summary(
    State(service): State<Arc<DashboardService>>,
    Path(name): Path<String>,
) -> Json<Option<OrderSummary>> {
    Json(service.order_summary(OrderKind::SalesOrder, &name).await)
}

pub async fn material_request_dashboard(
    State(service): State<Arc<DashboardService>>,
    Path(name): Path<String>,
) -> Json<Option<MaterialRequestDashboard>> {
    Json(service.material_request_status_dashboard(&name).await)
}

pub async fn material_request_summary(
    State(service): State<Arc<DashboardService>>,
    Path(name): Path<String>,
) -> Json<Option<OrderSummary>> {
    Json(service.order_summary(OrderKind::MaterialRequest, &name).await)
}

/// 合并采购订单明细
pub async fn consolidate_items(
    State(service): State<Arc<DashboardService>>,
    Json(req): Json<ConsolidateRequest>,
) -> Result<Json<ConsolidationResult>, AppError> {
    let result = match req {
        ConsolidateRequest::Order { purchase_order } => {
            service.consolidate_purchase_order(&purchase_order).await?
        }
        ConsolidateRequest::Records { items } => service.consolidate_records(&items),
    };
    Ok(Json(result))
}

/// 无记录时返回 false
fn html_or_false(html: Option<String>) -> Json<Value> {
    Json(html.map(Value::String).unwrap_or(Value::Bool(false)))
}

pub async fn last_purchases(
    State(service): State<Arc<HistoryService>>,
    Path(item_code): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(html_or_false(service.last_purchases(&item_code).await?))
}

pub async fn last_sales(
    State(service): State<Arc<HistoryService>>,
    Path(item_code): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(html_or_false(service.last_sales(&item_code).await?))
}

/// 修改草稿采购订单的供应商
pub async fn update_supplier(
    State(service): State<Arc<SupplierService>>,
    Path(name): Path<String>,
    Json(req): Json<SupplierRequest>,
) -> Result<Json<SupplierUpdate>, AppError> {
    Ok(Json(service.update_supplier(&name, &req.supplier).await?))
}

/// 收货/开票单据保存前的超量检查
pub async fn check_overflow(
    State(validator): State<Arc<OverflowValidator>>,
    Path(doctype): Path<String>,
    Json(check): Json<OverflowCheck>,
) -> Result<Json<ApiResponse>, AppError> {
    let doc = ReceivingDocument::from_route(&doctype)
        .ok_or_else(|| AppError::not_found("Receiving document type", doctype.clone()))?;

    validator.check_overflow_with_allowance(doc, &check).await?;
    Ok(Json(ApiResponse {
        success: true,
        message: format!("{} {} within allowance", doc.doctype(), check.item_code),
    }))
}
