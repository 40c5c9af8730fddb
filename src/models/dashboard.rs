use super::chain::{ItemProcurement, ItemProduction, ProcurementKpis, ProcurementLedger, ProductionKpis};
use super::linked::ProductionPlan;
use super::order::{DocStatus, OrderKind};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 状态展示信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub status: String,
    pub status_color: String,
    pub progress_color: String,
    pub message: String,
}

/// 单行履约进度 (简版看板)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineProgress {
    pub item_code: String,
    pub item_name: Option<String>,
    pub ordered_qty: BigDecimal,
    pub fulfilled_qty: BigDecimal,
    pub pending_qty: BigDecimal,
    /// 行级百分比, 可超过 100 (超量收货/交货)
    pub percentage: BigDecimal,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

/// 单行收货/交货与开票进度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentLine {
    pub item_code: String,
    pub item_name: Option<String>,
    pub ordered_qty: BigDecimal,
    pub fulfilled_qty: BigDecimal,
    pub billed_qty: BigDecimal,
    pub pending_fulfillment: BigDecimal,
    pub pending_billing: BigDecimal,
    pub fulfilled_percentage: BigDecimal,
    pub billed_percentage: BigDecimal,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

/// 订单级汇总 (总体百分比已截断到 [0, 100])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentTotals {
    pub total_ordered: BigDecimal,
    pub total_fulfilled: BigDecimal,
    pub total_billed: BigDecimal,
    pub total_pending_fulfillment: BigDecimal,
    pub total_pending_billing: BigDecimal,
    pub overall_fulfilled_percentage: BigDecimal,
    pub overall_billed_percentage: BigDecimal,
}

/// 履约快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentSnapshot {
    #[serde(flatten)]
    pub totals: FulfillmentTotals,
    pub lines: Vec<FulfillmentLine>,
}

/// 简版订单进度看板 (采购订单收货 / 销售订单交货)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProgressDashboard {
    pub order_name: String,
    pub kind: OrderKind,
    pub party: Option<String>,
    pub party_name: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub order_status: String,
    pub overall_percentage: BigDecimal,
    pub total_ordered: BigDecimal,
    pub total_fulfilled: BigDecimal,
    pub total_pending: BigDecimal,
    pub total_amount: BigDecimal,
    pub items_data: Vec<LineProgress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// 采购订单状态看板
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderDashboard {
    pub po_name: String,
    pub supplier: Option<String>,
    pub supplier_name: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub schedule_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub docstatus: DocStatus,
    pub status_info: StatusInfo,
    #[serde(flatten)]
    pub totals: FulfillmentTotals,
    pub total_amount: BigDecimal,
    pub items_data: Vec<FulfillmentLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// 销售订单明细 (含生产与采购链路)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrderLine {
    #[serde(flatten)]
    pub fulfillment: FulfillmentLine,
    pub production: ItemProduction,
    pub procurement: ItemProcurement,
}

/// 销售订单综合看板
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderDashboard {
    pub so_name: String,
    pub customer: Option<String>,
    pub customer_name: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub docstatus: DocStatus,
    pub status_info: StatusInfo,
    #[serde(flatten)]
    pub totals: FulfillmentTotals,
    pub total_amount: BigDecimal,
    pub production_kpis: ProductionKpis,
    pub procurement_kpis: ProcurementKpis,
    pub items_data: Vec<SalesOrderLine>,
    pub production_plans: Vec<ProductionPlan>,
    pub procurement_data: ProcurementLedger,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// 物料申请明细进度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLine {
    pub item_code: String,
    pub item_name: Option<String>,
    pub requested_qty: BigDecimal,
    pub ordered_qty: BigDecimal,
    pub received_qty: BigDecimal,
    pub billed_qty: BigDecimal,
    pub pending_qty: BigDecimal,
    pub ordered_percentage: BigDecimal,
    pub received_percentage: BigDecimal,
    pub billed_percentage: BigDecimal,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
    pub procurement: ItemProcurement,
}

/// 物料申请的采购订单创建状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoCreationStatus {
    pub status: String,
    pub status_color: String,
    pub message: String,
    pub po_count: usize,
    pub total_amount: BigDecimal,
    pub draft_count: usize,
    pub submitted_count: usize,
}

/// 物料申请状态看板
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequestDashboard {
    pub mr_name: String,
    pub title: Option<String>,
    pub material_request_type: Option<String>,
    pub customer: Option<String>,
    pub customer_name: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub schedule_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub docstatus: DocStatus,
    pub per_ordered: BigDecimal,
    pub per_received: BigDecimal,
    pub total_requested: BigDecimal,
    pub total_ordered: BigDecimal,
    pub total_received: BigDecimal,
    pub total_billed: BigDecimal,
    pub total_pending: BigDecimal,
    pub overall_ordered_percentage: BigDecimal,
    pub overall_received_percentage: BigDecimal,
    pub overall_billed_percentage: BigDecimal,
    pub items_data: Vec<RequestLine>,
    pub po_status: PoCreationStatus,
    pub procurement_kpis: ProcurementKpis,
    pub status_info: StatusInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// 订单摘要: 计数与百分比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_name: String,
    pub kind: OrderKind,
    pub status: Option<String>,
    pub docstatus: DocStatus,
    pub total_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered_items: Option<usize>,
    pub fulfilled_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billed_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_ordered: Option<BigDecimal>,
    pub per_fulfilled: BigDecimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_billed: Option<BigDecimal>,
    pub overall_fulfilled_percentage: BigDecimal,
}
