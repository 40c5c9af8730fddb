use super::linked::{LinkedDocumentRow, ProductionPlan};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 采购链路各环节的原始明细 (按根单据过滤, 不含已取消单据)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcurementLedger {
    pub material_requests: Vec<LinkedDocumentRow>,
    pub purchase_orders: Vec<LinkedDocumentRow>,
    pub purchase_receipts: Vec<LinkedDocumentRow>,
    pub purchase_invoices: Vec<LinkedDocumentRow>,
}

/// 单个物料在采购链路上的数量
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemProcurement {
    pub requested_qty: BigDecimal,
    pub po_ordered_qty: BigDecimal,
    pub pr_received_qty: BigDecimal,
    pub pi_billed_qty: BigDecimal,
    pub percentage: BigDecimal,
}


/// 单个环节的汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HopSummary {
    /// 不同单据数量
    pub documents: usize,
    /// 按单据状态计数
    pub by_status: BTreeMap<String, usize>,
    pub total_qty: BigDecimal,
}


/// 采购链路 KPI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcurementKpis {
    pub material_requests: HopSummary,
    pub purchase_orders: HopSummary,
    pub purchase_receipts: HopSummary,
    pub purchase_invoices: HopSummary,
    pub overall_percentage: BigDecimal,
}

/// 单个物料的生产进度
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemProduction {
    pub planned_qty: BigDecimal,
    pub produced_qty: BigDecimal,
    pub pending_qty: BigDecimal,
    pub percentage: BigDecimal,
}


/// 生产计划阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionStage {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

/// 生产计划 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionKpis {
    pub stage: ProductionStage,
    pub total_plans: usize,
    pub completed_plans: usize,
    pub in_progress_plans: usize,
    pub total_planned_qty: BigDecimal,
    pub total_produced_qty: BigDecimal,
    pub overall_percentage: BigDecimal,
}

/// 销售订单关联的生产数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionLedger {
    pub plans: Vec<ProductionPlan>,
    pub items: Vec<super::linked::ProductionPlanItem>,
}
