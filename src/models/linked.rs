use super::order::OrderKind;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 采购链路中的一环
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hop {
    MaterialRequest,
    PurchaseOrder,
    PurchaseReceipt,
    PurchaseInvoice,
}

impl Hop {
    /// 采购链路顺序: 物料申请 → 采购订单 → 采购收货 → 采购发票
    pub const PROCUREMENT: [Hop; 4] = [
        Hop::MaterialRequest,
        Hop::PurchaseOrder,
        Hop::PurchaseReceipt,
        Hop::PurchaseInvoice,
    ];

    /// (主表, 明细表)
    pub fn tables(self) -> (&'static str, &'static str) {
        match self {
            Hop::MaterialRequest => ("tabMaterial Request", "tabMaterial Request Item"),
            Hop::PurchaseOrder => ("tabPurchase Order", "tabPurchase Order Item"),
            Hop::PurchaseReceipt => ("tabPurchase Receipt", "tabPurchase Receipt Item"),
            Hop::PurchaseInvoice => ("tabPurchase Invoice", "tabPurchase Invoice Item"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hop::MaterialRequest => "Material Request",
            Hop::PurchaseOrder => "Purchase Order",
            Hop::PurchaseReceipt => "Purchase Receipt",
            Hop::PurchaseInvoice => "Purchase Invoice",
        }
    }
}

/// 链路根单据: 销售订单或物料申请
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRoot {
    pub kind: OrderKind,
    pub name: String,
}

impl ChainRoot {
    pub fn sales_order(name: impl Into<String>) -> Self {
        Self {
            kind: OrderKind::SalesOrder,
            name: name.into(),
        }
    }

    pub fn material_request(name: impl Into<String>) -> Self {
        Self {
            kind: OrderKind::MaterialRequest,
            name: name.into(),
        }
    }

    /// 下游主表上指向根单据的列; 物料申请作为根时, 物料申请环节就是它自身
    pub fn link_column(&self, hop: Hop) -> &'static str {
        match (self.kind, hop) {
            (OrderKind::MaterialRequest, Hop::MaterialRequest) => "name",
            (OrderKind::MaterialRequest, _) => "material_request",
            _ => "sales_order",
        }
    }
}

/// 下游单据明细行
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LinkedDocumentRow {
    pub parent: String,
    pub status: Option<String>,
    pub docstatus: i16,
    pub item_code: Option<String>,
    pub qty: BigDecimal,
    pub amount: BigDecimal,
}

/// 物料申请关联的采购订单主表
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LinkedOrderHeader {
    pub name: String,
    pub status: Option<String>,
    pub docstatus: i16,
    pub total: BigDecimal,
}

/// 生产计划主表
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProductionPlan {
    pub name: String,
    pub status: Option<String>,
    pub docstatus: i16,
    pub posting_date: Option<NaiveDate>,
    pub total_planned_qty: BigDecimal,
    pub total_produced_qty: BigDecimal,
}

/// 生产计划明细
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProductionPlanItem {
    pub plan: String,
    pub item_code: Option<String>,
    pub planned_qty: BigDecimal,
    pub produced_qty: BigDecimal,
}

/// 历史交易方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Purchase,
    Sales,
}

impl TradeSide {
    pub fn order_kind(self) -> OrderKind {
        match self {
            TradeSide::Purchase => OrderKind::PurchaseOrder,
            TradeSide::Sales => OrderKind::SalesOrder,
        }
    }

    pub fn party_label(self) -> &'static str {
        match self {
            TradeSide::Purchase => "Supplier",
            TradeSide::Sales => "Customer",
        }
    }
}

/// 已提交订单中某物料的一条交易记录
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub order_name: String,
    pub party: Option<String>,
    pub party_name: Option<String>,
    pub currency: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub qty: BigDecimal,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

/// 供应商
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub name: String,
    pub supplier_name: Option<String>,
}
