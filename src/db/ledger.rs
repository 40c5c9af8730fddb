use super::{queries, queries_chain};
use crate::models::{
    ChainRoot, Hop, LinkedDocumentRow, LinkedOrderHeader, OrderDocument, OrderKind,
    ProductionPlan, ProductionPlanItem, SupplierRecord, TradeSide, TransactionRecord,
};
use async_trait::async_trait;
use sqlx::PgPool;

/// 订单及下游单据的只读数据源
///
/// 根单据不存在时返回 `Ok(None)`; 下游查询为空时返回空列表。
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn order(&self, kind: OrderKind, name: &str) -> Result<Option<OrderDocument>, sqlx::Error>;

    /// 物料申请关联的采购订单 (docstatus 0/1)
    async fn linked_purchase_orders(
        &self,
        material_request: &str,
    ) -> Result<Vec<LinkedOrderHeader>, sqlx::Error>;

    /// 物料申请关联的已提交采购订单编号; 明细由调用方逐个 `order` 加载
    async fn submitted_purchase_order_names(&self, material_request: &str) -> Result<Vec<String>, sqlx::Error>;

    async fn chain_rows(&self, root: &ChainRoot, hop: Hop) -> Result<Vec<LinkedDocumentRow>, sqlx::Error>;

    async fn production_plans(&self, sales_order: &str) -> Result<Vec<ProductionPlan>, sqlx::Error>;

    async fn production_plan_items(&self, sales_order: &str) -> Result<Vec<ProductionPlanItem>, sqlx::Error>;

    async fn recent_transactions(
        &self,
        side: TradeSide,
        item_code: &str,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, sqlx::Error>;

    async fn supplier(&self, name: &str) -> Result<Option<SupplierRecord>, sqlx::Error>;

    async fn item_group_exempt(&self, item_code: &str) -> Result<bool, sqlx::Error>;
}

/// 写入接口
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    /// 仅更新草稿订单, 返回影响行数
    async fn set_order_supplier(
        &self,
        purchase_order: &str,
        supplier: &str,
        supplier_name: Option<&str>,
    ) -> Result<u64, sqlx::Error>;
}

/// PostgreSQL 实现
#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerReader for PgLedger {
    async fn order(&self, kind: OrderKind, name: &str) -> Result<Option<OrderDocument>, sqlx::Error> {
        let Some(header) = queries::get_order_header(&self.pool, kind, name).await? else {
            return Ok(None);
        };
        let rows = queries::list_order_lines(&self.pool, kind, name).await?;

        let doc = OrderDocument::assemble(kind, header, rows)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Some(doc))
    }

    async fn linked_purchase_orders(
        &self,
        material_request: &str,
    ) -> Result<Vec<LinkedOrderHeader>, sqlx::Error> {
        queries::list_linked_purchase_orders(&self.pool, material_request).await
    }

    async fn submitted_purchase_order_names(&self, material_request: &str) -> Result<Vec<String>, sqlx::Error> {
        queries::list_submitted_purchase_order_names(&self.pool, material_request).await
    }

    async fn chain_rows(&self, root: &ChainRoot, hop: Hop) -> Result<Vec<LinkedDocumentRow>, sqlx::Error> {
        queries_chain::query_chain_rows(&self.pool, root, hop).await
    }

    async fn production_plans(&self, sales_order: &str) -> Result<Vec<ProductionPlan>, sqlx::Error> {
        queries_chain::query_production_plans(&self.pool, sales_order).await
    }

    async fn production_plan_items(&self, sales_order: &str) -> Result<Vec<ProductionPlanItem>, sqlx::Error> {
        queries_chain::query_production_plan_items(&self.pool, sales_order).await
    }

    async fn recent_transactions(
        &self,
        side: TradeSide,
        item_code: &str,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, sqlx::Error> {
        queries::list_recent_transactions(&self.pool, side, item_code, limit).await
    }

    async fn supplier(&self, name: &str) -> Result<Option<SupplierRecord>, sqlx::Error> {
        queries::get_supplier(&self.pool, name).await
    }

    async fn item_group_exempt(&self, item_code: &str) -> Result<bool, sqlx::Error> {
        queries::is_item_group_exempt(&self.pool, item_code).await
    }
}

#[async_trait]
impl LedgerWriter for PgLedger {
    async fn set_order_supplier(
        &self,
        purchase_order: &str,
        supplier: &str,
        supplier_name: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        queries::update_order_supplier(&self.pool, purchase_order, supplier, supplier_name).await
    }
}
