use crate::db::{LedgerReader, LedgerWriter};
use crate::error::{AppError, AppResult};
use crate::models::{DocStatus, OrderKind};
use serde::Serialize;
use std::sync::Arc;

/// 供应商更新结果
#[derive(Debug, Clone, Serialize)]
pub struct SupplierUpdate {
    pub success: bool,
    pub message: String,
    pub purchase_order: String,
    pub supplier: String,
    pub supplier_name: Option<String>,
}

/// 草稿采购订单的供应商更新
pub struct SupplierService {
    ledger: Arc<dyn LedgerReader>,
    writer: Arc<dyn LedgerWriter>,
}

impl SupplierService {
    pub fn new(ledger: Arc<dyn LedgerReader>, writer: Arc<dyn LedgerWriter>) -> Self {
        Self { ledger, writer }
    }

    /// 只允许修改草稿订单; 供应商必须存在
    pub async fn update_supplier(&self, purchase_order: &str, supplier: &str) -> AppResult<SupplierUpdate> {
        let supplier = supplier.trim();
        if supplier.is_empty() {
            return Err(AppError::Validation("Supplier is required".to_string()));
        }

        let order = self
            .ledger
            .order(OrderKind::PurchaseOrder, purchase_order)
            .await?
            .ok_or_else(|| AppError::not_found("Purchase Order", purchase_order))?;

        if order.docstatus != DocStatus::Draft {
            return Err(AppError::Validation(format!(
                "Purchase Order {} is not in draft status, supplier cannot be changed",
                purchase_order
            )));
        }

        let record = self
            .ledger
            .supplier(supplier)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Supplier {} does not exist", supplier)))?;

        // 条件更新: 读取后若订单已被提交则影响 0 行
        let affected = self
            .writer
            .set_order_supplier(purchase_order, &record.name, record.supplier_name.as_deref())
            .await?;
        if affected == 0 {
            return Err(AppError::Validation(format!(
                "Purchase Order {} is no longer a draft, supplier was not updated",
                purchase_order
            )));
        }

        tracing::info!("采购订单 {} 供应商已更新为 {}", purchase_order, record.name);
        Ok(SupplierUpdate {
            success: true,
            message: format!("Supplier updated to {}", record.name),
            purchase_order: purchase_order.to_string(),
            supplier: record.name,
            supplier_name: record.supplier_name,
        })
    }
}
