#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use buying_dashboard::models::{
    ChainRoot, DocStatus, Hop, LinkedDocumentRow, LinkedOrderHeader, OrderDocument, OrderKind,
    ProductionPlan, ProductionPlanItem, SupplierRecord, TradeSide, TransactionRecord,
};
use buying_dashboard::{LedgerReader, LedgerWriter};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Mutex;

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

pub fn chain_row(parent: &str, status: &str, item: &str, qty: &str) -> LinkedDocumentRow {
    LinkedDocumentRow {
        parent: parent.to_string(),
        status: Some(status.to_string()),
        docstatus: 1,
        item_code: Some(item.to_string()),
        qty: dec(qty),
        amount: dec("0"),
    }
}

/// 内存账本: 测试用的 LedgerReader + LedgerWriter
#[derive(Default)]
pub struct InMemoryLedger {
    pub orders: Mutex<HashMap<(OrderKind, String), OrderDocument>>,
    /// 物料申请 → 关联采购订单编号
    pub mr_purchase_orders: HashMap<String, Vec<String>>,
    pub chain: HashMap<(String, Hop), Vec<LinkedDocumentRow>>,
    pub failing_hops: HashSet<Hop>,
    pub fail_orders: bool,
    /// 单个订单读取失败
    pub failing_orders: HashSet<String>,
    pub fail_linked_orders: bool,
    pub plans: HashMap<String, Vec<ProductionPlan>>,
    pub plan_items: HashMap<String, Vec<ProductionPlanItem>>,
    pub transactions: Vec<(TradeSide, String, TransactionRecord)>,
    pub suppliers: HashMap<String, SupplierRecord>,
    pub exempt_items: HashSet<String>,
}

impl InMemoryLedger {
    pub fn with_order(self, doc: OrderDocument) -> Self {
        self.orders
            .lock()
            .unwrap()
            .insert((doc.kind, doc.name.clone()), doc);
        self
    }

    pub fn with_chain(mut self, root: &str, hop: Hop, rows: Vec<LinkedDocumentRow>) -> Self {
        self.chain.insert((root.to_string(), hop), rows);
        self
    }

    pub fn failing(mut self, hop: Hop) -> Self {
        self.failing_hops.insert(hop);
        self
    }

    pub fn failing_order(mut self, name: &str) -> Self {
        self.failing_orders.insert(name.to_string());
        self
    }

    pub fn link_purchase_orders(mut self, material_request: &str, orders: &[&str]) -> Self {
        self.mr_purchase_orders.insert(
            material_request.to_string(),
            orders.iter().map(|po| po.to_string()).collect(),
        );
        self
    }

    pub fn with_supplier(mut self, name: &str, supplier_name: &str) -> Self {
        self.suppliers.insert(
            name.to_string(),
            SupplierRecord {
                name: name.to_string(),
                supplier_name: Some(supplier_name.to_string()),
            },
        );
        self
    }

    pub fn order_snapshot(&self, kind: OrderKind, name: &str) -> Option<OrderDocument> {
        self.orders
            .lock()
            .unwrap()
            .get(&(kind, name.to_string()))
            .cloned()
    }

    fn linked(&self, material_request: &str) -> Vec<OrderDocument> {
        let names = self
            .mr_purchase_orders
            .get(material_request)
            .cloned()
            .unwrap_or_default();
        names
            .iter()
            .filter_map(|name| self.order_snapshot(OrderKind::PurchaseOrder, name))
            .collect()
    }
}

fn unavailable(what: &str) -> sqlx::Error {
    sqlx::Error::Protocol(format!("{} unavailable", what))
}

#[async_trait]
impl LedgerReader for InMemoryLedger {
    async fn order(&self, kind: OrderKind, name: &str) -> Result<Option<OrderDocument>, sqlx::Error> {
        if self.fail_orders || self.failing_orders.contains(name) {
            return Err(unavailable(&format!("order {}", name)));
        }
        Ok(self.order_snapshot(kind, name))
    }

    async fn linked_purchase_orders(
        &self,
        material_request: &str,
    ) -> Result<Vec<LinkedOrderHeader>, sqlx::Error> {
        if self.fail_linked_orders {
            return Err(unavailable("linked purchase orders"));
        }
        Ok(self
            .linked(material_request)
            .into_iter()
            .filter(|po| po.docstatus != DocStatus::Cancelled)
            .map(|po| LinkedOrderHeader {
                name: po.name,
                status: po.status,
                docstatus: po.docstatus.into(),
                total: po.total,
            })
            .collect())
    }

    async fn submitted_purchase_order_names(&self, material_request: &str) -> Result<Vec<String>, sqlx::Error> {
        Ok(self
            .linked(material_request)
            .into_iter()
            .filter(|po| po.docstatus == DocStatus::Submitted)
            .map(|po| po.name)
            .collect())
    }

    async fn chain_rows(&self, root: &ChainRoot, hop: Hop) -> Result<Vec<LinkedDocumentRow>, sqlx::Error> {
        if self.failing_hops.contains(&hop) {
            return Err(unavailable(hop.label()));
        }
        Ok(self
            .chain
            .get(&(root.name.clone(), hop))
            .cloned()
            .unwrap_or_default())
    }

    async fn production_plans(&self, sales_order: &str) -> Result<Vec<ProductionPlan>, sqlx::Error> {
        Ok(self.plans.get(sales_order).cloned().unwrap_or_default())
    }

    async fn production_plan_items(&self, sales_order: &str) -> Result<Vec<ProductionPlanItem>, sqlx::Error> {
        Ok(self.plan_items.get(sales_order).cloned().unwrap_or_default())
    }

    async fn recent_transactions(
        &self,
        side: TradeSide,
        item_code: &str,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, sqlx::Error> {
        let mut rows: Vec<TransactionRecord> = self
            .transactions
            .iter()
            .filter(|(s, code, _)| *s == side && code == item_code)
            .map(|(_, _, record)| record.clone())
            .collect();
        rows.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn supplier(&self, name: &str) -> Result<Option<SupplierRecord>, sqlx::Error> {
        Ok(self.suppliers.get(name).cloned())
    }

    async fn item_group_exempt(&self, item_code: &str) -> Result<bool, sqlx::Error> {
        Ok(self.exempt_items.contains(item_code))
    }
}

#[async_trait]
impl LedgerWriter for InMemoryLedger {
    async fn set_order_supplier(
        &self,
        purchase_order: &str,
        supplier: &str,
        supplier_name: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(&(OrderKind::PurchaseOrder, purchase_order.to_string())) {
            Some(doc) if doc.docstatus == DocStatus::Draft => {
                doc.party = Some(supplier.to_string());
                doc.party_name = Some(supplier_name.unwrap_or(supplier).to_string());
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}
