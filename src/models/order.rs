use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// 订单类型 (采购订单 / 销售订单 / 物料申请)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    PurchaseOrder,
    SalesOrder,
    MaterialRequest,
}

impl OrderKind {
    /// ERP 中的单据类型名称
    pub fn doctype(self) -> &'static str {
        match self {
            OrderKind::PurchaseOrder => "Purchase Order",
            OrderKind::SalesOrder => "Sales Order",
            OrderKind::MaterialRequest => "Material Request",
        }
    }

    /// 单据链接路径 (/app/purchase-order/...)
    pub fn route(self) -> &'static str {
        match self {
            OrderKind::PurchaseOrder => "purchase-order",
            OrderKind::SalesOrder => "sales-order",
            OrderKind::MaterialRequest => "material-request",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.doctype())
    }
}

/// 单据生命周期: 0=草稿, 1=已提交, 2=已取消
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum DocStatus {
    Draft,
    Submitted,
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid docstatus {0}")]
pub struct InvalidDocStatus(pub i16);

impl TryFrom<i16> for DocStatus {
    type Error = InvalidDocStatus;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DocStatus::Draft),
            1 => Ok(DocStatus::Submitted),
            2 => Ok(DocStatus::Cancelled),
            other => Err(InvalidDocStatus(other)),
        }
    }
}

impl From<DocStatus> for i16 {
    fn from(status: DocStatus) -> Self {
        match status {
            DocStatus::Draft => 0,
            DocStatus::Submitted => 1,
            DocStatus::Cancelled => 2,
        }
    }
}

/// 单据主表查询行 (三种订单统一别名后的列)
#[derive(Debug, Clone, FromRow)]
pub struct OrderHeaderRow {
    pub name: String,
    pub title: Option<String>,
    pub order_type: Option<String>,
    pub party: Option<String>,
    pub party_name: Option<String>,
    pub currency: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub docstatus: i16,
    pub total: BigDecimal,
    pub per_ordered: BigDecimal,
    pub per_fulfilled: BigDecimal,
    pub per_billed: BigDecimal,
}

/// 单据明细查询行 (item_code 可能为空, 需在组装时过滤)
#[derive(Debug, Clone, FromRow)]
pub struct OrderLineRow {
    pub idx: Option<i32>,
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub item_group: Option<String>,
    pub uom: Option<String>,
    pub qty: BigDecimal,
    pub fulfilled_qty: BigDecimal,
    pub ordered_qty: BigDecimal,
    pub billed_amt: BigDecimal,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

/// 订单明细
///
/// `fulfilled_qty` 对采购订单/物料申请为已收货数量, 对销售订单为已交货数量;
/// `ordered_qty` 仅物料申请使用 (已下采购订单的数量)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_code: String,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub item_group: Option<String>,
    #[serde(default)]
    pub uom: Option<String>,
    pub qty: BigDecimal,
    pub fulfilled_qty: BigDecimal,
    pub ordered_qty: BigDecimal,
    pub billed_amt: BigDecimal,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

impl OrderLine {
    pub fn new(item_code: impl Into<String>, qty: BigDecimal, rate: BigDecimal) -> Self {
        let amount = &qty * &rate;
        Self {
            item_code: item_code.into(),
            item_name: None,
            item_group: None,
            uom: None,
            qty,
            fulfilled_qty: BigDecimal::zero(),
            ordered_qty: BigDecimal::zero(),
            billed_amt: BigDecimal::zero(),
            rate,
            amount,
        }
    }

    pub fn with_fulfilled(mut self, fulfilled_qty: BigDecimal) -> Self {
        self.fulfilled_qty = fulfilled_qty;
        self
    }

    pub fn with_ordered(mut self, ordered_qty: BigDecimal) -> Self {
        self.ordered_qty = ordered_qty;
        self
    }

    pub fn with_billed_amt(mut self, billed_amt: BigDecimal) -> Self {
        self.billed_amt = billed_amt;
        self
    }

    pub fn with_name(mut self, item_name: impl Into<String>) -> Self {
        self.item_name = Some(item_name.into());
        self
    }
}

/// 订单快照 - 每次请求从数据库重新构建, 聚合函数只读取该值对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDocument {
    pub kind: OrderKind,
    pub name: String,
    pub title: Option<String>,
    pub order_type: Option<String>,
    /// 供应商或客户
    pub party: Option<String>,
    pub party_name: Option<String>,
    pub currency: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    /// schedule_date / delivery_date
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub docstatus: DocStatus,
    pub total: BigDecimal,
    pub per_ordered: BigDecimal,
    pub per_fulfilled: BigDecimal,
    pub per_billed: BigDecimal,
    pub lines: Vec<OrderLine>,
    /// 加载时被跳过的明细
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl OrderDocument {
    pub fn new(kind: OrderKind, name: impl Into<String>, docstatus: DocStatus) -> Self {
        Self {
            kind,
            name: name.into(),
            title: None,
            order_type: None,
            party: None,
            party_name: None,
            currency: None,
            transaction_date: None,
            due_date: None,
            status: None,
            docstatus,
            total: BigDecimal::zero(),
            per_ordered: BigDecimal::zero(),
            per_fulfilled: BigDecimal::zero(),
            per_billed: BigDecimal::zero(),
            lines: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// 由主表行和明细行组装; 缺少物料编码的明细被跳过并记录
    pub fn assemble(
        kind: OrderKind,
        header: OrderHeaderRow,
        rows: Vec<OrderLineRow>,
    ) -> Result<Self, InvalidDocStatus> {
        let docstatus = DocStatus::try_from(header.docstatus)?;
        let mut lines = Vec::with_capacity(rows.len());
        let mut diagnostics = Vec::new();

        for row in rows {
            let Some(item_code) = row.item_code.filter(|code| !code.is_empty()) else {
                let note = format!(
                    "{} {}: line {} has no item code, skipped",
                    kind,
                    header.name,
                    row.idx.map(|i| i.to_string()).unwrap_or_else(|| "?".to_string())
                );
                tracing::warn!("{}", note);
                diagnostics.push(note);
                continue;
            };

            lines.push(OrderLine {
                item_code,
                item_name: row.item_name,
                item_group: row.item_group,
                uom: row.uom,
                qty: row.qty,
                fulfilled_qty: row.fulfilled_qty,
                ordered_qty: row.ordered_qty,
                billed_amt: row.billed_amt,
                rate: row.rate,
                amount: row.amount,
            });
        }

        Ok(Self {
            kind,
            name: header.name,
            title: header.title,
            order_type: header.order_type,
            party: header.party,
            party_name: header.party_name,
            currency: header.currency,
            transaction_date: header.transaction_date,
            due_date: header.due_date,
            status: header.status,
            docstatus,
            total: header.total,
            per_ordered: header.per_ordered,
            per_fulfilled: header.per_fulfilled,
            per_billed: header.per_billed,
            lines,
            diagnostics,
        })
    }

    pub fn with_lines(mut self, lines: Vec<OrderLine>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    pub fn host_status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(docstatus: i16) -> OrderHeaderRow {
        OrderHeaderRow {
            name: "PO-0001".to_string(),
            title: None,
            order_type: None,
            party: Some("SUP-1".to_string()),
            party_name: None,
            currency: Some("USD".to_string()),
            transaction_date: None,
            due_date: None,
            status: Some("To Receive and Bill".to_string()),
            docstatus,
            total: BigDecimal::from(100),
            per_ordered: BigDecimal::zero(),
            per_fulfilled: BigDecimal::zero(),
            per_billed: BigDecimal::zero(),
        }
    }

    fn row(item_code: Option<&str>) -> OrderLineRow {
        OrderLineRow {
            idx: Some(1),
            item_code: item_code.map(str::to_string),
            item_name: None,
            item_group: None,
            uom: None,
            qty: BigDecimal::from(10),
            fulfilled_qty: BigDecimal::zero(),
            ordered_qty: BigDecimal::zero(),
            billed_amt: BigDecimal::zero(),
            rate: BigDecimal::from(10),
            amount: BigDecimal::from(100),
        }
    }

    #[test]
    fn assemble_skips_lines_without_item_code() {
        let doc = OrderDocument::assemble(
            OrderKind::PurchaseOrder,
            header(1),
            vec![row(Some("ITEM-A")), row(None), row(Some(""))],
        )
        .unwrap();

        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.diagnostics.len(), 2);
        assert_eq!(doc.docstatus, DocStatus::Submitted);
    }

    #[test]
    fn assemble_rejects_unknown_docstatus() {
        let err = OrderDocument::assemble(OrderKind::PurchaseOrder, header(7), vec![]).unwrap_err();
        assert_eq!(err.0, 7);
    }

    #[test]
    fn docstatus_serializes_as_number() {
        let json = serde_json::to_string(&DocStatus::Cancelled).unwrap();
        assert_eq!(json, "2");
        let back: DocStatus = serde_json::from_str("0").unwrap();
        assert_eq!(back, DocStatus::Draft);
    }
}
