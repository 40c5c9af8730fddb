use crate::models::{DocStatus, LinkedOrderHeader, OrderKind, PoCreationStatus, StatusInfo};
use bigdecimal::{BigDecimal, Zero};

/// 看板状态标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    Draft,
    Cancelled,
    Stopped,
    Closed,
    OnHold,
    Completed,
    ToBill,
    ToReceive,
    PartiallyReceived,
    ToReceiveAndBill,
    PartiallyOrdered,
    PendingOrder,
    DeliveredAndBilled,
    ProductionComplete,
    ProcurementComplete,
    InProgress,
    ToDeliverAndBill,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::Draft => "Draft",
            StatusLabel::Cancelled => "Cancelled",
            StatusLabel::Stopped => "Stopped",
            StatusLabel::Closed => "Closed",
            StatusLabel::OnHold => "On Hold",
            StatusLabel::Completed => "Completed",
            StatusLabel::ToBill => "To Bill",
            StatusLabel::ToReceive => "To Receive",
            StatusLabel::PartiallyReceived => "Partially Received",
            StatusLabel::ToReceiveAndBill => "To Receive and Bill",
            StatusLabel::PartiallyOrdered => "Partially Ordered",
            StatusLabel::PendingOrder => "Pending Order",
            StatusLabel::DeliveredAndBilled => "Delivered & Billed",
            StatusLabel::ProductionComplete => "Production Complete",
            StatusLabel::ProcurementComplete => "Procurement Complete",
            StatusLabel::InProgress => "In Progress",
            StatusLabel::ToDeliverAndBill => "To Deliver and Bill",
        }
    }

    /// ERP 单据上的挂起/终止状态, 直接透传
    fn from_host(status: &str) -> Option<Self> {
        match status {
            "Stopped" => Some(StatusLabel::Stopped),
            "Closed" => Some(StatusLabel::Closed),
            "On Hold" => Some(StatusLabel::OnHold),
            "Completed" => Some(StatusLabel::Completed),
            _ => None,
        }
    }
}

/// 分类所需的百分比 (订单级, 已截断)
///
/// `ordered` 仅物料申请使用, `production`/`procurement` 仅销售订单使用。
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub ordered: BigDecimal,
    pub fulfilled: BigDecimal,
    pub billed: BigDecimal,
    pub production: BigDecimal,
    pub procurement: BigDecimal,
}

fn done(value: &BigDecimal) -> bool {
    *value >= BigDecimal::from(100)
}

fn started(value: &BigDecimal) -> bool {
    *value > BigDecimal::zero()
}

/// 按优先级分类, 第一条命中的规则生效
pub fn classify(
    kind: OrderKind,
    docstatus: DocStatus,
    host_status: Option<&str>,
    progress: &Progress,
) -> StatusLabel {
    match docstatus {
        DocStatus::Draft => return StatusLabel::Draft,
        DocStatus::Cancelled => return StatusLabel::Cancelled,
        DocStatus::Submitted => {}
    }

    if let Some(label) = host_status.and_then(StatusLabel::from_host) {
        return label;
    }

    let p = progress;
    match kind {
        OrderKind::MaterialRequest => {
            if done(&p.ordered) && done(&p.fulfilled) && done(&p.billed) {
                StatusLabel::Completed
            } else if done(&p.ordered) && done(&p.fulfilled) {
                StatusLabel::ToBill
            } else if done(&p.ordered) {
                StatusLabel::ToReceive
            } else if started(&p.ordered) {
                StatusLabel::PartiallyOrdered
            } else {
                StatusLabel::PendingOrder
            }
        }
        OrderKind::PurchaseOrder => {
            if done(&p.fulfilled) && done(&p.billed) {
                StatusLabel::Completed
            } else if done(&p.fulfilled) {
                StatusLabel::ToBill
            } else if started(&p.fulfilled) {
                StatusLabel::PartiallyReceived
            } else if started(&p.billed) {
                StatusLabel::ToReceive
            } else {
                StatusLabel::ToReceiveAndBill
            }
        }
        OrderKind::SalesOrder => {
            if done(&p.fulfilled) && done(&p.billed) && done(&p.production) && done(&p.procurement) {
                StatusLabel::Completed
            } else if done(&p.fulfilled) && done(&p.billed) {
                StatusLabel::DeliveredAndBilled
            } else if done(&p.fulfilled) {
                StatusLabel::ToBill
            } else if done(&p.production) {
                StatusLabel::ProductionComplete
            } else if done(&p.procurement) {
                StatusLabel::ProcurementComplete
            } else if started(&p.fulfilled) || started(&p.billed) {
                StatusLabel::InProgress
            } else {
                StatusLabel::ToDeliverAndBill
            }
        }
    }
}

/// 标签 → (状态颜色, 进度条颜色, 提示信息)
fn appearance(kind: OrderKind, label: StatusLabel) -> (&'static str, &'static str, String) {
    let fixed = |color: &'static str, progress: &'static str, message: &str| (color, progress, message.to_string());
    match label {
        StatusLabel::Draft => ("#6c757d", "#1976d2", format!("{} is in draft status", kind)),
        StatusLabel::Cancelled => ("#dc3545", "#d32f2f", format!("{} has been cancelled", kind)),
        StatusLabel::Stopped => ("#dc3545", "#d32f2f", format!("{} has been stopped", kind)),
        StatusLabel::Closed => ("#6c757d", "#6c757d", format!("{} has been closed", kind)),
        StatusLabel::OnHold => ("#fd7e14", "#f57c00", format!("{} is on hold", kind)),
        StatusLabel::Completed => match kind {
            OrderKind::MaterialRequest => fixed("#2e7d32", "#2e7d32", "All items ordered, received and billed"),
            OrderKind::PurchaseOrder => fixed("#2e7d32", "#2e7d32", "All items received and billed"),
            OrderKind::SalesOrder => fixed("#2e7d32", "#2e7d32", "All processes completed successfully"),
        },
        StatusLabel::ToBill => match kind {
            OrderKind::MaterialRequest => {
                fixed("#f57c00", "#f57c00", "All items ordered and received, pending billing")
            }
            OrderKind::PurchaseOrder => fixed("#f57c00", "#f57c00", "All items received, pending billing"),
            OrderKind::SalesOrder => fixed("#f57c00", "#f57c00", "All items delivered, pending billing"),
        },
        StatusLabel::ToReceive => match kind {
            OrderKind::MaterialRequest => fixed("#1976d2", "#1976d2", "All items ordered, pending receipt"),
            _ => fixed("#1976d2", "#1976d2", "Items billed, pending receipt"),
        },
        StatusLabel::PartiallyReceived => {
            fixed("#f57c00", "#f57c00", "Some items received, pending completion")
        }
        StatusLabel::ToReceiveAndBill => fixed("#1976d2", "#1976d2", "Items pending receipt and billing"),
        StatusLabel::PartiallyOrdered => fixed("#f57c00", "#f57c00", "Some items ordered, pending completion"),
        StatusLabel::PendingOrder => fixed("#dc3545", "#1976d2", "No items ordered yet"),
        StatusLabel::DeliveredAndBilled => fixed(
            "#2e7d32",
            "#2e7d32",
            "Order delivered and billed, production/procurement may be pending",
        ),
        StatusLabel::ProductionComplete => fixed("#1976d2", "#1976d2", "Production completed, pending delivery"),
        StatusLabel::ProcurementComplete => {
            fixed("#1976d2", "#1976d2", "Procurement completed, pending production")
        }
        StatusLabel::InProgress => fixed("#1976d2", "#1976d2", "Order is being processed"),
        StatusLabel::ToDeliverAndBill => fixed("#f57c00", "#f57c00", "Items pending delivery and billing"),
    }
}

pub fn status_info(kind: OrderKind, label: StatusLabel) -> StatusInfo {
    let (status_color, progress_color, message) = appearance(kind, label);
    StatusInfo {
        status: label.as_str().to_string(),
        status_color: status_color.to_string(),
        progress_color: progress_color.to_string(),
        message,
    }
}

/// 分类并生成展示信息
pub fn describe(
    kind: OrderKind,
    docstatus: DocStatus,
    host_status: Option<&str>,
    progress: &Progress,
) -> StatusInfo {
    status_info(kind, classify(kind, docstatus, host_status, progress))
}

/// 简版看板的订单状态: 全部 / 部分 / 尚未收货(交货)
pub fn progress_label(kind: OrderKind, docstatus: DocStatus, percentage: &BigDecimal) -> String {
    let (fully, partially, pending) = match kind {
        OrderKind::SalesOrder => ("Fully Delivered", "Partially Delivered", "Pending Delivery"),
        _ => ("Fully Received", "Partially Received", "Pending Receipt"),
    };

    let label = match docstatus {
        DocStatus::Draft => "Draft",
        DocStatus::Cancelled => "Cancelled",
        DocStatus::Submitted if done(percentage) => fully,
        DocStatus::Submitted if started(percentage) => partially,
        DocStatus::Submitted => pending,
    };
    label.to_string()
}

/// 物料申请的采购订单创建状态 (传入 docstatus 为 0/1 的采购订单)
pub fn po_creation_status(orders: &[LinkedOrderHeader]) -> PoCreationStatus {
    let total_amount = orders
        .iter()
        .fold(BigDecimal::zero(), |acc, po| acc + &po.total);
    let draft_count = orders.iter().filter(|po| po.docstatus == 0).count();
    let submitted_count = orders.iter().filter(|po| po.docstatus == 1).count();

    let (status, status_color, message) = if orders.is_empty() {
        (
            "No PO Created",
            "#dc3545",
            "No Purchase Orders created from this Material Request".to_string(),
        )
    } else if submitted_count > 0 {
        (
            "POs Created",
            "#2e7d32",
            format!("{} submitted Purchase Order(s) created", submitted_count),
        )
    } else {
        (
            "Draft POs Only",
            "#f57c00",
            format!("{} draft Purchase Order(s) created", draft_count),
        )
    };

    PoCreationStatus {
        status: status.to_string(),
        status_color: status_color.to_string(),
        message,
        po_count: orders.len(),
        total_amount,
        draft_count,
        submitted_count,
    }
}

/// 查询采购订单失败时的占位状态
pub fn po_creation_error() -> PoCreationStatus {
    PoCreationStatus {
        status: "Error".to_string(),
        status_color: "#dc3545".to_string(),
        message: "Error retrieving PO status".to_string(),
        po_count: 0,
        total_amount: BigDecimal::zero(),
        draft_count: 0,
        submitted_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(v: i32) -> BigDecimal {
        BigDecimal::from(v)
    }

    fn progress(ordered: i32, fulfilled: i32, billed: i32) -> Progress {
        Progress {
            ordered: pct(ordered),
            fulfilled: pct(fulfilled),
            billed: pct(billed),
            ..Progress::default()
        }
    }

    #[test]
    fn lifecycle_beats_progress() {
        let full = progress(100, 100, 100);
        assert_eq!(
            classify(OrderKind::PurchaseOrder, DocStatus::Draft, Some("Closed"), &full),
            StatusLabel::Draft
        );
        assert_eq!(
            classify(OrderKind::SalesOrder, DocStatus::Cancelled, None, &full),
            StatusLabel::Cancelled
        );
    }

    #[test]
    fn host_hold_states_pass_through() {
        let none = Progress::default();
        assert_eq!(
            classify(OrderKind::MaterialRequest, DocStatus::Submitted, Some("Stopped"), &none),
            StatusLabel::Stopped
        );
        assert_eq!(
            classify(OrderKind::SalesOrder, DocStatus::Submitted, Some("On Hold"), &none),
            StatusLabel::OnHold
        );
        assert_eq!(
            classify(OrderKind::PurchaseOrder, DocStatus::Submitted, Some("To Bill"), &none),
            StatusLabel::ToReceiveAndBill
        );
    }

    #[test]
    fn material_request_ladder() {
        let mr = |o, r, b| classify(OrderKind::MaterialRequest, DocStatus::Submitted, None, &progress(o, r, b));
        assert_eq!(mr(100, 100, 100), StatusLabel::Completed);
        assert_eq!(mr(100, 100, 40), StatusLabel::ToBill);
        assert_eq!(mr(100, 30, 0), StatusLabel::ToReceive);
        assert_eq!(mr(20, 0, 0), StatusLabel::PartiallyOrdered);
        assert_eq!(mr(0, 0, 0), StatusLabel::PendingOrder);
    }

    #[test]
    fn purchase_order_ladder() {
        let po = |r, b| classify(OrderKind::PurchaseOrder, DocStatus::Submitted, None, &progress(0, r, b));
        assert_eq!(po(100, 100), StatusLabel::Completed);
        assert_eq!(po(100, 10), StatusLabel::ToBill);
        assert_eq!(po(10, 100), StatusLabel::PartiallyReceived);
        assert_eq!(po(0, 50), StatusLabel::ToReceive);
        assert_eq!(po(0, 0), StatusLabel::ToReceiveAndBill);
    }

    #[test]
    fn sales_order_needs_production_and_procurement_to_complete() {
        let mut p = progress(0, 100, 100);
        assert_eq!(
            classify(OrderKind::SalesOrder, DocStatus::Submitted, None, &p),
            StatusLabel::DeliveredAndBilled
        );

        p.production = pct(100);
        p.procurement = pct(100);
        assert_eq!(
            classify(OrderKind::SalesOrder, DocStatus::Submitted, None, &p),
            StatusLabel::Completed
        );

        let p = Progress {
            production: pct(100),
            ..Progress::default()
        };
        assert_eq!(
            classify(OrderKind::SalesOrder, DocStatus::Submitted, None, &p),
            StatusLabel::ProductionComplete
        );
        assert_eq!(
            classify(OrderKind::SalesOrder, DocStatus::Submitted, None, &Progress::default()),
            StatusLabel::ToDeliverAndBill
        );
    }

    #[test]
    fn info_uses_kind_in_message() {
        let info = describe(OrderKind::MaterialRequest, DocStatus::Draft, None, &Progress::default());
        assert_eq!(info.status, "Draft");
        assert_eq!(info.message, "Material Request is in draft status");
    }

    #[test]
    fn simple_progress_labels() {
        assert_eq!(progress_label(OrderKind::SalesOrder, DocStatus::Submitted, &pct(100)), "Fully Delivered");
        assert_eq!(progress_label(OrderKind::PurchaseOrder, DocStatus::Submitted, &pct(3)), "Partially Received");
        assert_eq!(progress_label(OrderKind::PurchaseOrder, DocStatus::Submitted, &pct(0)), "Pending Receipt");
        assert_eq!(progress_label(OrderKind::PurchaseOrder, DocStatus::Draft, &pct(100)), "Draft");
    }

    #[test]
    fn po_creation_status_prefers_submitted() {
        let header = |name: &str, docstatus: i16, total: i32| LinkedOrderHeader {
            name: name.to_string(),
            status: None,
            docstatus,
            total: BigDecimal::from(total),
        };

        let none = po_creation_status(&[]);
        assert_eq!(none.status, "No PO Created");

        let drafts = po_creation_status(&[header("PO-1", 0, 10)]);
        assert_eq!(drafts.status, "Draft POs Only");

        let mixed = po_creation_status(&[header("PO-1", 0, 10), header("PO-2", 1, 15)]);
        assert_eq!(mixed.status, "POs Created");
        assert_eq!(mixed.po_count, 2);
        assert_eq!(mixed.submitted_count, 1);
        assert_eq!(mixed.total_amount, BigDecimal::from(25));
    }
}
