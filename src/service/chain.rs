use super::fulfillment::{overall_percentage, pending, percentage};
use crate::models::{
    Hop, HopSummary, ItemProcurement, ItemProduction, LinkedDocumentRow, ProcurementKpis,
    ProcurementLedger, ProductionKpis, ProductionLedger, ProductionPlan, ProductionStage,
};
use bigdecimal::{BigDecimal, Zero};
use std::collections::HashSet;

/// 采购链路百分比: 发票数量 / 四个环节中的最大数量 * 100
///
/// 分母随最大环节变化而变化, 任何环节都可能暂时超过其他环节。
pub fn chain_percentage(
    requested: &BigDecimal,
    ordered: &BigDecimal,
    received: &BigDecimal,
    billed: &BigDecimal,
) -> BigDecimal {
    let max_qty = [requested, ordered, received, billed]
        .into_iter()
        .max()
        .cloned()
        .unwrap_or_else(BigDecimal::zero);

    percentage(billed, &max_qty)
}

impl ProcurementLedger {
    pub fn rows(&self, hop: Hop) -> &[LinkedDocumentRow] {
        match hop {
            Hop::MaterialRequest => &self.material_requests,
            Hop::PurchaseOrder => &self.purchase_orders,
            Hop::PurchaseReceipt => &self.purchase_receipts,
            Hop::PurchaseInvoice => &self.purchase_invoices,
        }
    }

    pub fn rows_mut(&mut self, hop: Hop) -> &mut Vec<LinkedDocumentRow> {
        match hop {
            Hop::MaterialRequest => &mut self.material_requests,
            Hop::PurchaseOrder => &mut self.purchase_orders,
            Hop::PurchaseReceipt => &mut self.purchase_receipts,
            Hop::PurchaseInvoice => &mut self.purchase_invoices,
        }
    }

    fn hop_qty_for_item(&self, hop: Hop, item_code: &str) -> BigDecimal {
        self.rows(hop)
            .iter()
            .filter(|row| row.item_code.as_deref() == Some(item_code))
            .fold(BigDecimal::zero(), |acc, row| acc + &row.qty)
    }

    /// 单个物料在各环节的数量与进度
    pub fn item_totals(&self, item_code: &str) -> ItemProcurement {
        let requested_qty = self.hop_qty_for_item(Hop::MaterialRequest, item_code);
        let po_ordered_qty = self.hop_qty_for_item(Hop::PurchaseOrder, item_code);
        let pr_received_qty = self.hop_qty_for_item(Hop::PurchaseReceipt, item_code);
        let pi_billed_qty = self.hop_qty_for_item(Hop::PurchaseInvoice, item_code);
        let percentage = chain_percentage(
            &requested_qty,
            &po_ordered_qty,
            &pr_received_qty,
            &pi_billed_qty,
        );

        ItemProcurement {
            requested_qty,
            po_ordered_qty,
            pr_received_qty,
            pi_billed_qty,
            percentage,
        }
    }

    /// 链路 KPI; 同时返回缺少物料编码的行的说明
    pub fn kpis(&self) -> (ProcurementKpis, Vec<String>) {
        let mut diagnostics = Vec::new();
        let mut summarize = |hop: Hop| summarize_hop(hop, self.rows(hop), &mut diagnostics);
        let mr = summarize(Hop::MaterialRequest);
        let po = summarize(Hop::PurchaseOrder);
        let pr = summarize(Hop::PurchaseReceipt);
        let pi = summarize(Hop::PurchaseInvoice);

        let overall_percentage = chain_percentage(&mr.total_qty, &po.total_qty, &pr.total_qty, &pi.total_qty);

        (
            ProcurementKpis {
                material_requests: mr,
                purchase_orders: po,
                purchase_receipts: pr,
                purchase_invoices: pi,
                overall_percentage,
            },
            diagnostics,
        )
    }
}

fn summarize_hop(hop: Hop, rows: &[LinkedDocumentRow], diagnostics: &mut Vec<String>) -> HopSummary {
    let mut summary = HopSummary::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for row in rows {
        if row.item_code.is_none() {
            let note = format!("{} {}: row without item code skipped", hop.label(), row.parent);
            tracing::warn!("{}", note);
            diagnostics.push(note);
            continue;
        }

        if seen.insert(row.parent.as_str()) {
            summary.documents += 1;
            let status = row.status.clone().unwrap_or_else(|| "Unknown".to_string());
            *summary.by_status.entry(status).or_insert(0) += 1;
        }
        summary.total_qty += &row.qty;
    }

    summary
}

impl ProductionLedger {
    /// 单个物料的生产进度 (来自生产计划明细)
    pub fn item_totals(&self, item_code: &str) -> ItemProduction {
        let (planned_qty, produced_qty) = self
            .items
            .iter()
            .filter(|row| row.item_code.as_deref() == Some(item_code))
            .fold((BigDecimal::zero(), BigDecimal::zero()), |(planned, produced), row| {
                (planned + &row.planned_qty, produced + &row.produced_qty)
            });

        ItemProduction {
            pending_qty: pending(&planned_qty, &produced_qty),
            percentage: percentage(&produced_qty, &planned_qty),
            planned_qty,
            produced_qty,
        }
    }

    pub fn kpis(&self) -> ProductionKpis {
        production_kpis(&self.plans)
    }
}

/// 生产计划 KPI
pub fn production_kpis(plans: &[ProductionPlan]) -> ProductionKpis {
    let total_planned_qty = plans
        .iter()
        .fold(BigDecimal::zero(), |acc, p| acc + &p.total_planned_qty);
    let total_produced_qty = plans
        .iter()
        .fold(BigDecimal::zero(), |acc, p| acc + &p.total_produced_qty);
    let count_status = |status: &str| {
        plans
            .iter()
            .filter(|p| p.status.as_deref() == Some(status))
            .count()
    };

    let overall_percentage = overall_percentage(&total_produced_qty, &total_planned_qty);
    let stage = if overall_percentage >= BigDecimal::from(100) {
        ProductionStage::Completed
    } else if overall_percentage > BigDecimal::zero() {
        ProductionStage::InProgress
    } else {
        ProductionStage::NotStarted
    };

    ProductionKpis {
        stage,
        total_plans: plans.len(),
        completed_plans: count_status("Completed"),
        in_progress_plans: count_status("In Progress"),
        total_planned_qty,
        total_produced_qty,
        overall_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductionPlanItem;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn row(parent: &str, status: &str, item: &str, qty: &str) -> LinkedDocumentRow {
        LinkedDocumentRow {
            parent: parent.to_string(),
            status: Some(status.to_string()),
            docstatus: 1,
            item_code: Some(item.to_string()),
            qty: dec(qty),
            amount: BigDecimal::zero(),
        }
    }

    #[test]
    fn denominator_follows_largest_hop() {
        // 收货数量超过申请数量时以收货数量为分母
        assert_eq!(chain_percentage(&dec("10"), &dec("10"), &dec("20"), &dec("5")), dec("25.0"));
        assert_eq!(chain_percentage(&dec("10"), &dec("8"), &dec("8"), &dec("8")), dec("80.0"));
        assert_eq!(chain_percentage(&dec("0"), &dec("0"), &dec("0"), &dec("0")), dec("0"));
    }

    #[test]
    fn item_totals_sum_each_hop() {
        let ledger = ProcurementLedger {
            material_requests: vec![row("MR-1", "Ordered", "A", "10"), row("MR-1", "Ordered", "B", "4")],
            purchase_orders: vec![row("PO-1", "To Bill", "A", "6"), row("PO-2", "To Receive", "A", "6")],
            purchase_receipts: vec![row("PR-1", "Completed", "A", "6")],
            purchase_invoices: vec![row("PI-1", "Paid", "A", "3")],
        };

        let a = ledger.item_totals("A");
        assert_eq!(a.requested_qty, dec("10"));
        assert_eq!(a.po_ordered_qty, dec("12"));
        assert_eq!(a.pr_received_qty, dec("6"));
        assert_eq!(a.pi_billed_qty, dec("3"));
        assert_eq!(a.percentage, dec("25.0"));

        let missing = ledger.item_totals("Z");
        assert_eq!(missing, ItemProcurement::default());
    }

    #[test]
    fn kpis_count_distinct_documents_by_status() {
        let mut orphan = row("PO-3", "Draft", "A", "100");
        orphan.item_code = None;
        let ledger = ProcurementLedger {
            material_requests: vec![row("MR-1", "Ordered", "A", "10"), row("MR-1", "Ordered", "B", "10")],
            purchase_orders: vec![
                row("PO-1", "To Bill", "A", "10"),
                row("PO-2", "To Receive", "B", "5"),
                row("PO-2", "To Receive", "A", "5"),
                orphan,
            ],
            purchase_receipts: vec![],
            purchase_invoices: vec![row("PI-1", "Paid", "A", "10")],
        };

        let (kpis, diagnostics) = ledger.kpis();
        assert_eq!(kpis.material_requests.documents, 1);
        assert_eq!(kpis.purchase_orders.documents, 2);
        assert_eq!(kpis.purchase_orders.by_status.get("To Receive"), Some(&1));
        assert_eq!(kpis.purchase_orders.total_qty, dec("20"));
        assert_eq!(kpis.purchase_receipts.documents, 0);
        assert_eq!(kpis.overall_percentage, dec("50.0"));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn production_item_and_plan_kpis() {
        let plan = |name: &str, status: &str, planned: &str, produced: &str| ProductionPlan {
            name: name.to_string(),
            status: Some(status.to_string()),
            docstatus: 1,
            posting_date: None,
            total_planned_qty: dec(planned),
            total_produced_qty: dec(produced),
        };
        let ledger = ProductionLedger {
            plans: vec![plan("PP-1", "Completed", "10", "10"), plan("PP-2", "In Progress", "10", "2")],
            items: vec![
                ProductionPlanItem {
                    plan: "PP-1".to_string(),
                    item_code: Some("A".to_string()),
                    planned_qty: dec("10"),
                    produced_qty: dec("10"),
                },
                ProductionPlanItem {
                    plan: "PP-2".to_string(),
                    item_code: Some("A".to_string()),
                    planned_qty: dec("10"),
                    produced_qty: dec("2"),
                },
            ],
        };

        let a = ledger.item_totals("A");
        assert_eq!(a.planned_qty, dec("20"));
        assert_eq!(a.pending_qty, dec("8"));
        assert_eq!(a.percentage, dec("60.0"));

        let kpis = ledger.kpis();
        assert_eq!(kpis.total_plans, 2);
        assert_eq!(kpis.completed_plans, 1);
        assert_eq!(kpis.in_progress_plans, 1);
        assert_eq!(kpis.overall_percentage, dec("60.0"));
        assert_eq!(kpis.stage, ProductionStage::InProgress);
    }

    #[test]
    fn no_plans_means_not_started() {
        let kpis = production_kpis(&[]);
        assert_eq!(kpis.stage, ProductionStage::NotStarted);
        assert_eq!(kpis.overall_percentage, dec("0"));
    }
}
