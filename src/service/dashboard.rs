use super::consolidator::{consolidate_source, LineSource};
use super::fulfillment::{
    billed_qty_across_orders, fulfillment_line, fulfillment_snapshot, line_progress,
    overall_percentage, pending, percentage,
};
use super::status::{describe, po_creation_error, po_creation_status, progress_label, Progress};
use crate::db::LedgerReader;
use crate::error::{AppError, AppResult};
use crate::models::{
    ChainRoot, ConsolidationResult, Hop, MaterialRequestDashboard, OrderDocument, OrderKind,
    OrderProgressDashboard, OrderSummary, ProcurementLedger, ProductionLedger,
    PurchaseOrderDashboard, RequestLine, SalesOrderDashboard, SalesOrderLine,
};
use bigdecimal::{BigDecimal, Zero};
use serde_json::Value;
use std::sync::Arc;

/// 订单看板服务: 每次请求重新读取订单及下游单据, 纯函数计算后返回
pub struct DashboardService {
    ledger: Arc<dyn LedgerReader>,
}

/// 下游查询失败时记录日志和说明, 以空结果继续
fn rows_or_skip<T>(result: Result<Vec<T>, sqlx::Error>, what: &str, diagnostics: &mut Vec<String>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("读取 {} 失败, 已跳过: {}", what, e);
            diagnostics.push(format!("{} unavailable: {}", what, e));
            Vec::new()
        }
    }
}

impl DashboardService {
    pub fn new(ledger: Arc<dyn LedgerReader>) -> Self {
        Self { ledger }
    }

    /// 读取根单据; 不存在或读取失败都返回 None (失败写日志)
    async fn load(&self, kind: OrderKind, name: &str) -> Option<OrderDocument> {
        match self.ledger.order(kind, name).await {
            Ok(Some(doc)) => Some(doc),
            Ok(None) => {
                tracing::info!("{} {} not found", kind, name);
                None
            }
            Err(e) => {
                tracing::error!("读取 {} {} 失败: {}", kind, name, e);
                None
            }
        }
    }

    /// 读取某个根单据的采购链路, 四个环节并发查询
    async fn procurement_ledger(&self, root: &ChainRoot, diagnostics: &mut Vec<String>) -> ProcurementLedger {
        let (mr, po, pr, pi) = futures::join!(
            self.ledger.chain_rows(root, Hop::MaterialRequest),
            self.ledger.chain_rows(root, Hop::PurchaseOrder),
            self.ledger.chain_rows(root, Hop::PurchaseReceipt),
            self.ledger.chain_rows(root, Hop::PurchaseInvoice),
        );

        let mut ledger = ProcurementLedger::default();
        for (hop, result) in Hop::PROCUREMENT.into_iter().zip([mr, po, pr, pi]) {
            let what = format!("{} rows for {}", hop.label(), root.name);
            *ledger.rows_mut(hop) = rows_or_skip(result, &what, diagnostics);
        }
        ledger
    }

    /// 加载物料申请关联的已提交采购订单; 单个订单读取失败时跳过并返回说明
    async fn submitted_purchase_orders(&self, material_request: &str) -> (Vec<OrderDocument>, Vec<String>) {
        let mut notes = Vec::new();
        let names = rows_or_skip(
            self.ledger.submitted_purchase_order_names(material_request).await,
            &format!("submitted Purchase Orders for {}", material_request),
            &mut notes,
        );

        let loaded = futures::future::join_all(
            names
                .iter()
                .map(|po| self.ledger.order(OrderKind::PurchaseOrder, po)),
        )
        .await;

        let mut orders = Vec::with_capacity(names.len());
        for (po, result) in names.iter().zip(loaded) {
            match result {
                Ok(Some(doc)) => orders.push(doc),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("加载采购订单 {} 失败, 已跳过: {}", po, e);
                    notes.push(format!("Purchase Order {} skipped: {}", po, e));
                }
            }
        }
        (orders, notes)
    }

    /// 采购订单状态看板: 收货与开票进度
    pub async fn purchase_order_status_dashboard(&self, name: &str) -> Option<PurchaseOrderDashboard> {
        let doc = self.load(OrderKind::PurchaseOrder, name).await?;
        let snapshot = fulfillment_snapshot(&doc.lines);

        let progress = Progress {
            fulfilled: snapshot.totals.overall_fulfilled_percentage.clone(),
            billed: snapshot.totals.overall_billed_percentage.clone(),
            ..Progress::default()
        };
        let status_info = describe(doc.kind, doc.docstatus, doc.host_status(), &progress);
        tracing::info!("采购订单 {} 看板: {}", doc.name, status_info.status);

        Some(PurchaseOrderDashboard {
            po_name: doc.name,
            supplier: doc.party,
            supplier_name: doc.party_name,
            transaction_date: doc.transaction_date,
            schedule_date: doc.due_date,
            status: doc.status,
            docstatus: doc.docstatus,
            status_info,
            totals: snapshot.totals,
            total_amount: doc.total,
            items_data: snapshot.lines,
            diagnostics: doc.diagnostics,
        })
    }

    pub async fn purchase_order_progress(&self, name: &str) -> Option<OrderProgressDashboard> {
        self.order_progress(OrderKind::PurchaseOrder, name).await
    }

    pub async fn sales_order_progress(&self, name: &str) -> Option<OrderProgressDashboard> {
        self.order_progress(OrderKind::SalesOrder, name).await
    }

    /// 简版进度看板 (采购订单按收货, 销售订单按交货)
    async fn order_progress(&self, kind: OrderKind, name: &str) -> Option<OrderProgressDashboard> {
        let doc = self.load(kind, name).await?;
        let items_data = line_progress(&doc.lines);

        let total_ordered = doc.lines.iter().fold(BigDecimal::zero(), |acc, l| acc + &l.qty);
        let total_fulfilled = doc
            .lines
            .iter()
            .fold(BigDecimal::zero(), |acc, l| acc + &l.fulfilled_qty);
        let total_pending = items_data
            .iter()
            .fold(BigDecimal::zero(), |acc, l| acc + &l.pending_qty);
        let overall = overall_percentage(&total_fulfilled, &total_ordered);

        Some(OrderProgressDashboard {
            order_status: progress_label(kind, doc.docstatus, &overall),
            order_name: doc.name,
            kind,
            party: doc.party,
            party_name: doc.party_name,
            transaction_date: doc.transaction_date,
            due_date: doc.due_date,
            overall_percentage: overall,
            total_ordered,
            total_fulfilled,
            total_pending,
            total_amount: doc.total,
            items_data,
            diagnostics: doc.diagnostics,
        })
    }

    /// 销售订单综合看板: 交货/开票 + 生产计划 + 采购链路
    pub async fn sales_order_status_dashboard(&self, name: &str) -> Option<SalesOrderDashboard> {
        let doc = self.load(OrderKind::SalesOrder, name).await?;
        let mut diagnostics = doc.diagnostics.clone();
        let root = ChainRoot::sales_order(&doc.name);

        let (procurement, plans, plan_items) = futures::join!(
            self.procurement_ledger(&root, &mut diagnostics),
            self.ledger.production_plans(&doc.name),
            self.ledger.production_plan_items(&doc.name),
        );
        let production = ProductionLedger {
            plans: rows_or_skip(plans, &format!("Production Plans for {}", doc.name), &mut diagnostics),
            items: rows_or_skip(
                plan_items,
                &format!("Production Plan Items for {}", doc.name),
                &mut diagnostics,
            ),
        };

        let snapshot = fulfillment_snapshot(&doc.lines);
        let production_kpis = production.kpis();
        let (procurement_kpis, chain_notes) = procurement.kpis();
        diagnostics.extend(chain_notes);

        let items_data = doc
            .lines
            .iter()
            .map(|line| SalesOrderLine {
                fulfillment: fulfillment_line(line),
                production: production.item_totals(&line.item_code),
                procurement: procurement.item_totals(&line.item_code),
            })
            .collect();

        let progress = Progress {
            fulfilled: snapshot.totals.overall_fulfilled_percentage.clone(),
            billed: snapshot.totals.overall_billed_percentage.clone(),
            production: production_kpis.overall_percentage.clone(),
            procurement: procurement_kpis.overall_percentage.clone(),
            ..Progress::default()
        };
        let status_info = describe(doc.kind, doc.docstatus, doc.host_status(), &progress);
        tracing::info!(
            "销售订单 {} 看板: {}, 生产计划 {} 个, 采购订单 {} 个",
            doc.name,
            status_info.status,
            production_kpis.total_plans,
            procurement_kpis.purchase_orders.documents
        );

        Some(SalesOrderDashboard {
            so_name: doc.name,
            customer: doc.party,
            customer_name: doc.party_name,
            transaction_date: doc.transaction_date,
            delivery_date: doc.due_date,
            status: doc.status,
            docstatus: doc.docstatus,
            status_info,
            totals: snapshot.totals,
            total_amount: doc.total,
            production_kpis,
            procurement_kpis,
            items_data,
            production_plans: production.plans,
            procurement_data: procurement,
            diagnostics,
        })
    }

    /// 物料申请状态看板: 申请/下单/收货/开票 + 采购订单创建状态 + 采购链路
    pub async fn material_request_status_dashboard(&self, name: &str) -> Option<MaterialRequestDashboard> {
        let doc = self.load(OrderKind::MaterialRequest, name).await?;
        let mut diagnostics = doc.diagnostics.clone();
        let root = ChainRoot::material_request(&doc.name);

        let ((submitted, skipped), linked, procurement) = futures::join!(
            self.submitted_purchase_orders(&doc.name),
            self.ledger.linked_purchase_orders(&doc.name),
            self.procurement_ledger(&root, &mut diagnostics),
        );
        diagnostics.extend(skipped);
        let po_status = match linked {
            Ok(orders) => po_creation_status(&orders),
            Err(e) => {
                tracing::error!("读取物料申请 {} 的采购订单失败: {}", doc.name, e);
                diagnostics.push(format!("Purchase Order status unavailable: {}", e));
                po_creation_error()
            }
        };

        let mut total_requested = BigDecimal::zero();
        let mut total_ordered = BigDecimal::zero();
        let mut total_received = BigDecimal::zero();
        let mut total_billed = BigDecimal::zero();
        let mut total_pending = BigDecimal::zero();
        let mut items_data = Vec::with_capacity(doc.lines.len());

        for line in &doc.lines {
            let billed = billed_qty_across_orders(&line.item_code, &submitted);
            let pending_qty = pending(&line.qty, &line.ordered_qty);

            total_requested += &line.qty;
            total_ordered += &line.ordered_qty;
            total_received += &line.fulfilled_qty;
            total_billed += &billed;
            total_pending += &pending_qty;

            items_data.push(RequestLine {
                item_code: line.item_code.clone(),
                item_name: line.item_name.clone(),
                requested_qty: line.qty.clone(),
                ordered_qty: line.ordered_qty.clone(),
                received_qty: line.fulfilled_qty.clone(),
                ordered_percentage: percentage(&line.ordered_qty, &line.qty),
                received_percentage: percentage(&line.fulfilled_qty, &line.qty),
                billed_percentage: percentage(&billed, &line.qty),
                billed_qty: billed.round(2),
                pending_qty,
                rate: line.rate.clone(),
                amount: line.amount.clone(),
                procurement: procurement.item_totals(&line.item_code),
            });
        }

        let overall_ordered_percentage = overall_percentage(&total_ordered, &total_requested);
        let overall_received_percentage = overall_percentage(&total_received, &total_requested);
        let overall_billed_percentage = overall_percentage(&total_billed, &total_requested);

        let (procurement_kpis, chain_notes) = procurement.kpis();
        diagnostics.extend(chain_notes);

        let progress = Progress {
            ordered: overall_ordered_percentage.clone(),
            fulfilled: overall_received_percentage.clone(),
            billed: overall_billed_percentage.clone(),
            ..Progress::default()
        };
        let status_info = describe(doc.kind, doc.docstatus, doc.host_status(), &progress);
        tracing::info!(
            "物料申请 {} 看板: {}, {}",
            doc.name,
            status_info.status,
            po_status.status
        );

        Some(MaterialRequestDashboard {
            mr_name: doc.name,
            title: doc.title,
            material_request_type: doc.order_type,
            customer: doc.party,
            customer_name: doc.party_name,
            transaction_date: doc.transaction_date,
            schedule_date: doc.due_date,
            status: doc.status,
            docstatus: doc.docstatus,
            per_ordered: doc.per_ordered,
            per_received: doc.per_fulfilled,
            total_requested,
            total_ordered,
            total_received,
            total_billed: total_billed.round(2),
            total_pending,
            overall_ordered_percentage,
            overall_received_percentage,
            overall_billed_percentage,
            items_data,
            po_status,
            procurement_kpis,
            status_info,
            diagnostics,
        })
    }

    /// 订单摘要: 明细计数 + ERP 维护的百分比
    pub async fn order_summary(&self, kind: OrderKind, name: &str) -> Option<OrderSummary> {
        let doc = self.load(kind, name).await?;
        let zero = BigDecimal::zero();

        let total_ordered = doc.lines.iter().fold(BigDecimal::zero(), |acc, l| acc + &l.qty);
        let total_fulfilled = doc
            .lines
            .iter()
            .fold(BigDecimal::zero(), |acc, l| acc + &l.fulfilled_qty);
        let fulfilled_items = doc.lines.iter().filter(|l| l.fulfilled_qty > zero).count();

        let mut summary = OrderSummary {
            order_name: doc.name.clone(),
            kind,
            status: doc.status.clone(),
            docstatus: doc.docstatus,
            total_items: doc.lines.len(),
            ordered_items: None,
            fulfilled_items,
            billed_items: None,
            po_count: None,
            per_ordered: None,
            per_fulfilled: doc.per_fulfilled.clone(),
            per_billed: None,
            overall_fulfilled_percentage: overall_percentage(&total_fulfilled, &total_ordered),
        };

        match kind {
            OrderKind::MaterialRequest => {
                summary.ordered_items = Some(doc.lines.iter().filter(|l| l.ordered_qty > zero).count());
                summary.per_ordered = Some(doc.per_ordered.clone());
                summary.po_count = match self.ledger.linked_purchase_orders(&doc.name).await {
                    Ok(orders) => Some(orders.len()),
                    Err(e) => {
                        tracing::error!("统计物料申请 {} 的采购订单失败: {}", doc.name, e);
                        None
                    }
                };
            }
            OrderKind::PurchaseOrder | OrderKind::SalesOrder => {
                summary.billed_items = Some(doc.lines.iter().filter(|l| l.billed_amt > zero).count());
                summary.per_billed = Some(doc.per_billed.clone());
            }
        }

        Some(summary)
    }

    /// 合并采购订单明细 (按订单编号加载)
    pub async fn consolidate_purchase_order(&self, name: &str) -> AppResult<ConsolidationResult> {
        let doc = self
            .ledger
            .order(OrderKind::PurchaseOrder, name)
            .await?
            .ok_or_else(|| AppError::not_found("Purchase Order", name))?;
        Ok(consolidate_source(LineSource::Document(&doc)))
    }

    /// 合并前端提交的原始明细记录
    pub fn consolidate_records(&self, records: &[Value]) -> ConsolidationResult {
        consolidate_source(LineSource::Records(records))
    }
}
