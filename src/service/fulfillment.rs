use crate::models::{
    FulfillmentLine, FulfillmentSnapshot, FulfillmentTotals, LineProgress, OrderDocument, OrderLine,
};
use bigdecimal::{BigDecimal, Zero};

fn hundred() -> BigDecimal {
    BigDecimal::from(100)
}

/// 百分比统一输出 1 位小数 ("100.0", "0.0")
fn one_place(value: BigDecimal) -> BigDecimal {
    value.round(1).with_scale(1)
}

/// 行级百分比: part / whole * 100 (保留 1 位小数), whole <= 0 时为 0
///
/// 不做截断, 超量收货时可超过 100。
pub fn percentage(part: &BigDecimal, whole: &BigDecimal) -> BigDecimal {
    if *whole <= BigDecimal::zero() {
        return one_place(BigDecimal::zero());
    }
    one_place((part * hundred()) / whole)
}

/// 订单级百分比: 先截断到 [0, 100] 再保留 1 位小数
pub fn overall_percentage(part: &BigDecimal, whole: &BigDecimal) -> BigDecimal {
    if *whole <= BigDecimal::zero() {
        return one_place(BigDecimal::zero());
    }
    one_place(clamp_percentage((part * hundred()) / whole))
}

pub fn clamp_percentage(value: BigDecimal) -> BigDecimal {
    value.max(BigDecimal::zero()).min(hundred())
}

/// 未完成数量, 不小于 0
pub fn pending(ordered: &BigDecimal, done: &BigDecimal) -> BigDecimal {
    let diff = ordered - done;
    if diff < BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        diff
    }
}

/// 已开票数量 = 开票金额 / 单价; ERP 只存开票金额
pub fn billed_qty(billed_amt: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    if *rate > BigDecimal::zero() {
        billed_amt / rate
    } else {
        BigDecimal::zero()
    }
}

/// 物料申请的已开票数量: 扫描所有已提交的关联采购订单, 按物料编码累加 billed_amt / rate
pub fn billed_qty_across_orders(item_code: &str, orders: &[OrderDocument]) -> BigDecimal {
    orders
        .iter()
        .flat_map(|po| po.lines.iter())
        .filter(|line| line.item_code == item_code)
        .fold(BigDecimal::zero(), |acc, line| {
            acc + billed_qty(&line.billed_amt, &line.rate)
        })
}

#[derive(Default)]
struct Tally {
    ordered: BigDecimal,
    fulfilled: BigDecimal,
    billed: BigDecimal,
    pending_fulfillment: BigDecimal,
    pending_billing: BigDecimal,
}

/// 单行收货/交货与开票进度
pub fn fulfillment_line(line: &OrderLine) -> FulfillmentLine {
    let billed = billed_qty(&line.billed_amt, &line.rate);
    FulfillmentLine {
        item_code: line.item_code.clone(),
        item_name: line.item_name.clone(),
        ordered_qty: line.qty.clone(),
        fulfilled_qty: line.fulfilled_qty.clone(),
        pending_fulfillment: pending(&line.qty, &line.fulfilled_qty),
        pending_billing: pending(&line.qty, &billed).round(2),
        fulfilled_percentage: percentage(&line.fulfilled_qty, &line.qty),
        billed_percentage: percentage(&billed, &line.qty),
        billed_qty: billed.round(2),
        rate: line.rate.clone(),
        amount: line.amount.clone(),
    }
}

/// 订单履约快照: 行级明细 + 订单级汇总
pub fn fulfillment_snapshot(lines: &[OrderLine]) -> FulfillmentSnapshot {
    let mut tally = Tally::default();
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let billed = billed_qty(&line.billed_amt, &line.rate);
        tally.ordered += &line.qty;
        tally.fulfilled += &line.fulfilled_qty;
        tally.billed += &billed;

        let row = fulfillment_line(line);
        tally.pending_fulfillment += &row.pending_fulfillment;
        tally.pending_billing += &row.pending_billing;
        out.push(row);
    }

    FulfillmentSnapshot {
        totals: FulfillmentTotals {
            overall_fulfilled_percentage: overall_percentage(&tally.fulfilled, &tally.ordered),
            overall_billed_percentage: overall_percentage(&tally.billed, &tally.ordered),
            total_ordered: tally.ordered,
            total_fulfilled: tally.fulfilled,
            total_billed: tally.billed.round(2),
            total_pending_fulfillment: tally.pending_fulfillment,
            total_pending_billing: tally.pending_billing.round(2),
        },
        lines: out,
    }
}

/// 简版进度: 每行 (已收/已交, 未完成, 百分比)
pub fn line_progress(lines: &[OrderLine]) -> Vec<LineProgress> {
    lines
        .iter()
        .map(|line| LineProgress {
            item_code: line.item_code.clone(),
            item_name: line.item_name.clone(),
            ordered_qty: line.qty.clone(),
            fulfilled_qty: line.fulfilled_qty.clone(),
            pending_qty: pending(&line.qty, &line.fulfilled_qty),
            percentage: percentage(&line.fulfilled_qty, &line.qty),
            rate: line.rate.clone(),
            amount: line.amount.clone(),
        })
        .collect()
}
