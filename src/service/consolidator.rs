use crate::models::{ConsolidatedLine, ConsolidationResult, OrderDocument, OrderLine};
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use serde_json::Value;
use std::str::FromStr;

/// 合并后加权单价的小数位数
pub const RATE_SCALE: i64 = 6;

/// 合并输入: 已加载的订单, 或前端提交的原始明细记录
#[derive(Debug, Clone, Copy)]
pub enum LineSource<'a> {
    Document(&'a OrderDocument),
    Records(&'a [Value]),
}

impl LineSource<'_> {
    /// 统一成 OrderLine 序列; 无法识别的记录被跳过并返回说明
    pub fn normalize(self) -> (Vec<OrderLine>, Vec<String>) {
        match self {
            LineSource::Document(doc) => (doc.lines.clone(), doc.diagnostics.clone()),
            LineSource::Records(records) => {
                let mut lines = Vec::with_capacity(records.len());
                let mut diagnostics = Vec::new();
                for (idx, record) in records.iter().enumerate() {
                    match line_from_record(record) {
                        Ok(line) => lines.push(line),
                        Err(reason) => {
                            let note = format!("record {}: {}, skipped", idx + 1, reason);
                            tracing::warn!("{}", note);
                            diagnostics.push(note);
                        }
                    }
                }
                (lines, diagnostics)
            }
        }
    }
}

fn line_from_record(record: &Value) -> Result<OrderLine, String> {
    let Value::Object(map) = record else {
        return Err("not an object".to_string());
    };

    let item_code = match map.get("item_code") {
        Some(Value::String(code)) if !code.is_empty() => code.clone(),
        _ => return Err("missing item_code".to_string()),
    };

    let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(OrderLine {
        item_code,
        item_name: text("item_name"),
        item_group: text("item_group"),
        uom: text("uom"),
        qty: decimal_field(map.get("qty"), "qty")?,
        fulfilled_qty: decimal_field(map.get("received_qty"), "received_qty")?,
        ordered_qty: decimal_field(map.get("ordered_qty"), "ordered_qty")?,
        billed_amt: decimal_field(map.get("billed_amt"), "billed_amt")?,
        rate: decimal_field(map.get("rate"), "rate")?,
        amount: decimal_field(map.get("amount"), "amount")?,
    })
}

/// 数值字段: JSON 数字或数字字符串, 缺失/null 视为 0
fn decimal_field(value: Option<&Value>, key: &str) -> Result<BigDecimal, String> {
    match value {
        None | Some(Value::Null) => Ok(BigDecimal::zero()),
        Some(Value::Number(n)) => {
            BigDecimal::from_str(&n.to_string()).map_err(|e| format!("invalid {}: {}", key, e))
        }
        Some(Value::String(s)) if s.trim().is_empty() => Ok(BigDecimal::zero()),
        Some(Value::String(s)) => {
            BigDecimal::from_str(s.trim()).map_err(|e| format!("invalid {}: {}", key, e))
        }
        Some(other) => Err(format!("invalid {}: {}", key, other)),
    }
}

/// 按物料编码合并明细, 保持首次出现的顺序
///
/// 数量与金额直接累加; 单价按数量加权:
/// `(rate_prev * qty_prev + rate_cur * qty_cur) / (qty_prev + qty_cur)`,
/// 其中 qty_prev 为累加前的数量。总数量为 0 时单价保持不变。
/// 加权单价保留 `RATE_SCALE` 位小数。
pub fn consolidate(lines: &[OrderLine]) -> IndexMap<String, ConsolidatedLine> {
    let mut merged: IndexMap<String, ConsolidatedLine> = IndexMap::new();

    for line in lines {
        match merged.get_mut(&line.item_code) {
            Some(acc) => {
                let weight = &acc.qty + &line.qty;
                if !weight.is_zero() {
                    acc.rate = ((&acc.rate * &acc.qty + &line.rate * &line.qty) / &weight).round(RATE_SCALE);
                }
                acc.qty = weight;
                acc.amount = &acc.amount + &line.amount;
            }
            None => {
                merged.insert(
                    line.item_code.clone(),
                    ConsolidatedLine {
                        item_code: line.item_code.clone(),
                        item_name: line.item_name.clone(),
                        item_group: line.item_group.clone(),
                        uom: line.uom.clone(),
                        qty: line.qty.clone(),
                        rate: line.rate.clone(),
                        amount: line.amount.clone(),
                    },
                );
            }
        }
    }

    merged
}

/// 归一化后合并, 返回列表形式
pub fn consolidate_source(source: LineSource<'_>) -> ConsolidationResult {
    let (lines, diagnostics) = source.normalize();
    let merged = consolidate(&lines);
    tracing::info!("合并明细: {} 行 -> {} 个物料", lines.len(), merged.len());

    ConsolidationResult {
        items: merged.into_values().collect(),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn weighted_rate_for_same_item() {
        let lines = vec![
            OrderLine::new("A", dec("3"), dec("10")),
            OrderLine::new("A", dec("7"), dec("20")),
        ];
        let merged = consolidate(&lines);
        let a = &merged["A"];

        assert_eq!(a.qty, dec("10"));
        assert_eq!(a.rate, dec("17"));
        assert_eq!(a.amount, dec("170"));
    }

    #[test]
    fn keeps_first_seen_order() {
        let lines = vec![
            OrderLine::new("B", dec("1"), dec("1")),
            OrderLine::new("A", dec("1"), dec("1")),
            OrderLine::new("B", dec("1"), dec("3")),
        ];
        let merged = consolidate(&lines);
        let codes: Vec<&str> = merged.keys().map(String::as_str).collect();

        assert_eq!(codes, vec!["B", "A"]);
        assert_eq!(merged["B"].rate, dec("2"));
    }

    #[test]
    fn weighted_rate_is_bounded_for_repeating_fractions() {
        let lines = vec![
            OrderLine::new("A", dec("1"), dec("10")),
            OrderLine::new("A", dec("2"), dec("20")),
        ];
        let merged = consolidate(&lines);

        assert_eq!(merged["A"].rate, dec("16.666667"));
        assert_eq!(serde_json::to_value(&merged["A"].rate).unwrap(), "16.666667");
    }

    #[test]
    fn zero_weight_keeps_rate() {
        let lines = vec![
            OrderLine::new("A", dec("0"), dec("10")),
            OrderLine::new("A", dec("0"), dec("99")),
        ];
        let merged = consolidate(&lines);
        assert_eq!(merged["A"].rate, dec("10"));
        assert_eq!(merged["A"].qty, dec("0"));
    }

    #[test]
    fn records_are_normalized_before_merging() {
        let records = vec![
            json!({"item_code": "A", "qty": 3, "rate": "10", "amount": 30, "uom": "Nos"}),
            json!({"item_code": "A", "qty": "7", "rate": 20, "amount": null}),
            json!({"qty": 5}),
            json!("garbage"),
            json!({"item_code": "B", "qty": "abc"}),
        ];
        let result = consolidate_source(LineSource::Records(&records));

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.diagnostics.len(), 3);
        let a = &result.items[0];
        assert_eq!(a.qty, dec("10"));
        assert_eq!(a.rate, dec("17"));
        assert_eq!(a.amount, dec("30"));
        assert_eq!(a.uom.as_deref(), Some("Nos"));
    }

    #[test]
    fn document_source_uses_lines_as_is() {
        use crate::models::{DocStatus, OrderKind};
        let doc = OrderDocument::new(OrderKind::PurchaseOrder, "PO-1", DocStatus::Draft).with_lines(vec![
            OrderLine::new("A", dec("2"), dec("5")),
            OrderLine::new("C", dec("1"), dec("4")),
            OrderLine::new("A", dec("2"), dec("7")),
        ]);
        let result = consolidate_source(LineSource::Document(&doc));

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].rate, dec("6"));
        assert_eq!(result.items[0].amount, dec("24"));
        assert!(result.diagnostics.is_empty());
    }
}
