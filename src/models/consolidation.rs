use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 合并后的明细 (同一物料编码一行)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedLine {
    pub item_code: String,
    pub item_name: Option<String>,
    pub item_group: Option<String>,
    pub uom: Option<String>,
    pub qty: BigDecimal,
    /// 按数量加权的平均单价
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

/// 合并结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsolidationResult {
    pub items: Vec<ConsolidatedLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}
