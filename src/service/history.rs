use crate::db::LedgerReader;
use crate::error::AppResult;
use crate::models::{TradeSide, TransactionRecord};
use askama::Template;
use std::sync::Arc;

/// 历史交易表格中的一行 (已格式化)
struct HistoryRow {
    date: String,
    order_name: String,
    link: String,
    party: String,
    currency: String,
    rate: String,
    qty: String,
}

#[derive(Template)]
#[template(path = "history/last_transactions.html")]
struct LastTransactionsHtml<'a> {
    party_label: &'a str,
    rows: Vec<HistoryRow>,
}

/// 最近采购/销售记录 (HTML 表格)
pub struct HistoryService {
    ledger: Arc<dyn LedgerReader>,
    limit: i64,
    site_url: String,
}

impl HistoryService {
    pub fn new(ledger: Arc<dyn LedgerReader>, limit: i64, site_url: impl Into<String>) -> Self {
        Self {
            ledger,
            limit,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn last_purchases(&self, item_code: &str) -> AppResult<Option<String>> {
        self.render(TradeSide::Purchase, item_code).await
    }

    pub async fn last_sales(&self, item_code: &str) -> AppResult<Option<String>> {
        self.render(TradeSide::Sales, item_code).await
    }

    /// 物料编码为空或没有记录时返回 None
    pub async fn render(&self, side: TradeSide, item_code: &str) -> AppResult<Option<String>> {
        let item_code = item_code.trim();
        if item_code.is_empty() {
            return Ok(None);
        }

        let records = self
            .ledger
            .recent_transactions(side, item_code, self.limit)
            .await?;
        if records.is_empty() {
            tracing::info!("物料 {} 没有已提交的{:?}记录", item_code, side);
            return Ok(None);
        }

        let route = side.order_kind().route();
        let rows = records
            .into_iter()
            .map(|record| self.history_row(route, record))
            .collect();

        let html = LastTransactionsHtml {
            party_label: side.party_label(),
            rows,
        }
        .render()?;
        Ok(Some(html))
    }

    fn history_row(&self, route: &str, record: TransactionRecord) -> HistoryRow {
        HistoryRow {
            date: record
                .transaction_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            link: format!("{}/app/{}/{}", self.site_url, route, record.order_name),
            order_name: record.order_name,
            party: record.party.unwrap_or_default(),
            currency: record.currency.unwrap_or_default(),
            rate: record.rate.to_string(),
            qty: record.qty.to_string(),
        }
    }
}
