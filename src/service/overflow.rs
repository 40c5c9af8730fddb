use crate::db::LedgerReader;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// 触发超量检查的收货类单据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReceivingDocument {
    PurchaseReceipt,
    PurchaseInvoice,
}

impl ReceivingDocument {
    pub const ALL: [ReceivingDocument; 2] = [ReceivingDocument::PurchaseReceipt, ReceivingDocument::PurchaseInvoice];

    pub fn doctype(self) -> &'static str {
        match self {
            ReceivingDocument::PurchaseReceipt => "Purchase Receipt",
            ReceivingDocument::PurchaseInvoice => "Purchase Invoice",
        }
    }

    /// 路由段: purchase-receipt / purchase-invoice
    pub fn from_route(segment: &str) -> Option<Self> {
        match segment {
            "purchase-receipt" => Some(ReceivingDocument::PurchaseReceipt),
            "purchase-invoice" => Some(ReceivingDocument::PurchaseInvoice),
            _ => None,
        }
    }
}

/// 单行超量检查参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverflowCheck {
    pub item_code: String,
    pub received_qty: BigDecimal,
    pub target_qty: BigDecimal,
    #[serde(default = "BigDecimal::zero")]
    pub allowance_percent: BigDecimal,
}

/// 豁免判断: 返回 true 时跳过标准检查
#[async_trait]
pub trait OverflowBypass: Send + Sync {
    fn name(&self) -> &'static str;

    async fn bypass(&self, doc: ReceivingDocument, check: &OverflowCheck) -> Result<bool, sqlx::Error>;
}

/// 标准超量检查
pub trait AllowanceCheck: Send + Sync {
    fn check(&self, check: &OverflowCheck) -> AppResult<()>;
}

/// allowed = target * (1 + allowance / 100); received > allowed 时报错
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAllowance;

impl AllowanceCheck for StandardAllowance {
    fn check(&self, check: &OverflowCheck) -> AppResult<()> {
        let factor = BigDecimal::from(1) + &check.allowance_percent / BigDecimal::from(100);
        let allowed = &check.target_qty * factor;

        if check.received_qty > allowed {
            return Err(AppError::OverDelivery {
                item_code: check.item_code.clone(),
                received: check.received_qty.clone(),
                allowed,
                allowance: check.allowance_percent.clone(),
            });
        }
        Ok(())
    }
}

/// 物料组勾选了 custom_exempt_from_over_delivery 时豁免
pub struct ItemGroupExemption {
    ledger: Arc<dyn LedgerReader>,
}

impl ItemGroupExemption {
    pub fn new(ledger: Arc<dyn LedgerReader>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl OverflowBypass for ItemGroupExemption {
    fn name(&self) -> &'static str {
        "item_group_exemption"
    }

    async fn bypass(&self, _doc: ReceivingDocument, check: &OverflowCheck) -> Result<bool, sqlx::Error> {
        self.ledger.item_group_exempt(&check.item_code).await
    }
}

/// 超量收货/开票校验: 先运行按单据类型注册的豁免判断, 全部不命中再做标准检查
pub struct OverflowValidator {
    bypasses: HashMap<ReceivingDocument, Vec<Arc<dyn OverflowBypass>>>,
    standard: Arc<dyn AllowanceCheck>,
}

impl OverflowValidator {
    pub fn new(standard: Arc<dyn AllowanceCheck>) -> Self {
        Self {
            bypasses: HashMap::new(),
            standard,
        }
    }

    /// 标准检查 + 物料组豁免 (采购收货与采购发票都注册)
    pub fn with_item_group_exemption(ledger: Arc<dyn LedgerReader>) -> Self {
        let mut validator = Self::new(Arc::new(StandardAllowance));
        let exemption: Arc<dyn OverflowBypass> = Arc::new(ItemGroupExemption::new(ledger));
        for doc in ReceivingDocument::ALL {
            validator.register_bypass(doc, Arc::clone(&exemption));
        }
        validator
    }

    pub fn register_bypass(&mut self, doc: ReceivingDocument, bypass: Arc<dyn OverflowBypass>) {
        self.bypasses.entry(doc).or_default().push(bypass);
    }

    pub async fn check_overflow_with_allowance(
        &self,
        doc: ReceivingDocument,
        check: &OverflowCheck,
    ) -> AppResult<()> {
        if let Some(bypasses) = self.bypasses.get(&doc) {
            for bypass in bypasses {
                if bypass.bypass(doc, check).await? {
                    tracing::info!(
                        "{} 物料 {} 命中豁免 {}, 跳过超量检查",
                        doc.doctype(),
                        check.item_code,
                        bypass.name()
                    );
                    return Ok(());
                }
            }
        }

        self.standard.check(check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn check(received: &str, target: &str, allowance: &str) -> OverflowCheck {
        OverflowCheck {
            item_code: "ITEM-A".to_string(),
            received_qty: dec(received),
            target_qty: dec(target),
            allowance_percent: dec(allowance),
        }
    }

    struct Always(bool, AtomicUsize);

    #[async_trait]
    impl OverflowBypass for Always {
        fn name(&self) -> &'static str {
            "always"
        }

        async fn bypass(&self, _doc: ReceivingDocument, _check: &OverflowCheck) -> Result<bool, sqlx::Error> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Ok(self.0)
        }
    }

    #[test]
    fn standard_allowance_names_allowed_max() {
        assert!(StandardAllowance.check(&check("10.5", "10", "5")).is_ok());

        let err = StandardAllowance.check(&check("12", "10", "5")).unwrap_err();
        match &err {
            AppError::OverDelivery { allowed, .. } => assert_eq!(*allowed, dec("10.5")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("Over-delivery not allowed for ITEM-A: 12 > 10.5"));
        assert!(err.to_string().ends_with("(5% allowance)"));
    }

    #[tokio::test]
    async fn bypass_skips_standard_check_for_its_document_only() {
        let exempt = Arc::new(Always(true, AtomicUsize::new(0)));
        let mut validator = OverflowValidator::new(Arc::new(StandardAllowance));
        validator.register_bypass(ReceivingDocument::PurchaseReceipt, exempt.clone());

        let over = check("20", "10", "0");
        assert!(validator
            .check_overflow_with_allowance(ReceivingDocument::PurchaseReceipt, &over)
            .await
            .is_ok());
        assert!(validator
            .check_overflow_with_allowance(ReceivingDocument::PurchaseInvoice, &over)
            .await
            .is_err());
        assert_eq!(exempt.1.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_matching_bypass_falls_through() {
        let never = Arc::new(Always(false, AtomicUsize::new(0)));
        let mut validator = OverflowValidator::new(Arc::new(StandardAllowance));
        validator.register_bypass(ReceivingDocument::PurchaseInvoice, never.clone());

        let result = validator
            .check_overflow_with_allowance(ReceivingDocument::PurchaseInvoice, &check("11", "10", "5"))
            .await;
        assert!(matches!(result, Err(AppError::OverDelivery { .. })));
        assert_eq!(never.1.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn route_segments() {
        assert_eq!(
            ReceivingDocument::from_route("purchase-invoice"),
            Some(ReceivingDocument::PurchaseInvoice)
        );
        assert_eq!(ReceivingDocument::from_route("sales-invoice"), None);
    }
}
