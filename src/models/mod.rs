pub mod chain;
pub mod consolidation;
pub mod dashboard;
pub mod linked;
pub mod order;

pub use chain::{
    HopSummary, ItemProcurement, ItemProduction, ProcurementKpis, ProcurementLedger,
    ProductionKpis, ProductionLedger, ProductionStage,
};
pub use consolidation::{ConsolidatedLine, ConsolidationResult};
pub use dashboard::{
    FulfillmentLine, FulfillmentSnapshot, FulfillmentTotals, LineProgress,
    MaterialRequestDashboard, OrderProgressDashboard, OrderSummary, PoCreationStatus,
    PurchaseOrderDashboard, RequestLine, SalesOrderDashboard, SalesOrderLine, StatusInfo,
};
pub use linked::{
    ChainRoot, Hop, LinkedDocumentRow, LinkedOrderHeader, ProductionPlan, ProductionPlanItem,
    SupplierRecord, TradeSide, TransactionRecord,
};
pub use order::{DocStatus, InvalidDocStatus, OrderDocument, OrderHeaderRow, OrderKind, OrderLine, OrderLineRow};
