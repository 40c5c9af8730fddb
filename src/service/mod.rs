pub mod chain;
pub mod consolidator;
pub mod dashboard;
pub mod fulfillment;
pub mod history;
pub mod overflow;
pub mod status;
pub mod supplier;

pub use dashboard::DashboardService;
pub use history::HistoryService;
pub use overflow::{
    AllowanceCheck, ItemGroupExemption, OverflowBypass, OverflowCheck, OverflowValidator,
    ReceivingDocument, StandardAllowance,
};
pub use supplier::{SupplierService, SupplierUpdate};
