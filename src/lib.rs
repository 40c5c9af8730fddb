pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::{create_pool, LedgerReader, LedgerWriter, PgLedger};
pub use error::{AppError, AppResult};
pub use service::{DashboardService, HistoryService, OverflowValidator, SupplierService};
