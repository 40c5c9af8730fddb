pub mod ledger;
pub mod pool;
pub mod queries;
pub mod queries_chain;

pub use ledger::{LedgerReader, LedgerWriter, PgLedger};
pub use pool::create_pool;
