mod balances;
mod repository;

pub use balances::*;
pub use repository::*;

/// SQL migration for the transfer journal
pub const MIGRATION_001_JOURNAL: &str = include_str!("migrations/001_journal.sql");
