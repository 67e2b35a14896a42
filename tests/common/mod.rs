// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use ledger_sim::application::LedgerService;
use ledger_sim::domain::{Account, seed_accounts};
use tempfile::TempDir;

/// Account from the built-in seed table used throughout the tests.
pub const KNOWN_HASH: &str = "029ff25d832b97b9d55fc93078dac6552a61be7a";

/// Helper to create a test service over the built-in seed table and a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    test_service_with(seed_accounts()).await
}

/// Helper to create a test service with custom seed accounts
pub async fn test_service_with(seed: Vec<Account>) -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap(), seed).await?;
    Ok((service, temp_dir))
}

/// Same as [`test_service`], wrapped for sharing with the HTTP router or spawned tasks
pub async fn shared_service() -> Result<(Arc<LedgerService>, TempDir)> {
    let (service, temp) = test_service().await?;
    Ok((Arc::new(service), temp))
}

/// Small fixture: two accounts with round balances
pub fn small_seed() -> Vec<Account> {
    vec![Account::new("alice", 100_00), Account::new("bob", 25_50)]
}
