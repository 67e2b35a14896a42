use std::collections::HashMap;

use anyhow::{Result, bail};
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::domain::{Account, Cents};

/// In-memory balance store for the simulated ledger.
///
/// Accounts keep their seed order. The whole map sits behind one lock: reads share it,
/// a debit holds it exclusively from lookup to write-back.
#[derive(Debug)]
pub struct BalanceStore {
    inner: RwLock<Accounts>,
}

#[derive(Debug, Default)]
pub struct Accounts {
    accounts: Vec<Account>,
    index: HashMap<String, usize>,
}

impl Accounts {
    /// Current balance of an account, if it exists.
    pub fn balance(&self, hash: &str) -> Option<Cents> {
        self.index.get(hash).map(|&i| self.accounts[i].balance)
    }

    /// Subtract `amount` from an existing account and return the new balance.
    /// Returns `None` for unknown accounts. Callers check funds first.
    pub fn debit(&mut self, hash: &str, amount: Cents) -> Option<Cents> {
        let i = *self.index.get(hash)?;
        let account = &mut self.accounts[i];
        account.balance -= amount;
        Some(account.balance)
    }
}

impl BalanceStore {
    /// Build a store from seed accounts. Duplicate hashes are rejected.
    pub fn new(seed: Vec<Account>) -> Result<Self> {
        let mut index = HashMap::with_capacity(seed.len());
        for (i, account) in seed.iter().enumerate() {
            if index.insert(account.hash.clone(), i).is_some() {
                bail!("Duplicate account in seed: {}", account.hash);
            }
        }

        Ok(Self {
            inner: RwLock::new(Accounts {
                accounts: seed,
                index,
            }),
        })
    }

    /// Snapshot of every account in seed order.
    pub async fn list(&self) -> Vec<Account> {
        self.inner.read().await.accounts.clone()
    }

    /// Current balance of an account.
    pub async fn balance(&self, hash: &str) -> Option<Cents> {
        self.inner.read().await.balance(hash)
    }

    /// Exclusive access for a check-then-debit sequence.
    pub async fn lock(&self) -> RwLockWriteGuard<'_, Accounts> {
        self.inner.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BalanceStore {
        BalanceStore::new(vec![Account::new("a", 1000), Account::new("b", 500)]).unwrap()
    }

    #[tokio::test]
    async fn test_list_keeps_seed_order() {
        let store = BalanceStore::new(vec![
            Account::new("zeta", 1),
            Account::new("alpha", 2),
            Account::new("mu", 3),
        ])
        .unwrap();

        let hashes: Vec<_> = store.list().await.into_iter().map(|a| a.hash).collect();
        assert_eq!(hashes, vec!["zeta", "alpha", "mu"]);
    }

    #[tokio::test]
    async fn test_debit_updates_in_place() {
        let store = store();
        {
            let mut accounts = store.lock().await;
            assert_eq!(accounts.debit("a", 300), Some(700));
            assert_eq!(accounts.debit("missing", 1), None);
        }
        assert_eq!(store.balance("a").await, Some(700));
        assert_eq!(store.balance("b").await, Some(500));
        assert_eq!(store.list().await.len(), 2);
    }

    #[test]
    fn test_duplicate_seed_rejected() {
        let result = BalanceStore::new(vec![Account::new("a", 1), Account::new("a", 2)]);
        assert!(result.is_err());
    }
}
