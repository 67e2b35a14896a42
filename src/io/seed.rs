use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Account, amount_to_cents, seed_accounts};

/// One row of a seed file: `{"hash": "...", "balance": "123.45"}`.
#[derive(Debug, Deserialize)]
struct SeedRow {
    hash: String,
    balance: Value,
}

/// Read seed accounts from a JSON array. Order is preserved.
pub fn read_seed<R: Read>(reader: R) -> Result<Vec<Account>> {
    let rows: Vec<SeedRow> =
        serde_json::from_reader(reader).context("Seed file must be a JSON array of {hash, balance}")?;

    let mut seen = HashSet::with_capacity(rows.len());
    let mut accounts = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        if row.hash.is_empty() {
            bail!("Seed entry {} has an empty hash", i);
        }
        if !seen.insert(row.hash.clone()) {
            bail!("Duplicate hash in seed file: {}", row.hash);
        }

        let balance = amount_to_cents(&row.balance)
            .map_err(|e| anyhow::anyhow!("Seed entry {} ({}): {}", i, row.hash, e))?;
        if balance < 0 {
            bail!("Seed entry {} ({}) has a negative balance", i, row.hash);
        }

        accounts.push(Account::new(row.hash, balance));
    }

    Ok(accounts)
}

/// Load seed accounts from a file, or fall back to the built-in table.
pub fn load_seed(path: Option<&Path>) -> Result<Vec<Account>> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open seed file {}", path.display()))?;
            read_seed(file)
        }
        None => Ok(seed_accounts()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_seed_preserves_order_and_amounts() {
        let json = r#"[
            {"hash": "b", "balance": "10.50"},
            {"hash": "a", "balance": 3}
        ]"#;
        let accounts = read_seed(json.as_bytes()).unwrap();
        assert_eq!(accounts, vec![Account::new("b", 1050), Account::new("a", 300)]);
    }

    #[test]
    fn test_read_seed_rejects_bad_rows() {
        assert!(read_seed(r#"[{"hash": "a", "balance": 1}, {"hash": "a", "balance": 2}]"#.as_bytes()).is_err());
        assert!(read_seed(r#"[{"hash": "", "balance": 1}]"#.as_bytes()).is_err());
        assert!(read_seed(r#"[{"hash": "a", "balance": -1}]"#.as_bytes()).is_err());
        assert!(read_seed(r#"[{"hash": "a", "balance": "lots"}]"#.as_bytes()).is_err());
        assert!(read_seed(r#"{"hash": "a"}"#.as_bytes()).is_err());
    }

    #[test]
    fn test_load_seed_defaults_to_builtin_table() {
        assert_eq!(load_seed(None).unwrap(), seed_accounts());
    }
}
