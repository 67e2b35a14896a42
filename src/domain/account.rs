use serde::{Deserialize, Serialize};

use super::{Cents, format_usd};

/// Opaque identifier naming a simulated account. Usually a hex digest, but never validated as one.
pub type AccountHash = String;

/// A single account in the simulated ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub hash: AccountHash,
    pub balance: Cents,
}

impl Account {
    pub fn new(hash: impl Into<AccountHash>, balance: Cents) -> Self {
        Self {
            hash: hash.into(),
            balance,
        }
    }
}

/// Externally visible view of an account: the balance is always formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    pub hash: AccountHash,
    pub balance: String,
}

impl From<&Account> for BalanceView {
    fn from(account: &Account) -> Self {
        Self {
            hash: account.hash.clone(),
            balance: format_usd(account.balance),
        }
    }
}

/// Accounts every simulation starts with, in display order. Balances are whole dollars.
const SEED_TABLE: &[(&str, i64)] = &[
    (
        "65a6745f084e7af17e1715ae9302cc14820e331af610badd3d9805cb9cd3504e",
        843973673468271827,
    ),
    (
        "ca4ba96c58580a9d2ddbc99d993cf0a703c366c85f608a8d9d6b3890",
        104072038102022288,
    ),
    (
        "3842daf9315978e904e20579f52913aec3274e22b09c4fa9ddd2a2b7",
        331832306422424247,
    ),
    (
        "a23b0d1d1e8a721623a1a85b64a353fface595030eb41ba33d8fe4a554ee59d5",
        433584416429004014,
    ),
    (
        "dc5b25606dc0c977dec5aa13d61946b470066976aefcf390c40ffaff75d9a186",
        304836019657602521,
    ),
    (
        "8470faf251f8c3c8672718cbd982f942ce649bb69714794eb8b1de934cb59d52",
        511219268553231541,
    ),
    (
        "663e295cc4399e9a551571eebd7a4db0d6f3662c87eb18d0e0a2a4b67f07145c",
        979986251455561479,
    ),
    (
        "3fc8241058ee913bfe277e4652abc04822b33aa939d6f65084aae02e917eeff1",
        737671459026407806,
    ),
    (
        "d71d4b23cb2ec49e7b0ff31fd563b5ffdf4899dbecebd599711213ff37e52bd9",
        566991529670817765,
    ),
    (
        "c6f44160cdd0479af696b81abdd1982d36e08263322e4c5b07bf27b5623b29d5",
        866792902670770747,
    ),
    (
        "26efc86c0269a129bd183480f947c7424a48f9523156a8a70d3dfe5ed7103aab",
        673006143246620432,
    ),
    (
        "7c7228137410dc76b4925dfcc729fdc92cfd94a026022111c1a502d6240580fb",
        362909002628211717,
    ),
    (
        "029ff25d832b97b9d55fc93078dac6552a61be7a",
        652314353930976890,
    ),
    (
        "94e02b38274bfc81e66ea2e90f57f62faa2b5ae13e15bf89a3fc113881871e4e",
        648327740574171527,
    ),
    (
        "3e153176e6fcf704b9ebdb6cce4818ea6f276bcb42d4db72d6207df3434f3344",
        106495142286541647,
    ),
    (
        "b818d555523674878848476ee8ffc99cff1c95529e3cc450511672922a4a5736",
        777193703470672458,
    ),
    (
        "7f1c56bf38070c1637e6b0ce91fe5ab1ab8474be6dab8be2a3bf8eadb771e062",
        925379479273846641,
    ),
    (
        "c1e586cecb4f643611e882c6b3638f2d51a7b6ccd4f647c305351fccde94b9b4",
        77288644914241172,
    ),
    (
        "20f586474bf292d420bb8c5139bfb8224cda900280ffa2c95b45a33eb98e96cd",
        240152579988175246,
    ),
];

/// The built-in seed accounts, in insertion order.
pub fn seed_accounts() -> Vec<Account> {
    SEED_TABLE
        .iter()
        .map(|(hash, dollars)| Account::new(*hash, Cents::from(*dollars) * 100))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_accounts_are_unique_and_ordered() {
        let accounts = seed_accounts();
        assert_eq!(accounts.len(), 19);
        assert_eq!(
            accounts[0].hash,
            "65a6745f084e7af17e1715ae9302cc14820e331af610badd3d9805cb9cd3504e"
        );
        assert_eq!(
            accounts[18].hash,
            "20f586474bf292d420bb8c5139bfb8224cda900280ffa2c95b45a33eb98e96cd"
        );

        let mut hashes: Vec<_> = accounts.iter().map(|a| a.hash.as_str()).collect();
        hashes.sort_unstable();
        hashes.dedup();
        assert_eq!(hashes.len(), 19);
    }

    #[test]
    fn test_balance_view_formats_currency() {
        let account = Account::new("029ff25d832b97b9d55fc93078dac6552a61be7a", 65231435393097689000);
        let view = BalanceView::from(&account);
        assert_eq!(view.balance, "$652,314,353,930,976,890.00");
    }
}
