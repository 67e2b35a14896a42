use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    Account, BalanceView, JournalEntry, JournalRequest, Transfer, TransferReceipt,
    TransferRequest, TransferValidationError, amount_to_cents, field_text, format_usd,
    is_present, payload_digest,
};
use crate::storage::{BalanceStore, Repository};

use super::{AllowAll, AppError, Authenticator};

/// Application service providing the simulated ledger operations.
/// This is the primary interface for any client (HTTP, CLI, tests).
pub struct LedgerService {
    balances: BalanceStore,
    repo: Repository,
    auth: Box<dyn Authenticator>,
}

impl LedgerService {
    /// Create a new ledger service from a balance store and a journal repository.
    pub fn new(balances: BalanceStore, repo: Repository) -> Self {
        Self {
            balances,
            repo,
            auth: Box::new(AllowAll),
        }
    }

    /// Replace the authenticator consulted before every simulated transfer.
    pub fn with_authenticator(mut self, auth: impl Authenticator + 'static) -> Self {
        self.auth = Box::new(auth);
        self
    }

    /// Open (or create) the journal database at the given path and seed the balance store.
    pub async fn init(database_path: &str, seed: Vec<Account>) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        let balances =
            BalanceStore::new(seed).map_err(|e| AppError::InvalidSeed(e.to_string()))?;
        Ok(Self::new(balances, repo))
    }

    // ========================
    // Simulated balances
    // ========================

    /// All balances in seed order, formatted as currency.
    pub async fn list_balances(&self) -> Vec<BalanceView> {
        self.balances
            .list()
            .await
            .iter()
            .map(BalanceView::from)
            .collect()
    }

    /// Formatted balance of a single account.
    pub async fn get_balance(&self, hash: &str) -> Result<BalanceView, AppError> {
        let balance = self
            .balances
            .balance(hash)
            .await
            .ok_or_else(|| AppError::AccountNotFound(hash.to_string()))?;
        Ok(BalanceView {
            hash: hash.to_string(),
            balance: format_usd(balance),
        })
    }

    /// Debit the source account of a simulated transfer.
    ///
    /// Checks run in order: required fields, authentication, source existence, funds.
    /// The lookup, funds check and debit happen under one write lock, and nothing is
    /// mutated unless every check passes. The target account is never credited.
    pub async fn initiate_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferReceipt, AppError> {
        let transfer = Transfer::try_from(request).map_err(|e| match e {
            TransferValidationError::MissingFields => AppError::MissingFields(
                "sourceHash, amount, or targetAccount.".to_string(),
            ),
            TransferValidationError::InvalidAmount(reason) => AppError::InvalidAmount(reason),
        })?;

        info!(
            source = %transfer.source_hash,
            amount = %format_usd(transfer.amount_cents),
            target = %transfer.target_account,
            "Received simulated transfer request"
        );

        if !self.auth.authorize(&transfer) {
            return Err(AppError::Unauthorized);
        }

        let new_balance = {
            let mut accounts = self.balances.lock().await;

            let balance = accounts
                .balance(&transfer.source_hash)
                .ok_or_else(|| AppError::AccountNotFound(transfer.source_hash.clone()))?;

            if balance < transfer.amount_cents {
                return Err(AppError::InsufficientFunds {
                    hash: transfer.source_hash.clone(),
                    balance: format_usd(balance),
                });
            }

            accounts
                .debit(&transfer.source_hash, transfer.amount_cents)
                .ok_or_else(|| AppError::AccountNotFound(transfer.source_hash.clone()))?
        };

        let receipt = TransferReceipt::new(format_usd(new_balance), Utc::now());
        info!(
            source = %transfer.source_hash,
            new_balance = %receipt.new_source_balance,
            transaction_id = %receipt.transaction_id,
            "Simulated transfer successful"
        );

        Ok(receipt)
    }

    // ========================
    // Transfer journal
    // ========================

    /// Verify the payload digest of a journal transfer and persist it.
    pub async fn record_journal_transfer(
        &self,
        request: &JournalRequest,
    ) -> Result<JournalEntry, AppError> {
        if !is_present(&request.account) || request.amount.is_null() {
            return Err(AppError::MissingFields("account or amount".to_string()));
        }

        let digest = payload_digest(&request.account, &request.amount);
        if request.hash.as_deref() != Some(digest.as_str()) {
            warn!(account = %field_text(&request.account), "Journal transfer rejected: digest mismatch");
            return Err(AppError::InvalidHash);
        }

        let amount_cents = amount_to_cents(&request.amount)
            .map_err(|e| AppError::InvalidAmount(e.to_string()))?;
        let amount_cents = i64::try_from(amount_cents)
            .map_err(|_| AppError::InvalidAmount("Amount out of range".to_string()))?;

        let entry = JournalEntry::new(field_text(&request.account), amount_cents, digest);
        self.repo.save_entry(&entry).await?;

        info!(id = %entry.id, account = %entry.account, "Journal transfer recorded");
        Ok(entry)
    }

    /// All journal entries, oldest first.
    pub async fn list_journal(&self) -> Result<Vec<JournalEntry>, AppError> {
        Ok(self.repo.list_entries().await?)
    }

    /// Journal entries for one account, oldest first.
    pub async fn list_journal_for_account(
        &self,
        account: &str,
    ) -> Result<Vec<JournalEntry>, AppError> {
        Ok(self.repo.list_entries_for_account(account).await?)
    }
}
