//! The engine orchestrator: ties a [`LedgerStore`] to the pure computation
//! functions, one consistent snapshot per call.

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::traits::LedgerStore;
use crate::trial_balance::{generate_trial_balance, TrialBalance};
use crate::types::{Currency, EngineConfig, EngineResult};
use crate::wallet::{
    build_unified_ledger, compute_balance, compute_settlement_breakdown, pending_withdrawals,
    validate_withdrawal, ActorRef, LedgerItem, LedgerStatus, SettlementBreakdown, WalletBalance,
    WalletTransaction, WalletTransactionType,
};

/// Finance engine over a storage backend.
///
/// Every method reads all of its inputs from the store first and then runs
/// the pure aggregation/reconciliation functions on that snapshot.
pub struct FinanceEngine<S: LedgerStore> {
    store: S,
    config: EngineConfig,
}

impl<S: LedgerStore> FinanceEngine<S> {
    /// Create an engine with the production configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Aggregate the chart of accounts and all journal entries into a trial
    /// balance
    pub async fn trial_balance(&self) -> EngineResult<TrialBalance> {
        let accounts = self.store.get_accounts().await?;
        let entries = self.store.get_journal_entries(None, None).await?;
        Ok(generate_trial_balance(&accounts, &entries, &self.config))
    }

    /// Build the unified wallet ledger (statement) for one actor
    pub async fn wallet_statement(&self, actor: &ActorRef) -> EngineResult<Vec<LedgerItem>> {
        let transactions = self.store.get_wallet_transactions(&actor.id).await?;
        let bookings = self.store.get_bookings(actor).await?;
        let rules = self.store.get_commission_rules().await?;
        let zone = self.store.get_employee_zone(&actor.id).await?;

        Ok(build_unified_ledger(
            actor,
            &transactions,
            &bookings,
            &rules,
            zone.as_deref(),
            &self.config,
        ))
    }

    /// Net balance per currency for one actor
    pub async fn wallet_balance(&self, actor: &ActorRef) -> EngineResult<WalletBalance> {
        let ledger = self.wallet_statement(actor).await?;
        Ok(compute_balance(&ledger))
    }

    /// Settlement breakdown for one actor and currency
    pub async fn settlement_breakdown(
        &self,
        actor: &ActorRef,
        currency: Currency,
    ) -> EngineResult<SettlementBreakdown> {
        let ledger = self.wallet_statement(actor).await?;
        Ok(compute_settlement_breakdown(&ledger, currency))
    }

    /// Validate and persist a withdrawal request.
    ///
    /// Read-then-validate-then-write in one exclusive call: the balance is
    /// recomputed from a fresh snapshot, the cap is checked, and only then
    /// is a Pending withdrawal persisted. Requiring `&mut self` keeps two
    /// requests through the same engine from both validating against a
    /// stale balance, and open (still Pending) requests reserve their
    /// amount against the cap so a sequence of requests cannot commit the
    /// same funds twice. Stores shared across engines must provide their
    /// own atomicity for this call.
    pub async fn request_withdrawal(
        &mut self,
        actor: &ActorRef,
        amount: BigDecimal,
        currency: Currency,
    ) -> EngineResult<WalletTransaction> {
        let ledger = self.wallet_statement(actor).await?;
        let mut breakdown = compute_settlement_breakdown(&ledger, currency);
        // Pending requests are excluded from paid_out by the finalized-status
        // rule, but they still hold their amount until approved or rejected
        breakdown.net -= pending_withdrawals(&ledger, currency);
        validate_withdrawal(&breakdown, &amount)?;

        let txn = WalletTransaction::new(
            Uuid::new_v4().to_string(),
            actor.id.clone(),
            chrono::Utc::now().naive_utc(),
            WalletTransactionType::Withdrawal,
            amount,
            currency,
            LedgerStatus::Pending,
            "Withdrawal request",
        );
        self.store.save_wallet_transaction(&txn).await?;
        Ok(txn)
    }
}
