//! Storage abstraction: the engine's read contracts and its single write.
//!
//! The engine is a pure computation over snapshots; everything it consumes
//! arrives through this trait, so any backend (SQL, document store,
//! in-memory) can drive it. Each orchestrated operation fetches all of its
//! inputs from one store before computing, since mixing reads from different
//! snapshot times would silently corrupt proration math.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::chart::Account;
use crate::journal::JournalEntry;
use crate::types::EngineResult;
use crate::wallet::{ActorRef, BookingEvent, CommissionRule, WalletTransaction};

/// Read contracts the reconciliation engine consumes, plus the one write
/// used by the withdrawal path.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// The full chart of accounts
    async fn get_accounts(&self) -> EngineResult<Vec<Account>>;

    /// Journal entries, optionally filtered by posting date
    async fn get_journal_entries(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> EngineResult<Vec<JournalEntry>>;

    /// Explicit wallet transactions for one actor
    async fn get_wallet_transactions(
        &self,
        actor_id: &str,
    ) -> EngineResult<Vec<WalletTransaction>>;

    /// Bookings relevant to one actor: as sender for a customer, as the
    /// assigned driver for a driver
    async fn get_bookings(&self, actor: &ActorRef) -> EngineResult<Vec<BookingEvent>>;

    /// All configured commission rules
    async fn get_commission_rules(&self) -> EngineResult<Vec<CommissionRule>>;

    /// The delivery zone an employee (driver) is assigned to, if any
    async fn get_employee_zone(&self, actor_id: &str) -> EngineResult<Option<String>>;

    /// Persist a wallet transaction (a validated withdrawal request)
    async fn save_wallet_transaction(&mut self, txn: &WalletTransaction) -> EngineResult<()>;
}
