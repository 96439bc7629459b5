//! In-memory store implementation for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::chart::Account;
use crate::journal::JournalEntry;
use crate::traits::LedgerStore;
use crate::types::EngineResult;
use crate::wallet::{ActorRef, ActorRole, BookingEvent, CommissionRule, WalletTransaction};

/// In-memory [`LedgerStore`] for tests and development.
///
/// Collections keep insertion order so repeated reads return identical
/// snapshots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    accounts: Arc<RwLock<Vec<Account>>>,
    journal_entries: Arc<RwLock<Vec<JournalEntry>>>,
    wallet_transactions: Arc<RwLock<Vec<WalletTransaction>>>,
    bookings: Arc<RwLock<Vec<BookingEvent>>>,
    commission_rules: Arc<RwLock<Vec<CommissionRule>>>,
    employee_zones: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.accounts.write().unwrap().clear();
        self.journal_entries.write().unwrap().clear();
        self.wallet_transactions.write().unwrap().clear();
        self.bookings.write().unwrap().clear();
        self.commission_rules.write().unwrap().clear();
        self.employee_zones.write().unwrap().clear();
    }

    /// Seed an account
    pub fn add_account(&self, account: Account) {
        self.accounts.write().unwrap().push(account);
    }

    /// Seed a journal entry
    pub fn add_journal_entry(&self, entry: JournalEntry) {
        self.journal_entries.write().unwrap().push(entry);
    }

    /// Seed a wallet transaction
    pub fn add_wallet_transaction(&self, txn: WalletTransaction) {
        self.wallet_transactions.write().unwrap().push(txn);
    }

    /// Seed a booking
    pub fn add_booking(&self, booking: BookingEvent) {
        self.bookings.write().unwrap().push(booking);
    }

    /// Seed a commission rule
    pub fn add_commission_rule(&self, rule: CommissionRule) {
        self.commission_rules.write().unwrap().push(rule);
    }

    /// Assign an employee (driver) to a zone
    pub fn set_employee_zone(&self, actor_id: impl Into<String>, zone: impl Into<String>) {
        self.employee_zones
            .write()
            .unwrap()
            .insert(actor_id.into(), zone.into());
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get_accounts(&self) -> EngineResult<Vec<Account>> {
        Ok(self.accounts.read().unwrap().clone())
    }

    async fn get_journal_entries(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> EngineResult<Vec<JournalEntry>> {
        let entries = self.journal_entries.read().unwrap();
        let filtered: Vec<JournalEntry> = entries
            .iter()
            .filter(|entry| {
                if let Some(start) = start_date {
                    if entry.date < start {
                        return false;
                    }
                }
                if let Some(end) = end_date {
                    if entry.date > end {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn get_wallet_transactions(
        &self,
        actor_id: &str,
    ) -> EngineResult<Vec<WalletTransaction>> {
        let transactions = self.wallet_transactions.read().unwrap();
        Ok(transactions
            .iter()
            .filter(|t| t.actor_id == actor_id)
            .cloned()
            .collect())
    }

    async fn get_bookings(&self, actor: &ActorRef) -> EngineResult<Vec<BookingEvent>> {
        let bookings = self.bookings.read().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| match actor.role {
                ActorRole::Customer => b.sender_id == actor.id,
                ActorRole::Driver => b.driver_id.as_deref() == Some(actor.id.as_str()),
            })
            .cloned()
            .collect())
    }

    async fn get_commission_rules(&self) -> EngineResult<Vec<CommissionRule>> {
        Ok(self.commission_rules.read().unwrap().clone())
    }

    async fn get_employee_zone(&self, actor_id: &str) -> EngineResult<Option<String>> {
        Ok(self.employee_zones.read().unwrap().get(actor_id).cloned())
    }

    async fn save_wallet_transaction(&mut self, txn: &WalletTransaction) -> EngineResult<()> {
        self.wallet_transactions.write().unwrap().push(txn.clone());
        Ok(())
    }
}
