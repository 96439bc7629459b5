//! Journal entries: the double-entry transaction model.
//!
//! Entries are produced by operational actions outside the engine
//! (settlement approvals, invoice payments) and are read-only here. The
//! trial balance aggregator tolerates malformed entries; `validate` is for
//! the code paths that create them.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Currency, EngineError, EngineResult};

/// A single line of a journal entry.
///
/// Both sides are always present; in valid data exactly one of them is
/// nonzero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Account being posted to
    pub account_id: String,
    /// Debit amount (>= 0)
    pub debit: BigDecimal,
    /// Credit amount (>= 0)
    pub credit: BigDecimal,
}

impl JournalLine {
    /// Create a debit line
    pub fn debit(account_id: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            account_id: account_id.into(),
            debit: amount,
            credit: BigDecimal::from(0),
        }
    }

    /// Create a credit line
    pub fn credit(account_id: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            account_id: account_id.into(),
            debit: BigDecimal::from(0),
            credit: amount,
        }
    }
}

/// A complete double-entry journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier
    pub id: String,
    /// Posting date
    pub date: NaiveDate,
    /// Description of the transaction
    pub description: String,
    /// Optional reference (booking id, invoice number, etc.)
    pub reference: Option<String>,
    /// Currency the entry is recorded in
    pub currency: Currency,
    /// Exchange rate for foreign-currency entries
    pub exchange_rate: Option<BigDecimal>,
    /// Original total before conversion, for foreign-currency entries
    pub original_total: Option<BigDecimal>,
    /// The posting lines
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Create a new, empty journal entry
    pub fn new(id: impl Into<String>, date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date,
            description: description.into(),
            reference: None,
            currency: Currency::default(),
            exchange_rate: None,
            original_total: None,
            lines: Vec::new(),
        }
    }

    /// Total of all debit amounts
    pub fn total_debits(&self) -> BigDecimal {
        self.lines.iter().map(|l| &l.debit).sum()
    }

    /// Total of all credit amounts
    pub fn total_credits(&self) -> BigDecimal {
        self.lines.iter().map(|l| &l.credit).sum()
    }

    /// Whether debits equal credits across all lines
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }

    /// Validate the entry against the double-entry rules.
    ///
    /// Used by entry creators; the aggregator never rejects an entry.
    pub fn validate(&self) -> EngineResult<()> {
        if self.lines.len() < 2 {
            return Err(EngineError::Validation(
                "Journal entry must have at least two lines".to_string(),
            ));
        }

        for line in &self.lines {
            let zero = BigDecimal::from(0);
            if line.debit < zero || line.credit < zero {
                return Err(EngineError::Validation(format!(
                    "Line for account '{}' has a negative amount",
                    line.account_id
                )));
            }
            if (line.debit != zero) == (line.credit != zero) {
                return Err(EngineError::Validation(format!(
                    "Line for account '{}' must have exactly one of debit or credit set",
                    line.account_id
                )));
            }
        }

        if !self.is_balanced() {
            return Err(EngineError::Validation(format!(
                "Journal entry '{}' is not balanced: debits = {}, credits = {}",
                self.id,
                self.total_debits(),
                self.total_credits()
            )));
        }

        Ok(())
    }
}

/// Builder for journal entries
#[derive(Debug)]
pub struct JournalEntryBuilder {
    entry: JournalEntry,
}

impl JournalEntryBuilder {
    /// Start a new entry
    pub fn new(id: impl Into<String>, date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            entry: JournalEntry::new(id, date, description),
        }
    }

    /// Set the reference
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.entry.reference = Some(reference.into());
        self
    }

    /// Set the currency
    pub fn currency(mut self, currency: Currency) -> Self {
        self.entry.currency = currency;
        self
    }

    /// Record the exchange rate and pre-conversion total for a
    /// foreign-currency entry
    pub fn foreign(mut self, exchange_rate: BigDecimal, original_total: BigDecimal) -> Self {
        self.entry.exchange_rate = Some(exchange_rate);
        self.entry.original_total = Some(original_total);
        self
    }

    /// Add a debit line
    pub fn debit(mut self, account_id: impl Into<String>, amount: BigDecimal) -> Self {
        self.entry.lines.push(JournalLine::debit(account_id, amount));
        self
    }

    /// Add a credit line
    pub fn credit(mut self, account_id: impl Into<String>, amount: BigDecimal) -> Self {
        self.entry.lines.push(JournalLine::credit(account_id, amount));
        self
    }

    /// Validate and build the entry
    pub fn build(self) -> EngineResult<JournalEntry> {
        self.entry.validate()?;
        Ok(self.entry)
    }
}

/// Common posting patterns for the operational actions that feed the ledger
pub mod patterns {
    use super::*;

    /// A driver settling held COD cash with the company: debit cash, credit
    /// the driver payable account.
    pub fn settlement_received(
        id: impl Into<String>,
        date: NaiveDate,
        booking_reference: impl Into<String>,
        cash_account_id: impl Into<String>,
        driver_payable_account_id: impl Into<String>,
        amount: BigDecimal,
    ) -> EngineResult<JournalEntry> {
        JournalEntryBuilder::new(id, date, "Driver COD settlement")
            .reference(booking_reference)
            .debit(cash_account_id, amount.clone())
            .credit(driver_payable_account_id, amount)
            .build()
    }

    /// A customer paying a delivery invoice: debit cash, credit delivery
    /// fee revenue.
    pub fn invoice_payment(
        id: impl Into<String>,
        date: NaiveDate,
        invoice_reference: impl Into<String>,
        cash_account_id: impl Into<String>,
        revenue_account_id: impl Into<String>,
        amount: BigDecimal,
    ) -> EngineResult<JournalEntry> {
        JournalEntryBuilder::new(id, date, "Delivery invoice payment")
            .reference(invoice_reference)
            .debit(cash_account_id, amount.clone())
            .credit(revenue_account_id, amount)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn balanced_entry_validates() {
        let entry = JournalEntryBuilder::new("je1", date(), "Settlement")
            .debit("cash-usd", BigDecimal::from(50))
            .credit("driver-payable", BigDecimal::from(50))
            .build()
            .unwrap();

        assert!(entry.is_balanced());
        assert_eq!(entry.total_debits(), BigDecimal::from(50));
    }

    #[test]
    fn unbalanced_entry_is_rejected_by_validate() {
        let result = JournalEntryBuilder::new("je2", date(), "Broken")
            .debit("cash-usd", BigDecimal::from(50))
            .credit("driver-payable", BigDecimal::from(40))
            .build();

        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn line_with_both_sides_set_is_rejected() {
        let mut entry = JournalEntry::new("je3", date(), "Both sides");
        entry.lines.push(JournalLine {
            account_id: "cash-usd".to_string(),
            debit: BigDecimal::from(10),
            credit: BigDecimal::from(10),
        });
        entry.lines.push(JournalLine::credit("rev", BigDecimal::from(0)));

        assert!(entry.validate().is_err());
    }

    #[test]
    fn settlement_pattern_balances() {
        let entry = patterns::settlement_received(
            "je4",
            date(),
            "BK-1001",
            "cash-usd",
            "driver-payable",
            BigDecimal::from(200),
        )
        .unwrap();

        assert!(entry.is_balanced());
        assert_eq!(entry.reference.as_deref(), Some("BK-1001"));
    }
}
