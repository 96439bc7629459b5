//! Shared vocabulary for the ledger engine: currencies, account
//! classification, engine configuration, and errors.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::wallet::CommissionRule;

/// Currency buckets handled by the engine.
///
/// Wallets settle in exactly two currencies: US dollars and Cambodian riel.
/// Every monetary field in the system carries one of the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US dollar, the base currency for fees and commission rules.
    #[default]
    Usd,
    /// Cambodian riel, the local currency.
    Khr,
}

impl Currency {
    /// Lenient parse: an unknown or empty code falls back to USD so that a
    /// record with a corrupt currency field still renders on a statement.
    pub fn parse_lenient(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Khr => write!(f, "KHR"),
        }
    }
}

impl FromStr for Currency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" | "$" => Ok(Currency::Usd),
            "KHR" | "៛" => Ok(Currency::Khr),
            other => Err(EngineError::Validation(format!(
                "Unknown currency code '{}'",
                other
            ))),
        }
    }
}

/// Account classes following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountClass {
    /// Assets - what the business owns (Cash, Vehicles, Receivables, etc.)
    Asset,
    /// Liabilities - what the business owes (Driver Payables, Loans, etc.)
    Liability,
    /// Equity - owner's interest in the business
    Equity,
    /// Revenue - money earned by the business (delivery fees, etc.)
    Revenue,
    /// Expenses - costs incurred by the business (commissions, fuel, etc.)
    Expense,
}

impl AccountClass {
    /// Returns the normal balance side for this account class.
    /// Assets and Expenses normally carry debit balances; Liabilities,
    /// Equity, and Revenue normally carry credit balances.
    pub fn normal_balance(&self) -> EntrySide {
        match self {
            AccountClass::Asset | AccountClass::Expense => EntrySide::Debit,
            AccountClass::Liability | AccountClass::Equity | AccountClass::Revenue => {
                EntrySide::Credit
            }
        }
    }
}

/// Sides of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySide {
    Debit,
    Credit,
}

/// Named configuration for the reconciliation engine.
///
/// These values replace the inline constants of the original system: the
/// fixed conversion rate between the two currency buckets, the fallback
/// commission rule used when no zone or default rule matches, and the bound
/// on chart-of-accounts parent walks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The base currency (delivery fees and percentage rules are quoted in it).
    pub base_currency: Currency,
    /// The local currency.
    pub local_currency: Currency,
    /// Fixed conversion rate: units of local currency per one base unit.
    pub local_per_base: BigDecimal,
    /// Hard-coded fallback commission when no rule matches a booking.
    pub default_commission: CommissionRule,
    /// Maximum depth of an account parent-chain walk; bounds malformed
    /// hierarchies that contain a parent cycle.
    pub max_hierarchy_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_currency: Currency::Usd,
            local_currency: Currency::Khr,
            local_per_base: BigDecimal::from(4000),
            default_commission: CommissionRule::percentage(None, BigDecimal::from(70)),
            max_hierarchy_depth: 32,
        }
    }
}

impl EngineConfig {
    /// Convert an amount between the two currency buckets at the fixed rate.
    /// Same-currency conversion is the identity.
    pub fn convert(&self, amount: &BigDecimal, from: Currency, to: Currency) -> BigDecimal {
        if from == to {
            amount.clone()
        } else if from == self.base_currency && to == self.local_currency {
            amount * &self.local_per_base
        } else {
            amount / &self.local_per_base
        }
    }
}

/// Errors that can occur in the reconciliation engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Booking not found: {0}")]
    BookingNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Requested {requested} {currency} exceeds available balance of {available} {currency}")]
    ExceedsAvailableBalance {
        requested: BigDecimal,
        available: BigDecimal,
        currency: Currency,
    },
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
