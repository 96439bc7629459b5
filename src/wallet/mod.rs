//! Wallet vocabulary: explicit transactions, derived ledger items, and
//! commission rules.
//!
//! Explicit and implicit (booking-derived) entries are unified into a single
//! tagged-variant [`LedgerItem`], produced by independent pure mapping
//! functions and merged by the reconciler.

pub mod balance;
pub mod booking;
pub mod reconciler;

pub use balance::*;
pub use booking::*;
pub use reconciler::*;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{Currency, EngineConfig};

/// Types of explicit wallet transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletTransactionType {
    Deposit,
    Withdrawal,
    Settlement,
    Earning,
    Refund,
}

/// Lifecycle status of a wallet transaction or derived ledger item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerStatus {
    /// Awaiting approval; does not move the balance
    Pending,
    Approved,
    Applied,
    Collected,
    Earned,
    Held,
    Settled,
    /// Voided; does not move the balance
    Rejected,
}

impl LedgerStatus {
    /// Whether this status contributes to the balance. Pending and Rejected
    /// entries represent unconfirmed or voided events and are excluded.
    pub fn is_finalized(&self) -> bool {
        !matches!(self, LedgerStatus::Pending | LedgerStatus::Rejected)
    }
}

/// An explicit financial transaction against an actor's wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Unique identifier
    pub id: String,
    /// The customer or driver this transaction belongs to
    pub actor_id: String,
    /// When the transaction occurred
    pub date: NaiveDateTime,
    pub txn_type: WalletTransactionType,
    pub amount: BigDecimal,
    pub currency: Currency,
    pub status: LedgerStatus,
    pub description: String,
}

impl WalletTransaction {
    pub fn new(
        id: impl Into<String>,
        actor_id: impl Into<String>,
        date: NaiveDateTime,
        txn_type: WalletTransactionType,
        amount: BigDecimal,
        currency: Currency,
        status: LedgerStatus,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            actor_id: actor_id.into(),
            date,
            txn_type,
            amount,
            currency,
            status,
            description: description.into(),
        }
    }
}

/// Discriminant unifying explicit and booking-derived ledger entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerItemType {
    // explicit
    Deposit,
    Withdrawal,
    Settlement,
    Earning,
    Refund,
    // derived from bookings
    /// COD credited to a sender for a delivered item
    CodCollected,
    /// Prorated delivery fee debited to a sender
    ServiceFee,
    /// COD cash a driver holds and owes back to the company
    CodHeld,
    /// Prorated commission credited to a driver
    Commission,
}

/// One line of a unified wallet ledger, derived on every read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerItem {
    pub date: NaiveDateTime,
    pub description: String,
    pub item_type: LedgerItemType,
    pub amount: BigDecimal,
    pub currency: Currency,
    pub status: LedgerStatus,
    /// `true` increases the actor's balance, `false` decreases it
    pub is_credit: bool,
}

/// How a commission rule computes the driver's cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommissionRuleType {
    /// `value` is a percentage of the delivery fee
    Percentage,
    /// `value` is a fixed amount per booking
    FixedAmount,
}

/// A zone-scoped or default commission rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRule {
    /// Zone this rule applies to; `None` marks the default rule
    pub zone: Option<String>,
    pub rule_type: CommissionRuleType,
    pub value: BigDecimal,
}

impl CommissionRule {
    /// A percentage-of-fee rule
    pub fn percentage(zone: Option<String>, value: BigDecimal) -> Self {
        Self {
            zone,
            rule_type: CommissionRuleType::Percentage,
            value,
        }
    }

    /// A fixed-amount-per-booking rule
    pub fn fixed(zone: Option<String>, value: BigDecimal) -> Self {
        Self {
            zone,
            rule_type: CommissionRuleType::FixedAmount,
            value,
        }
    }
}

/// Pick the single rule that applies to a booking: the driver's zone rule if
/// one exists, else the default (zone-less) rule, else the configured
/// fallback.
pub fn select_rule<'a>(
    rules: &'a [CommissionRule],
    driver_zone: Option<&str>,
    config: &'a EngineConfig,
) -> &'a CommissionRule {
    driver_zone
        .and_then(|zone| rules.iter().find(|r| r.zone.as_deref() == Some(zone)))
        .or_else(|| rules.iter().find(|r| r.zone.is_none()))
        .unwrap_or(&config.default_commission)
}

/// Whether an actor uses the ledger as a customer (parcel sender) or a
/// driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorRole {
    Customer,
    Driver,
}

/// Reference to the actor a ledger is built for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
    pub id: String,
    pub role: ActorRole,
}

impl ActorRef {
    pub fn customer(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Customer,
        }
    }

    pub fn driver(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Driver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalized_statuses_exclude_pending_and_rejected() {
        assert!(!LedgerStatus::Pending.is_finalized());
        assert!(!LedgerStatus::Rejected.is_finalized());
        for status in [
            LedgerStatus::Approved,
            LedgerStatus::Applied,
            LedgerStatus::Collected,
            LedgerStatus::Earned,
            LedgerStatus::Held,
            LedgerStatus::Settled,
        ] {
            assert!(status.is_finalized(), "{status:?} should be finalized");
        }
    }

    #[test]
    fn rule_selection_prefers_zone_then_default_then_fallback() {
        let config = EngineConfig::default();
        let rules = vec![
            CommissionRule::fixed(Some("north".to_string()), BigDecimal::from(5)),
            CommissionRule::percentage(None, BigDecimal::from(60)),
        ];

        let zone_rule = select_rule(&rules, Some("north"), &config);
        assert_eq!(zone_rule.rule_type, CommissionRuleType::FixedAmount);

        let default_rule = select_rule(&rules, Some("south"), &config);
        assert_eq!(default_rule.value, BigDecimal::from(60));

        let fallback = select_rule(&[], None, &config);
        assert_eq!(fallback, &config.default_commission);
    }
}
