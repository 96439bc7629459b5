//! The wallet ledger reconciler: merges explicit transactions with entries
//! derived from booking state into one per-actor ledger.
//!
//! This is a pure function over an immutable snapshot. It keeps no state and
//! caches nothing, so re-running it against the same inputs yields identical
//! output, and concurrent calls cannot interfere.
//!
//! Derived entries are append-only by construction: a delivered item always
//! produces its COD entry (held, for a driver) even after settlement, and
//! the explicit Settlement credit reconciles the sum. History is never
//! deleted or mutated to reflect later transitions.

use bigdecimal::BigDecimal;
use tracing::warn;

use crate::types::{Currency, EngineConfig, EngineError, EngineResult};
use crate::wallet::booking::{BookingEvent, BookingItem, BookingStatus};
use crate::wallet::{
    select_rule, ActorRef, ActorRole, CommissionRule, CommissionRuleType, LedgerItem,
    LedgerItemType, LedgerStatus, WalletTransaction, WalletTransactionType,
};

/// Build the unified, date-descending ledger for one actor.
///
/// Explicit transactions map 1:1; implicit entries are derived per booking.
/// A booking whose derivation fails (e.g. a corrupt record) is logged and
/// skipped without affecting the rest of the ledger.
pub fn build_unified_ledger(
    actor: &ActorRef,
    transactions: &[WalletTransaction],
    bookings: &[BookingEvent],
    commission_rules: &[CommissionRule],
    driver_zone: Option<&str>,
    config: &EngineConfig,
) -> Vec<LedgerItem> {
    let mut items: Vec<LedgerItem> = transactions.iter().map(map_explicit).collect();

    for booking in bookings {
        match derive_booking_entries(actor, booking, commission_rules, driver_zone, config) {
            Ok(derived) => items.extend(derived),
            Err(err) => {
                warn!(booking = %booking.id, %err, "skipping booking contribution to ledger");
            }
        }
    }

    // stable sort: same-instant entries keep derivation order, so identical
    // snapshots always produce identical output
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items
}

/// Map one explicit transaction to a ledger item.
///
/// Deposit, Earning, Refund and Settlement credit the balance; Withdrawal
/// debits it. A Settlement is the actor paying held cash into the company,
/// which reduces what they owe, so it credits their wallet even though cash
/// physically leaves their hand.
fn map_explicit(txn: &WalletTransaction) -> LedgerItem {
    let (item_type, is_credit) = match txn.txn_type {
        WalletTransactionType::Deposit => (LedgerItemType::Deposit, true),
        WalletTransactionType::Earning => (LedgerItemType::Earning, true),
        WalletTransactionType::Refund => (LedgerItemType::Refund, true),
        WalletTransactionType::Settlement => (LedgerItemType::Settlement, true),
        WalletTransactionType::Withdrawal => (LedgerItemType::Withdrawal, false),
    };
    LedgerItem {
        date: txn.date,
        description: txn.description.clone(),
        item_type,
        amount: txn.amount.clone(),
        currency: txn.currency,
        status: txn.status,
        is_credit,
    }
}

fn derive_booking_entries(
    actor: &ActorRef,
    booking: &BookingEvent,
    commission_rules: &[CommissionRule],
    driver_zone: Option<&str>,
    config: &EngineConfig,
) -> EngineResult<Vec<LedgerItem>> {
    if booking.status == BookingStatus::Cancelled {
        return Ok(Vec::new());
    }
    if booking.items.is_empty() {
        return Err(EngineError::Validation(format!(
            "Booking '{}' has no items",
            booking.id
        )));
    }

    Ok(match actor.role {
        ActorRole::Customer => sender_entries(booking, config),
        ActorRole::Driver => driver_entries(booking, commission_rules, driver_zone, config),
    })
}

/// Entries for the parcel sender: a COD credit per delivered item, plus the
/// prorated service-fee debit(s).
fn sender_entries(booking: &BookingEvent, config: &EngineConfig) -> Vec<LedgerItem> {
    let mut out = Vec::new();

    for item in booking.delivered_items() {
        out.push(LedgerItem {
            date: booking.date,
            description: format!("COD collected for booking {} item {}", booking.id, item.id),
            item_type: LedgerItemType::CodCollected,
            amount: item.cod_amount.clone(),
            currency: item.bucket(),
            status: LedgerStatus::Collected,
            is_credit: true,
        });
    }

    let fee_due = booking.delivered_items().next().is_some()
        || matches!(
            booking.status,
            BookingStatus::Confirmed | BookingStatus::Completed
        );
    if !fee_due || booking.delivery_fee == BigDecimal::from(0) {
        return out;
    }

    for (currency, amount) in
        prorate_over_buckets(booking, &booking.delivery_fee, |item| item.is_delivered(), config)
    {
        out.push(LedgerItem {
            date: booking.date,
            description: format!("Delivery fee for booking {}", booking.id),
            item_type: LedgerItemType::ServiceFee,
            amount,
            currency,
            status: LedgerStatus::Applied,
            is_credit: false,
        });
    }

    out
}

/// Entries for the driver: prorated commission credit(s) over processed
/// items, plus a COD-held debit per delivered item.
///
/// The held debit is emitted whether or not the item has since been settled;
/// the explicit Settlement credit balances it out, keeping the history
/// intact and the sum self-correcting.
fn driver_entries(
    booking: &BookingEvent,
    commission_rules: &[CommissionRule],
    driver_zone: Option<&str>,
    config: &EngineConfig,
) -> Vec<LedgerItem> {
    let mut out = Vec::new();

    let rule = select_rule(commission_rules, driver_zone, config);
    let total_commission = match rule.rule_type {
        CommissionRuleType::FixedAmount => rule.value.clone(),
        CommissionRuleType::Percentage => {
            &booking.delivery_fee * &rule.value / BigDecimal::from(100)
        }
    };

    if total_commission > BigDecimal::from(0) {
        for (currency, amount) in
            prorate_over_buckets(booking, &total_commission, |item| item.is_processed(), config)
        {
            out.push(LedgerItem {
                date: booking.date,
                description: format!("Delivery commission for booking {}", booking.id),
                item_type: LedgerItemType::Commission,
                amount,
                currency,
                status: LedgerStatus::Earned,
                is_credit: true,
            });
        }
    }

    for item in booking.delivered_items() {
        out.push(LedgerItem {
            date: booking.date,
            description: format!("COD held for booking {} item {}", booking.id, item.id),
            item_type: LedgerItemType::CodHeld,
            amount: item.cod_amount.clone(),
            currency: item.bucket(),
            status: LedgerStatus::Held,
            is_credit: false,
        });
    }

    out
}

/// Split a booking-currency total across the booking's currency buckets in
/// proportion to the items matching `counts`.
///
/// Shares are computed multiply-first (`total x count / item_count`) so a
/// fully-prorated share is exact. A bucket's share is converted from the
/// booking currency into the bucket currency at the fixed rate only when the
/// booking currency is set and differs; with no recorded booking currency
/// amounts pass through unconverted. Buckets with no matching items produce
/// no entry.
fn prorate_over_buckets(
    booking: &BookingEvent,
    total: &BigDecimal,
    counts: impl Fn(&BookingItem) -> bool,
    config: &EngineConfig,
) -> Vec<(Currency, BigDecimal)> {
    let item_count = BigDecimal::from(booking.items.len() as u64);
    let buckets = booking.item_currencies();
    let mut shares = Vec::new();

    if buckets.len() <= 1 {
        let matching = booking.items.iter().filter(|i| counts(i)).count();
        if matching > 0 {
            let amount = total * BigDecimal::from(matching as u64) / &item_count;
            let bucket = buckets.first().copied().unwrap_or_default();
            // single-bucket entries carry the booking currency when set, with
            // no conversion
            let currency = booking.currency.unwrap_or(bucket);
            shares.push((currency, amount));
        }
    } else {
        for bucket in buckets {
            let matching = booking
                .items
                .iter()
                .filter(|i| i.bucket() == bucket && counts(i))
                .count();
            if matching == 0 {
                continue;
            }
            let share = total * BigDecimal::from(matching as u64) / &item_count;
            let amount = match booking.currency {
                Some(bc) if bc != bucket => config.convert(&share, bc, bucket),
                _ => share,
            };
            shares.push((bucket, amount));
        }
    }

    shares
}
