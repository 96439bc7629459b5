//! Balance and settlement calculation over a unified ledger.
//!
//! Only finalized entries move the balance; Pending and Rejected entries
//! represent unconfirmed or voided events. The settlement breakdown is the
//! gate that caps a payout request; validation happens before any write.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{Currency, EngineError, EngineResult};
use crate::wallet::{LedgerItem, LedgerItemType, LedgerStatus};

/// Net wallet balance per currency bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub usd: BigDecimal,
    pub khr: BigDecimal,
}

impl WalletBalance {
    /// The balance in one currency bucket
    pub fn get(&self, currency: Currency) -> &BigDecimal {
        match currency {
            Currency::Usd => &self.usd,
            Currency::Khr => &self.khr,
        }
    }
}

/// Compute the per-currency net balance from a unified ledger.
///
/// Credits add to their currency bucket, debits subtract; non-finalized
/// entries are excluded entirely.
pub fn compute_balance(ledger: &[LedgerItem]) -> WalletBalance {
    let mut balance = WalletBalance::default();

    for item in ledger.iter().filter(|i| i.status.is_finalized()) {
        let bucket = match item.currency {
            Currency::Usd => &mut balance.usd,
            Currency::Khr => &mut balance.khr,
        };
        if item.is_credit {
            *bucket += &item.amount;
        } else {
            *bucket -= &item.amount;
        }
    }

    balance
}

/// The components a payout request is validated against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementBreakdown {
    pub currency: Currency,
    /// COD collected on the actor's behalf
    pub cod_total: BigDecimal,
    /// Delivery fees charged to the actor
    pub fee_total: BigDecimal,
    /// Withdrawals already paid out
    pub paid_out: BigDecimal,
    /// Cash the actor deposited
    pub deposits: BigDecimal,
    /// `(cod_total + deposits) - fee_total - paid_out`; the payout cap
    pub net: BigDecimal,
}

/// Compute the settlement breakdown for one currency over finalized entries.
pub fn compute_settlement_breakdown(
    ledger: &[LedgerItem],
    currency: Currency,
) -> SettlementBreakdown {
    let mut cod_total = BigDecimal::from(0);
    let mut fee_total = BigDecimal::from(0);
    let mut paid_out = BigDecimal::from(0);
    let mut deposits = BigDecimal::from(0);

    for item in ledger
        .iter()
        .filter(|i| i.currency == currency && i.status.is_finalized())
    {
        match item.item_type {
            LedgerItemType::CodCollected => cod_total += &item.amount,
            LedgerItemType::ServiceFee => fee_total += &item.amount,
            LedgerItemType::Withdrawal => paid_out += &item.amount,
            LedgerItemType::Deposit => deposits += &item.amount,
            _ => {}
        }
    }

    let net = &cod_total + &deposits - &fee_total - &paid_out;

    SettlementBreakdown {
        currency,
        cod_total,
        fee_total,
        paid_out,
        deposits,
        net,
    }
}

/// Sum of withdrawal requests still awaiting approval, per currency.
///
/// Pending requests never move the balance or the breakdown, but an open
/// request reserves its amount: a second request validated while the first
/// is still pending must not commit the same funds twice.
pub fn pending_withdrawals(ledger: &[LedgerItem], currency: Currency) -> BigDecimal {
    ledger
        .iter()
        .filter(|i| {
            i.currency == currency
                && i.item_type == LedgerItemType::Withdrawal
                && i.status == LedgerStatus::Pending
        })
        .map(|i| i.amount.clone())
        .sum()
}

/// Validate a payout request against the settlement net.
///
/// A request for exactly `net` passes; anything above is rejected with a
/// descriptive error before any persistence happens.
pub fn validate_withdrawal(
    breakdown: &SettlementBreakdown,
    requested: &BigDecimal,
) -> EngineResult<()> {
    if *requested <= BigDecimal::from(0) {
        return Err(EngineError::InvalidAmount(format!(
            "Withdrawal amount must be positive, got {}",
            requested
        )));
    }
    if requested > &breakdown.net {
        return Err(EngineError::ExceedsAvailableBalance {
            requested: requested.clone(),
            available: breakdown.net.clone(),
            currency: breakdown.currency,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(
        item_type: LedgerItemType,
        amount: i64,
        currency: Currency,
        status: LedgerStatus,
        is_credit: bool,
    ) -> LedgerItem {
        LedgerItem {
            date: NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            description: String::new(),
            item_type,
            amount: BigDecimal::from(amount),
            currency,
            status,
            is_credit,
        }
    }

    #[test]
    fn balance_buckets_by_currency_and_skips_non_finalized() {
        let ledger = vec![
            item(LedgerItemType::CodCollected, 50, Currency::Usd, LedgerStatus::Collected, true),
            item(LedgerItemType::ServiceFee, 5, Currency::Usd, LedgerStatus::Applied, false),
            item(LedgerItemType::CodCollected, 200_000, Currency::Khr, LedgerStatus::Collected, true),
            item(LedgerItemType::Withdrawal, 40, Currency::Usd, LedgerStatus::Pending, false),
            item(LedgerItemType::Deposit, 99, Currency::Usd, LedgerStatus::Rejected, true),
        ];

        let balance = compute_balance(&ledger);
        assert_eq!(balance.usd, BigDecimal::from(45));
        assert_eq!(balance.khr, BigDecimal::from(200_000));
        assert_eq!(balance.get(Currency::Khr), &BigDecimal::from(200_000));
    }

    #[test]
    fn breakdown_net_formula() {
        let ledger = vec![
            item(LedgerItemType::CodCollected, 100, Currency::Usd, LedgerStatus::Collected, true),
            item(LedgerItemType::Deposit, 20, Currency::Usd, LedgerStatus::Approved, true),
            item(LedgerItemType::ServiceFee, 10, Currency::Usd, LedgerStatus::Applied, false),
            item(LedgerItemType::Withdrawal, 30, Currency::Usd, LedgerStatus::Approved, false),
            // other currency and other types stay out of the breakdown
            item(LedgerItemType::CodCollected, 8000, Currency::Khr, LedgerStatus::Collected, true),
            item(LedgerItemType::Commission, 7, Currency::Usd, LedgerStatus::Earned, true),
        ];

        let breakdown = compute_settlement_breakdown(&ledger, Currency::Usd);
        assert_eq!(breakdown.cod_total, BigDecimal::from(100));
        assert_eq!(breakdown.deposits, BigDecimal::from(20));
        assert_eq!(breakdown.fee_total, BigDecimal::from(10));
        assert_eq!(breakdown.paid_out, BigDecimal::from(30));
        assert_eq!(breakdown.net, BigDecimal::from(80));
    }

    #[test]
    fn withdrawal_cap_is_exact() {
        let ledger = vec![item(
            LedgerItemType::CodCollected,
            100,
            Currency::Usd,
            LedgerStatus::Collected,
            true,
        )];
        let breakdown = compute_settlement_breakdown(&ledger, Currency::Usd);

        assert!(validate_withdrawal(&breakdown, &BigDecimal::from(100)).is_ok());

        let just_over: BigDecimal = "100.01".parse().unwrap();
        let err = validate_withdrawal(&breakdown, &just_over).unwrap_err();
        assert!(matches!(err, EngineError::ExceedsAvailableBalance { .. }));
    }

    #[test]
    fn pending_withdrawals_sum_only_open_requests() {
        let ledger = vec![
            item(LedgerItemType::Withdrawal, 40, Currency::Usd, LedgerStatus::Pending, false),
            item(LedgerItemType::Withdrawal, 25, Currency::Usd, LedgerStatus::Pending, false),
            item(LedgerItemType::Withdrawal, 30, Currency::Usd, LedgerStatus::Approved, false),
            item(LedgerItemType::Withdrawal, 10, Currency::Usd, LedgerStatus::Rejected, false),
            item(LedgerItemType::Withdrawal, 8000, Currency::Khr, LedgerStatus::Pending, false),
        ];

        assert_eq!(
            pending_withdrawals(&ledger, Currency::Usd),
            BigDecimal::from(65)
        );
        assert_eq!(
            pending_withdrawals(&ledger, Currency::Khr),
            BigDecimal::from(8000)
        );
    }

    #[test]
    fn non_positive_withdrawals_are_rejected() {
        let breakdown = compute_settlement_breakdown(&[], Currency::Usd);
        assert!(validate_withdrawal(&breakdown, &BigDecimal::from(0)).is_err());
        assert!(validate_withdrawal(&breakdown, &BigDecimal::from(-5)).is_err());
    }
}
