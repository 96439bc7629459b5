//! Trial balance aggregation over the chart of accounts and journal entries.
//!
//! The aggregator is tolerant by design: unknown account references are
//! skipped with a warning, unbalanced entries are flagged but still
//! aggregated, and parent walks are cycle-bounded. Partial data must still
//! render a report.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::chart::{Account, ChartIndex};
use crate::journal::JournalEntry;
use crate::types::{AccountClass, EngineConfig};

/// One aggregated row per account, derived and never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_id: String,
    pub code: String,
    pub name: String,
    pub class: AccountClass,
    pub is_header: bool,
    /// Aggregated debits, including all descendants for header rows
    pub debit: BigDecimal,
    /// Aggregated credits, including all descendants for header rows
    pub credit: BigDecimal,
}

impl TrialBalanceRow {
    /// Net movement (debits minus credits)
    pub fn net(&self) -> BigDecimal {
        &self.debit - &self.credit
    }
}

/// The full trial balance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// One row per account, in chart order
    pub rows: Vec<TrialBalanceRow>,
    /// Total debits over leaf (non-header) rows
    pub total_debit: BigDecimal,
    /// Total credits over leaf (non-header) rows
    pub total_credit: BigDecimal,
    /// Whether leaf debits equal leaf credits
    pub is_balanced: bool,
    /// Ids of journal entries that violate the balanced-entry invariant.
    /// Flagged for the caller; their lines are still aggregated.
    pub unbalanced_entries: Vec<String>,
}

impl TrialBalance {
    /// Look up the row for an account
    pub fn row(&self, account_id: &str) -> Option<&TrialBalanceRow> {
        self.rows.iter().find(|r| r.account_id == account_id)
    }

    /// Net movement of one class summed over leaf rows only.
    ///
    /// Header rows are excluded so that rolled-up totals are not counted
    /// twice; this is the figure KPI dashboards consume.
    pub fn leaf_net(&self, class: AccountClass) -> BigDecimal {
        self.rows
            .iter()
            .filter(|r| !r.is_header && r.class == class)
            .map(|r| r.net())
            .sum()
    }
}

/// Aggregate journal entries into a trial balance over the given chart.
///
/// Never fails: malformed input degrades the report instead of aborting it.
pub fn generate_trial_balance(
    accounts: &[Account],
    entries: &[JournalEntry],
    config: &EngineConfig,
) -> TrialBalance {
    let mut rows: Vec<TrialBalanceRow> = accounts
        .iter()
        .map(|a| TrialBalanceRow {
            account_id: a.id.clone(),
            code: a.code.clone(),
            name: a.name.clone(),
            class: a.class,
            is_header: a.is_header,
            debit: BigDecimal::from(0),
            credit: BigDecimal::from(0),
        })
        .collect();

    let index_of: HashMap<&str, usize> = accounts
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.as_str(), i))
        .collect();

    let mut unbalanced_entries = Vec::new();

    for entry in entries {
        if !entry.is_balanced() {
            unbalanced_entries.push(entry.id.clone());
        }
        for line in &entry.lines {
            match index_of.get(line.account_id.as_str()) {
                Some(&i) => {
                    rows[i].debit += &line.debit;
                    rows[i].credit += &line.credit;
                }
                None => {
                    warn!(
                        entry = %entry.id,
                        account = %line.account_id,
                        "journal line references an unknown account, skipping"
                    );
                }
            }
        }
    }

    // Direct postings per account, snapshotted before roll-up so each
    // account contributes exactly once to every ancestor.
    let direct: Vec<(BigDecimal, BigDecimal)> = rows
        .iter()
        .map(|r| (r.debit.clone(), r.credit.clone()))
        .collect();

    let chart = ChartIndex::new(accounts, config.max_hierarchy_depth);
    for (i, account) in accounts.iter().enumerate() {
        for ancestor in chart.ancestors_of(&account.id) {
            if let Some(&j) = index_of.get(ancestor.id.as_str()) {
                rows[j].debit += &direct[i].0;
                rows[j].credit += &direct[i].1;
            }
        }
    }

    let total_debit: BigDecimal = rows
        .iter()
        .filter(|r| !r.is_header)
        .map(|r| &r.debit)
        .sum();
    let total_credit: BigDecimal = rows
        .iter()
        .filter(|r| !r.is_header)
        .map(|r| &r.credit)
        .sum();
    let is_balanced = total_debit == total_credit;

    TrialBalance {
        rows,
        total_debit,
        total_credit,
        is_balanced,
        unbalanced_entries,
    }
}
