//! Chart of accounts: the hierarchical account model read by the trial
//! balance aggregator.
//!
//! The hierarchy is read-only to the engine; accounts are created and edited
//! by an external configuration surface. Header accounts aggregate their
//! children and never appear in journal lines themselves.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::{AccountClass, Currency, EngineError, EngineResult};

/// A single account in the chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: String,
    /// Human-readable account code (e.g. "1000")
    pub code: String,
    /// Account name
    pub name: String,
    /// Class of the account (Asset, Liability, etc.)
    pub class: AccountClass,
    /// Optional sub-type within the class (e.g. "Cash and Bank")
    pub sub_type: Option<String>,
    /// Currency the account is denominated in
    pub currency: Currency,
    /// Header accounts aggregate children and take no direct postings
    pub is_header: bool,
    /// Weak reference to the parent (header) account, if any
    pub parent_id: Option<String>,
}

impl Account {
    /// Create a new leaf account
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        class: AccountClass,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            class,
            sub_type: None,
            currency: Currency::default(),
            is_header: false,
            parent_id,
        }
    }

    /// Mark this account as a header (aggregation-only) account
    pub fn header(mut self) -> Self {
        self.is_header = true;
        self
    }

    /// Set the sub-type
    pub fn sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }

    /// Set the currency
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

/// Index over a slice of accounts for hierarchy lookups.
///
/// Parent walks are bounded by `max_depth` and a visited set, so a malformed
/// hierarchy containing a parent cycle terminates instead of looping.
pub struct ChartIndex<'a> {
    accounts: &'a [Account],
    by_id: HashMap<&'a str, &'a Account>,
    max_depth: usize,
}

impl<'a> ChartIndex<'a> {
    /// Build an index over the given accounts
    pub fn new(accounts: &'a [Account], max_depth: usize) -> Self {
        let by_id = accounts.iter().map(|a| (a.id.as_str(), a)).collect();
        Self {
            accounts,
            by_id,
            max_depth,
        }
    }

    /// Look up an account by id
    pub fn get(&self, account_id: &str) -> Option<&'a Account> {
        self.by_id.get(account_id).copied()
    }

    /// Direct children of the given account
    pub fn children_of(&self, parent_id: &str) -> Vec<&'a Account> {
        self.accounts
            .iter()
            .filter(|a| a.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    /// Ancestors of the given account, nearest first, excluding the account
    /// itself. Stops at the root, at a dangling parent reference, or when a
    /// cycle or the depth bound is hit.
    pub fn ancestors_of(&self, account_id: &str) -> Vec<&'a Account> {
        let mut ancestors = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(account_id);

        let mut current = self
            .get(account_id)
            .and_then(|a| a.parent_id.as_deref());

        while let Some(parent_id) = current {
            if ancestors.len() >= self.max_depth || !visited.insert(parent_id) {
                break;
            }
            match self.get(parent_id) {
                Some(parent) => {
                    ancestors.push(parent);
                    current = parent.parent_id.as_deref();
                }
                None => break,
            }
        }

        ancestors
    }
}

/// Check the creation-time invariant that a child account carries the same
/// class and sub-type as its parent, and that the parent is a header.
///
/// The trial balance aggregator never calls this; it is exposed for the
/// external surface that maintains the chart.
pub fn validate_parent_consistency(child: &Account, parent: &Account) -> EngineResult<()> {
    if !parent.is_header {
        return Err(EngineError::Validation(format!(
            "Parent account '{}' is not a header account",
            parent.id
        )));
    }
    if child.class != parent.class {
        return Err(EngineError::Validation(format!(
            "Account '{}' has class {:?} but its parent '{}' has class {:?}",
            child.id, child.class, parent.id, parent.class
        )));
    }
    if child.sub_type != parent.sub_type {
        return Err(EngineError::Validation(format!(
            "Account '{}' sub-type does not match its parent '{}'",
            child.id, parent.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chart() -> Vec<Account> {
        vec![
            Account::new("assets", "1000", "Assets", AccountClass::Asset, None).header(),
            Account::new(
                "cash",
                "1100",
                "Cash and Bank",
                AccountClass::Asset,
                Some("assets".to_string()),
            )
            .header(),
            Account::new(
                "cash-usd",
                "1110",
                "Cash USD",
                AccountClass::Asset,
                Some("cash".to_string()),
            ),
        ]
    }

    #[test]
    fn ancestors_walk_to_root() {
        let accounts = sample_chart();
        let index = ChartIndex::new(&accounts, 32);

        let ancestors = index.ancestors_of("cash-usd");
        let ids: Vec<&str> = ancestors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["cash", "assets"]);

        assert!(index.ancestors_of("assets").is_empty());
    }

    #[test]
    fn parent_cycle_terminates() {
        let accounts = vec![
            Account::new("a", "1", "A", AccountClass::Asset, Some("b".to_string())),
            Account::new("b", "2", "B", AccountClass::Asset, Some("a".to_string())),
        ];
        let index = ChartIndex::new(&accounts, 32);

        let ancestors = index.ancestors_of("a");
        let ids: Vec<&str> = ancestors.iter().map(|a| a.id.as_str()).collect();
        // walks b, then a is already visited
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn dangling_parent_reference_is_tolerated() {
        let accounts = vec![Account::new(
            "orphan",
            "9",
            "Orphan",
            AccountClass::Expense,
            Some("missing".to_string()),
        )];
        let index = ChartIndex::new(&accounts, 32);
        assert!(index.ancestors_of("orphan").is_empty());
    }

    #[test]
    fn parent_consistency_is_enforced() {
        let parent = Account::new("rev", "4000", "Revenue", AccountClass::Revenue, None).header();
        let good = Account::new(
            "rev-fees",
            "4100",
            "Delivery Fees",
            AccountClass::Revenue,
            Some("rev".to_string()),
        );
        let bad = Account::new(
            "fuel",
            "5100",
            "Fuel",
            AccountClass::Expense,
            Some("rev".to_string()),
        );

        assert!(validate_parent_consistency(&good, &parent).is_ok());
        assert!(validate_parent_consistency(&bad, &parent).is_err());
    }
}
