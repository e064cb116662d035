use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Transaction, TransactionKind};

/// The amount of money that moved in each direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FlowTotals {
    /// Money coming in.
    pub credit: f64,
    /// Money going out.
    pub debit: f64,
    /// Money borrowed.
    pub debt: f64,
}

impl FlowTotals {
    /// The sum of all three directions.
    pub fn total(&self) -> f64 {
        self.credit + self.debit + self.debt
    }
}

/// Sums transaction amounts by kind.
///
/// All three totals start at zero. Transactions of an unknown kind are left out.
pub fn flow_totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> FlowTotals {
    let mut totals = FlowTotals::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Credit => totals.credit += transaction.amount,
            TransactionKind::Debit => totals.debit += transaction.amount,
            TransactionKind::Debt => totals.debt += transaction.amount,
            TransactionKind::Other(_) => {}
        }
    }

    totals
}

/// Sums transaction amounts by description.
///
/// Descriptions are compared exactly, so "Coffee" and "coffee" are separate
/// keys. Keys come out in sorted order.
pub fn sum_by_description<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions {
        *totals
            .entry(transaction.description.clone())
            .or_insert(0.0) += transaction.amount;
    }

    totals
}

/// Sums transaction amounts by kind, keyed by the capitalised kind, e.g. "Debit".
///
/// Unlike [flow_totals], unknown kinds get their own key.
pub fn sum_by_type<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions {
        *totals
            .entry(capitalise(transaction.kind.as_str()))
            .or_insert(0.0) += transaction.amount;
    }

    totals
}

/// Uppercases the first character and lowercases the rest.
pub(crate) fn capitalise(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
