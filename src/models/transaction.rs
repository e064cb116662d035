use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::models::Timestamped;

/// Money that has actually moved in or out of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The API's identifier for the transaction.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// Free text describing the transaction, e.g. "Coffee".
    #[serde(default)]
    pub description: String,
    /// The unsigned amount of money that moved. The direction is given by `kind`.
    pub amount: f64,
    /// Which way the money moved.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The account the transaction belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// When the transaction happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// When the API stored the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Transaction {
    /// Create a transaction with an empty ID, no account and no timestamps.
    pub fn build(amount: f64, kind: TransactionKind, description: &str) -> Self {
        Self {
            id: String::new(),
            description: description.to_owned(),
            amount,
            kind,
            account_id: None,
            timestamp: None,
            created_at: None,
        }
    }

    /// Set the `timestamp` field.
    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_owned());
        self
    }

    /// Set the `createdAt` field.
    pub fn created_at(mut self, created_at: &str) -> Self {
        self.created_at = Some(created_at.to_owned());
        self
    }
}

impl Timestamped for Transaction {
    fn timestamp_str(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    fn created_at_str(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// The direction of a [Transaction].
///
/// The API stores this as a lowercase string. Strings other than the three
/// known ones are kept in [TransactionKind::Other] so they survive a round
/// trip, but they do not count towards any inflow or outflow total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    /// Money coming in.
    Credit,
    /// Money going out.
    Debit,
    /// Money borrowed, i.e., an increase in a liability.
    Debt,
    /// A type string the dashboard does not know about.
    Other(String),
}

impl TransactionKind {
    /// The string the API uses for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Debt => "debt",
            Self::Other(kind) => kind,
        }
    }

    /// Whether the transaction counts as spending against the budget.
    pub fn is_spending(&self) -> bool {
        matches!(self, Self::Debit | Self::Debt)
    }
}

impl From<String> for TransactionKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "credit" => Self::Credit,
            "debit" => Self::Debit,
            "debt" => Self::Debt,
            _ => Self::Other(kind),
        }
    }
}

impl From<&str> for TransactionKind {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_owned())
    }
}

impl From<TransactionKind> for String {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Other(kind) => kind,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
