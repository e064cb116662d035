use serde::{Deserialize, Serialize};

use crate::models::Timestamped;

/// A bank account, credit card or loan with its current balance.
///
/// Whether the account is an asset or a liability is not stored anywhere,
/// it is inferred from the name by a [DebtClassifier](crate::aggregation::DebtClassifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The API's identifier for the account.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// The display name of the account, e.g. "Everyday" or "Visa".
    pub name: String,
    /// The signed balance of the account.
    pub balance: f64,
    /// When the balance was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// When the API stored the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Account {
    /// Create an account with an empty ID and no timestamps.
    pub fn build(name: &str, balance: f64) -> Self {
        Self {
            id: String::new(),
            name: name.to_owned(),
            balance,
            timestamp: None,
            created_at: None,
        }
    }

    /// Set the ID of the account.
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_owned();
        self
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

impl Timestamped for Account {
    fn timestamp_str(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    fn created_at_str(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}
