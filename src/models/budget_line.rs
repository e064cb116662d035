use serde::{Deserialize, Serialize};

use crate::models::Timestamped;

/// A planned monthly spending allocation.
///
/// The API calls these "expenses" and serves them from `/expenses`, but they
/// describe the budget, not money that has been spent. Money that has
/// actually moved is a [Transaction](crate::models::Transaction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    /// The API's identifier for the budget line.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// What the money is set aside for, e.g. "Rent".
    #[serde(default)]
    pub description: String,
    /// The amount budgeted per month.
    pub amount: f64,
    /// The category exactly as stored by the API, see [BudgetCategory::parse].
    pub category: String,
    /// An optional free-form label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// When the budget line was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// When the API stored the budget line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BudgetLine {
    /// Create a budget line with an empty ID, no label and no timestamps.
    pub fn build(amount: f64, category: &str, description: &str) -> Self {
        Self {
            id: String::new(),
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
            label: None,
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

    /// The recognised category of the line, if any.
    pub fn budget_category(&self) -> Option<BudgetCategory> {
        BudgetCategory::parse(&self.category)
    }
}

impl Timestamped for BudgetLine {
    fn timestamp_str(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    fn created_at_str(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// The two kinds of spending a budget is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetCategory {
    /// Essentials such as rent and groceries.
    Needs,
    /// Everything else.
    Wants,
}

impl BudgetCategory {
    /// Parse a category string case-insensitively.
    ///
    /// Returns `None` for anything other than "needs" or "wants".
    pub fn parse(category: &str) -> Option<Self> {
        match category.to_lowercase().as_str() {
            "needs" => Some(Self::Needs),
            "wants" => Some(Self::Wants),
            _ => None,
        }
    }

    /// The name to display for the category.
    pub fn label(self) -> &'static str {
        match self {
            Self::Needs => "Needs",
            Self::Wants => "Wants",
        }
    }
}
