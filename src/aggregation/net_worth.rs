use crate::models::Account;

/// The name fragments that mark an account as a liability by default.
pub const DEFAULT_DEBT_KEYWORDS: [&str; 6] = ["debt", "visa", "credit", "loan", "overdraft", "borrow"];

/// Decides whether an account is a liability from its name.
///
/// An account is a liability when its name contains one of the keywords,
/// ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtClassifier {
    keywords: Vec<String>,
}

impl DebtClassifier {
    /// Create a classifier from a list of keywords.
    ///
    /// Keywords are lowercased and empty keywords are ignored, since an empty
    /// keyword would match every account.
    pub fn new<S: AsRef<str>>(keywords: impl IntoIterator<Item = S>) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();

        Self { keywords }
    }

    /// Whether an account called `name` is a liability.
    pub fn is_debt(&self, name: &str) -> bool {
        let name = name.to_lowercase();

        self.keywords
            .iter()
            .any(|keyword| name.contains(keyword.as_str()))
    }

    /// The lowercased keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for DebtClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DEBT_KEYWORDS)
    }
}

/// The total of asset balances minus the total of liability balances.
///
/// Returns zero when there are no accounts.
pub fn total_net_worth<'a>(
    accounts: impl IntoIterator<Item = &'a Account>,
    classifier: &DebtClassifier,
) -> f64 {
    accounts.into_iter().fold(0.0, |total, account| {
        if classifier.is_debt(&account.name) {
            total - account.balance
        } else {
            total + account.balance
        }
    })
}
