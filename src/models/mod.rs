//! The records served by the finance API.
//!
//! These are plain values: the dashboard only ever reads snapshots of them
//! and never writes anything back.

mod account;
mod budget_line;
mod transaction;

pub use account::Account;
pub use budget_line::{BudgetCategory, BudgetLine};
pub use transaction::{Transaction, TransactionKind};

/// A record that may carry the time it was made.
///
/// The API is not consistent about which field holds the time, so records
/// expose both and [Timestamped::resolve_timestamp] picks one.
pub trait Timestamped {
    /// The explicit timestamp of the record, if any.
    fn timestamp_str(&self) -> Option<&str>;

    /// The time the API stored the record, if any.
    fn created_at_str(&self) -> Option<&str>;

    /// The timestamp to use for the record: `timestamp`, falling back to
    /// `created_at`. Empty strings count as missing.
    fn resolve_timestamp(&self) -> Option<&str> {
        self.timestamp_str()
            .filter(|timestamp| !timestamp.is_empty())
            .or_else(|| self.created_at_str().filter(|timestamp| !timestamp.is_empty()))
    }
}
