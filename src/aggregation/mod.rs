//! Derived summaries of account, budget and transaction records.
//!
//! Everything in this module is a pure function of its input. Nothing here
//! fails: records that do not fit a summary, such as unknown transaction
//! kinds or unparseable timestamps, are left out rather than reported as
//! errors.

mod budget;
mod flow;
mod monthly;
mod net_worth;

pub use budget::{BudgetVsActual, CategoryTotals, budget_vs_actual, category_totals};
pub(crate) use flow::capitalise;
pub use flow::{FlowTotals, flow_totals, sum_by_description, sum_by_type};
pub use monthly::{
    DropReason, DroppedRecord, InvalidMonthKey, MonthKey, MonthlyGroups, filter_to_month,
    group_by_month, group_by_month_at, monthly_net_flow_at, running_balances,
};
pub use net_worth::{DEFAULT_DEBT_KEYWORDS, DebtClassifier, total_net_worth};
