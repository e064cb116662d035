use serde::Serialize;

use crate::models::{BudgetCategory, BudgetLine, Transaction};

/// The budgeted amount for each [BudgetCategory].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    /// The total of lines in the "Needs" category.
    pub needs: f64,
    /// The total of lines in the "Wants" category.
    pub wants: f64,
}

impl CategoryTotals {
    /// The total of a single category.
    pub fn get(&self, category: BudgetCategory) -> f64 {
        match category {
            BudgetCategory::Needs => self.needs,
            BudgetCategory::Wants => self.wants,
        }
    }

    /// The total of both categories.
    pub fn total(&self) -> f64 {
        self.needs + self.wants
    }
}

/// Sums budget line amounts by category.
///
/// Both categories are always present, starting at zero. Lines with a
/// category other than "needs" or "wants" (ignoring case) are left out.
pub fn category_totals<'a>(budget_lines: impl IntoIterator<Item = &'a BudgetLine>) -> CategoryTotals {
    let mut totals = CategoryTotals::default();

    for line in budget_lines {
        match line.budget_category() {
            Some(BudgetCategory::Needs) => totals.needs += line.amount,
            Some(BudgetCategory::Wants) => totals.wants += line.amount,
            None => {}
        }
    }

    totals
}

/// The monthly budget next to the money actually spent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BudgetVsActual {
    /// The sum of all budget lines.
    pub budget: f64,
    /// The sum of debit and debt transactions.
    pub spent: f64,
}

impl BudgetVsActual {
    /// The share of the budget that has been spent, as a percentage.
    ///
    /// Returns `None` when the budget is zero.
    pub fn percent_spent(&self) -> Option<f64> {
        if self.budget == 0.0 {
            None
        } else {
            Some(self.spent / self.budget * 100.0)
        }
    }

    /// How much of the budget is left. Negative when overspent.
    pub fn remaining(&self) -> f64 {
        self.budget - self.spent
    }
}

/// Compares the total budget against actual spending.
///
/// Every budget line counts towards the budget regardless of its category.
/// Only debit and debt transactions count as spending.
pub fn budget_vs_actual<'a, 'b>(
    budget_lines: impl IntoIterator<Item = &'a BudgetLine>,
    transactions: impl IntoIterator<Item = &'b Transaction>,
) -> BudgetVsActual {
    let budget = budget_lines.into_iter().map(|line| line.amount).sum();
    let spent = transactions
        .into_iter()
        .filter(|transaction| transaction.kind.is_spending())
        .map(|transaction| transaction.amount)
        .sum();

    BudgetVsActual { budget, spent }
}

#[cfg(test)]
mod category_totals_tests {
    use crate::models::{BudgetCategory, BudgetLine};

    use super::{CategoryTotals, category_totals};

    #[test]
    fn both_categories_are_present_for_empty_input() {
        let lines: Vec<BudgetLine> = Vec::new();

        assert_eq!(
            category_totals(&lines),
            CategoryTotals {
                needs: 0.0,
                wants: 0.0
            }
        );
    }

    #[test]
    fn sums_by_lowercased_category() {
        let lines = vec![
            BudgetLine::build(1200.0, "Needs", "Rent"),
            BudgetLine::build(300.0, "needs", "Groceries"),
            BudgetLine::build(80.0, "WANTS", "Streaming"),
            BudgetLine::build(20.0, "Wants", "Coffee"),
        ];

        let totals = category_totals(&lines);

        assert_eq!(totals.needs, 1500.0);
        assert_eq!(totals.wants, 100.0);
        assert_eq!(totals.get(BudgetCategory::Needs), 1500.0);
        assert_eq!(totals.get(BudgetCategory::Wants), 100.0);
    }

    #[test]
    fn total_only_includes_recognised_categories() {
        let lines = vec![
            BudgetLine::build(200.0, "Needs", "Power"),
            BudgetLine::build(50.0, "Wants", "Games"),
            BudgetLine::build(999.0, "Savings", "Emergency fund"),
            BudgetLine::build(1.0, "", "Blank"),
        ];

        let totals = category_totals(&lines);

        let expected: f64 = lines
            .iter()
            .filter(|line| line.budget_category().is_some())
            .map(|line| line.amount)
            .sum();
        assert_eq!(totals.total(), expected);
        assert_eq!(totals.total(), 250.0);
    }
}
