//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    aggregation::capitalise,
    html::{CARD_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_currency},
    models::Transaction,
};

/// The most transactions listed in the recent transactions table.
pub(super) const RECENT_TRANSACTIONS_LIMIT: usize = 10;

const TABLE_HEADER_CELL_STYLE: &str = "px-6 py-3";

/// Renders the first ten transactions as a table.
///
/// `None` means the transactions could not be fetched.
pub(super) fn recent_transactions_view(transactions: Option<&[&Transaction]>) -> Markup {
    html! {
        section id="recent-transactions" class={"w-full mb-4 " (CARD_STYLE)} {
            h3 class="text-xl font-semibold mb-4" { "Recent Transactions" }

            @match transactions {
                None => {
                    p class="text-center p-3 text-red-600 dark:text-red-400" {
                        "Could not load transactions."
                    }
                }
                Some([]) => {
                    p class="text-center p-3 text-gray-500 dark:text-gray-400" {
                        "No transactions yet."
                    }
                }
                Some(transactions) => {
                    div class="overflow-x-auto rounded-lg shadow" {
                        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                            thead class="text-xs text-gray-900 uppercase bg-gray-100 dark:bg-gray-700 dark:text-gray-400" {
                                tr {
                                    th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Description" }
                                    th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Amount" }
                                    th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Type" }
                                }
                            }

                            tbody {
                                @for transaction in transactions.iter().take(RECENT_TRANSACTIONS_LIMIT) {
                                    tr class=(TABLE_ROW_STYLE) {
                                        td class=(TABLE_CELL_STYLE) { (capitalise_words(&transaction.description)) }
                                        td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                                        td class=(TABLE_CELL_STYLE) { (capitalise(transaction.kind.as_str())) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Capitalises each space separated word, e.g. "weekly SHOP" becomes "Weekly Shop".
fn capitalise_words(text: &str) -> String {
    text.split(' ').map(capitalise).collect::<Vec<_>>().join(" ")
}
