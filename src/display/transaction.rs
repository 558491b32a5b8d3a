//! Transaction display formatting
//!
//! Fixed-width register: a 4-column position gutter, then type, date,
//! category and amount columns, then the free-text description.

use crate::models::Transaction;

/// Format the register column header
pub fn format_register_header() -> String {
    format!(
        "    {:<10}{:<15}{:<20}{:<15}Description",
        "Type", "Date", "Category", "Amount"
    )
}

/// Format a single transaction for display (register row)
pub fn format_transaction_row(position: usize, txn: &Transaction) -> String {
    let amount = format!("{:.2}", txn.amount);
    format!(
        "{:>2}. {:<10}{:<15}{:<20}{:<15}{}",
        position,
        txn.type_name(),
        txn.date,
        txn.category_name(),
        amount,
        txn.description
    )
}

/// Format numbered transactions as a register
pub fn format_register<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = (usize, &'a Transaction)>,
{
    let mut rows = rows.into_iter().peekable();
    if rows.peek().is_none() {
        return "No transactions found.\n".to_string();
    }

    let mut output = format_register_header();
    output.push('\n');
    for (position, txn) in rows {
        output.push_str(&format_transaction_row(position, txn));
        output.push('\n');
    }
    output
}
