//! Expense display formatting
//!
//! Register-style list and detail view. User ids are shown by name when the
//! caller can resolve them.

use std::collections::HashMap;

use crate::models::{Expense, ExpenseType, UserId};

/// Resolve an id to a display name, falling back to the raw id
fn name_of<'a>(names: &'a HashMap<UserId, String>, id: &'a UserId) -> &'a str {
    names.get(id).map(String::as_str).unwrap_or(id.as_str())
}

/// Format a single expense as a list row
pub fn format_expense_row(
    expense: &Expense,
    names: &HashMap<UserId, String>,
    symbol: &str,
) -> String {
    let type_marker = match expense.expense_type {
        ExpenseType::Expense => " ",
        ExpenseType::Income => "+",
    };

    format!(
        "{} {:<10} {} {:<28} {:<14} {:>12}  {:<12} {}",
        type_marker,
        expense.id.short(),
        expense.date.format("%Y-%m-%d"),
        truncate(&expense.description, 28),
        expense.category,
        expense.amount.format_with_symbol(symbol),
        truncate(name_of(names, &expense.paid_by), 12),
        expense.split_with.len()
    )
}

/// Format a list of expenses
pub fn format_expense_list(
    expenses: &[Expense],
    names: &HashMap<UserId, String>,
    symbol: &str,
) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<10} {:<10} {:<28} {:<14} {:>12}  {:<12} {}\n",
        "ID", "Date", "Description", "Category", "Amount", "Paid By", "Split"
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, names, symbol));
        output.push('\n');
    }

    output.push_str(&"-".repeat(100));
    output.push('\n');
    output.push_str(&format!("{} record(s); + = income\n", expenses.len()));

    output
}

/// Format expense details for display
pub fn format_expense_details(
    expense: &Expense,
    names: &HashMap<UserId, String>,
    symbol: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!("Description: {}\n", expense.description));
    output.push_str(&format!("Date:        {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "Amount:      {}\n",
        expense.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Category:    {}\n", expense.category));
    output.push_str(&format!("Type:        {}\n", expense.expense_type));
    output.push_str(&format!(
        "Paid by:     {}\n",
        name_of(names, &expense.paid_by)
    ));

    let split: Vec<&str> = expense
        .split_with
        .iter()
        .map(|id| name_of(names, id))
        .collect();
    output.push_str(&format!("Split with:  {}\n", split.join(", ")));

    if let Ok(share) = expense.share() {
        output.push_str(&format!(
            "Each share:  {}\n",
            share.format_with_symbol(symbol)
        ));
    }

    output
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn dinner() -> (Expense, HashMap<UserId, String>) {
        let alex = UserId::from_raw("user1");
        let blake = UserId::from_raw("user2");
        let expense = Expense::new(
            "Dinner",
            Money::new(dec!(100)),
            NaiveDate::from_ymd_opt(2023, 10, 15).unwrap(),
            alex.clone(),
            [alex.clone(), blake.clone()],
        );
        let names = HashMap::from([(alex, "Alex".to_string()), (blake, "Blake".to_string())]);
        (expense, names)
    }

    #[test]
    fn test_details_resolve_names() {
        let (expense, names) = dinner();
        let text = format_expense_details(&expense, &names, "$");

        assert!(text.contains("Paid by:     Alex"));
        assert!(text.contains("Split with:  Alex, Blake"));
        assert!(text.contains("Each share:  $50.00"));
    }

    #[test]
    fn test_unknown_payer_shows_id() {
        let (expense, _) = dinner();
        let row = format_expense_row(&expense, &HashMap::new(), "$");
        assert!(row.contains("user1"));
        assert!(row.contains("2023-10-15"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 10), "a very ...");
        assert_eq!(truncate("café crème brûlée", 8), "café ...");
    }
}
