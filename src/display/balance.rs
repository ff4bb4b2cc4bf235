//! Balance display formatting
//!
//! Debt tables and the per-user "who owes whom" view.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::services::{DebtEdge, UserBalance};

#[derive(Tabled)]
struct DebtRow {
    #[tabled(rename = "Debtor")]
    debtor: String,
    #[tabled(rename = "Owes")]
    creditor: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Every debt edge as a table
pub fn format_debt_table(edges: &[DebtEdge], symbol: &str) -> String {
    if edges.is_empty() {
        return "Everyone is settled up.".to_string();
    }

    let rows = edges.iter().map(|edge| DebtRow {
        debtor: edge.debtor_name.clone(),
        creditor: edge.creditor_name.clone(),
        amount: edge.amount.format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

/// One user's balance from their own perspective
pub fn format_user_balance(balance: &UserBalance, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Balance for {}\n", balance.user.name));
    output.push_str(&"=".repeat(40));
    output.push('\n');

    output.push_str("You owe:\n");
    if balance.owes.is_empty() {
        output.push_str("  nobody\n");
    }
    for edge in &balance.owes {
        output.push_str(&format!(
            "  {:<24} {:>12}\n",
            edge.creditor_name,
            edge.amount.format_with_symbol(symbol)
        ));
    }

    output.push_str("Owed to you:\n");
    if balance.owed.is_empty() {
        output.push_str("  nothing\n");
    }
    for edge in &balance.owed {
        output.push_str(&format!(
            "  {:<24} {:>12}\n",
            edge.debtor_name,
            edge.amount.format_with_symbol(symbol)
        ));
    }

    output.push_str(&"-".repeat(40));
    output.push('\n');
    output.push_str(&format_net_line(balance, symbol));
    output.push('\n');

    output
}

/// "Net: $5.00 (you owe)"
pub fn format_net_line(balance: &UserBalance, symbol: &str) -> String {
    format!(
        "Net: {} ({})",
        balance.position.amount().format_with_symbol(symbol),
        balance.position.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::NetPosition;
    use crate::models::{Money, User, UserId};
    use rust_decimal_macros::dec;

    fn edge(debtor: &str, creditor: &str, amount: Money) -> DebtEdge {
        DebtEdge {
            debtor: UserId::from_raw(debtor.to_lowercase()),
            debtor_name: debtor.to_string(),
            creditor: UserId::from_raw(creditor.to_lowercase()),
            creditor_name: creditor.to_string(),
            amount,
        }
    }

    #[test]
    fn test_debt_table() {
        let edges = vec![edge("Bob", "Alice", Money::new(dec!(20)))];
        let text = format_debt_table(&edges, "$");
        assert!(text.contains("Bob"));
        assert!(text.contains("Alice"));
        assert!(text.contains("$20.00"));

        assert_eq!(format_debt_table(&[], "$"), "Everyone is settled up.");
    }

    #[test]
    fn test_user_balance_view() {
        let alice = User::with_id(UserId::from_raw("alice"), "Alice");
        let balance = UserBalance {
            user: alice,
            owes: vec![edge("Alice", "Bob", Money::new(dec!(8)))],
            owed: vec![edge("Bob", "Alice", Money::new(dec!(20)))],
            net: Money::new(dec!(12)),
            position: NetPosition::Creditor(Money::new(dec!(12))),
        };

        let text = format_user_balance(&balance, "€");
        assert!(text.contains("Balance for Alice"));
        assert!(text.contains("€8.00"));
        assert!(text.contains("€20.00"));
        assert!(text.ends_with("Net: €12.00 (to receive)\n"));
    }
}
