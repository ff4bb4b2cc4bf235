//! User display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Money, User, UserId};
use crate::services::UserBalance;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Avatar")]
    avatar: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Net")]
    net: String,
}

/// Format the group as a table, marking the active user
pub fn format_user_list(users: &[(User, Money)], active: Option<&UserId>, symbol: &str) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let rows = users.iter().map(|(user, net)| UserRow {
        marker: if Some(&user.id) == active { "*" } else { "" },
        id: user.id.to_string(),
        avatar: user.avatar_glyph(),
        name: user.name.clone(),
        net: net.format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n* = active user", table)
}

/// Detail view of one user with their balance
pub fn format_user_details(balance: &UserBalance, symbol: &str) -> String {
    let user = &balance.user;
    let mut output = String::new();

    output.push_str(&format!("User:     {} [{}]\n", user.name, user.avatar_glyph()));
    output.push_str(&format!("ID:       {}\n", user.id));
    output.push_str(&format!(
        "Net:      {} ({})\n",
        balance.position.amount().format_with_symbol(symbol),
        balance.position.label()
    ));
    output.push_str(&format!(
        "Created:  {}\n",
        user.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}
