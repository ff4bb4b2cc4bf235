//! Balance CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_debt_table, format_user_balance};
use crate::error::LedgerResult;
use crate::ledger::NetPosition;
use crate::services::{BalanceService, UserService};
use crate::storage::Storage;

/// Balance subcommands
#[derive(Subcommand)]
pub enum BalanceCommands {
    /// Who you owe and who owes you
    Show {
        /// User name or ID (defaults to the active user)
        user: Option<String>,
    },
    /// A single net figure
    Net {
        /// User name or ID (defaults to the active user)
        user: Option<String>,
    },
    /// Every debt in the group
    All,
}

/// Handle a balance command
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BalanceCommands,
) -> LedgerResult<()> {
    let users = UserService::new(storage);
    let balances = BalanceService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    let subject = |identifier: Option<String>| match identifier {
        Some(identifier) => users.resolve(&identifier),
        None => users.require_active(),
    };

    match cmd {
        BalanceCommands::Show { user } => {
            let user = subject(user)?;
            print!("{}", format_user_balance(&balances.user_balance(&user)?, symbol));
        }

        BalanceCommands::Net { user } => {
            let user = subject(user)?;
            let position = NetPosition::from_net(balances.net_balance(&user.id)?);
            println!(
                "{}: {} ({})",
                user.name,
                position.amount().format_with_symbol(symbol),
                position.label()
            );
        }

        BalanceCommands::All => {
            println!("{}", format_debt_table(&balances.edges()?, symbol));
            println!();
            println!("Net positions:");
            for (user, net) in balances.nets()? {
                let position = NetPosition::from_net(net);
                println!(
                    "  {:<20} {:>12}  {}",
                    user.name,
                    net.format_with_symbol(symbol),
                    position.label()
                );
            }
        }
    }

    Ok(())
}
