//! User CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_user_balance, format_user_details, format_user_list};
use crate::error::LedgerResult;
use crate::services::{BalanceService, UserService};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a user to the group
    Add {
        /// Display name
        name: String,
        /// Avatar glyph (defaults to the name's initial)
        #[arg(short, long)]
        avatar: Option<String>,
    },
    /// List all users with their net balance
    List,
    /// Show a user's details and balance
    Show {
        /// User name or ID (defaults to the active user)
        user: Option<String>,
    },
    /// Rename a user
    Rename {
        /// User name or ID
        user: String,
        /// New name
        name: String,
    },
    /// Change a user's avatar
    Avatar {
        /// User name or ID
        user: String,
        /// New avatar glyph
        avatar: String,
    },
    /// Act as another user
    Switch {
        /// User name or ID
        user: String,
    },
    /// Remove a user no expense refers to
    Delete {
        /// User name or ID
        user: String,
    },
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    settings: &Settings,
    cmd: UserCommands,
) -> LedgerResult<()> {
    let service = UserService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        UserCommands::Add { name, avatar } => {
            let user = service.create(&name, avatar.as_deref())?;
            println!("Added user: {} [{}]", user.name, user.avatar_glyph());
            println!("  ID: {}", user.id);
        }

        UserCommands::List => {
            let nets = BalanceService::new(storage).nets()?;
            let active = service.active()?.map(|u| u.id);
            println!("{}", format_user_list(&nets, active.as_ref(), symbol));
        }

        UserCommands::Show { user } => {
            let user = match user {
                Some(identifier) => service.resolve(&identifier)?,
                None => service.require_active()?,
            };
            let balance = BalanceService::new(storage).user_balance(&user)?;

            print!("{}", format_user_details(&balance, symbol));
            println!();
            print!("{}", format_user_balance(&balance, symbol));
        }

        UserCommands::Rename { user, name } => {
            let old_name = service.resolve(&user)?.name;
            let renamed = service.rename(&user, &name)?;
            println!("Renamed '{}' to '{}'", old_name, renamed.name);
        }

        UserCommands::Avatar { user, avatar } => {
            let updated = service.set_avatar(&user, &avatar)?;
            println!("Avatar for {} set to {}", updated.name, updated.avatar_glyph());
        }

        UserCommands::Switch { user } => {
            let active = service.switch_active(&user)?;
            println!("Now acting as {}", active.name);
        }

        UserCommands::Delete { user } => {
            let removed = service.delete(&user)?;
            println!("Deleted user: {}", removed.name);
        }
    }

    Ok(())
}
