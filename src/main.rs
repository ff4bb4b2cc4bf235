use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use shareledger::cli::{
    handle_balance_command, handle_expense_command, handle_export_command,
    handle_history_command, handle_import_command, handle_summary_command, handle_user_command,
};
use shareledger::config::{paths::LedgerPaths, settings::Settings};
use shareledger::ledger::UnknownUserPolicy;
use shareledger::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "shareledger",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based shared expense ledger",
    long_about = "shareledger records who paid for what and who shares each cost, \
                  then works out who owes whom across the group."
)]
struct Cli {
    /// Use this directory instead of the default config location
    #[arg(long, global = true, env = "SHARELEDGER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and the default group
    Init {
        /// Also add a few demonstration expenses
        #[arg(long)]
        sample: bool,
    },

    /// Show or change configuration
    Config {
        /// Currency symbol used for display
        #[arg(long)]
        currency: Option<String>,
        /// Count income records in balances
        #[arg(long)]
        include_income: Option<bool>,
        /// What to do with expenses that reference unknown users
        #[arg(long, value_enum)]
        unknown_users: Option<PolicyArg>,
    },

    /// User management commands
    #[command(subcommand)]
    User(shareledger::cli::UserCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(shareledger::cli::ExpenseCommands),

    /// Balance queries
    #[command(subcommand)]
    Balance(shareledger::cli::BalanceCommands),

    /// Group dashboard: totals, your share, your net balance
    Summary {
        /// Write the per-member table as CSV to this path (- for stdout)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Import users and expenses from a JSON snapshot
    Import {
        /// Path to the JSON file
        file: PathBuf,
        /// Report what would be imported without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Export data
    #[command(subcommand)]
    Export(shareledger::cli::ExportCommands),
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Drop debt edges that touch unknown users
    Ignore,
    /// Fail the computation
    Reject,
}

impl From<PolicyArg> for UnknownUserPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Ignore => UnknownUserPolicy::Ignore,
            PolicyArg::Reject => UnknownUserPolicy::Reject,
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("SHARELEDGER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    debug!(base = %paths.base_dir().display(), "resolved data directory");

    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init { sample }) => {
            println!("Initializing shareledger at: {}", paths.base_dir().display());
            initialize_storage(&paths, sample)?;
            storage.load_all()?;
            println!("Initialization complete!");
            println!();
            println!("Group members:");
            for user in storage.users.get_all()? {
                println!("  [{}] {} ({})", user.avatar_glyph(), user.name, user.id);
            }
            if sample {
                println!();
                println!("{} sample expenses recorded.", storage.expenses.count()?);
            }
            println!();
            println!("Run 'shareledger summary' to see where everyone stands.");
        }
        Some(Commands::Config {
            currency,
            include_income,
            unknown_users,
        }) => {
            let changed = currency.is_some() || include_income.is_some() || unknown_users.is_some();
            if let Some(symbol) = currency {
                settings.currency_symbol = symbol;
            }
            if let Some(include) = include_income {
                settings.balance.include_income = include;
            }
            if let Some(policy) = unknown_users {
                settings.balance.unknown_users = policy.into();
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("shareledger Configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!(
                "  Active user:     {}",
                settings
                    .active_user
                    .as_ref()
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "(first user)".to_string())
            );
            println!("  Include income:  {}", settings.balance.include_income);
            println!("  Unknown users:   {:?}", settings.balance.unknown_users);
        }
        Some(Commands::User(cmd)) => handle_user_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Balance(cmd)) => handle_balance_command(&storage, &settings, cmd)?,
        Some(Commands::Summary { csv }) => handle_summary_command(&storage, csv.as_deref())?,
        Some(Commands::History { count }) => handle_history_command(&storage, count)?,
        Some(Commands::Import { file, dry_run }) => {
            handle_import_command(&storage, &file, dry_run)?
        }
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        None => {
            println!("shareledger - who paid, who shares, who owes whom");
            println!();
            println!("Run 'shareledger --help' for usage information.");
            if !storage.is_initialized() {
                println!("Run 'shareledger init --sample' to get started.");
            }
        }
    }

    Ok(())
}
