//! Expense CLI commands

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::expense::parse_date;
use crate::models::{ExpenseCategory, ExpenseType, Money, UserId};
use crate::services::{
    CreateExpenseInput, ExpenseFilter, ExpenseService, Involvement, UpdateExpenseInput,
    UserService,
};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        description: String,
        /// Amount (e.g. 75.00)
        amount: String,
        /// Who paid (defaults to the active user)
        #[arg(short, long)]
        paid_by: Option<String>,
        /// Users sharing the cost, comma separated (defaults to everyone)
        #[arg(short, long, value_delimiter = ',')]
        split: Vec<String>,
        /// Category
        #[arg(short, long, default_value = "other")]
        category: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Record as income rather than a shared cost
        #[arg(long)]
        income: bool,
    },
    /// List expenses, newest first
    List {
        /// all, paid or involved (relative to --user or the active user)
        #[arg(short, long, default_value = "all")]
        filter: String,
        /// User the filter applies to
        #[arg(short, long)]
        user: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Search descriptions
        #[arg(short, long)]
        search: Option<String>,
        /// expense or income
        #[arg(short = 't', long = "type")]
        expense_type: Option<String>,
        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show expense details
    Show {
        /// Expense ID (or unique prefix)
        expense: String,
    },
    /// Edit an expense
    Edit {
        /// Expense ID (or unique prefix)
        expense: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        paid_by: Option<String>,
        /// Replacement split group, comma separated
        #[arg(short, long, value_delimiter = ',')]
        split: Option<Vec<String>>,
        #[arg(short, long)]
        category: Option<String>,
        /// expense or income
        #[arg(short = 't', long = "type")]
        expense_type: Option<String>,
    },
    /// Delete an expense
    Delete {
        /// Expense ID (or unique prefix)
        expense: String,
    },
}

fn parse_amount(raw: &str) -> LedgerResult<Money> {
    Money::parse(raw).map_err(|e| LedgerError::Validation(e.to_string()))
}

fn parse_date_arg(raw: &str) -> LedgerResult<NaiveDate> {
    parse_date(raw).ok_or_else(|| {
        LedgerError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", raw))
    })
}

fn parse_category(raw: &str) -> LedgerResult<ExpenseCategory> {
    ExpenseCategory::parse(raw)
        .ok_or_else(|| LedgerError::Validation(format!("Unknown category '{}'", raw)))
}

fn parse_type(raw: &str) -> LedgerResult<ExpenseType> {
    ExpenseType::parse(raw).ok_or_else(|| {
        LedgerError::Validation(format!("Unknown type '{}'. Use expense or income", raw))
    })
}

fn resolve_users(users: &UserService, identifiers: &[String]) -> LedgerResult<Vec<UserId>> {
    identifiers
        .iter()
        .map(|identifier| users.resolve(identifier).map(|u| u.id))
        .collect()
}

fn user_names(storage: &Storage) -> LedgerResult<HashMap<UserId, String>> {
    Ok(storage
        .users
        .get_all()?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect())
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let service = ExpenseService::new(storage);
    let users = UserService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            paid_by,
            split,
            category,
            date,
            income,
        } => {
            let paid_by = match paid_by {
                Some(identifier) => users.resolve(&identifier)?.id,
                None => users.require_active()?.id,
            };
            let split_with = if split.is_empty() {
                users.list()?.into_iter().map(|u| u.id).collect()
            } else {
                resolve_users(&users, &split)?
            };
            let date = match date {
                Some(raw) => parse_date_arg(&raw)?,
                None => Local::now().date_naive(),
            };

            let expense = service.create(CreateExpenseInput {
                description,
                amount: parse_amount(&amount)?,
                date,
                paid_by,
                split_with,
                category: parse_category(&category)?,
                expense_type: if income {
                    ExpenseType::Income
                } else {
                    ExpenseType::Expense
                },
            })?;

            println!(
                "Recorded: {} {} ({})",
                expense.description,
                expense.amount.format_with_symbol(symbol),
                expense.id
            );
            if let Ok(share) = expense.share() {
                println!(
                    "  Split {} ways: {} each",
                    expense.split_with.len(),
                    share.format_with_symbol(symbol)
                );
            }
        }

        ExpenseCommands::List {
            filter,
            user,
            category,
            search,
            expense_type,
            limit,
        } => {
            let involvement = Involvement::parse(&filter).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Unknown filter '{}'. Use all, paid or involved",
                    filter
                ))
            })?;

            let mut query = ExpenseFilter::new();
            if involvement != Involvement::All {
                let subject = match user {
                    Some(identifier) => users.resolve(&identifier)?,
                    None => users.require_active()?,
                };
                query = match involvement {
                    Involvement::Paid => query.paid_by(subject.id),
                    _ => query.involving(subject.id),
                };
            }
            if let Some(raw) = category {
                query = query.category(parse_category(&raw)?);
            }
            if let Some(raw) = expense_type {
                query = query.expense_type(parse_type(&raw)?);
            }
            if let Some(text) = search {
                query = query.search(text);
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }

            let expenses = service.list(&query)?;
            print!(
                "{}",
                format_expense_list(&expenses, &user_names(storage)?, symbol)
            );
        }

        ExpenseCommands::Show { expense } => {
            let expense = service.resolve(&expense)?;
            print!(
                "{}",
                format_expense_details(&expense, &user_names(storage)?, symbol)
            );
        }

        ExpenseCommands::Edit {
            expense,
            description,
            amount,
            date,
            paid_by,
            split,
            category,
            expense_type,
        } => {
            let changes = UpdateExpenseInput {
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(parse_date_arg).transpose()?,
                paid_by: paid_by
                    .as_deref()
                    .map(|identifier| users.resolve(identifier).map(|u| u.id))
                    .transpose()?,
                split_with: split
                    .as_deref()
                    .map(|ids| resolve_users(&users, ids))
                    .transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                expense_type: expense_type.as_deref().map(parse_type).transpose()?,
            };

            if changes.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            let updated = service.update(&expense, changes)?;
            println!("Updated expense: {} ({})", updated.description, updated.id);
        }

        ExpenseCommands::Delete { expense } => {
            let removed = service.delete(&expense)?;
            println!(
                "Deleted expense: {} {}",
                removed.description,
                removed.amount.format_with_symbol(symbol)
            );
        }
    }

    Ok(())
}
