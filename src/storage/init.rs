//! Storage initialization
//!
//! First-run setup: directories, the starter group of users, and optionally
//! a few demonstration expenses.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseCategory, ExpenseId, Money, User, UserId};

use super::expenses::ExpenseData;
use super::file_io::write_json_atomic;
use super::users::UserData;

const DEFAULT_USERS: &[(&str, &str)] = &[("user1", "Alex"), ("user2", "Blake"), ("user3", "Casey")];

/// Initialize storage for a fresh installation
///
/// Existing files are never overwritten, so running this twice is harmless.
/// With `sample` set, three demonstration expenses are written when no
/// expense file exists yet.
pub fn initialize_storage(paths: &LedgerPaths, sample: bool) -> LedgerResult<()> {
    paths.ensure_directories()?;

    let users = if paths.users_file().exists() {
        None
    } else {
        let users = default_users();
        write_json_atomic(
            paths.users_file(),
            &UserData {
                users: users.clone(),
            },
        )?;
        info!(count = users.len(), "created default users");
        Some(users)
    };

    if sample && !paths.expenses_file().exists() {
        let expenses = sample_expenses()?;
        info!(count = expenses.len(), "created sample expenses");
        write_json_atomic(paths.expenses_file(), &ExpenseData { expenses })?;
    }

    if !paths.is_initialized() {
        let mut settings = Settings::default();
        settings.active_user = users
            .as_ref()
            .and_then(|u| u.first())
            .map(|u| u.id.clone());
        settings.save(paths)?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.is_initialized()
}

fn default_users() -> Vec<User> {
    let now = Utc::now();
    DEFAULT_USERS
        .iter()
        .map(|(id, name)| {
            let mut user = User::with_id(UserId::from_raw(*id), *name);
            user.created_at = now;
            user.updated_at = now;
            user
        })
        .collect()
}

fn sample_expenses() -> LedgerResult<Vec<Expense>> {
    let everyone: Vec<UserId> = DEFAULT_USERS
        .iter()
        .map(|(id, _)| UserId::from_raw(*id))
        .collect();

    let rows = [
        ("exp1", "Dinner at Italian Restaurant", 7500, 15, "user1", ExpenseCategory::Food),
        ("exp2", "Movie tickets", 4500, 18, "user2", ExpenseCategory::Entertainment),
        ("exp3", "Grocery shopping", 12000, 20, "user3", ExpenseCategory::Food),
    ];

    rows.into_iter()
        .map(|(id, description, cents, day, paid_by, category)| -> LedgerResult<Expense> {
            let date = NaiveDate::from_ymd_opt(2023, 10, day).ok_or_else(|| {
                LedgerError::Validation(format!("invalid sample date 2023-10-{}", day))
            })?;
            Ok(Expense::new(
                description,
                Money::from_cents(cents),
                date,
                UserId::from_raw(paid_by),
                everyone.iter().cloned(),
            )
            .with_id(ExpenseId::from_raw(id))
            .with_category(category))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_io::read_json;
    use tempfile::TempDir;

    fn temp_paths() -> (TempDir, LedgerPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, paths)
    }

    #[test]
    fn test_initialize_storage() {
        let (_temp_dir, paths) = temp_paths();
        assert!(needs_initialization(&paths));

        initialize_storage(&paths, false).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.users_file().exists());
        assert!(!paths.expenses_file().exists());

        let data: UserData = read_json(paths.users_file()).unwrap();
        let names: Vec<_> = data.users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Alex", "Blake", "Casey"]);

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.active_user, Some(UserId::from_raw("user1")));
    }

    #[test]
    fn test_sample_expenses() {
        let (_temp_dir, paths) = temp_paths();
        initialize_storage(&paths, true).unwrap();

        let data: ExpenseData = read_json(paths.expenses_file()).unwrap();
        assert_eq!(data.expenses.len(), 3);
        let total: Money = data.expenses.iter().map(|e| e.amount).sum();
        assert_eq!(total, Money::from_cents(24000));
        assert!(data.expenses.iter().all(|e| e.split_with.len() == 3));
    }

    #[test]
    fn test_reinitialize_keeps_existing_users() {
        let (_temp_dir, paths) = temp_paths();
        write_json_atomic(
            paths.users_file(),
            &UserData {
                users: vec![User::with_id(UserId::from_raw("u-solo"), "Solo")],
            },
        )
        .unwrap();

        initialize_storage(&paths, false).unwrap();

        let data: UserData = read_json(paths.users_file()).unwrap();
        assert_eq!(data.users.len(), 1);
        assert!(Settings::load_or_create(&paths).unwrap().active_user.is_none());
    }
}
