//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct UserData {
    pub(crate) users: Vec<User>,
}

#[derive(Default)]
struct UserIndex {
    data: HashMap<UserId, User>,
    /// normalized name -> user_id
    by_name: HashMap<String, UserId>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    inner: RwLock<UserIndex>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            inner: RwLock::new(UserIndex::default()),
        }
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, UserIndex>> {
        self.inner
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, UserIndex>> {
        self.inner
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load users from disk
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: UserData = read_json(&self.path)?;

        let mut index = self.write()?;
        index.data.clear();
        index.by_name.clear();

        for user in file_data.users {
            index
                .by_name
                .insert(User::normalize_name(&user.name), user.id.clone());
            index.data.insert(user.id.clone(), user);
        }

        Ok(())
    }

    /// Save users to disk, oldest first
    pub fn save(&self) -> LedgerResult<()> {
        let users = self.get_all()?;
        write_json_atomic(&self.path, &UserData { users })
    }

    pub fn get(&self, id: &UserId) -> LedgerResult<Option<User>> {
        Ok(self.read()?.data.get(id).cloned())
    }

    /// All users in creation order (ties broken by id)
    pub fn get_all(&self) -> LedgerResult<Vec<User>> {
        let index = self.read()?;
        let mut users: Vec<_> = index.data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    /// Get a user by exact name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> LedgerResult<Option<User>> {
        let index = self.read()?;
        Ok(index
            .by_name
            .get(&User::normalize_name(name))
            .and_then(|id| index.data.get(id))
            .cloned())
    }

    pub fn contains(&self, id: &UserId) -> LedgerResult<bool> {
        Ok(self.read()?.data.contains_key(id))
    }

    /// Insert or update a user
    pub fn upsert(&self, user: User) -> LedgerResult<()> {
        let mut index = self.write()?;

        if let Some(old_name) = index
            .data
            .get(&user.id)
            .map(|old| User::normalize_name(&old.name))
        {
            index.by_name.remove(&old_name);
        }

        index
            .by_name
            .insert(User::normalize_name(&user.name), user.id.clone());
        index.data.insert(user.id.clone(), user);
        Ok(())
    }

    /// Remove a user, returning it if present
    pub fn delete(&self, id: &UserId) -> LedgerResult<Option<User>> {
        let mut index = self.write()?;

        let removed = index.data.remove(id);
        if let Some(user) = &removed {
            index.by_name.remove(&User::normalize_name(&user.name));
        }
        Ok(removed)
    }

    pub fn count(&self) -> LedgerResult<usize> {
        Ok(self.read()?.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, UserRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let user = User::new("Alex");
        let id = user.id.clone();

        repo.upsert(user).unwrap();

        assert_eq!(repo.get(&id).unwrap().unwrap().name, "Alex");
        assert!(repo.contains(&id).unwrap());
    }

    #[test]
    fn test_name_index_follows_rename() {
        let (_temp_dir, repo) = create_test_repo();
        let mut user = User::new("Alex");
        repo.upsert(user.clone()).unwrap();

        assert!(repo.get_by_name("alex").unwrap().is_some());

        user.rename("Alexis");
        repo.upsert(user).unwrap();

        assert!(repo.get_by_name("Alex").unwrap().is_none());
        assert_eq!(repo.get_by_name("ALEXIS").unwrap().unwrap().name, "Alexis");
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload_keeps_order() {
        let (temp_dir, repo) = create_test_repo();
        for (id, name) in [("user2", "Blake"), ("user1", "Alex"), ("user3", "Casey")] {
            let mut user = User::with_id(UserId::from_raw(id), name);
            user.created_at = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;
            repo.upsert(user).unwrap();
        }
        repo.save().unwrap();

        let repo2 = UserRepository::new(temp_dir.path().join("users.json"));
        repo2.load().unwrap();

        let names: Vec<_> = repo2.get_all().unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Alex", "Blake", "Casey"]);
    }

    #[test]
    fn test_delete_clears_name_index() {
        let (_temp_dir, repo) = create_test_repo();
        let user = User::new("Alex");
        let id = user.id.clone();
        repo.upsert(user).unwrap();

        assert!(repo.delete(&id).unwrap().is_some());
        assert!(repo.delete(&id).unwrap().is_none());
        assert!(repo.get_by_name("Alex").unwrap().is_none());
    }
}
