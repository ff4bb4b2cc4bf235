//! User service
//!
//! Group membership: adding, renaming and removing users, and tracking which
//! user the terminal is acting as.

use tracing::debug;

use crate::audit::{diff_entities, EntityType};
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId};
use crate::storage::Storage;

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a user to the group
    pub fn create(&self, name: &str, avatar: Option<&str>) -> LedgerResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("User name cannot be empty".into()));
        }

        if self.storage.users.get_by_name(name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "User",
                identifier: name.to_string(),
            });
        }

        let mut user = User::new(name);
        if let Some(avatar) = avatar {
            user.set_avatar(avatar.trim());
        }

        user.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.as_str(),
            Some(user.name.clone()),
            &user,
        )?;

        Ok(user)
    }

    pub fn get(&self, id: &UserId) -> LedgerResult<Option<User>> {
        self.storage.users.get(id)
    }

    /// Find a user by id or by name (case-insensitive)
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<User>> {
        let identifier = identifier.trim();
        if let Some(user) = self.storage.users.get(&UserId::from_raw(identifier))? {
            return Ok(Some(user));
        }
        self.storage.users.get_by_name(identifier)
    }

    /// Like `find`, but a miss is an error
    pub fn resolve(&self, identifier: &str) -> LedgerResult<User> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::user_not_found(identifier))
    }

    pub fn list(&self) -> LedgerResult<Vec<User>> {
        self.storage.users.get_all()
    }

    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.users.count()
    }

    /// Rename a user; expenses keep pointing at the same id
    pub fn rename(&self, identifier: &str, new_name: &str) -> LedgerResult<User> {
        let mut user = self.resolve(identifier)?;
        let before = user.clone();

        let new_name = new_name.trim();
        if let Some(existing) = self.storage.users.get_by_name(new_name)? {
            if existing.id != user.id {
                return Err(LedgerError::Duplicate {
                    entity_type: "User",
                    identifier: new_name.to_string(),
                });
            }
        }

        user.rename(new_name);
        user.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.save_update(&before, user)
    }

    /// Replace the avatar glyph
    pub fn set_avatar(&self, identifier: &str, avatar: &str) -> LedgerResult<User> {
        let mut user = self.resolve(identifier)?;
        let before = user.clone();

        user.set_avatar(avatar.trim());
        user.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.save_update(&before, user)
    }

    fn save_update(&self, before: &User, user: User) -> LedgerResult<User> {
        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.as_str(),
            Some(user.name.clone()),
            before,
            &user,
            diff_entities(before, &user),
        )?;

        Ok(user)
    }

    /// The user the terminal acts as
    ///
    /// Falls back to the first user when the setting is unset or points at a
    /// user that no longer exists.
    pub fn active(&self) -> LedgerResult<Option<User>> {
        let settings = Settings::load_or_create(self.storage.paths())?;

        if let Some(id) = &settings.active_user {
            if let Some(user) = self.storage.users.get(id)? {
                return Ok(Some(user));
            }
            debug!(user = %id, "active user missing, falling back to first user");
        }

        Ok(self.storage.users.get_all()?.into_iter().next())
    }

    /// Like `active`, but an empty group is an error
    pub fn require_active(&self) -> LedgerResult<User> {
        self.active()?.ok_or_else(|| {
            LedgerError::Validation("No users yet. Add one with 'shareledger user add'".into())
        })
    }

    /// Persist a new active user
    pub fn switch_active(&self, identifier: &str) -> LedgerResult<User> {
        let user = self.resolve(identifier)?;

        let mut settings = Settings::load_or_create(self.storage.paths())?;
        settings.active_user = Some(user.id.clone());
        settings.save(self.storage.paths())?;

        Ok(user)
    }

    /// Remove a user that no expense refers to
    pub fn delete(&self, identifier: &str) -> LedgerResult<User> {
        let user = self.resolve(identifier)?;

        let references = self.storage.expenses.count_referencing(&user.id)?;
        if references > 0 {
            return Err(LedgerError::InUse {
                entity_type: "User",
                identifier: user.name.clone(),
                references,
            });
        }

        self.storage.users.delete(&user.id)?;
        self.storage.users.save()?;

        let mut settings = Settings::load_or_create(self.storage.paths())?;
        if settings.active_user.as_ref() == Some(&user.id) {
            settings.active_user = None;
            settings.save(self.storage.paths())?;
        }

        self.storage.log_delete(
            EntityType::User,
            user.id.as_str(),
            Some(user.name.clone()),
            &user,
        )?;

        Ok(user)
    }
}
