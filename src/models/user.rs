//! User model
//!
//! A member of the group. Expenses reference users by id only, so a rename
//! never touches historical records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// A member of the expense-sharing group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Single-glyph avatar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// When the user was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the user was last modified
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user; the avatar defaults to the initial of the name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: UserId::new(),
            avatar: Self::initial(&name),
            name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a user with a known id (imports, seeding)
    pub fn with_id(id: UserId, name: impl Into<String>) -> Self {
        let mut user = Self::new(name);
        user.id = id;
        user
    }

    /// Upper-cased first character of a name
    pub fn initial(name: &str) -> Option<String> {
        name.trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
    }

    /// Glyph to show next to the name
    pub fn avatar_glyph(&self) -> String {
        self.avatar
            .clone()
            .or_else(|| Self::initial(&self.name))
            .unwrap_or_else(|| "?".to_string())
    }

    /// Rename the user, keeping a derived avatar in sync
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.avatar == Self::initial(&self.name) {
            self.avatar = Self::initial(&name);
        }
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Set an explicit avatar glyph
    pub fn set_avatar(&mut self, avatar: impl Into<String>) {
        self.avatar = Some(avatar.into());
        self.updated_at = Utc::now();
    }

    /// Validate the user
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(UserValidationError::NameTooLong(self.name.len()));
        }

        if let Some(avatar) = &self.avatar {
            let glyphs = avatar.chars().count();
            if glyphs == 0 || glyphs > 2 {
                return Err(UserValidationError::InvalidAvatar(avatar.clone()));
            }
        }

        Ok(())
    }

    /// Normalize a name for matching
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Check if this user matches a name (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(name)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidAvatar(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "User name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "User name too long ({} chars, max 50)", len)
            }
            Self::InvalidAvatar(avatar) => {
                write!(f, "Avatar must be one or two characters, got '{}'", avatar)
            }
        }
    }
}

impl std::error::Error for UserValidationError {}
