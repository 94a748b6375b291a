// Static user list the console lets the operator switch between

use common::models::User;
use std::path::Path;
use tracing::{info, instrument};

use crate::errors::ConsoleError;

/// Users loaded from the JSON user list
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Read the user list (`[{"usr", "perfil", "organizacion"}]`) from a file
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::UserList(format!("{}: {}", path.display(), e)))?;
        let directory = Self::from_json(&raw)?;

        info!(count = directory.users.len(), "User list loaded");
        Ok(directory)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConsoleError> {
        let users: Vec<User> =
            serde_json::from_str(raw).map_err(|e| ConsoleError::UserList(e.to_string()))?;
        Ok(Self { users })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// First listed user, or the placeholder when the list is empty
    pub fn default_user(&self) -> User {
        self.users.first().cloned().unwrap_or_else(User::placeholder)
    }
}
