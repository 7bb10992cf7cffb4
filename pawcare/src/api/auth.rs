use std::collections::{HashMap, hash_map};

use uuid::Uuid;

use crate::config::UserEntry;
use common::User;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Duplicate token for user {0}")]
    DuplicateToken(String),
}

/// Bearer token to principal lookup for the authentication layer.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: HashMap<Uuid, User>,
}

impl UserDirectory {
    pub fn new(entries: &[UserEntry]) -> Result<Self, AuthError> {
        let mut users = HashMap::new();

        for entry in entries {
            match users.entry(entry.token) {
                hash_map::Entry::Vacant(e) => {
                    e.insert(entry.user());
                }
                hash_map::Entry::Occupied(_) => {
                    return Err(AuthError::DuplicateToken(entry.email.clone()));
                }
            }
        }

        Ok(Self { users })
    }

    #[must_use]
    pub fn authenticate(&self, token: Uuid) -> Option<User> {
        self.users.get(&token).cloned()
    }

    #[must_use]
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }
}
