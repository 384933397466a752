//! Local user registry and sign-in state.
//!
//! Registration enforces username uniqueness. Login looks the user up by
//! username only: the password is required non-blank but never verified
//! against a secret. This is demo-grade auth on purpose; keeping the
//! behavior inside this one collaborator means a real credential check
//! can be swapped in without touching the orchestrator.

use std::rc::Rc;

use chat_types::{user::User, ChatError, Result};

use crate::ports::StoragePort;

const USERS_KEY: &str = "chat_users";
const CURRENT_USER_KEY: &str = "chat_current_user";

#[derive(Clone)]
pub struct AuthService {
    storage: Rc<dyn StoragePort>,
}

impl AuthService {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    /// Register a new unique username and sign it in.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ChatError::Validation("Please fill in all fields".to_string()));
        }

        let mut users = self.users().await;
        if users.iter().any(|u| u.username == username) {
            return Err(ChatError::Validation("Username already exists".to_string()));
        }

        let user = User::new(username);
        users.push(user.clone());
        let blob = serde_json::to_vec(&users)?;
        self.storage.set(USERS_KEY, &blob).await?;

        self.set_current_user(&user).await?;
        Ok(user)
    }

    /// Sign in by username. Any password is accepted once the username
    /// is found.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ChatError::Validation("Please fill in all fields".to_string()));
        }

        let users = self.users().await;
        let user = users
            .into_iter()
            .find(|u| u.username == username)
            .ok_or_else(|| {
                ChatError::Validation("User not found. Try registering instead.".to_string())
            })?;

        self.set_current_user(&user).await?;
        Ok(user)
    }

    /// The signed-in user from a previous visit, if any.
    pub async fn current_user(&self) -> Option<User> {
        let blob = self.storage.get(CURRENT_USER_KEY).await.ok()??;
        match serde_json::from_slice(&blob) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("discarding malformed current-user record: {}", e);
                None
            }
        }
    }

    pub async fn set_current_user(&self, user: &User) -> Result<()> {
        let blob = serde_json::to_vec(user)?;
        self.storage.set(CURRENT_USER_KEY, &blob).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.storage.delete(CURRENT_USER_KEY).await
    }

    /// All registered users. Malformed data reads as an empty registry.
    async fn users(&self) -> Vec<User> {
        let blob = match self.storage.get(USERS_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("user registry read failed: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_slice(&blob) {
            Ok(users) => users,
            Err(e) => {
                log::warn!("discarding malformed user registry: {}", e);
                Vec::new()
            }
        }
    }
}
