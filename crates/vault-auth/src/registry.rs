//! Persisted user registry.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use vault_core::config::AuthConfig;
use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::types::OwnerId;
use vault_entity::user::{User, UserProfile};

use crate::password;

/// Registry of user accounts, keyed by username, persisted as a JSON list.
#[derive(Debug)]
pub struct UserRegistry {
    users: RwLock<HashMap<String, User>>,
    path: PathBuf,
    persist_gate: Mutex<()>,
    min_password_length: usize,
}

impl UserRegistry {
    /// Open the registry, loading the user file at `path` if present.
    pub async fn open(path: impl Into<PathBuf>, config: &AuthConfig) -> AppResult<Self> {
        let path = path.into();
        let users = match fs::read(&path).await {
            Ok(data) => {
                let list: Vec<User> = serde_json::from_slice(&data).map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Integrity,
                        format!("Corrupt user registry at {}", path.display()),
                        e,
                    )
                })?;
                list.into_iter().map(|u| (u.username.clone(), u)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read user registry: {}", path.display()),
                    e,
                ));
            }
        };

        Ok(Self {
            users: RwLock::new(users),
            path,
            persist_gate: Mutex::new(()),
            min_password_length: config.min_password_length,
        })
    }

    /// Register a new user and return the created record.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::validation("Username cannot be empty"));
        }
        if password.len() < self.min_password_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.min_password_length
            )));
        }

        let password_hash = password::hash_password(password)?;
        let user = User {
            id: OwnerId::new(),
            username: username.to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        {
            let mut users = self.write_users()?;
            if users.contains_key(username) {
                return Err(AppError::validation("Username is already taken"));
            }
            users.insert(username.to_string(), user.clone());
        }
        self.persist().await?;

        info!(owner_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verify a username/password pair, returning the user on success.
    ///
    /// Unknown usernames and wrong passwords produce the same error so the
    /// response never reveals which one was wrong.
    pub fn verify_credentials(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .read_users()?
            .get(username.trim())
            .cloned()
            .ok_or_else(|| AppError::authentication("Invalid username or password"))?;

        if !password::verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication("Invalid username or password"));
        }
        Ok(user)
    }

    /// Look up a user's public profile by owner ID.
    pub fn profile(&self, owner_id: OwnerId) -> AppResult<UserProfile> {
        self.read_users()?
            .values()
            .find(|u| u.id == owner_id)
            .map(UserProfile::from)
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn read_users(&self) -> AppResult<RwLockReadGuard<'_, HashMap<String, User>>> {
        self.users
            .read()
            .map_err(|_| AppError::integrity("User registry lock poisoned"))
    }

    fn write_users(&self) -> AppResult<RwLockWriteGuard<'_, HashMap<String, User>>> {
        self.users
            .write()
            .map_err(|_| AppError::integrity("User registry lock poisoned"))
    }

    /// Persist the registry atomically (write temp, then rename).
    async fn persist(&self) -> AppResult<()> {
        let _gate = self.persist_gate.lock().await;

        let list: Vec<User> = {
            let users = self.read_users()?;
            let mut list: Vec<User> = users.values().cloned().collect();
            list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            list
        };
        let data = serde_json::to_vec_pretty(&list)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create registry directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write user registry temp file: {}", tmp.display()),
                e,
            )
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to commit user registry: {}", self.path.display()),
                e,
            )
        })?;
        Ok(())
    }
}
