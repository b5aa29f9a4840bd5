//! User service: registration and password authentication.
//!
//! Passwords are hashed with bcrypt on the blocking thread pool. Failed
//! logins are indistinguishable: an unknown username still pays for a full
//! bcrypt verification (against a dummy hash computed at the same cost) and
//! yields the same error as a wrong password.

use crate::crypto;
use crate::errors::GatewayError;
use crate::models::{User, ROLE_USER};
use crate::repositories::UserStore;
use common::secret::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::instrument;

/// Maximum username length in bytes.
pub const MAX_USERNAME_LENGTH: usize = 64;

/// bcrypt only reads the first 72 bytes of a password; longer ones are
/// rejected instead of being silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Registers and authenticates users against a `UserStore`.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    bcrypt_cost: u32,
    dummy_hash: String,
}

impl UserService {
    /// Create a user service.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Crypto` if `bcrypt_cost` is outside 10-14.
    pub fn new(store: Arc<dyn UserStore>, bcrypt_cost: u32) -> Result<Self, GatewayError> {
        let dummy_hash = crypto::hash_password("timing-equalization-placeholder", bcrypt_cost)?;
        Ok(Self {
            store,
            bcrypt_cost,
            dummy_hash,
        })
    }

    /// The underlying user store.
    pub fn store(&self) -> Arc<dyn UserStore> {
        Arc::clone(&self.store)
    }

    /// Register a new user with the default `"user"` role.
    ///
    /// # Errors
    ///
    /// - `GatewayError::BadRequest` if the username or password is empty or too long
    /// - `GatewayError::DuplicateUser` if the username is already registered
    #[instrument(skip_all, name = "gw.users.register")]
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<User, GatewayError> {
        self.create(username, password, ROLE_USER).await
    }

    /// Create a user with an explicit role.
    #[instrument(skip_all, name = "gw.users.create", fields(role = %role))]
    pub async fn create(
        &self,
        username: &str,
        password: &SecretString,
        role: &str,
    ) -> Result<User, GatewayError> {
        validate_username(username)?;
        validate_password(password)?;

        // Cheap pre-check; the store's insert is still the authority.
        if self.store.get(username).await?.is_some() {
            return Err(GatewayError::DuplicateUser);
        }

        let password_hash = hash_blocking(password.clone(), self.bcrypt_cost).await?;

        let user = self
            .store
            .insert(User {
                username: username.to_string(),
                password_hash,
                role: role.to_string(),
            })
            .await?;

        tracing::info!(target: "gw.users", role = %user.role, "User registered");
        Ok(user)
    }

    /// Create the user unless the username already exists.
    ///
    /// Used at startup to seed the administrator account. Returns `true` if
    /// a user was created.
    pub async fn ensure_user(
        &self,
        username: &str,
        password: &SecretString,
        role: &str,
    ) -> Result<bool, GatewayError> {
        match self.create(username, password, role).await {
            Ok(_) => Ok(true),
            Err(GatewayError::DuplicateUser) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Verify a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidCredentials` for an unknown user or a
    /// wrong password alike.
    #[instrument(skip_all, name = "gw.users.authenticate")]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<User, GatewayError> {
        let user = self.store.get(username).await?;

        let hash_to_verify = match &user {
            Some(u) => u.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };

        let is_valid = verify_blocking(password.clone(), hash_to_verify).await?;

        match user {
            Some(user) if is_valid => Ok(user),
            _ => {
                tracing::debug!(target: "gw.users", "Authentication failed");
                Err(GatewayError::InvalidCredentials)
            }
        }
    }
}

fn validate_username(username: &str) -> Result<(), GatewayError> {
    if username.trim().is_empty() {
        return Err(GatewayError::BadRequest(
            "Username cannot be empty".to_string(),
        ));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(GatewayError::BadRequest(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_password(password: &SecretString) -> Result<(), GatewayError> {
    let password = password.expose_secret();
    if password.is_empty() {
        return Err(GatewayError::BadRequest(
            "Password cannot be empty".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(GatewayError::BadRequest(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

async fn hash_blocking(password: SecretString, cost: u32) -> Result<String, GatewayError> {
    tokio::task::spawn_blocking(move || crypto::hash_password(password.expose_secret(), cost))
        .await
        .map_err(|e| {
            tracing::error!(target: "gw.users", error = %e, "Password hashing task failed");
            GatewayError::Internal
        })?
}

async fn verify_blocking(password: SecretString, hash: String) -> Result<bool, GatewayError> {
    tokio::task::spawn_blocking(move || crypto::verify_password(password.expose_secret(), &hash))
        .await
        .map_err(|e| {
            tracing::error!(target: "gw.users", error = %e, "Password verification task failed");
            GatewayError::Internal
        })?
}
