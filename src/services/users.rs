//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, UpdateUser, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate user by login and return a JWT token
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_login(login.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            tracing::warn!("Failed login attempt for {}", user.login);
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.login);
        Ok((token, user))
    }

    /// Token lifetime in seconds
    pub fn token_lifetime(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.login.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + self.token_lifetime(),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Create the first administrator when no account exists yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }
        let hash = self.hash_password(&self.config.bootstrap_admin_password)?;
        let admin = self
            .repository
            .users
            .create(&self.config.bootstrap_admin_login, &hash, Role::Admin)
            .await?;
        tracing::warn!(
            "No users found, created administrator '{}' from configuration. Change its password.",
            admin.login
        );
        Ok(())
    }

    /// Re-check the password of an already authenticated user
    pub async fn confirm_password(&self, user_id: i32, password: &str) -> AppResult<()> {
        let user = self.repository.users.get_by_id(user_id).await?;
        if self.verify_password(&user, password)? {
            Ok(())
        } else {
            tracing::warn!("Password confirmation failed for {}", user.login);
            Err(AppError::Authorization("Incorrect password".to_string()))
        }
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn create_user(&self, data: &CreateUser) -> AppResult<User> {
        data.validate()?;
        let hash = self.hash_password(&data.password)?;
        let user = self
            .repository
            .users
            .create(data.login.trim(), &hash, data.role.unwrap_or(Role::Planning))
            .await?;
        tracing::info!("Created user {} ({})", user.login, user.role);
        Ok(user)
    }

    pub async fn update_user(&self, id: i32, data: &UpdateUser) -> AppResult<User> {
        data.validate()?;
        let hash = match data.password.as_deref() {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };
        self.repository
            .users
            .update(id, data.login.as_deref().map(str::trim), hash.as_deref(), data.role)
            .await
    }

    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}
