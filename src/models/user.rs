//! User model, JWT claims and role checks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::Role;
use crate::error::AppError;

/// Application user (login account)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub role: Option<Role>,
}

/// Update user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    fn require_any(&self, roles: &[Role], what: &str) -> Result<(), AppError> {
        if self.role == Role::Admin || roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Insufficient rights to {}",
                what
            )))
        }
    }

    /// Check if user is admin
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    /// Clients, staff, vehicles, events and their material lists
    pub fn require_planning(&self) -> Result<(), AppError> {
        self.require_any(&[Role::Planning], "manage planning")
    }

    /// List review, departures, returns and reinforcements
    pub fn require_logistics(&self) -> Result<(), AppError> {
        self.require_any(&[Role::Logistics], "manage logistics")
    }

    /// Equipment and consumable inventory
    pub fn require_inventory(&self) -> Result<(), AppError> {
        self.require_any(&[Role::Maintenance, Role::Logistics], "manage inventory")
    }

    /// Maintenance record updates
    pub fn require_maintenance(&self) -> Result<(), AppError> {
        self.require_any(&[Role::Maintenance, Role::Logistics], "manage maintenance")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "tester".to_string(),
            user_id: 7,
            role,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = claims(Role::Logistics).create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.role, Role::Logistics);
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_admin_passes_every_check() {
        let admin = claims(Role::Admin);
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_planning().is_ok());
        assert!(admin.require_logistics().is_ok());
        assert!(admin.require_inventory().is_ok());
        assert!(admin.require_maintenance().is_ok());
    }

    #[test]
    fn test_roles_are_separated() {
        let planner = claims(Role::Planning);
        assert!(planner.require_planning().is_ok());
        assert!(planner.require_logistics().is_err());
        assert!(planner.require_admin().is_err());

        let mechanic = claims(Role::Maintenance);
        assert!(mechanic.require_maintenance().is_ok());
        assert!(mechanic.require_inventory().is_ok());
        assert!(mechanic.require_planning().is_err());

        let logistics = claims(Role::Logistics);
        assert!(logistics.require_logistics().is_ok());
        assert!(logistics.require_maintenance().is_ok());
        assert!(matches!(
            logistics.require_admin(),
            Err(AppError::Authorization(_))
        ));
    }
}
