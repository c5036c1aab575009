//! Client model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Company that hires or lends equipment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    pub id: i32,
    pub company: String,
    /// Contact person at the company
    pub representative: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub representative_phone: Option<String>,
}

/// Create client request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Representative is required"))]
    pub representative: String,
    pub address: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub representative_phone: Option<String>,
}

/// Update client request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClient {
    #[validate(length(min = 1, message = "Company cannot be empty"))]
    pub company: Option<String>,
    #[validate(length(min = 1, message = "Representative cannot be empty"))]
    pub representative: Option<String>,
    pub address: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub representative_phone: Option<String>,
}
