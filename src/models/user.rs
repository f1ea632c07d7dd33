//! User model and role mapping

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Internal capability role. External role labels are free-form text; every
/// label maps to exactly one of these two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Librarian,
    Member,
}

impl Role {
    /// Total mapping from an arbitrary external role label. Only the
    /// (case-insensitive) "librarian" label grants librarian capability.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("librarian") {
            Role::Librarian
        } else {
            Role::Member
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Librarian => "Librarian",
            Role::Member => "Member",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User model from database. `role` keeps the external label as registered;
/// business code goes through [`Role::from_label`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_label(&self.role)
    }
}

/// Register user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    /// External role label; anything other than "Librarian" registers an
    /// ordinary member
    pub role: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Password update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePassword {
    pub password: Option<String>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i64,
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

    pub fn is_librarian(&self) -> bool {
        self.role == Role::Librarian
    }

    /// Require librarian capability
    pub fn require_librarian(&self) -> Result<(), AppError> {
        if self.is_librarian() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Librarian privileges required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_mapping_is_total() {
        assert_eq!(Role::from_label("Librarian"), Role::Librarian);
        assert_eq!(Role::from_label("LIBRARIAN"), Role::Librarian);
        assert_eq!(Role::from_label("librarian"), Role::Librarian);
        assert_eq!(Role::from_label("Member"), Role::Member);
        assert_eq!(Role::from_label("reader"), Role::Member);
        assert_eq!(Role::from_label(""), Role::Member);
        assert_eq!(Role::from_label("administrator"), Role::Member);
    }
}
