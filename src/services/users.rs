//! User account service: registration, login, password management

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, Role, User, UserClaims},
    repository::Repository,
    services::verify::LibrarianVerifier,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    verifier: Arc<dyn LibrarianVerifier>,
}

impl UsersService {
    pub fn new(
        repository: Repository,
        config: AuthConfig,
        verifier: Arc<dyn LibrarianVerifier>,
    ) -> Self {
        Self {
            repository,
            config,
            verifier,
        }
    }

    /// Register a new user (member or librarian). Registering a librarian
    /// account requires confirmation from the external registry.
    pub async fn register(&self, user: CreateUser) -> AppResult<User> {
        if self
            .repository
            .users
            .find_by_username(&user.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        check_librarian_verified(Role::from_label(&user.role), self.verifier.as_ref()).await?;

        let hash = self.hash_password(&user.password)?;
        self.repository.users.create(&user, &hash).await
    }

    /// Authenticate by username and password, returning a JWT token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Incorrect username or password".to_string())
            })?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Incorrect username or password".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role(),
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Replace a user's password; the new value must be non-empty
    pub async fn update_password(&self, id: i64, password: Option<String>) -> AppResult<User> {
        let user = self.repository.users.get_by_id(id).await?;

        let password = match password {
            Some(p) if !p.is_empty() => p,
            _ => {
                return Err(AppError::Validation(
                    "Password must not be empty".to_string(),
                ))
            }
        };

        let hash = self.hash_password(&password)?;
        self.repository.users.update_password(user.id, &hash).await?;
        self.repository.users.get_by_id(user.id).await
    }

    /// Delete a user
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repository.users.delete(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against the stored hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Librarian accounts need a positive answer from the external registry;
/// member registrations never trigger the call.
async fn check_librarian_verified(
    role: Role,
    verifier: &dyn LibrarianVerifier,
) -> AppResult<()> {
    if role == Role::Librarian && !verifier.verify().await? {
        return Err(AppError::Conflict(
            "Librarian verification failed".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::verify::MockLibrarianVerifier;

    #[tokio::test]
    async fn member_registration_skips_verification() {
        let mut verifier = MockLibrarianVerifier::new();
        verifier.expect_verify().never();

        assert!(check_librarian_verified(Role::Member, &verifier).await.is_ok());
    }

    #[tokio::test]
    async fn librarian_registration_requires_confirmation() {
        let mut verifier = MockLibrarianVerifier::new();
        verifier.expect_verify().times(1).returning(|| Ok(true));
        assert!(check_librarian_verified(Role::Librarian, &verifier).await.is_ok());

        let mut verifier = MockLibrarianVerifier::new();
        verifier.expect_verify().times(1).returning(|| Ok(false));
        let err = check_librarian_verified(Role::Librarian, &verifier)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
