//! External librarian verification capability
//!
//! Registering a librarian account requires a yes/no answer from an outside
//! registry. The capability is a one-method trait so the user service stays
//! free of networking concerns and tests can stub it.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

use crate::{
    config::VerificationConfig,
    error::{AppError, AppResult},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibrarianVerifier: Send + Sync {
    /// Returns true when the external registry confirms the credential
    async fn verify(&self) -> AppResult<bool>;
}

/// Verifier that calls the configured HTTP endpoint; any 2xx answer counts
/// as confirmed
pub struct HttpLibrarianVerifier {
    client: reqwest::Client,
    config: VerificationConfig,
}

impl HttpLibrarianVerifier {
    pub fn new(config: VerificationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl LibrarianVerifier for HttpLibrarianVerifier {
    async fn verify(&self) -> AppResult<bool> {
        let response = self
            .client
            .get(&self.config.url)
            .header(AUTHORIZATION, &self.config.token)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Librarian verification call failed: {}", e)))?;

        Ok(response.status().is_success())
    }
}
