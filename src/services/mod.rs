//! Business logic services

pub mod branches;
pub mod catalog;
pub mod loans;
pub mod notify;
pub mod users;
pub mod verify;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub branches: branches::BranchesService,
    pub users: users::UsersService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository and configuration
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let sink = notify::sink_from_config(&config.notification);
        let verifier: Arc<dyn verify::LibrarianVerifier> = Arc::new(
            verify::HttpLibrarianVerifier::new(config.verification.clone()),
        );

        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            branches: branches::BranchesService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), config.auth.clone(), verifier),
            loans: loans::LoansService::new(repository, config.library.clone(), sink),
        }
    }
}
