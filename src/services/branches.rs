//! Library branch management service

use crate::{
    error::AppResult,
    models::branch::{Branch, CreateBranch, UpdateBranch},
    repository::Repository,
};

#[derive(Clone)]
pub struct BranchesService {
    repository: Repository,
}

impl BranchesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a new library branch
    pub async fn add_branch(&self, branch: CreateBranch) -> AppResult<Branch> {
        self.repository.branches.create(&branch).await
    }

    /// Rename an existing branch
    pub async fn update_branch(&self, id: i64, branch: UpdateBranch) -> AppResult<Branch> {
        self.repository.branches.update(id, &branch).await
    }

    /// Get branch by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Branch> {
        self.repository.branches.get_by_id(id).await
    }
}
