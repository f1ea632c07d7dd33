//! Library branches repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::branch::{Branch, CreateBranch, UpdateBranch},
};

#[derive(Clone)]
pub struct BranchesRepository {
    pool: Pool<Postgres>,
}

impl BranchesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Find branch by ID
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Branch>> {
        let branch = sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(branch)
    }

    /// Get branch by ID, failing when missing
    pub async fn get_by_id(&self, id: i64) -> AppResult<Branch> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Branch with id {} not found", id)))
    }

    /// Create a new branch
    pub async fn create(&self, branch: &CreateBranch) -> AppResult<Branch> {
        let created = sqlx::query_as::<_, Branch>(
            "INSERT INTO branches (name) VALUES ($1) RETURNING *",
        )
        .bind(&branch.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Rename a branch
    pub async fn update(&self, id: i64, branch: &UpdateBranch) -> AppResult<Branch> {
        let updated = sqlx::query_as::<_, Branch>(
            "UPDATE branches SET name = $1 WHERE id = $2 RETURNING *",
        )
        .bind(&branch.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Library branch not found".to_string()))?;

        Ok(updated)
    }
}
