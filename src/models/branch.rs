//! Library branch model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A physical library location holding its own inventory counts per book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Branch {
    pub id: i64,
    pub name: String,
}

/// Create branch request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBranch {
    #[validate(length(min = 1, message = "Branch name must not be empty"))]
    pub name: String,
}

/// Update branch request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBranch {
    #[validate(length(min = 1, message = "Branch name must not be empty"))]
    pub name: String,
}
