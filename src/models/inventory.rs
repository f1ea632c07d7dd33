//! Per-branch inventory model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Stock record for one (book, branch) pair. At most one row exists per
/// pair; `0 <= available_quantity <= total_quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryEntry {
    pub id: i64,
    pub book_id: i64,
    pub branch_id: i64,
    pub total_quantity: i32,
    pub available_quantity: i32,
}

/// Create or update stock for a book at a branch
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StockRequest {
    pub branch_id: i64,
    #[validate(range(min = 0, message = "Total quantity must not be negative"))]
    pub total_quantity: i32,
    #[validate(range(min = 0, message = "Available quantity must not be negative"))]
    pub available_quantity: i32,
}
