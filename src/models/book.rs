//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Category tag of books subject to the primary borrow limit; every other
/// tag falls under the "other" limit.
pub const KIND_BOOK: &str = "Book";

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    /// Category tag, e.g. "Book", "Magazine", "DVD"
    pub kind: String,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    pub publication_year: Option<i32>,
    #[validate(length(min = 1, message = "Kind must not be empty"))]
    pub kind: String,
}

/// Update book request (replaces all descriptive fields)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    pub publication_year: Option<i32>,
    #[validate(length(min = 1, message = "Kind must not be empty"))]
    pub kind: String,
}

/// Book search query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
}

/// Per-branch stock summary for search results
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BranchStock {
    pub branch_name: String,
    pub total_quantity: i32,
    pub available_quantity: i32,
}

/// Book with its per-branch stock records
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookWithInventory {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    pub kind: String,
    pub locations: Vec<BranchStock>,
}

impl BookWithInventory {
    pub fn new(book: Book, locations: Vec<BranchStock>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            publication_year: book.publication_year,
            kind: book.kind,
            locations,
        }
    }
}
