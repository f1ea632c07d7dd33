//! Repository layer for database operations

pub mod books;
pub mod branches;
pub mod inventory;
pub mod loans;
pub mod users;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub branches: branches::BranchesRepository,
    pub users: users::UsersRepository,
    pub inventory: inventory::InventoryRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            branches: branches::BranchesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            inventory: inventory::InventoryRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a unit of work. Mutations issued through the returned
    /// transaction commit together or not at all; dropping it without
    /// committing rolls everything back.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }
}
