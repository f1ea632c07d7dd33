//! Per-branch inventory repository

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::BranchStock,
        inventory::{InventoryEntry, StockRequest},
    },
};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: Pool<Postgres>,
}

impl InventoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Find the stock record for a (book, branch) pair
    pub async fn find_by_book_and_branch(
        &self,
        book_id: i64,
        branch_id: i64,
    ) -> AppResult<Option<InventoryEntry>> {
        let entry = sqlx::query_as::<_, InventoryEntry>(
            "SELECT * FROM inventory WHERE book_id = $1 AND branch_id = $2",
        )
        .bind(book_id)
        .bind(branch_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    /// Create a stock record. The (book, branch) pair carries a unique
    /// constraint; the catalog service checks for duplicates first.
    pub async fn create(&self, book_id: i64, stock: &StockRequest) -> AppResult<InventoryEntry> {
        let created = sqlx::query_as::<_, InventoryEntry>(
            r#"
            INSERT INTO inventory (book_id, branch_id, total_quantity, available_quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(stock.branch_id)
        .bind(stock.total_quantity)
        .bind(stock.available_quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Replace both quantity counters for an existing record
    pub async fn update_quantities(
        &self,
        book_id: i64,
        stock: &StockRequest,
    ) -> AppResult<Option<InventoryEntry>> {
        let updated = sqlx::query_as::<_, InventoryEntry>(
            r#"
            UPDATE inventory
            SET total_quantity = $1, available_quantity = $2
            WHERE book_id = $3 AND branch_id = $4
            RETURNING *
            "#,
        )
        .bind(stock.total_quantity)
        .bind(stock.available_quantity)
        .bind(book_id)
        .bind(stock.branch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Take one available copy inside the caller's transaction. The guard
    /// on `available_quantity > 0` means two concurrent borrows of the
    /// last copy can never both succeed; returns false when no copy was
    /// left to take.
    pub async fn take_available(
        &self,
        conn: &mut PgConnection,
        book_id: i64,
        branch_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE inventory
            SET available_quantity = available_quantity - 1
            WHERE book_id = $1 AND branch_id = $2 AND available_quantity > 0
            "#,
        )
        .bind(book_id)
        .bind(branch_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Put one copy back inside the caller's transaction. A missing stock
    /// record is tolerated: inventory may have been restructured after the
    /// loan was issued.
    pub async fn put_back_available(
        &self,
        conn: &mut PgConnection,
        book_id: i64,
        branch_id: i64,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE inventory
            SET available_quantity = available_quantity + 1
            WHERE book_id = $1 AND branch_id = $2
            "#,
        )
        .bind(book_id)
        .bind(branch_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Per-branch stock summaries for one book, joined with branch names
    pub async fn list_for_book(&self, book_id: i64) -> AppResult<Vec<BranchStock>> {
        let stocks = sqlx::query_as::<_, BranchStock>(
            r#"
            SELECT br.name AS branch_name, i.total_quantity, i.available_quantity
            FROM inventory i
            JOIN branches br ON i.branch_id = br.id
            WHERE i.book_id = $1
            ORDER BY br.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stocks)
    }
}
