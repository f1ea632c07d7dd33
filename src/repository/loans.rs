//! Loans repository for database operations

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::loan::{DueSoonLoan, Loan, LoanStatus, NewLoan},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Find loan by ID
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(loan)
    }

    /// Insert a new Borrowed loan inside the caller's transaction
    pub async fn insert(&self, conn: &mut PgConnection, loan: &NewLoan) -> AppResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO loans (user_id, book_id, branch_id, borrow_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(loan.user_id)
        .bind(loan.book_id)
        .bind(loan.branch_id)
        .bind(loan.borrow_date)
        .bind(loan.due_date)
        .bind(LoanStatus::Borrowed)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Settle a loan inside the caller's transaction: record the return
    /// date and the final status. The loan is terminal afterwards.
    pub async fn finalize_return(
        &self,
        conn: &mut PgConnection,
        loan_id: i64,
        return_date: NaiveDate,
        status: LoanStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE loans SET return_date = $1, status = $2 WHERE id = $3")
            .bind(return_date)
            .bind(status)
            .bind(loan_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// All loans for a user, newest first
    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE user_id = $1 ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Count the user's overdue, unreturned loans as of `today`
    pub async fn count_overdue_by_user(&self, user_id: i64, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM loans
            WHERE user_id = $1 AND status = 'Borrowed'
              AND due_date < $2 AND return_date IS NULL
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Count the user's Borrowed loans of books with the given category tag
    pub async fn count_borrowed_by_user_and_kind(
        &self,
        user_id: i64,
        kind: &str,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM loans l
            JOIN books b ON l.book_id = b.id
            WHERE l.user_id = $1 AND l.status = 'Borrowed' AND b.kind = $2
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Borrowed loans due on exactly the given date, with borrower and
    /// book details for notification
    pub async fn find_due_on(&self, due_date: NaiveDate) -> AppResult<Vec<DueSoonLoan>> {
        let loans = sqlx::query_as::<_, DueSoonLoan>(
            r#"
            SELECT l.id, l.user_id, u.username, u.email, b.title, l.due_date
            FROM loans l
            JOIN users u ON l.user_id = u.id
            JOIN books b ON l.book_id = b.id
            WHERE l.status = 'Borrowed' AND l.due_date = $1
            ORDER BY l.id
            "#,
        )
        .bind(due_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }
}
