//! Loan lifecycle engine
//!
//! Borrowing and returning each mutate two records, the loan and the
//! matching inventory row, inside one unit of work. Every business rule is
//! checked before the transaction starts; the only failure possible after
//! that point is a storage failure, which rolls both halves back.

use std::sync::Arc;

use chrono::{Days, Months, NaiveDate, Utc};

use crate::{
    config::LibraryConfig,
    error::{AppError, AppResult},
    models::{
        book::KIND_BOOK,
        inventory::InventoryEntry,
        loan::{DueSoonLoan, Loan, LoanStatus, NewLoan},
    },
    repository::Repository,
    services::notify::{DueNotice, NotificationSink},
};

const MSG_NO_STOCK: &str = "Insufficient available quantity in this branch";
const MSG_OVERDUE: &str =
    "You have overdue books. Please return them before borrowing new ones.";
const MSG_LOAN_GONE: &str = "Loan record does not exist or already returned";

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LibraryConfig,
    sink: Arc<dyn NotificationSink>,
}

impl LoansService {
    pub fn new(
        repository: Repository,
        config: LibraryConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            repository,
            config,
            sink,
        }
    }

    /// Borrow a book for a user from a specific library branch.
    ///
    /// Rules, in order: the three referenced records must exist; the branch
    /// must have an available copy; the user must have no overdue unreturned
    /// loans; the user must be under the per-kind borrow limit.
    pub async fn borrow_book(&self, user_id: i64, book_id: i64, branch_id: i64) -> AppResult<()> {
        let user = self.repository.users.find_by_id(user_id).await?;
        let book = self.repository.books.find_by_id(book_id).await?;
        let branch = self.repository.branches.find_by_id(branch_id).await?;
        let book = match (user, book, branch) {
            (Some(_), Some(book), Some(_)) => book,
            _ => {
                return Err(AppError::NotFound(
                    "User, book, or library branch does not exist".to_string(),
                ))
            }
        };

        let today = Utc::now().date_naive();

        let stock = self
            .repository
            .inventory
            .find_by_book_and_branch(book_id, branch_id)
            .await?;
        check_stock(stock.as_ref())?;

        let overdue = self
            .repository
            .loans
            .count_overdue_by_user(user_id, today)
            .await?;
        check_no_overdue(overdue)?;

        let same_kind = self
            .repository
            .loans
            .count_borrowed_by_user_and_kind(user_id, &book.kind)
            .await?;
        check_kind_limit(same_kind, &book.kind, &self.config)?;

        let loan = NewLoan {
            user_id,
            book_id,
            branch_id,
            borrow_date: today,
            due_date: due_date(today, self.config.loan_duration_months),
        };

        let mut tx = self.repository.begin().await?;
        self.repository.loans.insert(&mut tx, &loan).await?;
        let taken = self
            .repository
            .inventory
            .take_available(&mut tx, book_id, branch_id)
            .await?;
        if !taken {
            // A concurrent borrow took the last copy between the rule check
            // and the guarded update; dropping the transaction discards the
            // loan insert.
            return Err(AppError::Conflict(MSG_NO_STOCK.to_string()));
        }
        tx.commit().await?;

        tracing::info!(user_id, book_id, branch_id, "book borrowed");
        Ok(())
    }

    /// Return a borrowed book: settle the loan status and put the copy back.
    ///
    /// Not idempotent; a second return of the same loan fails.
    pub async fn return_book(&self, loan_id: i64) -> AppResult<()> {
        let loan = self
            .repository
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_LOAN_GONE.to_string()))?;

        if loan.status != LoanStatus::Borrowed {
            return Err(AppError::Conflict(MSG_LOAN_GONE.to_string()));
        }

        let today = Utc::now().date_naive();
        let status = settle_status(loan.due_date, today);

        let mut tx = self.repository.begin().await?;
        self.repository
            .loans
            .finalize_return(&mut tx, loan.id, today, status)
            .await?;
        self.repository
            .inventory
            .put_back_available(&mut tx, loan.book_id, loan.branch_id)
            .await?;
        tx.commit().await?;

        tracing::info!(loan_id, status = %status, "book returned");
        Ok(())
    }

    /// All loans for a user, newest first
    pub async fn get_user_loans(&self, user_id: i64) -> AppResult<Vec<Loan>> {
        if self.repository.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User with id {} not found", user_id)));
        }
        self.repository.loans.find_by_user(user_id).await
    }

    /// Notify users whose loans are due in exactly the configured number of
    /// days. Returns the number of matching loans; delivery failures are
    /// logged and never abort the scan.
    pub async fn notify_due_soon(&self) -> AppResult<usize> {
        let today = Utc::now().date_naive();
        let target = today + Days::new(self.config.notification_days_before);

        let due = self.repository.loans.find_due_on(target).await?;
        let notices = build_notices(&due, today);

        Ok(dispatch_notices(self.sink.as_ref(), &notices).await)
    }
}

fn check_stock(stock: Option<&InventoryEntry>) -> AppResult<()> {
    match stock {
        Some(entry) if entry.available_quantity > 0 => Ok(()),
        _ => Err(AppError::Conflict(MSG_NO_STOCK.to_string())),
    }
}

fn check_no_overdue(overdue_count: i64) -> AppResult<()> {
    if overdue_count > 0 {
        Err(AppError::Conflict(MSG_OVERDUE.to_string()))
    } else {
        Ok(())
    }
}

fn kind_limit(config: &LibraryConfig, kind: &str) -> i64 {
    if kind == KIND_BOOK {
        config.borrow_limit_book
    } else {
        config.borrow_limit_other
    }
}

fn check_kind_limit(borrowed_same_kind: i64, kind: &str, config: &LibraryConfig) -> AppResult<()> {
    let limit = kind_limit(config, kind);
    if borrowed_same_kind >= limit {
        Err(AppError::Conflict(format!(
            "Borrowing limit reached: {} max {}",
            kind, limit
        )))
    } else {
        Ok(())
    }
}

fn due_date(today: NaiveDate, months: u32) -> NaiveDate {
    today + Months::new(months)
}

/// A loan returned after its due date settles to Overdue; on or before the
/// due date it settles to Returned.
fn settle_status(due_date: NaiveDate, today: NaiveDate) -> LoanStatus {
    if due_date < today {
        LoanStatus::Overdue
    } else {
        LoanStatus::Returned
    }
}

fn build_notices(loans: &[DueSoonLoan], today: NaiveDate) -> Vec<DueNotice> {
    loans
        .iter()
        .map(|loan| DueNotice {
            user_id: loan.user_id,
            username: loan.username.clone(),
            email: loan.email.clone(),
            book_title: loan.title.clone(),
            due_date: loan.due_date,
            days_remaining: (loan.due_date - today).num_days(),
        })
        .collect()
}

async fn dispatch_notices(sink: &dyn NotificationSink, notices: &[DueNotice]) -> usize {
    for notice in notices {
        if let Err(e) = sink.deliver(notice).await {
            tracing::warn!(
                user_id = notice.user_id,
                "failed to deliver due-soon notice: {}",
                e
            );
        }
    }
    notices.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notify::MockNotificationSink;

    fn cfg() -> LibraryConfig {
        LibraryConfig::default()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(available: i32) -> InventoryEntry {
        InventoryEntry {
            id: 1,
            book_id: 2,
            branch_id: 3,
            total_quantity: 10,
            available_quantity: available,
        }
    }

    fn due_soon_loan(id: i64, due: NaiveDate) -> DueSoonLoan {
        DueSoonLoan {
            id,
            user_id: 7,
            username: "alice".to_string(),
            email: Some("alice@example.org".to_string()),
            title: "The Name of the Rose".to_string(),
            due_date: due,
        }
    }

    #[test]
    fn stock_check_requires_an_available_copy() {
        assert!(check_stock(Some(&entry(1))).is_ok());
        assert!(check_stock(Some(&entry(5))).is_ok());

        let err = check_stock(Some(&entry(0))).unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == MSG_NO_STOCK));

        let err = check_stock(None).unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == MSG_NO_STOCK));
    }

    #[test]
    fn any_overdue_loan_blocks_borrowing() {
        assert!(check_no_overdue(0).is_ok());

        let err = check_no_overdue(1).unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == MSG_OVERDUE));
        assert!(check_no_overdue(3).is_err());
    }

    #[test]
    fn book_kind_uses_the_book_limit() {
        // default book limit is 5: one under passes, at the limit fails
        assert!(check_kind_limit(4, KIND_BOOK, &cfg()).is_ok());

        let err = check_kind_limit(5, KIND_BOOK, &cfg()).unwrap_err();
        assert!(
            matches!(err, AppError::Conflict(ref m) if m == "Borrowing limit reached: Book max 5")
        );
    }

    #[test]
    fn other_kinds_use_the_other_limit() {
        assert!(check_kind_limit(5, "DVD", &cfg()).is_ok());
        assert!(check_kind_limit(9, "DVD", &cfg()).is_ok());

        let err = check_kind_limit(10, "DVD", &cfg()).unwrap_err();
        assert!(
            matches!(err, AppError::Conflict(ref m) if m == "Borrowing limit reached: DVD max 10")
        );
    }

    #[test]
    fn limits_are_read_from_config_not_constants() {
        let config = LibraryConfig {
            borrow_limit_book: 2,
            ..LibraryConfig::default()
        };
        assert!(check_kind_limit(1, KIND_BOOK, &config).is_ok());
        assert!(check_kind_limit(2, KIND_BOOK, &config).is_err());
    }

    #[test]
    fn due_date_adds_calendar_months() {
        assert_eq!(due_date(date(2026, 3, 15), 1), date(2026, 4, 15));
        assert_eq!(due_date(date(2026, 3, 15), 3), date(2026, 6, 15));
        // month-end clamps instead of spilling over
        assert_eq!(due_date(date(2026, 1, 31), 1), date(2026, 2, 28));
        assert_eq!(due_date(date(2024, 1, 31), 1), date(2024, 2, 29));
    }

    #[test]
    fn return_settles_overdue_only_when_past_due() {
        let today = date(2026, 8, 4);
        assert_eq!(settle_status(date(2026, 8, 3), today), LoanStatus::Overdue);
        assert_eq!(settle_status(today, today), LoanStatus::Returned);
        assert_eq!(settle_status(date(2026, 8, 5), today), LoanStatus::Returned);
    }

    #[test]
    fn notices_carry_exact_days_remaining() {
        let today = date(2026, 8, 4);
        let loans = vec![due_soon_loan(1, date(2026, 8, 9))];

        let notices = build_notices(&loans, today);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].days_remaining, 5);
        assert_eq!(notices[0].username, "alice");
        assert_eq!(notices[0].book_title, "The Name of the Rose");
    }

    #[tokio::test]
    async fn each_notice_is_delivered_exactly_once() {
        let today = date(2026, 8, 4);
        let loans = vec![
            due_soon_loan(1, date(2026, 8, 9)),
            due_soon_loan(2, date(2026, 8, 9)),
        ];
        let notices = build_notices(&loans, today);

        let mut sink = MockNotificationSink::new();
        sink.expect_deliver().times(2).returning(|_| Ok(()));

        assert_eq!(dispatch_notices(&sink, &notices).await, 2);
    }

    #[tokio::test]
    async fn delivery_failure_does_not_abort_the_scan() {
        let today = date(2026, 8, 4);
        let loans = vec![
            due_soon_loan(1, date(2026, 8, 9)),
            due_soon_loan(2, date(2026, 8, 9)),
        ];
        let notices = build_notices(&loans, today);

        let mut sink = MockNotificationSink::new();
        sink.expect_deliver()
            .times(2)
            .returning(|_| Err(AppError::Internal("smtp down".to_string())));

        assert_eq!(dispatch_notices(&sink, &notices).await, 2);
    }
}
