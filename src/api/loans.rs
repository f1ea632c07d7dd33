//! Loan lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, models::loan::Loan};

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Borrowing user ID
    pub user_id: i64,
    /// Book ID
    pub book_id: i64,
    /// Branch the copy is taken from
    pub branch_id: i64,
}

/// Return request
#[derive(Deserialize, ToSchema)]
pub struct ReturnRequest {
    /// Loan ID
    pub loan_id: i64,
}

/// Status message for loan operations
#[derive(Serialize, ToSchema)]
pub struct LoanMessage {
    pub message: String,
}

/// Result of a due-soon notification scan
#[derive(Serialize, ToSchema)]
pub struct NotifyResponse {
    /// Number of loans that qualified for a notice
    pub notified: usize,
}

/// Borrow a book from a branch
#[utoipa::path(
    post,
    path = "/loans/borrow",
    tag = "loans",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = LoanMessage),
        (status = 404, description = "User, book, or branch not found"),
        (status = 409, description = "No available copy, overdue loans, or borrow limit reached")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<LoanMessage>)> {
    state
        .services
        .loans
        .borrow_book(request.user_id, request.book_id, request.branch_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanMessage {
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/return",
    tag = "loans",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = LoanMessage),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<LoanMessage>> {
    state.services.loans.return_book(request.loan_id).await?;

    Ok(Json(LoanMessage {
        message: "Book returned successfully".to_string(),
    }))
}

/// Get all loans for a user
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's loans, newest first", body = Vec<Loan>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.get_user_loans(user_id).await?;
    Ok(Json(loans))
}

/// Notify users whose loans are due soon
#[utoipa::path(
    get,
    path = "/loans/notify-due-soon",
    tag = "loans",
    responses(
        (status = 200, description = "Scan completed", body = NotifyResponse)
    )
)]
pub async fn notify_due_soon(
    State(state): State<crate::AppState>,
) -> AppResult<Json<NotifyResponse>> {
    let notified = state.services.loans.notify_due_soon().await?;
    Ok(Json(NotifyResponse { notified }))
}
