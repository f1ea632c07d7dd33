//! Catalog endpoints: books and their per-branch stock

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, BookWithInventory, CreateBook, UpdateBook},
        inventory::{InventoryEntry, StockRequest},
    },
};

use super::AuthenticatedUser;

/// Add a new book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_librarian()?;
    book.validate()?;

    let created = state.services.catalog.add_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book's descriptive fields
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Librarian privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_librarian()?;
    book.validate()?;

    let updated = state.services.catalog.update_book(id, book).await?;
    Ok(Json(updated))
}

/// Search books by title, author and publication year
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books with per-branch stock", body = Vec<BookWithInventory>)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookWithInventory>>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(Json(books))
}

/// Stock a book at a branch
#[utoipa::path(
    post,
    path = "/books/{id}/stock",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = StockRequest,
    responses(
        (status = 201, description = "Stock record created", body = InventoryEntry),
        (status = 400, description = "Invalid quantities"),
        (status = 403, description = "Librarian privileges required"),
        (status = 404, description = "Book or branch not found"),
        (status = 409, description = "Stock already exists for this book at this branch")
    )
)]
pub async fn add_stock(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i64>,
    Json(stock): Json<StockRequest>,
) -> AppResult<(StatusCode, Json<InventoryEntry>)> {
    claims.require_librarian()?;
    stock.validate()?;

    let created = state.services.catalog.add_stock(book_id, stock).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace the quantities of an existing stock record
#[utoipa::path(
    put,
    path = "/books/{id}/stock",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = StockRequest,
    responses(
        (status = 200, description = "Stock record updated", body = InventoryEntry),
        (status = 400, description = "Invalid quantities"),
        (status = 403, description = "Librarian privileges required"),
        (status = 404, description = "Stock record not found")
    )
)]
pub async fn update_stock(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i64>,
    Json(stock): Json<StockRequest>,
) -> AppResult<Json<InventoryEntry>> {
    claims.require_librarian()?;
    stock.validate()?;

    let updated = state.services.catalog.update_stock(book_id, stock).await?;
    Ok(Json(updated))
}
