//! Catalog service: books and their per-branch stock

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, BookWithInventory, CreateBook, UpdateBook},
        inventory::{InventoryEntry, StockRequest},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a new book to the catalog
    pub async fn add_book(&self, book: CreateBook) -> AppResult<Book> {
        self.repository.books.create(&book).await
    }

    /// Update a book's descriptive fields
    pub async fn update_book(&self, id: i64, book: UpdateBook) -> AppResult<Book> {
        self.repository.books.update(id, &book).await
    }

    /// Stock a book at a branch. A (book, branch) pair gets at most one
    /// stock record.
    pub async fn add_stock(&self, book_id: i64, stock: StockRequest) -> AppResult<InventoryEntry> {
        if self.repository.books.find_by_id(book_id).await?.is_none() {
            return Err(AppError::NotFound("Book does not exist".to_string()));
        }
        if self
            .repository
            .branches
            .find_by_id(stock.branch_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(
                "Library branch does not exist".to_string(),
            ));
        }

        check_quantity_bound(&stock)?;

        if self
            .repository
            .inventory
            .find_by_book_and_branch(book_id, stock.branch_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Stock for this book already exists at this branch".to_string(),
            ));
        }

        self.repository.inventory.create(book_id, &stock).await
    }

    /// Replace the quantities of an existing stock record
    pub async fn update_stock(
        &self,
        book_id: i64,
        stock: StockRequest,
    ) -> AppResult<InventoryEntry> {
        check_quantity_bound(&stock)?;

        self.repository
            .inventory
            .update_quantities(book_id, &stock)
            .await?
            .ok_or_else(|| AppError::NotFound("Stock record not found".to_string()))
    }

    /// Search books by optional title/author/year, each with its per-branch
    /// stock summary
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<BookWithInventory>> {
        let books = self.repository.books.search(query).await?;

        let mut result = Vec::with_capacity(books.len());
        for book in books {
            let locations = self.repository.inventory.list_for_book(book.id).await?;
            result.push(BookWithInventory::new(book, locations));
        }

        Ok(result)
    }
}

fn check_quantity_bound(stock: &StockRequest) -> AppResult<()> {
    if stock.available_quantity > stock.total_quantity {
        return Err(AppError::Validation(
            "Available quantity cannot exceed total quantity".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_must_stay_within_total() {
        let stock = StockRequest {
            branch_id: 1,
            total_quantity: 3,
            available_quantity: 3,
        };
        assert!(check_quantity_bound(&stock).is_ok());

        let stock = StockRequest {
            branch_id: 1,
            total_quantity: 3,
            available_quantity: 4,
        };
        assert!(check_quantity_bound(&stock).is_err());
    }
}
