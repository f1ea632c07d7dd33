//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, branches, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atheneum API",
        version = "1.0.0",
        description = "Library Branch Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        // Users
        users::register,
        users::get_user,
        users::update_password,
        users::delete_user,
        // Books
        books::create_book,
        books::update_book,
        books::search_books,
        books::add_stock,
        books::update_stock,
        // Branches
        branches::create_branch,
        branches::update_branch,
        branches::get_branch,
        // Loans
        loans::borrow_book,
        loans::return_book,
        loans::get_user_loans,
        loans::notify_due_soon,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdatePassword,
            crate::models::user::Role,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookWithInventory,
            crate::models::book::BranchStock,
            crate::models::inventory::InventoryEntry,
            crate::models::inventory::StockRequest,
            // Branches
            crate::models::branch::Branch,
            crate::models::branch::CreateBranch,
            crate::models::branch::UpdateBranch,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanStatus,
            loans::BorrowRequest,
            loans::ReturnRequest,
            loans::LoanMessage,
            loans::NotifyResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User account management"),
        (name = "books", description = "Catalog and stock management"),
        (name = "branches", description = "Library branch management"),
        (name = "loans", description = "Loan lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
