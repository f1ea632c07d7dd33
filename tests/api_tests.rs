//! API integration tests
//!
//! These run against a live server with a seeded librarian account
//! (admin/admin). Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get a librarian token
async fn get_librarian_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to register a fresh member account, returning its id
async fn register_member(client: &Client, username: &str) -> i64 {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass",
            "role": "Member"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse register response");
    body["id"].as_i64().expect("No user ID")
}

/// Helper to create a branch, a book, and a stock record with the given
/// number of copies; returns (book_id, branch_id)
async fn stock_book(client: &Client, token: &str, copies: i32) -> (i64, i64) {
    let response = client
        .post(format!("{}/branches", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Test Branch" }))
        .send()
        .await
        .expect("Failed to create branch");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse branch response");
    let branch_id = body["id"].as_i64().expect("No branch ID");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "publication_year": 1980,
            "kind": "Book"
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book response");
    let book_id = body["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/books/{}/stock", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "branch_id": branch_id,
            "total_quantity": copies,
            "available_quantity": copies
        }))
        .send()
        .await
        .expect("Failed to create stock");
    assert_eq!(response.status(), 201);

    (book_id, branch_id)
}

/// Unique username per test run
fn unique(name: &str) -> String {
    format!("{}-{}", name, chrono::Utc::now().timestamp_micros())
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "Librarian");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_get_and_delete_user() {
    let client = Client::new();
    let username = unique("member");
    let user_id = register_member(&client, &username).await;

    let response = client
        .get(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], username.as_str());
    // The stored hash must never leave the server
    assert!(body.get("password").is_none());

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_empty_password_update_is_rejected() {
    let client = Client::new();
    let user_id = register_member(&client, &unique("pwd")).await;

    let response = client
        .patch(format!("{}/users/{}", BASE_URL, user_id))
        .json(&json!({ "password": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrow_decrements_stock_until_exhausted() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;

    let (book_id, branch_id) = stock_book(&client, &token, 1).await;
    let user_id = register_member(&client, &unique("borrower")).await;

    // First borrow takes the only copy
    let response = client
        .post(format!("{}/loans/borrow", BASE_URL))
        .json(&json!({
            "user_id": user_id,
            "book_id": book_id,
            "branch_id": branch_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // The branch now shows zero available copies
    let response = client
        .get(format!("{}/books/search?title=Test Book", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let book = body
        .as_array()
        .expect("Expected array")
        .iter()
        .find(|b| b["id"].as_i64() == Some(book_id))
        .expect("Borrowed book missing from search");
    assert_eq!(book["locations"][0]["available_quantity"], 0);

    // Second borrow of the same book conflicts
    let other_id = register_member(&client, &unique("second")).await;
    let response = client
        .post(format!("{}/loans/borrow", BASE_URL))
        .json(&json!({
            "user_id": other_id,
            "book_id": book_id,
            "branch_id": branch_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Insufficient available quantity in this branch");
}

#[tokio::test]
#[ignore]
async fn test_second_return_of_a_loan_fails() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;

    let (book_id, branch_id) = stock_book(&client, &token, 1).await;
    let user_id = register_member(&client, &unique("returner")).await;

    let response = client
        .post(format!("{}/loans/borrow", BASE_URL))
        .json(&json!({
            "user_id": user_id,
            "book_id": book_id,
            "branch_id": branch_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/users/{}/loans", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan = &body.as_array().expect("Expected array")[0];
    let loan_id = loan["id"].as_i64().expect("No loan ID");
    assert_eq!(loan["status"], "Borrowed");

    // Returning on time settles the loan and frees the copy
    let response = client
        .post(format!("{}/loans/return", BASE_URL))
        .json(&json!({ "loan_id": loan_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/users/{}/loans", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body[0]["status"], "Returned");
    assert!(body[0]["return_date"].is_string());

    // A second return is not a no-op
    let response = client
        .post(format!("{}/loans/return", BASE_URL))
        .json(&json!({ "loan_id": loan_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_stock_entry_conflicts() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;

    let (book_id, branch_id) = stock_book(&client, &token, 3).await;

    let response = client
        .post(format!("{}/books/{}/stock", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "branch_id": branch_id,
            "total_quantity": 2,
            "available_quantity": 2
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_catalog_writes_require_librarian() {
    let client = Client::new();

    // No token at all
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Unauthorized",
            "author": "Nobody",
            "kind": "Book"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // Member token
    let username = unique("member");
    register_member(&client, &username).await;
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "testpass" }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let member_token = body["token"].as_str().expect("No token").to_string();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token))
        .json(&json!({
            "title": "Forbidden",
            "author": "Nobody",
            "kind": "Book"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_notify_due_soon_reports_a_count() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans/notify-due-soon", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["notified"].is_number());
}
