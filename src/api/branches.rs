//! Library branch endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::branch::{Branch, CreateBranch, UpdateBranch},
};

use super::AuthenticatedUser;

/// Create a new library branch
#[utoipa::path(
    post,
    path = "/branches",
    tag = "branches",
    security(("bearer_auth" = [])),
    request_body = CreateBranch,
    responses(
        (status = 201, description = "Branch created", body = Branch),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn create_branch(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(branch): Json<CreateBranch>,
) -> AppResult<(StatusCode, Json<Branch>)> {
    claims.require_librarian()?;
    branch.validate()?;

    let created = state.services.branches.add_branch(branch).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Rename an existing branch
#[utoipa::path(
    put,
    path = "/branches/{id}",
    tag = "branches",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Branch ID")
    ),
    request_body = UpdateBranch,
    responses(
        (status = 200, description = "Branch updated", body = Branch),
        (status = 403, description = "Librarian privileges required"),
        (status = 404, description = "Branch not found")
    )
)]
pub async fn update_branch(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(branch): Json<UpdateBranch>,
) -> AppResult<Json<Branch>> {
    claims.require_librarian()?;
    branch.validate()?;

    let updated = state.services.branches.update_branch(id, branch).await?;
    Ok(Json(updated))
}

/// Get branch details by ID
#[utoipa::path(
    get,
    path = "/branches/{id}",
    tag = "branches",
    params(
        ("id" = i64, Path, description = "Branch ID")
    ),
    responses(
        (status = 200, description = "Branch details", body = Branch),
        (status = 404, description = "Branch not found")
    )
)]
pub async fn get_branch(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Branch>> {
    let branch = state.services.branches.get_by_id(id).await?;
    Ok(Json(branch))
}
