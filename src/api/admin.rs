use axum::extract::Query;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::stats::AdminStatsResponse;
use crate::schemas::user::{RoleUpdate, UserResponse};

const RECENT_USERS_LIMIT: i64 = 5;
const TOP_COURSES_LIMIT: i64 = 5;

#[derive(Debug, Deserialize)]
pub(crate) struct UserListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    role: Option<UserRole>,
    #[serde(default)]
    search: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/users", get(list_users))
        .route("/users/:user_id/role", put(update_user_role))
        .route("/users/:user_id", delete(delete_user))
}

async fn stats(
    CurrentAdmin(_admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
) -> Result<Json<AdminStatsResponse>, ApiError> {
    let totals = repositories::stats::admin_totals(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to aggregate admin stats"))?;
    let recent_users = repositories::stats::recent_users(state.db(), RECENT_USERS_LIMIT)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch recent users"))?;
    let top_courses = repositories::stats::top_courses(state.db(), TOP_COURSES_LIMIT)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch top courses"))?;

    Ok(Json(AdminStatsResponse::from_db(totals, recent_users, top_courses)))
}

async fn list_users(
    Query(params): Query<UserListQuery>,
    CurrentAdmin(_admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
) -> Result<Json<PaginatedResponse<UserResponse>>, ApiError> {
    let filter = repositories::users::ListUsers {
        role: params.role,
        search: params.search,
        skip: params.skip,
        limit: params.limit,
    };

    let users = repositories::users::list(state.db(), &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;
    let total_count = repositories::users::count(state.db(), &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count users"))?;

    Ok(Json(PaginatedResponse {
        items: users.into_iter().map(UserResponse::from_db).collect(),
        total_count,
        skip: filter.skip,
        limit: filter.limit,
    }))
}

async fn update_user_role(
    axum::extract::Path(user_id): axum::extract::Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
    Json(payload): Json<RoleUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;

    if user.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let updated =
        repositories::users::update_role(state.db(), &user_id, payload.role, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update user role"))?;

    tracing::info!(
        admin_id = %admin.id,
        user_id = %updated.id,
        role = ?updated.role,
        action = "user_role_update",
        "Admin changed user role"
    );

    Ok(Json(UserResponse::from_db(updated)))
}

async fn delete_user(
    axum::extract::Path(user_id): axum::extract::Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let deleted = repositories::users::delete_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete user"))?;

    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(
        admin_id = %admin.id,
        user_id = %user_id,
        action = "user_delete",
        "Admin deleted user"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}
