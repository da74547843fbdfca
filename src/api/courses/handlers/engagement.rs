use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::course::{
    ReviewAddedResponse, ReviewCreate, ReviewResponse, WishlistItemResponse,
    WishlistToggleResponse,
};
use crate::services::policy::{self, Action, Resource};
use crate::services::ratings;

pub(in crate::api::courses) async fn add_review(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<ReviewCreate>,
) -> Result<(axum::http::StatusCode, Json<ReviewAddedResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    let Some(course) = course else {
        return Err(ApiError::NotFound("Course not found".to_string()));
    };

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let enrollment =
        repositories::enrollments::find_by_user_and_course(&mut *tx, &user.id, &course.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    if enrollment.is_none() {
        return Err(ApiError::BadRequest("Must be enrolled to review".to_string()));
    }

    let existing = repositories::reviews::exists_for_user(&mut *tx, &course.id, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing review"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Already reviewed this course".to_string()));
    }

    repositories::reviews::create(
        &mut *tx,
        repositories::reviews::CreateReview {
            id: &Uuid::new_v4().to_string(),
            course_id: &course.id,
            user_id: &user.id,
            rating: payload.rating,
            comment: payload.comment,
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create review"))?;

    // The course row carries the aggregate; recompute it from all reviews
    // inside the same transaction.
    let all_ratings = repositories::reviews::list_ratings(&mut *tx, &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load ratings"))?;

    let rating = ratings::rounded_mean(&all_ratings);
    repositories::courses::update_rating(&mut *tx, &course.id, rating, all_ratings.len() as i32, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update course rating"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(ReviewAddedResponse { message: "Review added".to_string(), rating }),
    ))
}

pub(in crate::api::courses) async fn list_reviews(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    let Some(course) = course else {
        return Err(ApiError::NotFound("Course not found".to_string()));
    };

    if !course.is_published
        && !policy::authorize(
            &user,
            Action::Read,
            Resource::Course { instructor_id: &course.instructor_id },
        )
    {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let rows = repositories::reviews::list_for_course(state.db(), &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list reviews"))?;

    Ok(Json(rows.into_iter().map(ReviewResponse::from_db).collect()))
}

pub(in crate::api::courses) async fn toggle_wishlist(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<WishlistToggleResponse>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    let Some(course) = course else {
        return Err(ApiError::NotFound("Course not found".to_string()));
    };

    let in_wishlist = repositories::wishlist::exists(state.db(), &user.id, &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check wishlist"))?;

    if in_wishlist {
        repositories::wishlist::remove(state.db(), &user.id, &course.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update wishlist"))?;
    } else {
        repositories::wishlist::add(state.db(), &user.id, &course.id, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update wishlist"))?;
    }

    let message =
        if in_wishlist { "Removed from wishlist" } else { "Added to wishlist" }.to_string();

    Ok(Json(WishlistToggleResponse { message, in_wishlist: !in_wishlist }))
}

pub(in crate::api::courses) async fn list_wishlist(
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<WishlistItemResponse>>, ApiError> {
    let rows = repositories::wishlist::list_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list wishlist"))?;

    Ok(Json(rows.into_iter().map(WishlistItemResponse::from_db).collect()))
}
