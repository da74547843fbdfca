use axum::{extract::Query, Json};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::course::{CategoryResponse, CourseDetailResponse, CourseResponse};
use crate::services::policy::{self, Action, Resource};

use super::super::helpers;
use super::super::queries::ListCoursesQuery;

/// Storefront cap on the featured strip.
const FEATURED_LIMIT: i64 = 6;

pub(in crate::api::courses) async fn list_courses(
    CurrentUser(_user): CurrentUser,
    state: axum::extract::State<AppState>,
    Query(params): Query<ListCoursesQuery>,
) -> Result<Json<PaginatedResponse<CourseResponse>>, ApiError> {
    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);

    let courses = repositories::courses::list_published(state.db(), skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
    let total_count = repositories::courses::count_published(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count courses"))?;

    let items = helpers::course_summaries(state.db(), courses).await?;

    Ok(Json(PaginatedResponse { items, total_count, skip, limit }))
}

pub(in crate::api::courses) async fn get_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
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

    let sections = helpers::load_tree(state.db(), &course.id).await?;
    let instructor = helpers::instructor_brief(state.db(), &course.instructor_id).await?;

    Ok(Json(CourseDetailResponse {
        course: CourseResponse::from_db(course, instructor),
        sections,
    }))
}

pub(in crate::api::courses) async fn list_categories(
    CurrentUser(_user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let rows = repositories::courses::categories(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list categories"))?;

    Ok(Json(
        rows.into_iter()
            .map(|row| CategoryResponse { name: row.category, count: row.count })
            .collect(),
    ))
}

pub(in crate::api::courses) async fn list_featured(
    CurrentUser(_user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_featured(state.db(), FEATURED_LIMIT)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list featured courses"))?;

    let items = helpers::course_summaries(state.db(), courses).await?;

    Ok(Json(items))
}
