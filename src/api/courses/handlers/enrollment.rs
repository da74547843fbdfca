use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::course::{
    EnrollResponse, EnrolledCourseResponse, ProgressResponse, ProgressUpdate,
};
use crate::services::policy::{self, Action, Resource};
use crate::services::progress;

pub(in crate::api::courses) async fn enroll(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<(axum::http::StatusCode, Json<EnrollResponse>), ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    let Some(course) = course else {
        return Err(ApiError::NotFound("Course not found".to_string()));
    };

    // Hidden courses enroll like missing ones.
    if !course.is_published
        && !policy::authorize(
            &user,
            Action::Read,
            Resource::Course { instructor_id: &course.instructor_id },
        )
    {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let existing = repositories::enrollments::find_by_user_and_course(&mut *tx, &user.id, &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Already enrolled in this course".to_string()));
    }

    let snapshot = repositories::courses::count_lessons(&mut *tx, &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count lessons"))?;

    repositories::enrollments::create(
        &mut *tx,
        repositories::enrollments::CreateEnrollment {
            id: &Uuid::new_v4().to_string(),
            user_id: &user.id,
            course_id: &course.id,
            total_lessons: snapshot as i32,
            enrolled_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create enrollment"))?;

    repositories::courses::increment_students(&mut *tx, &course.id, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update student counter"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(EnrollResponse { message: "Enrolled successfully".to_string(), course_id: course.id }),
    ))
}

pub(in crate::api::courses) async fn update_progress(
    axum::extract::Path((course_id, lesson_id)): axum::extract::Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<ProgressUpdate>,
) -> Result<Json<ProgressResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let enrollment =
        repositories::enrollments::lock_by_user_and_course(&mut *tx, &user.id, &course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch enrollment"))?;

    let Some(enrollment) = enrollment else {
        return Err(ApiError::NotFound("Not enrolled in this course".to_string()));
    };

    repositories::enrollments::upsert_progress(
        &mut *tx,
        repositories::enrollments::UpsertProgress {
            id: &Uuid::new_v4().to_string(),
            enrollment_id: &enrollment.id,
            lesson_id: &lesson_id,
            completed: payload.completed,
            watched_seconds: payload.watched_seconds,
            now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save progress"))?;

    // Recount instead of incrementing so repeating a lesson cannot inflate
    // the counter.
    let completed = repositories::enrollments::count_completed(&mut *tx, &enrollment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count completed lessons"))?;

    let percent = progress::percent_complete(completed, enrollment.total_lessons as i64);

    repositories::enrollments::update_counters(
        &mut *tx,
        &enrollment.id,
        completed as i32,
        percent,
        now,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update enrollment counters"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok(Json(ProgressResponse { progress: percent, completed_lessons: completed as i32 }))
}

pub(in crate::api::courses) async fn list_enrolled(
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<EnrolledCourseResponse>>, ApiError> {
    let rows = repositories::enrollments::list_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;

    Ok(Json(rows.into_iter().map(EnrolledCourseResponse::from_db).collect()))
}
