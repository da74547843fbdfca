use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Course;
use crate::repositories;
use crate::schemas::course::{
    CourseCreate, CourseDetailResponse, CourseResponse, CourseUpdate, FeatureToggleResponse,
    PublishToggleResponse,
};
use crate::services::course_content;
use crate::services::policy::{Action, Resource};

use super::super::helpers;

pub(in crate::api::courses) async fn create_course(
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(axum::http::StatusCode, Json<CourseDetailResponse>), ApiError> {
    require(&user, Action::Create, Resource::Course { instructor_id: &user.id })?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let totals = course_content::tree_totals(&payload.sections);
    let now = primitive_now_utc();

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let course_id = Uuid::new_v4().to_string();
    let course = repositories::courses::create(
        &mut *tx,
        repositories::courses::CreateCourse {
            id: &course_id,
            title: &payload.title,
            subtitle: payload.subtitle.clone(),
            description: &payload.description,
            instructor_id: &user.id,
            category: &payload.category,
            level: payload.level,
            language: payload.language.clone(),
            price: payload.price,
            is_free: payload.is_free,
            thumbnail: payload.thumbnail.clone(),
            total_lessons: totals.lessons,
            total_duration_minutes: totals.duration_minutes,
            is_published: payload.is_published,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    let sections = helpers::insert_sections(&mut tx, &course.id, payload.sections).await?;
    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    let instructor = crate::schemas::course::InstructorBrief {
        id: user.id.clone(),
        full_name: user.full_name.clone(),
        avatar: user.avatar.clone(),
    };

    Ok((
        axum::http::StatusCode::CREATED,
        Json(CourseDetailResponse {
            course: CourseResponse::from_db(course, instructor),
            sections,
        }),
    ))
}

pub(in crate::api::courses) async fn update_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;
    require(&user, Action::Update, Resource::Course { instructor_id: &course.instructor_id })?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    // Replacing the tree recomputes the stored totals in the same transaction;
    // otherwise both stay untouched.
    let mut replaced_sections = None;
    let mut total_lessons = None;
    let mut total_duration_minutes = None;

    if let Some(sections) = payload.sections {
        let totals = course_content::tree_totals(&sections);
        total_lessons = Some(totals.lessons);
        total_duration_minutes = Some(totals.duration_minutes);

        repositories::courses::delete_sections(&mut *tx, &course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to clear sections"))?;
        replaced_sections = Some(helpers::insert_sections(&mut tx, &course_id, sections).await?);
    }

    repositories::courses::update(
        &mut *tx,
        &course_id,
        repositories::courses::UpdateCourse {
            title: payload.title,
            subtitle: payload.subtitle,
            description: payload.description,
            category: payload.category,
            level: payload.level,
            language: payload.language,
            price: payload.price,
            is_free: payload.is_free,
            thumbnail: payload.thumbnail,
            total_lessons,
            total_duration_minutes,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    let updated = repositories::courses::fetch_one_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated course"))?;

    let sections = match replaced_sections {
        Some(sections) => sections,
        None => helpers::load_tree(state.db(), &course_id).await?,
    };
    let instructor = helpers::instructor_brief(state.db(), &updated.instructor_id).await?;

    Ok(Json(CourseDetailResponse {
        course: CourseResponse::from_db(updated, instructor),
        sections,
    }))
}

pub(in crate::api::courses) async fn delete_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let course = fetch_course(&state, &course_id).await?;
    require(&user, Action::Delete, Resource::Course { instructor_id: &course.instructor_id })?;

    // Sections, lessons, reviews, enrollments and progress rows go with the
    // course through FK cascades; quizzes keep their rows with course_id
    // nulled out.
    repositories::courses::delete_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?;

    tracing::info!(
        user_id = %user.id,
        course_id = %course_id,
        action = "course_delete",
        "Course deleted"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub(in crate::api::courses) async fn toggle_publish(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<PublishToggleResponse>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;
    require(&user, Action::Publish, Resource::Course { instructor_id: &course.instructor_id })?;

    let is_published = !course.is_published;
    repositories::courses::set_published(state.db(), &course_id, is_published, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update course"))?;

    let message =
        if is_published { "Course published" } else { "Course unpublished" }.to_string();

    Ok(Json(PublishToggleResponse { message, is_published }))
}

pub(in crate::api::courses) async fn toggle_feature(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<FeatureToggleResponse>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;
    require(&user, Action::Feature, Resource::Course { instructor_id: &course.instructor_id })?;

    let is_featured = !course.is_featured;
    repositories::courses::set_featured(state.db(), &course_id, is_featured, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update course"))?;

    let message = if is_featured { "Course featured" } else { "Course unfeatured" }.to_string();

    Ok(Json(FeatureToggleResponse { message, is_featured }))
}

async fn fetch_course(state: &AppState, course_id: &str) -> Result<Course, ApiError> {
    repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))
}
