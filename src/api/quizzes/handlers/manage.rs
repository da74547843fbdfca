use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::quiz::{
    QuestionResponse, QuizCreate, QuizPublishResponse, QuizResponse, QuizUpdate,
};
use crate::services::policy::{Action, Resource};

use super::super::helpers;

pub(in crate::api::quizzes) async fn create_quiz(
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(axum::http::StatusCode, Json<QuizResponse>), ApiError> {
    require(&user, Action::Create, Resource::Quiz { created_by: &user.id })?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    helpers::ensure_course_exists(&state, payload.course_id.as_deref()).await?;

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let quiz_id = Uuid::new_v4().to_string();
    let quiz = repositories::quizzes::create(
        &mut *tx,
        repositories::quizzes::CreateQuiz {
            id: &quiz_id,
            title: &payload.title,
            description: payload.description.clone(),
            course_id: payload.course_id.clone(),
            created_by: &user.id,
            difficulty: payload.difficulty,
            duration_minutes: payload.duration_minutes,
            passing_score: payload.passing_score,
            is_published: payload.is_published,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    let questions = helpers::insert_questions(&mut tx, &quiz.id, payload.questions).await?;
    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    let course_title = match quiz.course_id.as_deref() {
        Some(course_id) => repositories::quizzes::find_course_title(state.db(), course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch course title"))?,
        None => None,
    };

    let question_responses = questions
        .into_iter()
        .map(|question| QuestionResponse::from_db(question, true))
        .collect();

    Ok((
        axum::http::StatusCode::CREATED,
        Json(QuizResponse::from_db(quiz, course_title, question_responses)),
    ))
}

pub(in crate::api::quizzes) async fn update_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizUpdate>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = helpers::fetch_quiz(&state, &quiz_id).await?;
    require(&user, Action::Update, Resource::Quiz { created_by: &quiz.created_by })?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    helpers::ensure_course_exists(&state, payload.course_id.as_deref()).await?;

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    repositories::quizzes::update(
        &mut *tx,
        &quiz_id,
        repositories::quizzes::UpdateQuiz {
            title: payload.title,
            description: payload.description,
            course_id: payload.course_id,
            difficulty: payload.difficulty,
            duration_minutes: payload.duration_minutes,
            passing_score: payload.passing_score,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update quiz"))?;

    if let Some(questions) = payload.questions {
        repositories::quizzes::delete_questions(&mut *tx, &quiz_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to clear questions"))?;
        helpers::insert_questions(&mut tx, &quiz_id, questions).await?;
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    let updated = helpers::fetch_quiz(&state, &quiz_id).await?;
    let detail = helpers::quiz_detail(&state, updated, true).await?;

    Ok(Json(detail))
}

pub(in crate::api::quizzes) async fn delete_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let quiz = helpers::fetch_quiz(&state, &quiz_id).await?;
    require(&user, Action::Delete, Resource::Quiz { created_by: &quiz.created_by })?;

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    // Results reference the quiz by plain text id, so they do not cascade;
    // remove them together with the quiz.
    let removed_results = repositories::results::delete_by_quiz(&mut *tx, &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz results"))?;

    repositories::quizzes::delete_by_id(&mut *tx, &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    tracing::info!(
        user_id = %user.id,
        quiz_id = %quiz_id,
        removed_results,
        action = "quiz_delete",
        "Quiz deleted"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub(in crate::api::quizzes) async fn toggle_publish(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<QuizPublishResponse>, ApiError> {
    let quiz = helpers::fetch_quiz(&state, &quiz_id).await?;
    require(&user, Action::Publish, Resource::Quiz { created_by: &quiz.created_by })?;

    let is_published = !quiz.is_published;
    repositories::quizzes::set_published(state.db(), &quiz_id, is_published, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update quiz"))?;

    let message = if is_published { "Quiz published" } else { "Quiz unpublished" }.to_string();

    Ok(Json(QuizPublishResponse { message, is_published }))
}
