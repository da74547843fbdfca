use axum::Json;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::quiz::{QuizSubmission, SubmitQuizResponse};
use crate::services::grading;
use crate::services::policy::{self, Action, Resource};

use super::super::helpers;

pub(in crate::api::quizzes) async fn submit_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizSubmission>,
) -> Result<(axum::http::StatusCode, Json<SubmitQuizResponse>), ApiError> {
    let quiz = helpers::fetch_quiz(&state, &quiz_id).await?;

    if !quiz.is_published
        && !policy::authorize(&user, Action::Read, Resource::Quiz { created_by: &quiz.created_by })
    {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let questions = repositories::quizzes::list_questions(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch questions"))?;

    let graded = grading::grade(&questions, &payload.responses);

    // The result row freezes the questions as they stood at submission time;
    // later quiz edits leave it untouched.
    let result = repositories::results::create(
        state.db(),
        repositories::results::CreateResult {
            id: &Uuid::new_v4().to_string(),
            user_id: &user.id,
            quiz_id: &quiz.id,
            score: graded.score,
            total: graded.total,
            percentage: graded.percentage,
            details: sqlx::types::Json(graded.details),
            completed_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to store quiz result"))?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(SubmitQuizResponse {
            result_id: result.id,
            score: result.score,
            total: result.total,
            percentage: result.percentage,
        }),
    ))
}
