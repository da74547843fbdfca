use axum::{extract::Query, Json};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::quiz::{QuizResponse, QuizSummaryResponse};
use crate::services::policy::{self, Action, Resource};

use super::super::helpers;
use super::super::queries::ListQuizzesQuery;

pub(in crate::api::quizzes) async fn list_quizzes(
    CurrentUser(_user): CurrentUser,
    state: axum::extract::State<AppState>,
    Query(params): Query<ListQuizzesQuery>,
) -> Result<Json<PaginatedResponse<QuizSummaryResponse>>, ApiError> {
    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);

    let list_params = repositories::quizzes::ListQuizzes {
        course_id: params.course_id,
        difficulty: params.difficulty,
        skip,
        limit,
    };

    let rows = repositories::quizzes::list_published(state.db(), &list_params)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;
    let total_count = repositories::quizzes::count_published(state.db(), &list_params)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count quizzes"))?;

    let items = rows.into_iter().map(QuizSummaryResponse::from_db).collect();

    Ok(Json(PaginatedResponse { items, total_count, skip, limit }))
}

pub(in crate::api::quizzes) async fn list_mine(
    CurrentTeacher(teacher): CurrentTeacher,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<QuizSummaryResponse>>, ApiError> {
    let rows = repositories::quizzes::list_by_creator(state.db(), &teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;

    Ok(Json(rows.into_iter().map(QuizSummaryResponse::from_db).collect()))
}

pub(in crate::api::quizzes) async fn get_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = helpers::fetch_quiz(&state, &quiz_id).await?;

    let can_manage =
        policy::authorize(&user, Action::Read, Resource::Quiz { created_by: &quiz.created_by });

    if !quiz.is_published && !can_manage {
        return Err(ApiError::Forbidden("Access denied"));
    }

    // Correct answers stay server-side for everyone but the quiz owner and
    // admins.
    let detail = helpers::quiz_detail(&state, quiz, can_manage).await?;

    Ok(Json(detail))
}
