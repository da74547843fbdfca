use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{AnswerDetail, QuizResult};

const COLUMNS: &str = "id, user_id, quiz_id, score, total, percentage, details, completed_at";

const WITH_QUIZ_SELECT: &str = "\
    SELECT r.id, r.user_id, r.quiz_id, q.title AS quiz_title, r.score, r.total, \
           r.percentage, r.details, r.completed_at \
    FROM quiz_results r LEFT JOIN quizzes q ON q.id = r.quiz_id";

pub(crate) struct CreateResult<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub quiz_id: &'a str,
    pub score: i32,
    pub total: i32,
    pub percentage: i32,
    pub details: Json<Vec<AnswerDetail>>,
    pub completed_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateResult<'_>,
) -> Result<QuizResult, sqlx::Error> {
    sqlx::query_as::<_, QuizResult>(&format!(
        "INSERT INTO quiz_results (
            id, user_id, quiz_id, score, total, percentage, details, completed_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.quiz_id)
    .bind(params.score)
    .bind(params.total)
    .bind(params.percentage)
    .bind(params.details)
    .bind(params.completed_at)
    .fetch_one(executor)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ResultWithQuizRow {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: Option<String>,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) percentage: i32,
    pub(crate) details: Json<Vec<AnswerDetail>>,
    pub(crate) completed_at: PrimitiveDateTime,
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<ResultWithQuizRow>, sqlx::Error> {
    sqlx::query_as::<_, ResultWithQuizRow>(&format!("{WITH_QUIZ_SELECT} WHERE r.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_recent_by_user(
    pool: &PgPool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<ResultWithQuizRow>, sqlx::Error> {
    sqlx::query_as::<_, ResultWithQuizRow>(&format!(
        "{WITH_QUIZ_SELECT} WHERE r.user_id = $1 ORDER BY r.completed_at DESC LIMIT $2"
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_user_and_quiz(
    pool: &PgPool,
    user_id: &str,
    quiz_id: &str,
) -> Result<Vec<ResultWithQuizRow>, sqlx::Error> {
    sqlx::query_as::<_, ResultWithQuizRow>(&format!(
        "{WITH_QUIZ_SELECT} WHERE r.user_id = $1 AND r.quiz_id = $2 ORDER BY r.completed_at DESC"
    ))
    .bind(user_id)
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

/// quiz_results has no FK on quiz_id; callers delete results inside the same
/// transaction that removes the quiz.
pub(crate) async fn delete_by_quiz(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: &str,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM quiz_results WHERE quiz_id = $1").bind(quiz_id).execute(executor).await?;
    Ok(result.rows_affected())
}
