use sqlx::PgPool;
use sqlx::{Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::{Quiz, QuizQuestion};
use crate::db::types::DifficultyLevel;

const COLUMNS: &str = "\
    id, title, description, course_id, created_by, difficulty, duration_minutes, \
    passing_score, is_published, created_at, updated_at";

const QUESTION_COLUMNS: &str =
    "id, quiz_id, text, options, correct_answer, explanation, points, position";

const SUMMARY_SELECT: &str = "\
    SELECT q.id, q.title, q.description, q.course_id, c.title AS course_title, \
           q.created_by, q.difficulty, q.duration_minutes, q.passing_score, \
           q.is_published, q.created_at, q.updated_at, \
           (SELECT COUNT(*) FROM quiz_questions WHERE quiz_id = q.id) AS question_count \
    FROM quizzes q LEFT JOIN courses c ON c.id = q.course_id";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateQuiz<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: Option<String>,
    pub course_id: Option<String>,
    pub created_by: &'a str,
    pub difficulty: DifficultyLevel,
    pub duration_minutes: i32,
    pub passing_score: i32,
    pub is_published: bool,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateQuiz<'_>,
) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (
            id, title, description, course_id, created_by, difficulty,
            duration_minutes, passing_score, is_published, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
        RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.course_id)
    .bind(params.created_by)
    .bind(params.difficulty)
    .bind(params.duration_minutes)
    .bind(params.passing_score)
    .bind(params.is_published)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(executor)
    .await
}

pub(crate) struct UpdateQuiz {
    pub title: Option<String>,
    pub description: Option<String>,
    pub course_id: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
    pub duration_minutes: Option<i32>,
    pub passing_score: Option<i32>,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    params: UpdateQuiz,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE quizzes SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            course_id = COALESCE($3, course_id),
            difficulty = COALESCE($4, difficulty),
            duration_minutes = COALESCE($5, duration_minutes),
            passing_score = COALESCE($6, passing_score),
            updated_at = $7
         WHERE id = $8",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.course_id)
    .bind(params.difficulty)
    .bind(params.duration_minutes)
    .bind(params.passing_score)
    .bind(params.updated_at)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn set_published(
    pool: &PgPool,
    id: &str,
    is_published: bool,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE quizzes SET is_published = $1, updated_at = $2 WHERE id = $3")
        .bind(is_published)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM quizzes WHERE id = $1").bind(id).execute(executor).await?;
    Ok(())
}

pub(crate) struct CreateQuestion<'a> {
    pub id: &'a str,
    pub quiz_id: &'a str,
    pub text: &'a str,
    pub options: sqlx::types::Json<&'a Vec<String>>,
    pub correct_answer: &'a str,
    pub explanation: Option<String>,
    pub points: i32,
    pub position: i32,
}

pub(crate) async fn insert_question(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateQuestion<'_>,
) -> Result<QuizQuestion, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(&format!(
        "INSERT INTO quiz_questions (
            id, quiz_id, text, options, correct_answer, explanation, points, position
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {QUESTION_COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.quiz_id)
    .bind(params.text)
    .bind(params.options)
    .bind(params.correct_answer)
    .bind(params.explanation)
    .bind(params.points)
    .bind(params.position)
    .fetch_one(executor)
    .await
}

pub(crate) async fn delete_questions(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn list_questions(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: &str,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM quiz_questions WHERE quiz_id = $1 ORDER BY position"
    ))
    .bind(quiz_id)
    .fetch_all(executor)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct QuizSummaryRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) course_id: Option<String>,
    pub(crate) course_title: Option<String>,
    pub(crate) created_by: String,
    pub(crate) difficulty: DifficultyLevel,
    pub(crate) duration_minutes: i32,
    pub(crate) passing_score: i32,
    pub(crate) is_published: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) question_count: i64,
}

pub(crate) struct ListQuizzes {
    pub course_id: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
    pub skip: i64,
    pub limit: i64,
}

pub(crate) async fn list_published(
    pool: &PgPool,
    params: &ListQuizzes,
) -> Result<Vec<QuizSummaryRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("{SUMMARY_SELECT} WHERE q.is_published"));
    push_filters(&mut builder, params);
    builder.push(" ORDER BY q.created_at DESC OFFSET ");
    builder.push_bind(params.skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(params.limit.clamp(1, 1000));
    builder.build_query_as::<QuizSummaryRow>().fetch_all(pool).await
}

pub(crate) async fn count_published(
    pool: &PgPool,
    params: &ListQuizzes,
) -> Result<i64, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM quizzes q WHERE q.is_published");
    push_filters(&mut builder, params);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, params: &ListQuizzes) {
    if let Some(course_id) = &params.course_id {
        builder.push(" AND q.course_id = ");
        builder.push_bind(course_id.clone());
    }
    if let Some(difficulty) = params.difficulty {
        builder.push(" AND q.difficulty = ");
        builder.push_bind(difficulty);
    }
}

pub(crate) async fn list_by_creator(
    pool: &PgPool,
    created_by: &str,
) -> Result<Vec<QuizSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, QuizSummaryRow>(&format!(
        "{SUMMARY_SELECT} WHERE q.created_by = $1 ORDER BY q.created_at DESC"
    ))
    .bind(created_by)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_course_title(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT title FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_optional(pool)
        .await
}
