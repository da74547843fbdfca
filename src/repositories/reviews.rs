use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::CourseReview;

const COLUMNS: &str = "id, course_id, user_id, rating, comment, created_at";

pub(crate) async fn exists_for_user(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    user_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id FROM course_reviews WHERE course_id = $1 AND user_id = $2",
    )
    .bind(course_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub(crate) struct CreateReview<'a> {
    pub id: &'a str,
    pub course_id: &'a str,
    pub user_id: &'a str,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateReview<'_>,
) -> Result<CourseReview, sqlx::Error> {
    sqlx::query_as::<_, CourseReview>(&format!(
        "INSERT INTO course_reviews (id, course_id, user_id, rating, comment, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.user_id)
    .bind(params.rating)
    .bind(params.comment)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_ratings(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<Vec<i16>, sqlx::Error> {
    sqlx::query_scalar("SELECT rating FROM course_reviews WHERE course_id = $1")
        .bind(course_id)
        .fetch_all(executor)
        .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ReviewWithAuthorRow {
    pub(crate) id: String,
    pub(crate) rating: i16,
    pub(crate) comment: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) user_id: String,
    pub(crate) author_name: String,
    pub(crate) author_avatar: Option<String>,
}

pub(crate) async fn list_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<ReviewWithAuthorRow>, sqlx::Error> {
    sqlx::query_as::<_, ReviewWithAuthorRow>(
        "SELECT r.id,
                r.rating,
                r.comment,
                r.created_at,
                r.user_id,
                u.full_name AS author_name,
                u.avatar AS author_avatar
         FROM course_reviews r
         JOIN users u ON u.id = r.user_id
         WHERE r.course_id = $1
         ORDER BY r.created_at DESC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}
