use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::types::CourseLevel;

pub(crate) async fn exists(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM wishlist_items WHERE user_id = $1 AND course_id = $2)",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn add(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    course_id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO wishlist_items (user_id, course_id, added_at)
         VALUES ($1,$2,$3) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(course_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn remove(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND course_id = $2")
        .bind(user_id)
        .bind(course_id)
        .execute(executor)
        .await?;
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct WishlistCourseRow {
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) subtitle: Option<String>,
    pub(crate) thumbnail: Option<String>,
    pub(crate) category: String,
    pub(crate) level: CourseLevel,
    pub(crate) price: f64,
    pub(crate) is_free: bool,
    pub(crate) rating: f64,
    pub(crate) instructor_name: String,
    pub(crate) added_at: PrimitiveDateTime,
}

pub(crate) async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<WishlistCourseRow>, sqlx::Error> {
    sqlx::query_as::<_, WishlistCourseRow>(
        "SELECT w.course_id,
                c.title,
                c.subtitle,
                c.thumbnail,
                c.category,
                c.level,
                c.price,
                c.is_free,
                c.rating,
                u.full_name AS instructor_name,
                w.added_at
         FROM wishlist_items w
         JOIN courses c ON c.id = w.course_id
         JOIN users u ON u.id = c.instructor_id
         WHERE w.user_id = $1
         ORDER BY w.added_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
