use sqlx::PgPool;

use crate::db::models::{Course, CourseLesson, CourseSection};
use crate::db::types::{CourseLevel, LessonKind};

const COLUMNS: &str = "\
    id, title, subtitle, description, instructor_id, category, level, language, \
    price, is_free, thumbnail, rating, total_ratings, students_enrolled, \
    total_lessons, total_duration_minutes, is_published, is_featured, \
    created_at, updated_at";

const SECTION_COLUMNS: &str = "id, course_id, title, position";

const LESSON_COLUMNS: &str =
    "id, section_id, course_id, title, kind, content, duration_minutes, position, is_preview";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(id)
        .fetch_one(executor)
        .await
}

pub(crate) struct CreateCourse<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub subtitle: Option<String>,
    pub description: &'a str,
    pub instructor_id: &'a str,
    pub category: &'a str,
    pub level: CourseLevel,
    pub language: String,
    pub price: f64,
    pub is_free: bool,
    pub thumbnail: Option<String>,
    pub total_lessons: i32,
    pub total_duration_minutes: i32,
    pub is_published: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateCourse<'_>,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, title, subtitle, description, instructor_id, category, level, language,
            price, is_free, thumbnail, total_lessons, total_duration_minutes,
            is_published, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.subtitle)
    .bind(params.description)
    .bind(params.instructor_id)
    .bind(params.category)
    .bind(params.level)
    .bind(params.language)
    .bind(params.price)
    .bind(params.is_free)
    .bind(params.thumbnail)
    .bind(params.total_lessons)
    .bind(params.total_duration_minutes)
    .bind(params.is_published)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(executor)
    .await
}

pub(crate) struct UpdateCourse {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub language: Option<String>,
    pub price: Option<f64>,
    pub is_free: Option<bool>,
    pub thumbnail: Option<String>,
    pub total_lessons: Option<i32>,
    pub total_duration_minutes: Option<i32>,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    params: UpdateCourse,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET
            title = COALESCE($1, title),
            subtitle = COALESCE($2, subtitle),
            description = COALESCE($3, description),
            category = COALESCE($4, category),
            level = COALESCE($5, level),
            language = COALESCE($6, language),
            price = COALESCE($7, price),
            is_free = COALESCE($8, is_free),
            thumbnail = COALESCE($9, thumbnail),
            total_lessons = COALESCE($10, total_lessons),
            total_duration_minutes = COALESCE($11, total_duration_minutes),
            updated_at = $12
         WHERE id = $13",
    )
    .bind(params.title)
    .bind(params.subtitle)
    .bind(params.description)
    .bind(params.category)
    .bind(params.level)
    .bind(params.language)
    .bind(params.price)
    .bind(params.is_free)
    .bind(params.thumbnail)
    .bind(params.total_lessons)
    .bind(params.total_duration_minutes)
    .bind(params.updated_at)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM courses WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}

pub(crate) async fn set_published(
    pool: &PgPool,
    id: &str,
    is_published: bool,
    now: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET is_published = $1, updated_at = $2 WHERE id = $3")
        .bind(is_published)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn set_featured(
    pool: &PgPool,
    id: &str,
    is_featured: bool,
    now: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET is_featured = $1, updated_at = $2 WHERE id = $3")
        .bind(is_featured)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn increment_students(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    now: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET students_enrolled = students_enrolled + 1, updated_at = $1 WHERE id = $2",
    )
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn update_rating(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    rating: f64,
    total_ratings: i32,
    now: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET rating = $1, total_ratings = $2, updated_at = $3 WHERE id = $4")
        .bind(rating)
        .bind(total_ratings)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn list_published(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses WHERE is_published
         ORDER BY created_at DESC OFFSET $1 LIMIT $2"
    ))
    .bind(skip.max(0))
    .bind(limit.clamp(1, 1000))
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_published(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE is_published").fetch_one(pool).await
}

pub(crate) async fn list_by_instructor(
    pool: &PgPool,
    instructor_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses WHERE instructor_id = $1 ORDER BY created_at DESC"
    ))
    .bind(instructor_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_featured(pool: &PgPool, limit: i64) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses WHERE is_published AND is_featured
         ORDER BY students_enrolled DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CategoryCount {
    pub(crate) category: String,
    pub(crate) count: i64,
}

pub(crate) async fn categories(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
    sqlx::query_as::<_, CategoryCount>(
        "SELECT category, COUNT(*) AS count FROM courses WHERE is_published
         GROUP BY category ORDER BY count DESC, category",
    )
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateSection<'a> {
    pub id: &'a str,
    pub course_id: &'a str,
    pub title: &'a str,
    pub position: i32,
}

pub(crate) async fn insert_section(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateSection<'_>,
) -> Result<CourseSection, sqlx::Error> {
    sqlx::query_as::<_, CourseSection>(&format!(
        "INSERT INTO course_sections (id, course_id, title, position)
         VALUES ($1,$2,$3,$4) RETURNING {SECTION_COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.position)
    .fetch_one(executor)
    .await
}

pub(crate) struct CreateLesson<'a> {
    pub id: &'a str,
    pub section_id: &'a str,
    pub course_id: &'a str,
    pub title: &'a str,
    pub kind: LessonKind,
    pub content: Option<String>,
    pub duration_minutes: i32,
    pub position: i32,
    pub is_preview: bool,
}

pub(crate) async fn insert_lesson(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateLesson<'_>,
) -> Result<CourseLesson, sqlx::Error> {
    sqlx::query_as::<_, CourseLesson>(&format!(
        "INSERT INTO course_lessons (
            id, section_id, course_id, title, kind, content,
            duration_minutes, position, is_preview
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
         RETURNING {LESSON_COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.section_id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.kind)
    .bind(params.content)
    .bind(params.duration_minutes)
    .bind(params.position)
    .bind(params.is_preview)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_sections(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<CourseSection>, sqlx::Error> {
    sqlx::query_as::<_, CourseSection>(&format!(
        "SELECT {SECTION_COLUMNS} FROM course_sections WHERE course_id = $1 ORDER BY position"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_lessons(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<CourseLesson>, sqlx::Error> {
    sqlx::query_as::<_, CourseLesson>(&format!(
        "SELECT {LESSON_COLUMNS} FROM course_lessons WHERE course_id = $1 ORDER BY position"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

// Lessons go with their sections through the FK cascade.
pub(crate) async fn delete_sections(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM course_sections WHERE course_id = $1")
        .bind(course_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn count_lessons(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM course_lessons WHERE course_id = $1")
        .bind(course_id)
        .fetch_one(executor)
        .await
}
