use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{Enrollment, LessonProgress};
use crate::db::types::CourseLevel;

const COLUMNS: &str = "\
    id, user_id, course_id, enrolled_at, total_lessons, completed_lessons, \
    percent_complete, last_accessed_at";

const PROGRESS_COLUMNS: &str =
    "id, enrollment_id, lesson_id, completed, watched_seconds, completed_at, updated_at";

pub(crate) async fn find_by_user_and_course(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2"
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

/// Row-locked variant for the progress write path. Serializes concurrent
/// updates against the same enrollment so the recount below never sees a
/// half-applied upsert.
pub(crate) async fn lock_by_user_and_course(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2 FOR UPDATE"
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

pub(crate) struct CreateEnrollment<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub course_id: &'a str,
    pub total_lessons: i32,
    pub enrolled_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateEnrollment<'_>,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (
            id, user_id, course_id, enrolled_at, total_lessons,
            completed_lessons, percent_complete, last_accessed_at
         ) VALUES ($1,$2,$3,$4,$5,0,0,$4)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.course_id)
    .bind(params.enrolled_at)
    .bind(params.total_lessons)
    .fetch_one(executor)
    .await
}

pub(crate) struct UpsertProgress<'a> {
    pub id: &'a str,
    pub enrollment_id: &'a str,
    pub lesson_id: &'a str,
    pub completed: bool,
    pub watched_seconds: i32,
    pub now: PrimitiveDateTime,
}

/// Insert-or-update keyed by (enrollment, lesson). A completion keeps its
/// original timestamp only while the flag stays false; every true write
/// restamps it.
pub(crate) async fn upsert_progress(
    executor: impl sqlx::PgExecutor<'_>,
    params: UpsertProgress<'_>,
) -> Result<LessonProgress, sqlx::Error> {
    sqlx::query_as::<_, LessonProgress>(&format!(
        "INSERT INTO lesson_progress (
            id, enrollment_id, lesson_id, completed, watched_seconds, completed_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5, CASE WHEN $4 THEN $6 END, $6)
         ON CONFLICT (enrollment_id, lesson_id) DO UPDATE SET
            completed = EXCLUDED.completed,
            watched_seconds = EXCLUDED.watched_seconds,
            completed_at = CASE WHEN EXCLUDED.completed
                THEN EXCLUDED.updated_at ELSE lesson_progress.completed_at END,
            updated_at = EXCLUDED.updated_at
         RETURNING {PROGRESS_COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.enrollment_id)
    .bind(params.lesson_id)
    .bind(params.completed)
    .bind(params.watched_seconds)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn count_completed(
    executor: impl sqlx::PgExecutor<'_>,
    enrollment_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM lesson_progress WHERE enrollment_id = $1 AND completed")
        .bind(enrollment_id)
        .fetch_one(executor)
        .await
}

pub(crate) async fn update_counters(
    executor: impl sqlx::PgExecutor<'_>,
    enrollment_id: &str,
    completed_lessons: i32,
    percent_complete: i32,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE enrollments SET
            completed_lessons = $1, percent_complete = $2, last_accessed_at = $3
         WHERE id = $4",
    )
    .bind(completed_lessons)
    .bind(percent_complete)
    .bind(now)
    .bind(enrollment_id)
    .execute(executor)
    .await?;
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EnrolledCourseRow {
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) thumbnail: Option<String>,
    pub(crate) category: String,
    pub(crate) level: CourseLevel,
    pub(crate) rating: f64,
    pub(crate) total_duration_minutes: i32,
    pub(crate) instructor_name: String,
    pub(crate) enrolled_at: PrimitiveDateTime,
    pub(crate) total_lessons: i32,
    pub(crate) completed_lessons: i32,
    pub(crate) percent_complete: i32,
    pub(crate) last_accessed_at: PrimitiveDateTime,
}

pub(crate) async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<EnrolledCourseRow>, sqlx::Error> {
    sqlx::query_as::<_, EnrolledCourseRow>(
        "SELECT e.course_id,
                c.title,
                c.thumbnail,
                c.category,
                c.level,
                c.rating,
                c.total_duration_minutes,
                u.full_name AS instructor_name,
                e.enrolled_at,
                e.total_lessons,
                e.completed_lessons,
                e.percent_complete,
                e.last_accessed_at
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         JOIN users u ON u.id = c.instructor_id
         WHERE e.user_id = $1
         ORDER BY e.enrolled_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CourseStudentRow {
    pub(crate) user_id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) avatar: Option<String>,
    pub(crate) enrolled_at: PrimitiveDateTime,
    pub(crate) completed_lessons: i32,
    pub(crate) percent_complete: i32,
}

pub(crate) async fn list_students_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<CourseStudentRow>, sqlx::Error> {
    sqlx::query_as::<_, CourseStudentRow>(
        "SELECT e.user_id,
                u.full_name,
                u.email,
                u.avatar,
                e.enrolled_at,
                e.completed_lessons,
                e.percent_complete
         FROM enrollments e
         JOIN users u ON u.id = e.user_id
         WHERE e.course_id = $1
         ORDER BY e.enrolled_at DESC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}
