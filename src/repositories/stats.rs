use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::types::UserRole;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AdminTotalsRow {
    pub(crate) total_users: i64,
    pub(crate) total_students: i64,
    pub(crate) total_teachers: i64,
    pub(crate) total_courses: i64,
    pub(crate) published_courses: i64,
    pub(crate) total_quizzes: i64,
    pub(crate) total_enrollments: i64,
    pub(crate) total_revenue: f64,
}

pub(crate) async fn admin_totals(pool: &PgPool) -> Result<AdminTotalsRow, sqlx::Error> {
    sqlx::query_as::<_, AdminTotalsRow>(
        "SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM users WHERE role = 'student') AS total_students,
            (SELECT COUNT(*) FROM users WHERE role = 'teacher') AS total_teachers,
            (SELECT COUNT(*) FROM courses) AS total_courses,
            (SELECT COUNT(*) FROM courses WHERE is_published) AS published_courses,
            (SELECT COUNT(*) FROM quizzes) AS total_quizzes,
            (SELECT COUNT(*) FROM enrollments) AS total_enrollments,
            (SELECT COALESCE(SUM(price * students_enrolled), 0) FROM courses) AS total_revenue",
    )
    .fetch_one(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RecentUserRow {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) avatar: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn recent_users(pool: &PgPool, limit: i64) -> Result<Vec<RecentUserRow>, sqlx::Error> {
    sqlx::query_as::<_, RecentUserRow>(
        "SELECT id, full_name, email, role, avatar, created_at
         FROM users ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TopCourseRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) thumbnail: Option<String>,
    pub(crate) students_enrolled: i32,
    pub(crate) rating: f64,
    pub(crate) price: f64,
}

pub(crate) async fn top_courses(pool: &PgPool, limit: i64) -> Result<Vec<TopCourseRow>, sqlx::Error> {
    sqlx::query_as::<_, TopCourseRow>(
        "SELECT id, title, thumbnail, students_enrolled, rating, price
         FROM courses ORDER BY students_enrolled DESC, created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TeacherOverviewRow {
    pub(crate) total_courses: i64,
    pub(crate) published_courses: i64,
    pub(crate) total_students: i64,
    pub(crate) total_quizzes: i64,
    pub(crate) quiz_attempts: i64,
    pub(crate) total_revenue: f64,
    pub(crate) average_rating: Option<f64>,
}

pub(crate) async fn teacher_overview(
    pool: &PgPool,
    instructor_id: &str,
) -> Result<TeacherOverviewRow, sqlx::Error> {
    sqlx::query_as::<_, TeacherOverviewRow>(
        "SELECT
            (SELECT COUNT(*) FROM courses WHERE instructor_id = $1) AS total_courses,
            (SELECT COUNT(*) FROM courses WHERE instructor_id = $1 AND is_published)
                AS published_courses,
            (SELECT COALESCE(SUM(students_enrolled), 0) FROM courses WHERE instructor_id = $1)
                AS total_students,
            (SELECT COUNT(*) FROM quizzes WHERE created_by = $1) AS total_quizzes,
            (SELECT COUNT(*) FROM quiz_results r
                WHERE r.quiz_id IN (SELECT id FROM quizzes WHERE created_by = $1)) AS quiz_attempts,
            (SELECT COALESCE(SUM(price * students_enrolled), 0) FROM courses WHERE instructor_id = $1)
                AS total_revenue,
            (SELECT AVG(rating) FROM courses WHERE instructor_id = $1 AND total_ratings > 0)
                AS average_rating",
    )
    .bind(instructor_id)
    .fetch_one(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StudentOverviewRow {
    pub(crate) courses_enrolled: i64,
    pub(crate) completed_courses: i64,
    pub(crate) quizzes_taken: i64,
    pub(crate) average_score: Option<f64>,
    pub(crate) best_score: Option<i32>,
}

pub(crate) async fn student_overview(
    pool: &PgPool,
    user_id: &str,
) -> Result<StudentOverviewRow, sqlx::Error> {
    sqlx::query_as::<_, StudentOverviewRow>(
        "SELECT
            (SELECT COUNT(*) FROM enrollments WHERE user_id = $1) AS courses_enrolled,
            (SELECT COUNT(*) FROM enrollments WHERE user_id = $1 AND percent_complete = 100)
                AS completed_courses,
            (SELECT COUNT(*) FROM quiz_results WHERE user_id = $1) AS quizzes_taken,
            (SELECT AVG(percentage)::float8 FROM quiz_results WHERE user_id = $1) AS average_score,
            (SELECT MAX(percentage) FROM quiz_results WHERE user_id = $1) AS best_score",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ScoreDistributionRow {
    pub(crate) below_40: i64,
    pub(crate) from_40_to_69: i64,
    pub(crate) from_70_to_89: i64,
    pub(crate) from_90: i64,
}

pub(crate) async fn score_distribution(
    pool: &PgPool,
    user_id: &str,
) -> Result<ScoreDistributionRow, sqlx::Error> {
    sqlx::query_as::<_, ScoreDistributionRow>(
        "SELECT
            COUNT(*) FILTER (WHERE percentage < 40) AS below_40,
            COUNT(*) FILTER (WHERE percentage BETWEEN 40 AND 69) AS from_40_to_69,
            COUNT(*) FILTER (WHERE percentage BETWEEN 70 AND 89) AS from_70_to_89,
            COUNT(*) FILTER (WHERE percentage >= 90) AS from_90
         FROM quiz_results WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}
