use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::types::UserRole;
use crate::repositories::enrollments::CourseStudentRow;
use crate::repositories::stats::{
    AdminTotalsRow, RecentUserRow, ScoreDistributionRow, StudentOverviewRow, TeacherOverviewRow,
    TopCourseRow,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdminTotals {
    pub(crate) total_users: i64,
    pub(crate) total_students: i64,
    pub(crate) total_teachers: i64,
    pub(crate) total_courses: i64,
    pub(crate) published_courses: i64,
    pub(crate) total_quizzes: i64,
    pub(crate) total_enrollments: i64,
    pub(crate) total_revenue: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecentUserResponse {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) avatar: Option<String>,
    pub(crate) created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TopCourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) thumbnail: Option<String>,
    pub(crate) students_enrolled: i32,
    pub(crate) rating: f64,
    pub(crate) price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdminStatsResponse {
    pub(crate) stats: AdminTotals,
    pub(crate) recent_users: Vec<RecentUserResponse>,
    pub(crate) top_courses: Vec<TopCourseResponse>,
}

impl AdminStatsResponse {
    pub(crate) fn from_db(
        totals: AdminTotalsRow,
        recent_users: Vec<RecentUserRow>,
        top_courses: Vec<TopCourseRow>,
    ) -> Self {
        Self {
            stats: AdminTotals {
                total_users: totals.total_users,
                total_students: totals.total_students,
                total_teachers: totals.total_teachers,
                total_courses: totals.total_courses,
                published_courses: totals.published_courses,
                total_quizzes: totals.total_quizzes,
                total_enrollments: totals.total_enrollments,
                total_revenue: totals.total_revenue,
            },
            recent_users: recent_users
                .into_iter()
                .map(|user| RecentUserResponse {
                    id: user.id,
                    full_name: user.full_name,
                    email: user.email,
                    role: user.role,
                    avatar: user.avatar,
                    created_at: format_primitive(user.created_at),
                })
                .collect(),
            top_courses: top_courses
                .into_iter()
                .map(|course| TopCourseResponse {
                    id: course.id,
                    title: course.title,
                    thumbnail: course.thumbnail,
                    students_enrolled: course.students_enrolled,
                    rating: course.rating,
                    price: course.price,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeacherStatsResponse {
    pub(crate) total_courses: i64,
    pub(crate) published_courses: i64,
    pub(crate) total_students: i64,
    pub(crate) total_quizzes: i64,
    pub(crate) quiz_attempts: i64,
    pub(crate) total_revenue: f64,
    /// Mean rating over the teacher's rated courses, one decimal; 0 when
    /// nothing is rated yet.
    pub(crate) average_rating: f64,
}

impl TeacherStatsResponse {
    pub(crate) fn from_db(row: TeacherOverviewRow) -> Self {
        Self {
            total_courses: row.total_courses,
            published_courses: row.published_courses,
            total_students: row.total_students,
            total_quizzes: row.total_quizzes,
            quiz_attempts: row.quiz_attempts,
            total_revenue: row.total_revenue.round(),
            average_rating: row.average_rating.map(|avg| (avg * 10.0).round() / 10.0).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreBucket {
    pub(crate) range: String,
    pub(crate) count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentStatsResponse {
    pub(crate) courses_enrolled: i64,
    pub(crate) completed_courses: i64,
    pub(crate) quizzes_taken: i64,
    pub(crate) average_score: i64,
    pub(crate) best_score: i32,
    pub(crate) score_distribution: Vec<ScoreBucket>,
}

impl StudentStatsResponse {
    pub(crate) fn from_db(overview: StudentOverviewRow, distribution: ScoreDistributionRow) -> Self {
        Self {
            courses_enrolled: overview.courses_enrolled,
            completed_courses: overview.completed_courses,
            quizzes_taken: overview.quizzes_taken,
            average_score: overview.average_score.map(|avg| avg.round() as i64).unwrap_or(0),
            best_score: overview.best_score.unwrap_or(0),
            score_distribution: vec![
                ScoreBucket { range: "0-39".to_string(), count: distribution.below_40 },
                ScoreBucket { range: "40-69".to_string(), count: distribution.from_40_to_69 },
                ScoreBucket { range: "70-89".to_string(), count: distribution.from_70_to_89 },
                ScoreBucket { range: "90-100".to_string(), count: distribution.from_90 },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CourseStudentResponse {
    pub(crate) user_id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) avatar: Option<String>,
    pub(crate) enrolled_at: String,
    pub(crate) completed_lessons: i32,
    pub(crate) percent_complete: i32,
}

impl CourseStudentResponse {
    pub(crate) fn from_db(row: CourseStudentRow) -> Self {
        Self {
            user_id: row.user_id,
            full_name: row.full_name,
            email: row.email,
            avatar: row.avatar,
            enrolled_at: format_primitive(row.enrolled_at),
            completed_lessons: row.completed_lessons,
            percent_complete: row.percent_complete,
        }
    }
}
