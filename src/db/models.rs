use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{CourseLevel, DifficultyLevel, LessonKind, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) avatar: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) headline: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) subtitle: Option<String>,
    pub(crate) description: String,
    pub(crate) instructor_id: String,
    pub(crate) category: String,
    pub(crate) level: CourseLevel,
    pub(crate) language: String,
    pub(crate) price: f64,
    pub(crate) is_free: bool,
    pub(crate) thumbnail: Option<String>,
    pub(crate) rating: f64,
    pub(crate) total_ratings: i32,
    pub(crate) students_enrolled: i32,
    pub(crate) total_lessons: i32,
    pub(crate) total_duration_minutes: i32,
    pub(crate) is_published: bool,
    pub(crate) is_featured: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseSection {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseLesson {
    pub(crate) id: String,
    pub(crate) section_id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) kind: LessonKind,
    pub(crate) content: Option<String>,
    pub(crate) duration_minutes: i32,
    pub(crate) position: i32,
    pub(crate) is_preview: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseReview {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) user_id: String,
    pub(crate) rating: i16,
    pub(crate) comment: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Enrollment {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) course_id: String,
    pub(crate) enrolled_at: PrimitiveDateTime,
    /// Lesson count frozen at enrollment time; course edits do not rewrite it.
    pub(crate) total_lessons: i32,
    pub(crate) completed_lessons: i32,
    pub(crate) percent_complete: i32,
    pub(crate) last_accessed_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct LessonProgress {
    pub(crate) id: String,
    pub(crate) enrollment_id: String,
    pub(crate) lesson_id: String,
    pub(crate) completed: bool,
    pub(crate) watched_seconds: i32,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) course_id: Option<String>,
    pub(crate) created_by: String,
    pub(crate) difficulty: DifficultyLevel,
    pub(crate) duration_minutes: i32,
    pub(crate) passing_score: i32,
    pub(crate) is_published: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuizQuestion {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) text: String,
    pub(crate) options: Json<Vec<String>>,
    pub(crate) correct_answer: String,
    pub(crate) explanation: Option<String>,
    /// Stored per question but not consulted by grading; scoring counts
    /// correct answers.
    pub(crate) points: i32,
    pub(crate) position: i32,
}

/// Per-question snapshot persisted with a result. The quiz may change or
/// disappear later; history keeps what the student actually saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerDetail {
    pub(crate) question_id: String,
    pub(crate) question_text: String,
    pub(crate) user_answer: String,
    pub(crate) correct_answer: String,
    pub(crate) correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuizResult {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) quiz_id: String,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) percentage: i32,
    pub(crate) details: Json<Vec<AnswerDetail>>,
    pub(crate) completed_at: PrimitiveDateTime,
}
