use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{AnswerDetail, Quiz, QuizQuestion};
use crate::db::types::DifficultyLevel;
use crate::repositories::quizzes::QuizSummaryRow;
use crate::repositories::results::ResultWithQuizRow;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub(crate) struct QuestionCreate {
    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub(crate) text: String,
    #[validate(length(min = 2, message = "questions need at least two options"))]
    pub(crate) options: Vec<String>,
    #[serde(alias = "correctAnswer")]
    #[validate(length(min = 1, message = "correct_answer must not be empty"))]
    pub(crate) correct_answer: String,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
    #[serde(default = "default_points")]
    #[validate(range(min = 0, message = "points must be non-negative"))]
    pub(crate) points: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "courseId")]
    pub(crate) course_id: Option<String>,
    #[serde(default = "default_difficulty")]
    pub(crate) difficulty: DifficultyLevel,
    #[serde(default = "default_duration")]
    #[serde(alias = "durationMinutes", alias = "duration")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: i32,
    #[serde(default = "default_passing_score")]
    #[serde(alias = "passingScore")]
    #[validate(range(min = 0, max = 100, message = "passing_score must be between 0 and 100"))]
    pub(crate) passing_score: i32,
    #[serde(default)]
    #[serde(alias = "isPublished")]
    pub(crate) is_published: bool,
    #[validate(length(min = 1, message = "quizzes need at least one question"), nested)]
    pub(crate) questions: Vec<QuestionCreate>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "courseId")]
    pub(crate) course_id: Option<String>,
    #[serde(default)]
    pub(crate) difficulty: Option<DifficultyLevel>,
    #[serde(default)]
    #[serde(alias = "durationMinutes", alias = "duration")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: Option<i32>,
    #[serde(default)]
    #[serde(alias = "passingScore")]
    #[validate(range(min = 0, max = 100, message = "passing_score must be between 0 and 100"))]
    pub(crate) passing_score: Option<i32>,
    /// Replaces every stored question when present.
    #[serde(default)]
    #[validate(length(min = 1, message = "quizzes need at least one question"), nested)]
    pub(crate) questions: Option<Vec<QuestionCreate>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionResponse {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) options: Vec<String>,
    /// Present for the quiz owner and admins, null for everyone else.
    pub(crate) correct_answer: Option<String>,
    pub(crate) explanation: Option<String>,
    pub(crate) points: i32,
    pub(crate) position: i32,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: QuizQuestion, include_answers: bool) -> Self {
        Self {
            id: question.id,
            text: question.text,
            options: question.options.0,
            correct_answer: include_answers.then_some(question.correct_answer),
            explanation: if include_answers { question.explanation } else { None },
            points: question.points,
            position: question.position,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizResponse {
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
    pub(crate) question_count: usize,
    pub(crate) questions: Vec<QuestionResponse>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuizResponse {
    pub(crate) fn from_db(
        quiz: Quiz,
        course_title: Option<String>,
        questions: Vec<QuestionResponse>,
    ) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            course_id: quiz.course_id,
            course_title,
            created_by: quiz.created_by,
            difficulty: quiz.difficulty,
            duration_minutes: quiz.duration_minutes,
            passing_score: quiz.passing_score,
            is_published: quiz.is_published,
            question_count: questions.len(),
            questions,
            created_at: format_primitive(quiz.created_at),
            updated_at: format_primitive(quiz.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizSummaryResponse {
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
    pub(crate) question_count: i64,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuizSummaryResponse {
    pub(crate) fn from_db(row: QuizSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            course_id: row.course_id,
            course_title: row.course_title,
            created_by: row.created_by,
            difficulty: row.difficulty,
            duration_minutes: row.duration_minutes,
            passing_score: row.passing_score,
            is_published: row.is_published,
            question_count: row.question_count,
            created_at: format_primitive(row.created_at),
            updated_at: format_primitive(row.updated_at),
        }
    }
}

/// Answers keyed by question id; unanswered questions are simply absent.
#[derive(Debug, Deserialize)]
pub(crate) struct QuizSubmission {
    #[serde(default)]
    pub(crate) responses: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitQuizResponse {
    pub(crate) result_id: String,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) percentage: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizResultResponse {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: Option<String>,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) percentage: i32,
    pub(crate) details: Vec<AnswerDetail>,
    pub(crate) completed_at: String,
}

impl QuizResultResponse {
    pub(crate) fn from_db(row: ResultWithQuizRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            quiz_id: row.quiz_id,
            quiz_title: row.quiz_title,
            score: row.score,
            total: row.total,
            percentage: row.percentage,
            details: row.details.0,
            completed_at: format_primitive(row.completed_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizPublishResponse {
    pub(crate) message: String,
    pub(crate) is_published: bool,
}

fn default_points() -> i32 {
    1
}

fn default_difficulty() -> DifficultyLevel {
    DifficultyLevel::Beginner
}

fn default_duration() -> i32 {
    30
}

fn default_passing_score() -> i32 {
    70
}
