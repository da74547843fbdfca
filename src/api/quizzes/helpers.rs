use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::models::{Quiz, QuizQuestion};
use crate::repositories;
use crate::schemas::quiz::{QuestionCreate, QuestionResponse, QuizResponse};

pub(super) async fn fetch_quiz(state: &AppState, quiz_id: &str) -> Result<Quiz, ApiError> {
    repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))
}

/// Writes the question list in payload order. The correct answer has to be
/// one of the offered options; grading compares exact strings, so anything
/// else would make the question unanswerable.
pub(super) async fn insert_questions(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    quiz_id: &str,
    questions: Vec<QuestionCreate>,
) -> Result<Vec<QuizQuestion>, ApiError> {
    let mut stored = Vec::new();

    for (index, question) in questions.into_iter().enumerate() {
        if !question.options.contains(&question.correct_answer) {
            return Err(ApiError::BadRequest(format!(
                "correct_answer must be one of the options (question {})",
                index + 1
            )));
        }

        let row = repositories::quizzes::insert_question(
            &mut **tx,
            repositories::quizzes::CreateQuestion {
                id: &Uuid::new_v4().to_string(),
                quiz_id,
                text: &question.text,
                options: sqlx::types::Json(&question.options),
                correct_answer: &question.correct_answer,
                explanation: question.explanation.clone(),
                points: question.points,
                position: index as i32 + 1,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

        stored.push(row);
    }

    Ok(stored)
}

pub(super) async fn quiz_detail(
    state: &AppState,
    quiz: Quiz,
    include_answers: bool,
) -> Result<QuizResponse, ApiError> {
    let course_title = match quiz.course_id.as_deref() {
        Some(course_id) => repositories::quizzes::find_course_title(state.db(), course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch course title"))?,
        None => None,
    };

    let questions = repositories::quizzes::list_questions(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch questions"))?
        .into_iter()
        .map(|question| QuestionResponse::from_db(question, include_answers))
        .collect();

    Ok(QuizResponse::from_db(quiz, course_title, questions))
}

/// The linked course is optional but has to exist when given.
pub(super) async fn ensure_course_exists(
    state: &AppState,
    course_id: Option<&str>,
) -> Result<(), ApiError> {
    if let Some(course_id) = course_id {
        let title = repositories::quizzes::find_course_title(state.db(), course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;
        if title.is_none() {
            return Err(ApiError::BadRequest("Linked course does not exist".to_string()));
        }
    }
    Ok(())
}
