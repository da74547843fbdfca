use std::collections::HashMap;

use crate::db::models::{AnswerDetail, QuizQuestion};

/// Placeholder recorded in the answer breakdown when the submission carries
/// no response for a question.
pub(crate) const NOT_ANSWERED: &str = "Not answered";

pub(crate) struct GradedAttempt {
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) percentage: i32,
    pub(crate) details: Vec<AnswerDetail>,
}

/// Grades a submission against the stored questions.
///
/// Every question counts for exactly one point and an answer matches only on
/// exact, case-sensitive equality with the stored correct answer. Responses
/// keyed by unknown question ids are ignored. The returned breakdown is a
/// self-contained snapshot that stays readable after the quiz is edited.
pub(crate) fn grade(
    questions: &[QuizQuestion],
    responses: &HashMap<String, String>,
) -> GradedAttempt {
    let mut score = 0;
    let mut details = Vec::with_capacity(questions.len());

    for question in questions {
        let user_answer = responses.get(&question.id);
        let correct = user_answer.is_some_and(|answer| *answer == question.correct_answer);
        if correct {
            score += 1;
        }
        details.push(AnswerDetail {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            user_answer: user_answer.cloned().unwrap_or_else(|| NOT_ANSWERED.to_string()),
            correct_answer: question.correct_answer.clone(),
            correct,
        });
    }

    let total = questions.len() as i32;
    GradedAttempt { score, total, percentage: percentage(score, total), details }
}

/// Score as a whole percentage; an empty quiz grades to 0.
pub(crate) fn percentage(score: i32, total: i32) -> i32 {
    if total <= 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as i32
}
