mod list;
mod manage;
mod submit;

pub(super) use list::{get_quiz, list_mine, list_quizzes};
pub(super) use manage::{create_quiz, delete_quiz, toggle_publish, update_quiz};
pub(super) use submit::submit_quiz;
