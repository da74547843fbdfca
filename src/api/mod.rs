pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod courses;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod pagination;
pub(crate) mod quizzes;
pub(crate) mod router;
pub(crate) mod student;
pub(crate) mod teacher;
pub(crate) mod validation;
