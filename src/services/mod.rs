pub(crate) mod course_content;
pub(crate) mod grading;
pub(crate) mod policy;
pub(crate) mod progress;
pub(crate) mod ratings;
