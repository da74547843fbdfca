pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod quizzes;
pub(crate) mod results;
pub(crate) mod reviews;
pub(crate) mod stats;
pub(crate) mod users;
pub(crate) mod wishlist;
