mod handlers;
mod helpers;
mod queries;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_course).get(handlers::list_courses))
        .route("/enrolled", get(handlers::list_enrolled))
        .route("/wishlist", get(handlers::list_wishlist))
        .route("/categories", get(handlers::list_categories))
        .route("/featured", get(handlers::list_featured))
        .route(
            "/:course_id",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        .route("/:course_id/publish", post(handlers::toggle_publish))
        .route("/:course_id/feature", post(handlers::toggle_feature))
        .route("/:course_id/enroll", post(handlers::enroll))
        .route("/:course_id/progress/:lesson_id", put(handlers::update_progress))
        .route("/:course_id/review", post(handlers::add_review))
        .route("/:course_id/reviews", get(handlers::list_reviews))
        .route("/:course_id/wishlist", post(handlers::toggle_wishlist))
}

#[cfg(test)]
mod tests;
