mod handlers;
mod helpers;
mod queries;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_quiz).get(handlers::list_quizzes))
        .route("/mine", get(handlers::list_mine))
        .route(
            "/:quiz_id",
            get(handlers::get_quiz).put(handlers::update_quiz).delete(handlers::delete_quiz),
        )
        .route("/:quiz_id/publish", post(handlers::toggle_publish))
        .route("/:quiz_id/submit", post(handlers::submit_quiz))
}
