use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::{self, CurrentUser};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::quiz::QuizResultResponse;
use crate::schemas::stats::StudentStatsResponse;
use crate::services::policy::{Action, Resource};

const RECENT_RESULTS_LIMIT: i64 = 20;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/results", get(list_results))
        .route("/results/:result_id", get(get_result))
        .route("/quiz-history/:quiz_id", get(quiz_history))
}

async fn stats(
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<StudentStatsResponse>, ApiError> {
    let overview = repositories::stats::student_overview(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to aggregate student stats"))?;
    let distribution = repositories::stats::score_distribution(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to aggregate score distribution"))?;

    Ok(Json(StudentStatsResponse::from_db(overview, distribution)))
}

async fn list_results(
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<QuizResultResponse>>, ApiError> {
    let results =
        repositories::results::list_recent_by_user(state.db(), &user.id, RECENT_RESULTS_LIMIT)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list quiz results"))?;

    Ok(Json(results.into_iter().map(QuizResultResponse::from_db).collect()))
}

async fn get_result(
    axum::extract::Path(result_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<QuizResultResponse>, ApiError> {
    let result = repositories::results::find_by_id(state.db(), &result_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz result"))?;

    let Some(result) = result else {
        return Err(ApiError::NotFound("Result not found".to_string()));
    };

    guards::require(&user, Action::Read, Resource::QuizResult { user_id: &result.user_id })?;

    Ok(Json(QuizResultResponse::from_db(result)))
}

async fn quiz_history(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<QuizResultResponse>>, ApiError> {
    let results = repositories::results::list_by_user_and_quiz(state.db(), &user.id, &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quiz history"))?;

    Ok(Json(results.into_iter().map(QuizResultResponse::from_db).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::test_support;

    #[tokio::test]
    async fn stats_start_at_zero() {
        let ctx = test_support::setup_test_context().await;

        let student = test_support::insert_user(
            ctx.state.db(),
            "student@smartedu.test",
            "Student User",
            UserRole::Student,
        )
        .await;
        let token = test_support::bearer_token(&student.id, ctx.state.settings());

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/student/stats",
                Some(&token),
                None,
            ))
            .await
            .expect("student stats");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["coursesEnrolled"], 0);
        assert_eq!(body["quizzesTaken"], 0);
        assert_eq!(body["averageScore"], 0);
        assert_eq!(body["bestScore"], 0);
        assert_eq!(body["scoreDistribution"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn results_are_visible_to_owner_and_admin_only() {
        let ctx = test_support::setup_test_context().await;

        let teacher = test_support::insert_user(
            ctx.state.db(),
            "teacher@smartedu.test",
            "Teacher User",
            UserRole::Teacher,
        )
        .await;
        let owner = test_support::insert_user(
            ctx.state.db(),
            "owner@smartedu.test",
            "Owner Student",
            UserRole::Student,
        )
        .await;
        let stranger = test_support::insert_user(
            ctx.state.db(),
            "stranger@smartedu.test",
            "Stranger Student",
            UserRole::Student,
        )
        .await;
        let admin = test_support::insert_user(
            ctx.state.db(),
            "admin@smartedu.test",
            "Admin User",
            UserRole::Admin,
        )
        .await;

        let teacher_token = test_support::bearer_token(&teacher.id, ctx.state.settings());
        let quiz_payload = json!({
            "title": "Borrowck Quiz",
            "is_published": true,
            "questions": [
                {"text": "How many mutable borrows?", "options": ["one", "many"], "correct_answer": "one"}
            ]
        });
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/quizzes",
                Some(&teacher_token),
                Some(quiz_payload),
            ))
            .await
            .expect("create quiz");
        let status = response.status();
        let quiz = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {quiz}");
        let quiz_id = quiz["id"].as_str().expect("quiz id").to_string();

        let owner_token = test_support::bearer_token(&owner.id, ctx.state.settings());
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/quizzes/{quiz_id}/submit"),
                Some(&owner_token),
                Some(json!({"responses": {}})),
            ))
            .await
            .expect("submit quiz");
        let status = response.status();
        let submitted = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {submitted}");
        let result_id = submitted["resultId"].as_str().expect("result id").to_string();

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/student/results",
                Some(&owner_token),
                None,
            ))
            .await
            .expect("list results");
        let status = response.status();
        let listed = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {listed}");
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
        assert_eq!(listed[0]["quizTitle"], "Borrowck Quiz");

        let detail_path = format!("/api/v1/student/results/{result_id}");

        let stranger_token = test_support::bearer_token(&stranger.id, ctx.state.settings());
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                &detail_path,
                Some(&stranger_token),
                None,
            ))
            .await
            .expect("result as stranger");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin_token = test_support::bearer_token(&admin.id, ctx.state.settings());
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, &detail_path, Some(&admin_token), None))
            .await
            .expect("result as admin");
        assert_eq!(response.status(), StatusCode::OK);

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                &format!("/api/v1/student/quiz-history/{quiz_id}"),
                Some(&owner_token),
                None,
            ))
            .await
            .expect("quiz history");
        let status = response.status();
        let history = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {history}");
        assert_eq!(history.as_array().map(Vec::len), Some(1));
        assert_eq!(history[0]["score"], 0);
        assert_eq!(history[0]["total"], 1);
    }
}
