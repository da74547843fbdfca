use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::{self, CurrentTeacher};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::course::{CourseResponse, InstructorBrief};
use crate::schemas::quiz::QuizSummaryResponse;
use crate::schemas::stats::{CourseStudentResponse, TeacherStatsResponse};
use crate::services::policy::{Action, Resource};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/courses", get(list_courses))
        .route("/quizzes", get(list_quizzes))
        .route("/courses/:course_id/students", get(course_students))
}

async fn stats(
    CurrentTeacher(user): CurrentTeacher,
    state: axum::extract::State<AppState>,
) -> Result<Json<TeacherStatsResponse>, ApiError> {
    let overview = repositories::stats::teacher_overview(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to aggregate teacher stats"))?;

    Ok(Json(TeacherStatsResponse::from_db(overview)))
}

async fn list_courses(
    CurrentTeacher(user): CurrentTeacher,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_by_instructor(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list teaching courses"))?;

    // Every row belongs to the caller, so the instructor card never needs a lookup.
    let instructor = InstructorBrief {
        id: user.id.clone(),
        full_name: user.full_name.clone(),
        avatar: user.avatar.clone(),
    };

    Ok(Json(
        courses
            .into_iter()
            .map(|course| CourseResponse::from_db(course, instructor.clone()))
            .collect(),
    ))
}

async fn list_quizzes(
    CurrentTeacher(user): CurrentTeacher,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<QuizSummaryResponse>>, ApiError> {
    let quizzes = repositories::quizzes::list_by_creator(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list teaching quizzes"))?;

    Ok(Json(quizzes.into_iter().map(QuizSummaryResponse::from_db).collect()))
}

async fn course_students(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentTeacher(user): CurrentTeacher,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CourseStudentResponse>>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    let Some(course) = course else {
        return Err(ApiError::NotFound("Course not found".to_string()));
    };

    guards::require(&user, Action::Read, Resource::Course { instructor_id: &course.instructor_id })?;

    let students = repositories::enrollments::list_students_for_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list course students"))?;

    Ok(Json(students.into_iter().map(CourseStudentResponse::from_db).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::test_support;

    #[tokio::test]
    async fn teacher_sees_only_own_courses() {
        let ctx = test_support::setup_test_context().await;

        let alice = test_support::insert_user(
            ctx.state.db(),
            "alice@smartedu.test",
            "Alice Teacher",
            UserRole::Teacher,
        )
        .await;
        let bob = test_support::insert_user(
            ctx.state.db(),
            "bob@smartedu.test",
            "Bob Teacher",
            UserRole::Teacher,
        )
        .await;
        test_support::insert_course(ctx.state.db(), &alice.id, "Alice Course", true).await;
        test_support::insert_course(ctx.state.db(), &bob.id, "Bob Course", true).await;

        let token = test_support::bearer_token(&alice.id, ctx.state.settings());
        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/teacher/courses",
                Some(&token),
                None,
            ))
            .await
            .expect("teacher courses");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        let courses = body.as_array().expect("course list");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0]["title"], "Alice Course");
        assert_eq!(courses[0]["instructor"]["fullName"], "Alice Teacher");
    }

    #[tokio::test]
    async fn stats_count_courses_and_quizzes() {
        let ctx = test_support::setup_test_context().await;

        let teacher = test_support::insert_user(
            ctx.state.db(),
            "teacher@smartedu.test",
            "Teacher User",
            UserRole::Teacher,
        )
        .await;
        let token = test_support::bearer_token(&teacher.id, ctx.state.settings());
        test_support::insert_course(ctx.state.db(), &teacher.id, "Published Course", true).await;
        test_support::insert_course(ctx.state.db(), &teacher.id, "Draft Course", false).await;

        let quiz_payload = json!({
            "title": "Ownership Quiz",
            "questions": [
                {"text": "Who owns a Box?", "options": ["caller", "callee"], "correct_answer": "caller"}
            ]
        });
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/quizzes",
                Some(&token),
                Some(quiz_payload),
            ))
            .await
            .expect("create quiz");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/teacher/stats",
                Some(&token),
                None,
            ))
            .await
            .expect("teacher stats");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["totalCourses"], 2);
        assert_eq!(body["publishedCourses"], 1);
        assert_eq!(body["totalQuizzes"], 1);
        assert_eq!(body["averageRating"], 0.0);
    }

    #[tokio::test]
    async fn course_students_requires_ownership() {
        let ctx = test_support::setup_test_context().await;

        let owner = test_support::insert_user(
            ctx.state.db(),
            "owner@smartedu.test",
            "Owner Teacher",
            UserRole::Teacher,
        )
        .await;
        let other = test_support::insert_user(
            ctx.state.db(),
            "other@smartedu.test",
            "Other Teacher",
            UserRole::Teacher,
        )
        .await;
        let admin = test_support::insert_user(
            ctx.state.db(),
            "admin@smartedu.test",
            "Admin User",
            UserRole::Admin,
        )
        .await;
        let course = test_support::insert_course(ctx.state.db(), &owner.id, "Guarded", true).await;

        let path = format!("/api/v1/teacher/courses/{}/students", course.id);

        let other_token = test_support::bearer_token(&other.id, ctx.state.settings());
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, &path, Some(&other_token), None))
            .await
            .expect("students as non-owner");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin_token = test_support::bearer_token(&admin.id, ctx.state.settings());
        let response = ctx
            .app
            .oneshot(test_support::json_request(Method::GET, &path, Some(&admin_token), None))
            .await
            .expect("students as admin");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body.as_array().map(Vec::len), Some(0));
    }
}
