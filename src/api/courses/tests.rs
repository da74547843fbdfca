use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::test_support::{self, TestContext};

fn course_tree_payload(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "Ownership, borrowing, lifetimes.",
        "category": "Programming",
        "is_published": true,
        "sections": [
            {
                "title": "Basics",
                "lessons": [
                    {"title": "Intro", "duration_minutes": 10},
                    {"title": "Variables", "duration_minutes": 10},
                    {"title": "Functions", "duration_minutes": 10}
                ]
            },
            {
                "title": "Ownership",
                "lessons": [
                    {"title": "Moves", "duration_minutes": 10},
                    {"title": "Borrows", "duration_minutes": 10}
                ]
            }
        ]
    })
}

async fn create_course_over_http(
    ctx: &TestContext,
    token: &str,
    payload: serde_json::Value,
) -> serde_json::Value {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(token),
            Some(payload),
        ))
        .await
        .expect("create course");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    body
}

async fn teacher_with_token(ctx: &TestContext, email: &str) -> (User, String) {
    let teacher = test_support::insert_user(ctx.state.db(), email, "Course Teacher", UserRole::Teacher).await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());
    (teacher, token)
}

async fn student_with_token(ctx: &TestContext, email: &str) -> (User, String) {
    let student = test_support::insert_user(ctx.state.db(), email, "Course Student", UserRole::Student).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    (student, token)
}

#[tokio::test]
async fn course_totals_follow_every_tree_save() {
    let ctx = test_support::setup_test_context().await;
    let (_teacher, token) = teacher_with_token(&ctx, "teacher@smartedu.test").await;

    let created = create_course_over_http(&ctx, &token, course_tree_payload("Rust Deep Dive")).await;
    assert_eq!(created["totalLessons"], 5);
    assert_eq!(created["totalDurationMinutes"], 50);
    let sections = created["sections"].as_array().expect("sections");
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["position"], 1);
    assert_eq!(sections[0]["lessons"].as_array().map(Vec::len), Some(3));
    assert_eq!(sections[1]["lessons"][1]["title"], "Borrows");
    let course_id = created["id"].as_str().expect("course id").to_string();

    let replace_tree = json!({
        "sections": [
            {
                "title": "Rewritten",
                "lessons": [
                    {"title": "Only One", "duration_minutes": 7},
                    {"title": "Only Two", "duration_minutes": 8}
                ]
            }
        ]
    });
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/courses/{course_id}"),
            Some(&token),
            Some(replace_tree),
        ))
        .await
        .expect("update course");

    let status = response.status();
    let updated = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {updated}");
    assert_eq!(updated["totalLessons"], 2);
    assert_eq!(updated["totalDurationMinutes"], 15);
    assert_eq!(updated["sections"].as_array().map(Vec::len), Some(1));
    assert_eq!(updated["sections"][0]["title"], "Rewritten");

    // Metadata-only updates must leave the stored tree and its totals alone.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/courses/{course_id}"),
            Some(&token),
            Some(json!({"title": "Renamed Deep Dive"})),
        ))
        .await
        .expect("rename course");

    let status = response.status();
    let renamed = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {renamed}");
    assert_eq!(renamed["title"], "Renamed Deep Dive");
    assert_eq!(renamed["totalLessons"], 2);
    assert_eq!(renamed["sections"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn students_cannot_manage_courses() {
    let ctx = test_support::setup_test_context().await;
    let (_student, token) = student_with_token(&ctx, "student@smartedu.test").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            Some(course_tree_payload("Sneaky Course")),
        ))
        .await
        .expect("create course as student");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (_teacher, teacher_token) = teacher_with_token(&ctx, "owner@smartedu.test").await;
    let created = create_course_over_http(&ctx, &teacher_token, course_tree_payload("Owned")).await;
    let course_id = created["id"].as_str().expect("course id");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/courses/{course_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete course as student");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Featuring stays admin-only even for the owning teacher.
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{course_id}/feature"),
            Some(&teacher_token),
            None,
        ))
        .await
        .expect("feature course as teacher");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn enrollment_is_unique_per_student() {
    let ctx = test_support::setup_test_context().await;
    let (teacher, _) = teacher_with_token(&ctx, "teacher@smartedu.test").await;
    let (_student, token) = student_with_token(&ctx, "student@smartedu.test").await;
    let course = test_support::insert_course(ctx.state.db(), &teacher.id, "Enrollable", true).await;

    let enroll_path = format!("/api/v1/courses/{}/enroll", course.id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, &enroll_path, Some(&token), None))
        .await
        .expect("enroll");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["courseId"], course.id.as_str());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, &enroll_path, Some(&token), None))
        .await
        .expect("enroll again");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let stored = repositories::courses::fetch_one_by_id(ctx.state.db(), &course.id)
        .await
        .expect("course after enrolls");
    assert_eq!(stored.students_enrolled, 1);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses/enrolled",
            Some(&token),
            None,
        ))
        .await
        .expect("enrolled list");
    let status = response.status();
    let enrolled = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {enrolled}");
    assert_eq!(enrolled.as_array().map(Vec::len), Some(1));
    assert_eq!(enrolled[0]["title"], "Enrollable");
    assert_eq!(enrolled[0]["percentComplete"], 0);
}

#[tokio::test]
async fn hidden_courses_cannot_be_enrolled() {
    let ctx = test_support::setup_test_context().await;
    let (teacher, _) = teacher_with_token(&ctx, "teacher@smartedu.test").await;
    let (_student, token) = student_with_token(&ctx, "student@smartedu.test").await;
    let draft = test_support::insert_course(ctx.state.db(), &teacher.id, "Draft", false).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{}/enroll", draft.id),
            Some(&token),
            None,
        ))
        .await
        .expect("enroll hidden course");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses/missing-course/enroll",
            Some(&token),
            None,
        ))
        .await
        .expect("enroll missing course");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn progress_recounts_completed_lessons() {
    let ctx = test_support::setup_test_context().await;
    let (_teacher, teacher_token) = teacher_with_token(&ctx, "teacher@smartedu.test").await;
    let (_student, token) = student_with_token(&ctx, "student@smartedu.test").await;

    let payload = json!({
        "title": "Two Lessons",
        "description": "Small course.",
        "category": "Programming",
        "is_published": true,
        "sections": [
            {
                "title": "Only Section",
                "lessons": [
                    {"title": "First", "duration_minutes": 5},
                    {"title": "Second", "duration_minutes": 5}
                ]
            }
        ]
    });
    let created = create_course_over_http(&ctx, &teacher_token, payload).await;
    let course_id = created["id"].as_str().expect("course id").to_string();
    let first_lesson = created["sections"][0]["lessons"][0]["id"].as_str().expect("lesson id").to_string();
    let second_lesson = created["sections"][0]["lessons"][1]["id"].as_str().expect("lesson id").to_string();

    // Progress before enrollment has nothing to attach to.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/courses/{course_id}/progress/{first_lesson}"),
            Some(&token),
            Some(json!({"completed": true})),
        ))
        .await
        .expect("progress without enrollment");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{course_id}/enroll"),
            Some(&token),
            None,
        ))
        .await
        .expect("enroll");
    assert_eq!(response.status(), StatusCode::CREATED);

    let mark = |lesson: String, completed: bool| {
        let app = ctx.app.clone();
        let token = token.clone();
        let course_id = course_id.clone();
        async move {
            let response = app
                .oneshot(test_support::json_request(
                    Method::PUT,
                    &format!("/api/v1/courses/{course_id}/progress/{lesson}"),
                    Some(&token),
                    Some(json!({"completed": completed, "watched_seconds": 120})),
                ))
                .await
                .expect("update progress");
            let status = response.status();
            let body = test_support::read_json(response).await;
            assert_eq!(status, StatusCode::OK, "response: {body}");
            body
        }
    };

    let body = mark(first_lesson.clone(), true).await;
    assert_eq!(body["progress"], 50);
    assert_eq!(body["completedLessons"], 1);

    // Completing the same lesson twice must not inflate the counter.
    let body = mark(first_lesson.clone(), true).await;
    assert_eq!(body["progress"], 50);
    assert_eq!(body["completedLessons"], 1);

    let body = mark(second_lesson.clone(), true).await;
    assert_eq!(body["progress"], 100);
    assert_eq!(body["completedLessons"], 2);

    let body = mark(second_lesson, false).await;
    assert_eq!(body["progress"], 50);
    assert_eq!(body["completedLessons"], 1);
}

#[tokio::test]
async fn empty_course_progress_stays_at_zero() {
    let ctx = test_support::setup_test_context().await;
    let (teacher, _) = teacher_with_token(&ctx, "teacher@smartedu.test").await;
    let (_student, token) = student_with_token(&ctx, "student@smartedu.test").await;
    let course = test_support::insert_course(ctx.state.db(), &teacher.id, "No Lessons", true).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{}/enroll", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("enroll");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/courses/{}/progress/ghost-lesson", course.id),
            Some(&token),
            Some(json!({"completed": true})),
        ))
        .await
        .expect("progress on empty course");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["progress"], 0);
    assert_eq!(body["completedLessons"], 1);
}

#[tokio::test]
async fn reviews_require_enrollment_and_stay_unique() {
    let ctx = test_support::setup_test_context().await;
    let (teacher, _) = teacher_with_token(&ctx, "teacher@smartedu.test").await;
    let course = test_support::insert_course(ctx.state.db(), &teacher.id, "Reviewable", true).await;
    let review_path = format!("/api/v1/courses/{}/review", course.id);

    let (_first, first_token) = student_with_token(&ctx, "first@smartedu.test").await;
    let (_second, second_token) = student_with_token(&ctx, "second@smartedu.test").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &review_path,
            Some(&first_token),
            Some(json!({"rating": 4})),
        ))
        .await
        .expect("review before enrollment");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for (token, rating) in [(&first_token, 4), (&second_token, 5)] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/courses/{}/enroll", course.id),
                Some(token),
                None,
            ))
            .await
            .expect("enroll");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &review_path,
                Some(token),
                Some(json!({"rating": rating, "comment": "solid"})),
            ))
            .await
            .expect("review");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &review_path,
            Some(&first_token),
            Some(json!({"rating": 1})),
        ))
        .await
        .expect("duplicate review");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let stored = repositories::courses::fetch_one_by_id(ctx.state.db(), &course.id)
        .await
        .expect("course after reviews");
    assert_eq!(stored.rating, 4.5);
    assert_eq!(stored.total_ratings, 2);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{}/reviews", course.id),
            Some(&first_token),
            None,
        ))
        .await
        .expect("list reviews");
    let status = response.status();
    let reviews = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {reviews}");
    let items = reviews.as_array().expect("review list");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|review| review["user"]["fullName"].is_string()));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &review_path,
            Some(&first_token),
            Some(json!({"rating": 9})),
        ))
        .await
        .expect("out of range review");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wishlist_toggles_membership() {
    let ctx = test_support::setup_test_context().await;
    let (teacher, _) = teacher_with_token(&ctx, "teacher@smartedu.test").await;
    let (_student, token) = student_with_token(&ctx, "student@smartedu.test").await;
    let course = test_support::insert_course(ctx.state.db(), &teacher.id, "Wishable", true).await;
    let toggle_path = format!("/api/v1/courses/{}/wishlist", course.id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, &toggle_path, Some(&token), None))
        .await
        .expect("add to wishlist");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["inWishlist"], true);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses/wishlist",
            Some(&token),
            None,
        ))
        .await
        .expect("wishlist");
    let status = response.status();
    let listed = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {listed}");
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["title"], "Wishable");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, &toggle_path, Some(&token), None))
        .await
        .expect("remove from wishlist");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["inWishlist"], false);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses/wishlist",
            Some(&token),
            None,
        ))
        .await
        .expect("wishlist after removal");
    let status = response.status();
    let listed = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {listed}");
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn catalog_exposes_categories_and_featured() {
    let ctx = test_support::setup_test_context().await;
    let (teacher, _) = teacher_with_token(&ctx, "teacher@smartedu.test").await;
    let (_student, token) = student_with_token(&ctx, "student@smartedu.test").await;
    let now = primitive_now_utc();

    let mut featured_ids = Vec::new();
    for index in 0..7 {
        let course = test_support::insert_course(
            ctx.state.db(),
            &teacher.id,
            &format!("Course {index}"),
            true,
        )
        .await;
        repositories::courses::set_featured(ctx.state.db(), &course.id, true, now)
            .await
            .expect("feature course");
        featured_ids.push(course.id);
    }
    sqlx::query("UPDATE courses SET category = 'Design' WHERE id = $1")
        .bind(&featured_ids[0])
        .execute(ctx.state.db())
        .await
        .expect("recategorize course");
    let draft = test_support::insert_course(ctx.state.db(), &teacher.id, "Hidden Draft", false).await;
    repositories::courses::set_featured(ctx.state.db(), &draft.id, true, now)
        .await
        .expect("feature draft");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses/categories",
            Some(&token),
            None,
        ))
        .await
        .expect("categories");
    let status = response.status();
    let categories = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {categories}");
    let buckets = categories.as_array().expect("category list");
    assert_eq!(buckets.len(), 2);
    let programming = buckets
        .iter()
        .find(|bucket| bucket["name"] == "Programming")
        .expect("programming bucket");
    assert_eq!(programming["count"], 6);

    // The strip caps out even when more courses are flagged.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses/featured",
            Some(&token),
            None,
        ))
        .await
        .expect("featured");
    let status = response.status();
    let featured = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {featured}");
    let items = featured.as_array().expect("featured list");
    assert_eq!(items.len(), 6);
    assert!(items.iter().all(|course| course["title"] != "Hidden Draft"));

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses?limit=3",
            Some(&token),
            None,
        ))
        .await
        .expect("course page");
    let status = response.status();
    let page = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {page}");
    assert_eq!(page["items"].as_array().map(Vec::len), Some(3));
    assert_eq!(page["totalCount"], 7);
    assert_eq!(page["limit"], 3);
}

#[tokio::test]
async fn unpublished_courses_are_owner_only() {
    let ctx = test_support::setup_test_context().await;
    let (teacher, teacher_token) = teacher_with_token(&ctx, "owner@smartedu.test").await;
    let (_student, student_token) = student_with_token(&ctx, "student@smartedu.test").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "admin@smartedu.test",
        "Admin User",
        UserRole::Admin,
    )
    .await;
    let draft = test_support::insert_course(ctx.state.db(), &teacher.id, "Secret Draft", false).await;
    let detail_path = format!("/api/v1/courses/{}", draft.id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, &detail_path, Some(&student_token), None))
        .await
        .expect("draft as student");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, &detail_path, Some(&teacher_token), None))
        .await
        .expect("draft as owner");
    assert_eq!(response.status(), StatusCode::OK);

    let admin_token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, &detail_path, Some(&admin_token), None))
        .await
        .expect("draft as admin");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/courses", Some(&student_token), None))
        .await
        .expect("course list");
    let status = response.status();
    let page = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {page}");
    assert_eq!(page["totalCount"], 0);

    // Toggling publish makes it enrollable; toggling again hides it back.
    let publish_path = format!("/api/v1/courses/{}/publish", draft.id);
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, &publish_path, Some(&teacher_token), None))
        .await
        .expect("publish draft");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["isPublished"], true);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, &detail_path, Some(&student_token), None))
        .await
        .expect("published course as student");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_a_course_clears_dependents() {
    let ctx = test_support::setup_test_context().await;
    let (_teacher, teacher_token) = teacher_with_token(&ctx, "teacher@smartedu.test").await;
    let (_student, student_token) = student_with_token(&ctx, "student@smartedu.test").await;

    let created = create_course_over_http(&ctx, &teacher_token, course_tree_payload("Doomed")).await;
    let course_id = created["id"].as_str().expect("course id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{course_id}/enroll"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("enroll");
    assert_eq!(response.status(), StatusCode::CREATED);

    let quiz_payload = json!({
        "title": "Attached Quiz",
        "course_id": course_id,
        "is_published": true,
        "questions": [
            {"text": "Keep?", "options": ["yes", "no"], "correct_answer": "yes"}
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

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/courses/{course_id}"),
            Some(&teacher_token),
            None,
        ))
        .await
        .expect("delete course");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let gone = repositories::courses::find_by_id(ctx.state.db(), &course_id)
        .await
        .expect("course after delete");
    assert!(gone.is_none());

    let orphan_enrollments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
            .bind(&course_id)
            .fetch_one(ctx.state.db())
            .await
            .expect("count enrollments");
    assert_eq!(orphan_enrollments, 0);

    let quiz = repositories::quizzes::find_by_id(ctx.state.db(), &quiz_id)
        .await
        .expect("quiz after course delete")
        .expect("quiz survives");
    assert_eq!(quiz.course_id, None);
}
