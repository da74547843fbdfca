use std::collections::HashMap;

use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::db::models::{Course, CourseLesson};
use crate::repositories;
use crate::schemas::course::{
    CourseResponse, InstructorBrief, LessonResponse, SectionCreate, SectionResponse,
};

/// Writes a section/lesson tree under the course, assigning positions from
/// the payload order.
pub(super) async fn insert_sections(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    course_id: &str,
    sections: Vec<SectionCreate>,
) -> Result<Vec<SectionResponse>, ApiError> {
    let mut responses = Vec::new();

    for (section_index, section) in sections.into_iter().enumerate() {
        let section_id = Uuid::new_v4().to_string();

        let stored = repositories::courses::insert_section(
            &mut **tx,
            repositories::courses::CreateSection {
                id: &section_id,
                course_id,
                title: &section.title,
                position: section_index as i32 + 1,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create section"))?;

        let mut lessons = Vec::new();
        for (lesson_index, lesson) in section.lessons.into_iter().enumerate() {
            let stored_lesson = repositories::courses::insert_lesson(
                &mut **tx,
                repositories::courses::CreateLesson {
                    id: &Uuid::new_v4().to_string(),
                    section_id: &section_id,
                    course_id,
                    title: &lesson.title,
                    kind: lesson.kind,
                    content: lesson.content,
                    duration_minutes: lesson.duration_minutes,
                    position: lesson_index as i32 + 1,
                    is_preview: lesson.is_preview,
                },
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to create lesson"))?;

            lessons.push(LessonResponse::from_db(stored_lesson));
        }

        responses.push(SectionResponse::from_db(stored, lessons));
    }

    Ok(responses)
}

pub(super) async fn load_tree(
    pool: &sqlx::PgPool,
    course_id: &str,
) -> Result<Vec<SectionResponse>, ApiError> {
    let sections = repositories::courses::list_sections(pool, course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch sections"))?;
    let lessons = repositories::courses::list_lessons(pool, course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lessons"))?;

    let mut by_section: HashMap<String, Vec<CourseLesson>> = HashMap::new();
    for lesson in lessons {
        by_section.entry(lesson.section_id.clone()).or_default().push(lesson);
    }

    Ok(sections
        .into_iter()
        .map(|section| {
            let lessons = by_section
                .remove(&section.id)
                .unwrap_or_default()
                .into_iter()
                .map(LessonResponse::from_db)
                .collect();
            SectionResponse::from_db(section, lessons)
        })
        .collect())
}

pub(super) async fn instructor_brief(
    pool: &sqlx::PgPool,
    instructor_id: &str,
) -> Result<InstructorBrief, ApiError> {
    let instructor = repositories::users::fetch_one_by_id(pool, instructor_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch instructor"))?;

    Ok(InstructorBrief {
        id: instructor.id,
        full_name: instructor.full_name,
        avatar: instructor.avatar,
    })
}

/// Resolves instructors for a page of courses with a single batched query.
pub(super) async fn course_summaries(
    pool: &sqlx::PgPool,
    courses: Vec<Course>,
) -> Result<Vec<CourseResponse>, ApiError> {
    let mut ids: Vec<String> =
        courses.iter().map(|course| course.instructor_id.clone()).collect();
    ids.sort();
    ids.dedup();

    let briefs: HashMap<String, InstructorBrief> =
        repositories::users::list_briefs_by_ids(pool, &ids)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch instructors"))?
            .into_iter()
            .map(|row| {
                (
                    row.id.clone(),
                    InstructorBrief { id: row.id, full_name: row.full_name, avatar: row.avatar },
                )
            })
            .collect();

    courses
        .into_iter()
        .map(|course| {
            let brief = briefs
                .get(&course.instructor_id)
                .cloned()
                .ok_or_else(|| ApiError::Internal("Course instructor missing".to_string()))?;
            Ok(CourseResponse::from_db(course, brief))
        })
        .collect()
}
