use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Course, CourseLesson, CourseSection};
use crate::db::types::{CourseLevel, LessonKind};
use crate::repositories::enrollments::EnrolledCourseRow;
use crate::repositories::reviews::ReviewWithAuthorRow;
use crate::repositories::wishlist::WishlistCourseRow;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LessonCreate {
    #[validate(length(min = 1, message = "lesson title must not be empty"))]
    pub(crate) title: String,
    #[serde(default = "default_lesson_kind")]
    pub(crate) kind: LessonKind,
    #[serde(default)]
    pub(crate) content: Option<String>,
    #[serde(default)]
    #[serde(alias = "durationMinutes", alias = "duration")]
    #[validate(range(min = 0, message = "duration_minutes must be non-negative"))]
    pub(crate) duration_minutes: i32,
    #[serde(default)]
    #[serde(alias = "isPreview")]
    pub(crate) is_preview: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SectionCreate {
    #[validate(length(min = 1, message = "section title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) lessons: Vec<LessonCreate>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) subtitle: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub(crate) description: String,
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub(crate) category: String,
    #[serde(default = "default_level")]
    pub(crate) level: CourseLevel,
    #[serde(default = "default_language")]
    pub(crate) language: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub(crate) price: f64,
    #[serde(default)]
    #[serde(alias = "isFree")]
    pub(crate) is_free: bool,
    #[serde(default)]
    pub(crate) thumbnail: Option<String>,
    #[serde(default)]
    #[serde(alias = "isPublished")]
    pub(crate) is_published: bool,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) sections: Vec<SectionCreate>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) subtitle: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub(crate) category: Option<String>,
    #[serde(default)]
    pub(crate) level: Option<CourseLevel>,
    #[serde(default)]
    pub(crate) language: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub(crate) price: Option<f64>,
    #[serde(default)]
    #[serde(alias = "isFree")]
    pub(crate) is_free: Option<bool>,
    #[serde(default)]
    pub(crate) thumbnail: Option<String>,
    /// Replaces the whole section tree when present.
    #[serde(default)]
    #[validate(nested)]
    pub(crate) sections: Option<Vec<SectionCreate>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InstructorBrief {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) avatar: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) subtitle: Option<String>,
    pub(crate) description: String,
    pub(crate) instructor: InstructorBrief,
    pub(crate) category: String,
    pub(crate) level: CourseLevel,
    pub(crate) language: String,
    pub(crate) price: f64,
    pub(crate) is_free: bool,
    pub(crate) thumbnail: Option<String>,
    pub(crate) rating: f64,
    pub(crate) total_ratings: i32,
    pub(crate) students_enrolled: i32,
    pub(crate) total_lessons: i32,
    pub(crate) total_duration_minutes: i32,
    pub(crate) is_published: bool,
    pub(crate) is_featured: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course, instructor: InstructorBrief) -> Self {
        Self {
            id: course.id,
            title: course.title,
            subtitle: course.subtitle,
            description: course.description,
            instructor,
            category: course.category,
            level: course.level,
            language: course.language,
            price: course.price,
            is_free: course.is_free,
            thumbnail: course.thumbnail,
            rating: course.rating,
            total_ratings: course.total_ratings,
            students_enrolled: course.students_enrolled,
            total_lessons: course.total_lessons,
            total_duration_minutes: course.total_duration_minutes,
            is_published: course.is_published,
            is_featured: course.is_featured,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LessonResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) kind: LessonKind,
    pub(crate) content: Option<String>,
    pub(crate) duration_minutes: i32,
    pub(crate) position: i32,
    pub(crate) is_preview: bool,
}

impl LessonResponse {
    pub(crate) fn from_db(lesson: CourseLesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title,
            kind: lesson.kind,
            content: lesson.content,
            duration_minutes: lesson.duration_minutes,
            position: lesson.position,
            is_preview: lesson.is_preview,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SectionResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) position: i32,
    pub(crate) lessons: Vec<LessonResponse>,
}

impl SectionResponse {
    pub(crate) fn from_db(section: CourseSection, lessons: Vec<LessonResponse>) -> Self {
        Self { id: section.id, title: section.title, position: section.position, lessons }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseDetailResponse {
    #[serde(flatten)]
    pub(crate) course: CourseResponse,
    pub(crate) sections: Vec<SectionResponse>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ReviewCreate {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub(crate) rating: i16,
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewAuthor {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) avatar: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewResponse {
    pub(crate) id: String,
    pub(crate) user: ReviewAuthor,
    pub(crate) rating: i16,
    pub(crate) comment: Option<String>,
    pub(crate) created_at: String,
}

impl ReviewResponse {
    pub(crate) fn from_db(row: ReviewWithAuthorRow) -> Self {
        Self {
            id: row.id,
            user: ReviewAuthor {
                id: row.user_id,
                full_name: row.author_name,
                avatar: row.author_avatar,
            },
            rating: row.rating,
            comment: row.comment,
            created_at: format_primitive(row.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewAddedResponse {
    pub(crate) message: String,
    pub(crate) rating: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnrollResponse {
    pub(crate) message: String,
    pub(crate) course_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProgressUpdate {
    pub(crate) completed: bool,
    #[serde(default)]
    #[serde(alias = "watchedSeconds", alias = "watchedDuration")]
    #[validate(range(min = 0, message = "watched_seconds must be non-negative"))]
    pub(crate) watched_seconds: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressResponse {
    pub(crate) progress: i32,
    pub(crate) completed_lessons: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnrolledCourseResponse {
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) thumbnail: Option<String>,
    pub(crate) category: String,
    pub(crate) level: CourseLevel,
    pub(crate) rating: f64,
    pub(crate) total_duration_minutes: i32,
    pub(crate) instructor_name: String,
    pub(crate) enrolled_at: String,
    pub(crate) total_lessons: i32,
    pub(crate) completed_lessons: i32,
    pub(crate) percent_complete: i32,
    pub(crate) last_accessed_at: String,
}

impl EnrolledCourseResponse {
    pub(crate) fn from_db(row: EnrolledCourseRow) -> Self {
        Self {
            course_id: row.course_id,
            title: row.title,
            thumbnail: row.thumbnail,
            category: row.category,
            level: row.level,
            rating: row.rating,
            total_duration_minutes: row.total_duration_minutes,
            instructor_name: row.instructor_name,
            enrolled_at: format_primitive(row.enrolled_at),
            total_lessons: row.total_lessons,
            completed_lessons: row.completed_lessons,
            percent_complete: row.percent_complete,
            last_accessed_at: format_primitive(row.last_accessed_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryResponse {
    pub(crate) name: String,
    pub(crate) count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WishlistToggleResponse {
    pub(crate) message: String,
    pub(crate) in_wishlist: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WishlistItemResponse {
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) subtitle: Option<String>,
    pub(crate) thumbnail: Option<String>,
    pub(crate) category: String,
    pub(crate) level: CourseLevel,
    pub(crate) price: f64,
    pub(crate) is_free: bool,
    pub(crate) rating: f64,
    pub(crate) instructor_name: String,
    pub(crate) added_at: String,
}

impl WishlistItemResponse {
    pub(crate) fn from_db(row: WishlistCourseRow) -> Self {
        Self {
            course_id: row.course_id,
            title: row.title,
            subtitle: row.subtitle,
            thumbnail: row.thumbnail,
            category: row.category,
            level: row.level,
            price: row.price,
            is_free: row.is_free,
            rating: row.rating,
            instructor_name: row.instructor_name,
            added_at: format_primitive(row.added_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublishToggleResponse {
    pub(crate) message: String,
    pub(crate) is_published: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeatureToggleResponse {
    pub(crate) message: String,
    pub(crate) is_featured: bool,
}

fn default_lesson_kind() -> LessonKind {
    LessonKind::Video
}

fn default_level() -> CourseLevel {
    CourseLevel::All
}

fn default_language() -> String {
    "English".to_string()
}
