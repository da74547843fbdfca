use serde::Deserialize;

use crate::db::types::DifficultyLevel;

#[derive(Debug, Deserialize)]
pub(super) struct ListQuizzesQuery {
    #[serde(default)]
    pub(super) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(super) limit: i64,
    #[serde(default)]
    #[serde(alias = "courseId")]
    pub(super) course_id: Option<String>,
    #[serde(default)]
    pub(super) difficulty: Option<DifficultyLevel>,
}
