use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct ListCoursesQuery {
    #[serde(default)]
    pub(super) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(super) limit: i64,
}
