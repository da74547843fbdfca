mod catalog;
mod engagement;
mod enrollment;
mod manage;

pub(super) use catalog::{get_course, list_categories, list_courses, list_featured};
pub(super) use engagement::{add_review, list_reviews, list_wishlist, toggle_wishlist};
pub(super) use enrollment::{enroll, list_enrolled, update_progress};
pub(super) use manage::{
    create_course, delete_course, toggle_feature, toggle_publish, update_course,
};
