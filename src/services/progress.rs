/// Completion percentage as stored on an enrollment.
///
/// The lesson total is frozen when the student enrolls, so a course whose
/// tree was emptied afterwards (or was empty to begin with) reports 0
/// instead of dividing by zero.
pub(crate) fn percent_complete(completed_lessons: i64, total_lessons: i64) -> i32 {
    if total_lessons <= 0 {
        return 0;
    }
    let ratio = completed_lessons as f64 / total_lessons as f64;
    (ratio * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_percent() {
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 67);
        assert_eq!(percent_complete(1, 2), 50);
    }

    #[test]
    fn complete_course_is_100() {
        assert_eq!(percent_complete(8, 8), 100);
    }

    #[test]
    fn zero_total_lessons_is_zero() {
        assert_eq!(percent_complete(0, 0), 0);
        assert_eq!(percent_complete(3, 0), 0);
    }
}
