use crate::schemas::course::SectionCreate;

pub(crate) struct TreeTotals {
    pub(crate) lessons: i32,
    pub(crate) duration_minutes: i32,
}

/// Denormalized counters stored on the course row. Recomputed from the
/// incoming tree whenever sections are created or replaced, never patched
/// incrementally.
pub(crate) fn tree_totals(sections: &[SectionCreate]) -> TreeTotals {
    let mut lessons = 0;
    let mut duration_minutes = 0;
    for section in sections {
        lessons += section.lessons.len() as i32;
        duration_minutes += section.lessons.iter().map(|lesson| lesson.duration_minutes).sum::<i32>();
    }
    TreeTotals { lessons, duration_minutes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::LessonKind;
    use crate::schemas::course::LessonCreate;

    fn lesson(title: &str, duration_minutes: i32) -> LessonCreate {
        LessonCreate {
            title: title.to_string(),
            kind: LessonKind::Video,
            content: None,
            duration_minutes,
            is_preview: false,
        }
    }

    #[test]
    fn totals_sum_over_all_sections() {
        let sections = vec![
            SectionCreate {
                title: "Basics".to_string(),
                lessons: vec![lesson("Intro", 10), lesson("Setup", 25)],
            },
            SectionCreate { title: "Advanced".to_string(), lessons: vec![lesson("Traits", 40)] },
        ];

        let totals = tree_totals(&sections);

        assert_eq!(totals.lessons, 3);
        assert_eq!(totals.duration_minutes, 75);
    }

    #[test]
    fn empty_tree_has_zero_totals() {
        let totals = tree_totals(&[]);
        assert_eq!(totals.lessons, 0);
        assert_eq!(totals.duration_minutes, 0);

        let sections = vec![SectionCreate { title: "Placeholder".to_string(), lessons: vec![] }];
        let totals = tree_totals(&sections);
        assert_eq!(totals.lessons, 0);
        assert_eq!(totals.duration_minutes, 0);
    }
}
