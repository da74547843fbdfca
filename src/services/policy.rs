use crate::db::models::User;
use crate::db::types::UserRole;

/// Mutations and reads that go beyond what any authenticated user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Create,
    Read,
    Update,
    Delete,
    Publish,
    Feature,
}

/// Resource under access control, carrying only the owner id the decision
/// needs. `Read` on courses and quizzes guards unpublished content; the
/// published catalog is open to everyone and never consults the policy.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Resource<'a> {
    Course { instructor_id: &'a str },
    Quiz { created_by: &'a str },
    QuizResult { user_id: &'a str },
}

pub(crate) fn authorize(actor: &User, action: Action, resource: Resource<'_>) -> bool {
    if actor.role == UserRole::Admin {
        return true;
    }

    match resource {
        Resource::Course { instructor_id } => match action {
            Action::Create => actor.role == UserRole::Teacher,
            Action::Read | Action::Update | Action::Delete | Action::Publish => {
                actor.role == UserRole::Teacher && instructor_id == actor.id
            }
            Action::Feature => false,
        },
        Resource::Quiz { created_by } => match action {
            Action::Create => actor.role == UserRole::Teacher,
            Action::Read | Action::Update | Action::Delete | Action::Publish => {
                actor.role == UserRole::Teacher && created_by == actor.id
            }
            Action::Feature => false,
        },
        Resource::QuizResult { user_id } => action == Action::Read && user_id == actor.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    fn user(id: &str, role: UserRole) -> User {
        let now = primitive_now_utc();
        User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            hashed_password: "hash".to_string(),
            full_name: "Test User".to_string(),
            role,
            avatar: None,
            bio: None,
            headline: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn admin_is_allowed_everything() {
        let admin = user("admin-1", UserRole::Admin);
        for action in
            [Action::Create, Action::Read, Action::Update, Action::Delete, Action::Publish, Action::Feature]
        {
            assert!(authorize(&admin, action, Resource::Course { instructor_id: "someone-else" }));
        }
        assert!(authorize(&admin, Action::Read, Resource::QuizResult { user_id: "someone-else" }));
    }

    #[test]
    fn teacher_manages_own_content_only() {
        let teacher = user("teacher-1", UserRole::Teacher);

        assert!(authorize(&teacher, Action::Create, Resource::Course { instructor_id: "teacher-1" }));
        assert!(authorize(&teacher, Action::Update, Resource::Course { instructor_id: "teacher-1" }));
        assert!(authorize(&teacher, Action::Publish, Resource::Quiz { created_by: "teacher-1" }));
        assert!(authorize(&teacher, Action::Delete, Resource::Quiz { created_by: "teacher-1" }));

        assert!(!authorize(&teacher, Action::Update, Resource::Course { instructor_id: "teacher-2" }));
        assert!(!authorize(&teacher, Action::Delete, Resource::Course { instructor_id: "teacher-2" }));
        assert!(!authorize(&teacher, Action::Publish, Resource::Quiz { created_by: "teacher-2" }));
    }

    #[test]
    fn featuring_is_admin_only() {
        let teacher = user("teacher-1", UserRole::Teacher);
        assert!(!authorize(&teacher, Action::Feature, Resource::Course { instructor_id: "teacher-1" }));
    }

    #[test]
    fn students_cannot_author_content() {
        let student = user("student-1", UserRole::Student);

        assert!(!authorize(&student, Action::Create, Resource::Course { instructor_id: "student-1" }));
        assert!(!authorize(&student, Action::Create, Resource::Quiz { created_by: "student-1" }));
        assert!(!authorize(&student, Action::Read, Resource::Course { instructor_id: "teacher-1" }));
    }

    #[test]
    fn results_are_visible_to_their_owner() {
        let student = user("student-1", UserRole::Student);

        assert!(authorize(&student, Action::Read, Resource::QuizResult { user_id: "student-1" }));
        assert!(!authorize(&student, Action::Read, Resource::QuizResult { user_id: "student-2" }));
        assert!(!authorize(&student, Action::Delete, Resource::QuizResult { user_id: "student-1" }));
    }
}
