pub mod academic;
pub mod announcements;
pub mod evaluations;
pub mod events;
pub mod grades;
pub mod permissions;
pub mod users;

pub use academic::AcademicService;
pub use announcements::AnnouncementService;
pub use evaluations::EvaluationService;
pub use events::EventService;
pub use grades::GradeService;
pub use permissions::PermissionService;
pub use users::UserService;

/// 数据库唯一约束冲突（SQLite 与 PostgreSQL 的错误文本）
pub(crate) fn is_unique_violation(msg: &str) -> bool {
    msg.contains("UNIQUE") || msg.contains("duplicate key")
}

/// 数据库外键约束冲突
pub(crate) fn is_foreign_key_violation(msg: &str) -> bool {
    msg.contains("FOREIGN KEY") || msg.contains("foreign key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_detection() {
        assert!(is_unique_violation(
            "UNIQUE constraint failed: courses.code"
        ));
        assert!(is_unique_violation(
            "duplicate key value violates unique constraint \"users_username_key\""
        ));
        assert!(!is_unique_violation("connection reset"));
        assert!(is_foreign_key_violation("FOREIGN KEY constraint failed"));
        assert!(!is_foreign_key_violation("UNIQUE constraint failed"));
    }
}
