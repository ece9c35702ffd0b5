//! 默认权限目录与内置角色

use crate::models::users::entities::UserRole;

pub mod codes {
    pub const ANNOUNCEMENTS_CREATE: &str = "announcements.create";
    pub const EVENTS_CREATE: &str = "events.create";
    pub const EVENTS_REGISTER: &str = "events.register";
    pub const EVALUATIONS_MANAGE: &str = "evaluations.manage";
    pub const GRADES_RECORD: &str = "grades.record";
    pub const GRADES_READ: &str = "grades.read";
    pub const GRADES_VIEW_OWN: &str = "grades.view_own";
    pub const PERMISSIONS_MANAGE: &str = "permissions.manage";
    pub const USERS_MANAGE: &str = "users.manage";
}

/// (代码, 名称, 描述)
pub const DEFAULT_PERMISSIONS: &[(&str, &str, &str)] = &[
    (codes::ANNOUNCEMENTS_CREATE, "Publicar comunicados", "发布公告"),
    (codes::EVENTS_CREATE, "Crear eventos", "创建活动"),
    (codes::EVENTS_REGISTER, "Inscribirse en eventos", "报名参加活动"),
    (codes::EVALUATIONS_MANAGE, "Gestionar evaluaciones", "创建和维护评估"),
    (codes::GRADES_RECORD, "Registrar notas", "录入和修改成绩"),
    (codes::GRADES_READ, "Consultar notas", "查看课程成绩和学生成绩单"),
    (codes::GRADES_VIEW_OWN, "Ver mis notas", "查看本人成绩单"),
    (codes::PERMISSIONS_MANAGE, "Gestionar permisos", "维护权限、角色和授权"),
    (codes::USERS_MANAGE, "Gestionar usuarios", "维护用户"),
];

const TEACHER_PERMISSIONS: &[&str] = &[
    codes::ANNOUNCEMENTS_CREATE,
    codes::EVENTS_CREATE,
    codes::EVENTS_REGISTER,
    codes::EVALUATIONS_MANAGE,
    codes::GRADES_RECORD,
    codes::GRADES_READ,
];

const STUDENT_PERMISSIONS: &[&str] = &[codes::EVENTS_REGISTER, codes::GRADES_VIEW_OWN];

/// 内置角色（代码, 名称, 权限代码列表）；`None` 表示全部权限
pub fn default_roles() -> Vec<(String, &'static str, Option<&'static [&'static str]>)> {
    vec![
        (UserRole::Admin.role_code(), "Administrador", None),
        (UserRole::Teacher.role_code(), "Docente", Some(TEACHER_PERMISSIONS)),
        (UserRole::Student.role_code(), "Estudiante", Some(STUDENT_PERMISSIONS)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_permission_code;

    #[test]
    fn test_catalogue_codes_are_valid() {
        for (code, _, _) in DEFAULT_PERMISSIONS {
            assert!(validate_permission_code(code).is_ok(), "{code}");
        }
    }

    #[test]
    fn test_role_permissions_exist_in_catalogue() {
        for (_, _, perms) in default_roles() {
            for code in perms.unwrap_or_default() {
                assert!(DEFAULT_PERMISSIONS.iter().any(|(c, _, _)| c == code));
            }
        }
    }
}
