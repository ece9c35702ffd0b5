//! 预导入模块，方便使用

pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::event_registrations::{
    ActiveModel as EventRegistrationActiveModel, Entity as EventRegistrations,
    Model as EventRegistrationModel,
};
pub use super::events::{ActiveModel as EventActiveModel, Entity as Events, Model as EventModel};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::periods::{ActiveModel as PeriodActiveModel, Entity as Periods, Model as PeriodModel};
pub use super::permissions::{
    ActiveModel as PermissionActiveModel, Entity as Permissions, Model as PermissionModel,
};
pub use super::role_permissions::{
    ActiveModel as RolePermissionActiveModel, Entity as RolePermissions,
    Model as RolePermissionModel,
};
pub use super::roles::{ActiveModel as RoleActiveModel, Entity as Roles, Model as RoleModel};
pub use super::user_permissions::{
    ActiveModel as UserPermissionActiveModel, Entity as UserPermissions,
    Model as UserPermissionModel,
};
pub use super::user_roles::{
    ActiveModel as UserRoleActiveModel, Entity as UserRoles, Model as UserRoleModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
