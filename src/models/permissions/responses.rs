use serde::Serialize;
use ts_rs::TS;

use super::entities::{Permission, Role, UserPermissionGrant, UserRoleAssignment};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserRole;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct PermissionListResponse {
    pub items: Vec<Permission>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct RoleListResponse {
    pub items: Vec<Role>,
}

/// 角色详情（含权限）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct RoleDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// 用户的角色分配与直接授权
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct UserAssignmentsResponse {
    pub user_id: i64,
    pub roles: Vec<UserRoleAssignment>,
    pub permissions: Vec<UserPermissionGrant>,
}

/// 用户当前有效权限
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct EffectivePermissionsResponse {
    pub user_id: i64,
    pub role: UserRole,
    /// 管理员跳过权限检查
    pub is_admin: bool,
    pub permissions: Vec<String>,
}
