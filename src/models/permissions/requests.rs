use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::ValidityWindow;
use crate::models::common::PaginationQuery;
use crate::utils::validate::{
    validate_length, validate_max_length, validate_permission_code, validate_role_code,
};

/// 创建权限请求，模块由代码前缀决定
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct CreatePermissionRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl CreatePermissionRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_permission_code(&self.code)?;
        validate_length("权限名称", &self.name, 3, 100)?;
        validate_max_length("描述", self.description.as_deref(), 500)
    }

    /// `grades.record` -> `grades`
    pub fn module(&self) -> &str {
        self.code.split('.').next().unwrap_or_default()
    }
}

/// 更新权限请求（代码不可修改）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct UpdatePermissionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdatePermissionRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref name) = self.name {
            validate_length("权限名称", name, 3, 100)?;
        }
        validate_max_length("描述", self.description.as_deref(), 500)
    }
}

/// 权限列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct PermissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub module: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct PermissionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub module: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl From<PermissionListParams> for PermissionListQuery {
    fn from(params: PermissionListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            module: params.module,
            is_active: params.is_active,
            search: params.search,
        }
    }
}

/// 创建角色请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct CreateRoleRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permission_ids: Vec<i64>,
}

impl CreateRoleRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_role_code(&self.code)?;
        validate_length("角色名称", &self.name, 3, 100)?;
        validate_max_length("描述", self.description.as_deref(), 500)
    }
}

/// 为角色添加权限
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct RolePermissionRequest {
    pub permission_id: i64,
}

/// 为用户分配角色
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct AssignRoleRequest {
    pub role_id: i64,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl AssignRoleRequest {
    pub fn window(&self) -> ValidityWindow {
        ValidityWindow {
            valid_from: self.valid_from,
            valid_until: self.valid_until,
        }
    }
}

/// 直接授予用户权限
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct GrantPermissionRequest {
    pub permission_id: i64,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl GrantPermissionRequest {
    pub fn window(&self) -> ValidityWindow {
        ValidityWindow {
            valid_from: self.valid_from,
            valid_until: self.valid_until,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_permission() {
        let req = CreatePermissionRequest {
            code: "reports.export".to_string(),
            name: "Exportar reportes".to_string(),
            description: None,
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.module(), "reports");

        let bad = CreatePermissionRequest {
            code: "Reports".to_string(),
            name: "Exportar".to_string(),
            description: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_create_role() {
        let req = CreateRoleRequest {
            code: "TUTOR".to_string(),
            name: "Tu".to_string(),
            description: None,
            permission_ids: vec![],
        };
        assert!(req.validate().is_err());
    }
}
