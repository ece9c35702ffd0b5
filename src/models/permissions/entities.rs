use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

/// 权限
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct Permission {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub module: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 角色
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct Role {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 有效期，两端均可为空（不限）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct ValidityWindow {
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl ValidityWindow {
    /// `valid_from <= now < valid_until`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_from.is_none_or(|from| from <= now)
            && self.valid_until.is_none_or(|until| now < until)
    }

    pub fn validate(&self) -> Result<(), String> {
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until)
            && until <= from
        {
            return Err("有效期结束时间必须晚于开始时间".to_string());
        }
        Ok(())
    }
}

/// 用户角色分配
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct UserRoleAssignment {
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub window: ValidityWindow,
    pub assigned_at: DateTime<Utc>,
}

/// 用户直接授权
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/permission.ts")]
pub struct UserPermissionGrant {
    pub id: i64,
    pub user_id: i64,
    pub permission_id: i64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub window: ValidityWindow,
    pub granted_at: DateTime<Utc>,
}

/// 计算有效权限所需的全部来源
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionSources {
    /// 与用户基础角色同名的角色所含权限
    pub base_role: Vec<Permission>,
    /// 分配的角色及其权限
    pub assigned_roles: Vec<(ValidityWindow, Vec<Permission>)>,
    /// 直接授予的权限
    pub direct_grants: Vec<(ValidityWindow, Permission)>,
}

impl PermissionSources {
    /// 在 `now` 时刻生效的权限代码，去重并按代码排序
    pub fn effective_at(&self, now: DateTime<Utc>) -> Vec<String> {
        let from_roles = self
            .assigned_roles
            .iter()
            .filter(|(window, _)| window.is_valid_at(now))
            .flat_map(|(_, permissions)| permissions.iter());
        let from_grants = self
            .direct_grants
            .iter()
            .filter(|(window, _)| window.is_valid_at(now))
            .map(|(_, permission)| permission);

        self.base_role
            .iter()
            .chain(from_roles)
            .chain(from_grants)
            .filter(|p| p.is_active)
            .map(|p| p.code.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap()
    }

    fn permission(code: &str, active: bool) -> Permission {
        Permission {
            id: 0,
            code: code.to_string(),
            name: code.to_string(),
            description: None,
            module: code.split('.').next().unwrap_or_default().to_string(),
            is_active: active,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_window_boundaries() {
        let t = now();
        let open = ValidityWindow::default();
        assert!(open.is_valid_at(t));

        let window = ValidityWindow {
            valid_from: Some(t),
            valid_until: Some(t + Duration::days(1)),
        };
        assert!(window.is_valid_at(t));
        assert!(!window.is_valid_at(t - Duration::seconds(1)));
        assert!(!window.is_valid_at(t + Duration::days(1)));
    }

    #[test]
    fn test_window_validate() {
        let t = now();
        let bad = ValidityWindow {
            valid_from: Some(t),
            valid_until: Some(t),
        };
        assert!(bad.validate().is_err());
        assert!(ValidityWindow::default().validate().is_ok());
    }

    #[test]
    fn test_effective_union() {
        let t = now();
        let expired = ValidityWindow {
            valid_from: None,
            valid_until: Some(t - Duration::hours(1)),
        };
        let sources = PermissionSources {
            base_role: vec![permission("grades.record", true), permission("events.create", true)],
            assigned_roles: vec![
                (ValidityWindow::default(), vec![permission("events.create", true)]),
                (expired, vec![permission("users.manage", true)]),
            ],
            direct_grants: vec![
                (ValidityWindow::default(), permission("announcements.create", true)),
                (ValidityWindow::default(), permission("legacy.export", false)),
            ],
        };
        assert_eq!(
            sources.effective_at(t),
            vec![
                "announcements.create".to_string(),
                "events.create".to_string(),
                "grades.record".to_string(),
            ]
        );
    }

    #[test]
    fn test_effective_empty() {
        assert!(PermissionSources::default().effective_at(now()).is_empty());
    }
}
