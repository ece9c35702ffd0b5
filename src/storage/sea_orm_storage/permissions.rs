//! 权限、角色与用户授权存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::permissions::{
    ActiveModel as PermissionActiveModel, Column as PermissionColumn, Entity as Permissions,
};
use crate::entity::role_permissions::{
    ActiveModel as RolePermissionActiveModel, Column as RolePermissionColumn,
    Entity as RolePermissions,
};
use crate::entity::roles::{ActiveModel as RoleActiveModel, Column as RoleColumn, Entity as Roles};
use crate::entity::user_permissions::{
    ActiveModel as UserPermissionActiveModel, Column as UserPermissionColumn,
    Entity as UserPermissions,
};
use crate::entity::user_roles::{
    ActiveModel as UserRoleActiveModel, Column as UserRoleColumn, Entity as UserRoles,
};
use crate::errors::{Result, SchoolHubError};
use crate::models::common::normalize_page;
use crate::models::{
    PaginationInfo,
    permissions::{
        defaults::{DEFAULT_PERMISSIONS, default_roles},
        entities::{
            Permission, PermissionSources, Role, UserPermissionGrant, UserRoleAssignment,
            ValidityWindow,
        },
        requests::{
            CreatePermissionRequest, CreateRoleRequest, PermissionListQuery,
            UpdatePermissionRequest,
        },
        responses::PermissionListResponse,
    },
    users::entities::User,
};
use crate::utils::contains_ignore_case;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

fn window_columns(window: &ValidityWindow) -> (Option<i64>, Option<i64>) {
    (
        window.valid_from.map(|t| t.timestamp()),
        window.valid_until.map(|t| t.timestamp()),
    )
}

/// 角色所含的全部权限（按代码排序）
async fn permissions_of_role<C: ConnectionTrait>(conn: &C, role_id: i64) -> Result<Vec<Permission>> {
    let permissions = Permissions::find()
        .inner_join(RolePermissions)
        .filter(RolePermissionColumn::RoleId.eq(role_id))
        .order_by_asc(PermissionColumn::Code)
        .all(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("查询角色权限失败: {e}")))?;

    Ok(permissions.into_iter().map(|m| m.into_permission()).collect())
}

async fn insert_role_permissions<C: ConnectionTrait>(
    conn: &C,
    role_id: i64,
    permission_ids: &[i64],
) -> Result<()> {
    for permission_id in permission_ids {
        RolePermissionActiveModel {
            role_id: Set(role_id),
            permission_id: Set(*permission_id),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("关联角色权限失败: {e}")))?;
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 创建权限，模块取代码前缀
    pub async fn create_permission_impl(&self, req: CreatePermissionRequest) -> Result<Permission> {
        let now = chrono::Utc::now().timestamp();
        let module = req.module().to_string();

        let model = PermissionActiveModel {
            code: Set(req.code),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            module: Set(module),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建权限失败: {e}")))?;

        Ok(result.into_permission())
    }

    pub async fn get_permission_by_id_impl(&self, id: i64) -> Result<Option<Permission>> {
        let result = Permissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询权限失败: {e}")))?;

        Ok(result.map(|m| m.into_permission()))
    }

    pub async fn get_permission_by_code_impl(&self, code: &str) -> Result<Option<Permission>> {
        let result = Permissions::find()
            .filter(PermissionColumn::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询权限失败: {e}")))?;

        Ok(result.map(|m| m.into_permission()))
    }

    /// 分页列出权限
    pub async fn list_permissions_with_pagination_impl(
        &self,
        query: PermissionListQuery,
    ) -> Result<PermissionListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 10);
        let (page, size) = (page as u64, size as u64);

        let mut select = Permissions::find();

        if let Some(ref module) = query.module {
            select = select.filter(PermissionColumn::Module.eq(module.as_str()));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(PermissionColumn::IsActive.eq(is_active));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(contains_ignore_case(PermissionColumn::Code, search))
                    .add(contains_ignore_case(PermissionColumn::Name, search)),
            );
        }

        select = select.order_by_asc(PermissionColumn::Code);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询权限总数失败: {e}")))?;

        let permissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询权限列表失败: {e}")))?;

        Ok(PermissionListResponse {
            items: permissions.into_iter().map(|m| m.into_permission()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 更新权限
    pub async fn update_permission_impl(
        &self,
        id: i64,
        update: UpdatePermissionRequest,
    ) -> Result<Option<Permission>> {
        let existing = self.get_permission_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut model = PermissionActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新权限失败: {e}")))?;

        self.get_permission_by_id_impl(id).await
    }

    pub async fn delete_permission_impl(&self, id: i64) -> Result<bool> {
        let result = Permissions::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除权限失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 创建角色并关联初始权限
    pub async fn create_role_impl(&self, req: CreateRoleRequest) -> Result<Role> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let role = RoleActiveModel {
            code: Set(req.code),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建角色失败: {e}")))?;

        let mut permission_ids = req.permission_ids;
        permission_ids.sort_unstable();
        permission_ids.dedup();
        insert_role_permissions(&txn, role.id, &permission_ids).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(role.into_role())
    }

    pub async fn get_role_by_id_impl(&self, id: i64) -> Result<Option<Role>> {
        let result = Roles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(result.map(|m| m.into_role()))
    }

    pub async fn get_role_by_code_impl(&self, code: &str) -> Result<Option<Role>> {
        let result = Roles::find()
            .filter(RoleColumn::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(result.map(|m| m.into_role()))
    }

    pub async fn list_roles_impl(&self) -> Result<Vec<Role>> {
        let roles = Roles::find()
            .order_by_asc(RoleColumn::Code)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询角色列表失败: {e}")))?;

        Ok(roles.into_iter().map(|m| m.into_role()).collect())
    }

    /// 删除角色（关联和分配级联删除）
    pub async fn delete_role_impl(&self, id: i64) -> Result<bool> {
        let result = Roles::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除角色失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_role_permissions_impl(&self, role_id: i64) -> Result<Vec<Permission>> {
        permissions_of_role(&self.db, role_id).await
    }

    pub async fn add_role_permission_impl(&self, role_id: i64, permission_id: i64) -> Result<bool> {
        let exists = RolePermissions::find()
            .filter(RolePermissionColumn::RoleId.eq(role_id))
            .filter(RolePermissionColumn::PermissionId.eq(permission_id))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询角色权限失败: {e}")))?
            > 0;
        if exists {
            return Ok(false);
        }

        insert_role_permissions(&self.db, role_id, &[permission_id]).await?;
        Ok(true)
    }

    pub async fn remove_role_permission_impl(
        &self,
        role_id: i64,
        permission_id: i64,
    ) -> Result<bool> {
        let result = RolePermissions::delete_many()
            .filter(RolePermissionColumn::RoleId.eq(role_id))
            .filter(RolePermissionColumn::PermissionId.eq(permission_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("移除角色权限失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 为用户分配角色
    pub async fn assign_user_role_impl(
        &self,
        user_id: i64,
        role_id: i64,
        window: ValidityWindow,
    ) -> Result<UserRoleAssignment> {
        let (valid_from, valid_until) = window_columns(&window);

        let result = UserRoleActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            valid_from: Set(valid_from),
            valid_until: Set(valid_until),
            assigned_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("分配角色失败: {e}")))?;

        Ok(result.into_assignment())
    }

    pub async fn revoke_user_role_impl(&self, user_id: i64, assignment_id: i64) -> Result<bool> {
        let result = UserRoles::delete_many()
            .filter(UserRoleColumn::Id.eq(assignment_id))
            .filter(UserRoleColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("撤销角色失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 直接授予用户权限
    pub async fn grant_user_permission_impl(
        &self,
        user_id: i64,
        permission_id: i64,
        window: ValidityWindow,
    ) -> Result<UserPermissionGrant> {
        let (valid_from, valid_until) = window_columns(&window);

        let result = UserPermissionActiveModel {
            user_id: Set(user_id),
            permission_id: Set(permission_id),
            valid_from: Set(valid_from),
            valid_until: Set(valid_until),
            granted_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("授予权限失败: {e}")))?;

        Ok(result.into_grant())
    }

    pub async fn revoke_user_permission_impl(&self, user_id: i64, grant_id: i64) -> Result<bool> {
        let result = UserPermissions::delete_many()
            .filter(UserPermissionColumn::Id.eq(grant_id))
            .filter(UserPermissionColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("撤销权限失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_user_role_assignments_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserRoleAssignment>> {
        let rows = UserRoles::find()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .order_by_asc(UserRoleColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询角色分配失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_assignment()).collect())
    }

    pub async fn list_user_permission_grants_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserPermissionGrant>> {
        let rows = UserPermissions::find()
            .filter(UserPermissionColumn::UserId.eq(user_id))
            .order_by_asc(UserPermissionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询直接授权失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_grant()).collect())
    }

    /// 加载基础角色、角色分配和直接授权三类权限来源
    pub async fn load_permission_sources_impl(&self, user: &User) -> Result<PermissionSources> {
        let mut sources = PermissionSources::default();

        if let Some(base_role) = self.get_role_by_code_impl(&user.role.role_code()).await? {
            sources.base_role = permissions_of_role(&self.db, base_role.id).await?;
        }

        for assignment in self.list_user_role_assignments_impl(user.id).await? {
            let permissions = permissions_of_role(&self.db, assignment.role_id).await?;
            sources.assigned_roles.push((assignment.window, permissions));
        }

        let grants = UserPermissions::find()
            .filter(UserPermissionColumn::UserId.eq(user.id))
            .find_also_related(Permissions)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询直接授权失败: {e}")))?;

        sources.direct_grants = grants
            .into_iter()
            .filter_map(|(grant, permission)| {
                permission.map(|p| (grant.into_grant().window, p.into_permission()))
            })
            .collect();

        Ok(sources)
    }

    /// 写入默认权限目录和内置角色；权限表非空时跳过
    pub async fn seed_default_permissions_impl(&self) -> Result<bool> {
        let existing = Permissions::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询权限总数失败: {e}")))?;
        if existing > 0 {
            return Ok(false);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let mut ids_by_code: HashMap<&str, i64> = HashMap::new();

        for (code, name, description) in DEFAULT_PERMISSIONS {
            let module = code.split('.').next().unwrap_or_default();
            let permission = PermissionActiveModel {
                code: Set(code.to_string()),
                name: Set(name.to_string()),
                description: Set(Some(description.to_string())),
                module: Set(module.to_string()),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("写入默认权限失败: {e}")))?;
            ids_by_code.insert(*code, permission.id);
        }

        for (code, name, permissions) in default_roles() {
            let role_id = match Roles::find()
                .filter(RoleColumn::Code.eq(code.as_str()))
                .one(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("查询角色失败: {e}")))?
            {
                Some(role) => role.id,
                None => {
                    RoleActiveModel {
                        code: Set(code.clone()),
                        name: Set(name.to_string()),
                        description: Set(None),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| {
                        SchoolHubError::database_operation(format!("写入内置角色失败: {e}"))
                    })?
                    .id
                }
            };

            let permission_ids: Vec<i64> = match permissions {
                Some(codes) => codes
                    .iter()
                    .filter_map(|c| ids_by_code.get(c).copied())
                    .collect(),
                None => {
                    let mut all: Vec<i64> = ids_by_code.values().copied().collect();
                    all.sort_unstable();
                    all
                }
            };

            let already: Vec<i64> = RolePermissions::find()
                .select_only()
                .column(RolePermissionColumn::PermissionId)
                .filter(RolePermissionColumn::RoleId.eq(role_id))
                .into_tuple()
                .all(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("查询角色权限失败: {e}")))?;

            let missing: Vec<i64> = permission_ids
                .into_iter()
                .filter(|id| !already.contains(id))
                .collect();
            insert_role_permissions(&txn, role_id, &missing).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }
}
