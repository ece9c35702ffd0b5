pub mod assignments;
pub mod catalogue;
pub mod roles;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::permissions::requests::{
    AssignRoleRequest, CreatePermissionRequest, CreateRoleRequest, GrantPermissionRequest,
    PermissionListParams, RolePermissionRequest, UpdatePermissionRequest,
};
use crate::storage::Storage;

pub struct PermissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl PermissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    /// 权限数据变更后清空缓存的有效权限
    pub(crate) async fn invalidate(&self, request: &HttpRequest) {
        self.get_cache(request).invalidate_all().await;
    }

    // 权限目录
    pub async fn list_permissions(
        &self,
        request: &HttpRequest,
        query: PermissionListParams,
    ) -> ActixResult<HttpResponse> {
        catalogue::list_permissions(self, request, query).await
    }

    pub async fn get_permission(
        &self,
        request: &HttpRequest,
        permission_id: i64,
    ) -> ActixResult<HttpResponse> {
        catalogue::get_permission(self, request, permission_id).await
    }

    pub async fn create_permission(
        &self,
        request: &HttpRequest,
        permission_data: CreatePermissionRequest,
    ) -> ActixResult<HttpResponse> {
        catalogue::create_permission(self, request, permission_data).await
    }

    pub async fn update_permission(
        &self,
        request: &HttpRequest,
        permission_id: i64,
        update_data: UpdatePermissionRequest,
    ) -> ActixResult<HttpResponse> {
        catalogue::update_permission(self, request, permission_id, update_data).await
    }

    pub async fn delete_permission(
        &self,
        request: &HttpRequest,
        permission_id: i64,
    ) -> ActixResult<HttpResponse> {
        catalogue::delete_permission(self, request, permission_id).await
    }

    // 角色
    pub async fn list_roles(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roles::list_roles(self, request).await
    }

    pub async fn create_role(
        &self,
        request: &HttpRequest,
        role_data: CreateRoleRequest,
    ) -> ActixResult<HttpResponse> {
        roles::create_role(self, request, role_data).await
    }

    pub async fn get_role(&self, request: &HttpRequest, role_id: i64) -> ActixResult<HttpResponse> {
        roles::get_role(self, request, role_id).await
    }

    pub async fn delete_role(&self, request: &HttpRequest, role_id: i64) -> ActixResult<HttpResponse> {
        roles::delete_role(self, request, role_id).await
    }

    pub async fn add_role_permission(
        &self,
        request: &HttpRequest,
        role_id: i64,
        data: RolePermissionRequest,
    ) -> ActixResult<HttpResponse> {
        roles::add_role_permission(self, request, role_id, data.permission_id).await
    }

    pub async fn remove_role_permission(
        &self,
        request: &HttpRequest,
        role_id: i64,
        permission_id: i64,
    ) -> ActixResult<HttpResponse> {
        roles::remove_role_permission(self, request, role_id, permission_id).await
    }

    // 用户授权
    pub async fn list_user_assignments(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::list_user_assignments(self, request, user_id).await
    }

    pub async fn assign_role(
        &self,
        request: &HttpRequest,
        user_id: i64,
        data: AssignRoleRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::assign_role(self, request, user_id, data).await
    }

    pub async fn revoke_role(
        &self,
        request: &HttpRequest,
        user_id: i64,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::revoke_role(self, request, user_id, assignment_id).await
    }

    pub async fn grant_permission(
        &self,
        request: &HttpRequest,
        user_id: i64,
        data: GrantPermissionRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::grant_permission(self, request, user_id, data).await
    }

    pub async fn revoke_permission(
        &self,
        request: &HttpRequest,
        user_id: i64,
        grant_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::revoke_permission(self, request, user_id, grant_id).await
    }

    pub async fn effective_permissions(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::effective_permissions(self, request, Some(user_id)).await
    }

    pub async fn my_permissions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        assignments::effective_permissions(self, request, None).await
    }
}
