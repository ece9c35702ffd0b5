use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::PermissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    permissions::{
        requests::CreateRoleRequest,
        responses::{RoleDetailResponse, RoleListResponse},
    },
    users::entities::UserRole,
};
use crate::services::{is_foreign_key_violation, is_unique_violation};

/// 与用户基础角色同名的内置角色不可删除
fn is_builtin_role(code: &str) -> bool {
    UserRole::all_roles()
        .iter()
        .any(|role| role.role_code() == code)
}

pub async fn list_roles(service: &PermissionService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_roles().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RoleListResponse { items },
            "Role list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve role list: {e}"),
            )),
        ),
    }
}

pub async fn create_role(
    service: &PermissionService,
    request: &HttpRequest,
    mut role_data: CreateRoleRequest,
) -> ActixResult<HttpResponse> {
    role_data.code = role_data.code.trim().to_string();
    if let Err(msg) = role_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.get_role_by_code(&role_data.code).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::RoleAlreadyExists,
                "Role code already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => error!("Failed to check role code: {}", e),
    }

    match storage.create_role(role_data).await {
        Ok(role) => {
            service.invalidate(request).await;
            info!("Role {} created", role.code);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(role, "Role created successfully")))
        }
        Err(e) => {
            let msg = format!("Role creation failed: {e}");
            error!("{}", msg);
            if is_unique_violation(&msg) {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::RoleAlreadyExists,
                    "Role code already exists",
                )))
            } else if is_foreign_key_violation(&msg) {
                Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::PermissionNotFound,
                    "One or more permissions do not exist",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
            }
        }
    }
}

pub async fn get_role(
    service: &PermissionService,
    request: &HttpRequest,
    role_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let role = match storage.get_role_by_id(role_id).await {
        Ok(Some(role)) => role,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RoleNotFound,
                "Role not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get role: {e}"),
                )),
            );
        }
    };

    match storage.list_role_permissions(role_id).await {
        Ok(permissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RoleDetailResponse { role, permissions },
            "Role retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get role permissions: {e}"),
            )),
        ),
    }
}

pub async fn delete_role(
    service: &PermissionService,
    request: &HttpRequest,
    role_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_role_by_id(role_id).await {
        Ok(Some(role)) if is_builtin_role(&role.code) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Built-in roles cannot be deleted",
            )));
        }
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RoleNotFound,
                "Role not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get role: {e}"),
                )),
            );
        }
    }

    match storage.delete_role(role_id).await {
        Ok(true) => {
            service.invalidate(request).await;
            info!("Role {} deleted", role_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Role deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RoleNotFound,
            "Role not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Role deletion failed: {e}"),
            )),
        ),
    }
}

pub async fn add_role_permission(
    service: &PermissionService,
    request: &HttpRequest,
    role_id: i64,
    permission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_role_by_id(role_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RoleNotFound,
                "Role not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get role: {e}"),
                )),
            );
        }
    }

    match storage.get_permission_by_id(permission_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::PermissionNotFound,
                "Permission not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get permission: {e}"),
                )),
            );
        }
    }

    match storage.add_role_permission(role_id, permission_id).await {
        Ok(true) => {
            service.invalidate(request).await;
            Ok(HttpResponse::Created().json(ApiResponse::success_empty(
                "Permission added to role successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Role already has this permission",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to add permission to role: {e}"),
            )),
        ),
    }
}

pub async fn remove_role_permission(
    service: &PermissionService,
    request: &HttpRequest,
    role_id: i64,
    permission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.remove_role_permission(role_id, permission_id).await {
        Ok(true) => {
            service.invalidate(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Permission removed from role successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Role does not have this permission",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to remove permission from role: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roles() {
        assert!(is_builtin_role("ADMIN"));
        assert!(is_builtin_role("TEACHER"));
        assert!(is_builtin_role("STUDENT"));
        assert!(!is_builtin_role("LIBRARIAN"));
    }
}
