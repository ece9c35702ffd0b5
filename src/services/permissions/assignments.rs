use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PermissionService;
use crate::middlewares::{RequireJWT, require_permission};
use crate::models::{
    ApiResponse, ErrorCode,
    permissions::{
        requests::{AssignRoleRequest, GrantPermissionRequest},
        responses::{EffectivePermissionsResponse, UserAssignmentsResponse},
    },
    users::entities::User,
};

/// 确认目标用户存在
async fn ensure_user(
    service: &PermissionService,
    request: &HttpRequest,
    user_id: i64,
) -> Result<User, HttpResponse> {
    match service.get_storage(request).get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get user: {e}"),
            )),
        ),
    }
}

pub async fn list_user_assignments(
    service: &PermissionService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = ensure_user(service, request, user_id).await {
        return Ok(resp);
    }

    let storage = service.get_storage(request);

    let roles = match storage.list_user_role_assignments(user_id).await {
        Ok(list) => list,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to list role assignments: {e}"),
                )),
            );
        }
    };
    let permissions = match storage.list_user_permission_grants(user_id).await {
        Ok(list) => list,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to list permission grants: {e}"),
                )),
            );
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserAssignmentsResponse {
            user_id,
            roles,
            permissions,
        },
        "User assignments retrieved successfully",
    )))
}

pub async fn assign_role(
    service: &PermissionService,
    request: &HttpRequest,
    user_id: i64,
    data: AssignRoleRequest,
) -> ActixResult<HttpResponse> {
    let window = data.window();
    if let Err(msg) = window.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    if let Err(resp) = ensure_user(service, request, user_id).await {
        return Ok(resp);
    }

    let storage = service.get_storage(request);

    match storage.get_role_by_id(data.role_id).await {
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

    match storage.assign_user_role(user_id, data.role_id, window).await {
        Ok(assignment) => {
            service.invalidate(request).await;
            info!("Role {} assigned to user {}", data.role_id, user_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Role assigned successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Role assignment failed: {e}"),
            )),
        ),
    }
}

pub async fn revoke_role(
    service: &PermissionService,
    request: &HttpRequest,
    user_id: i64,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.revoke_user_role(user_id, assignment_id).await {
        Ok(true) => {
            service.invalidate(request).await;
            info!("Role assignment {} revoked from user {}", assignment_id, user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Role revoked successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Role assignment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to revoke role: {e}"),
            )),
        ),
    }
}

pub async fn grant_permission(
    service: &PermissionService,
    request: &HttpRequest,
    user_id: i64,
    data: GrantPermissionRequest,
) -> ActixResult<HttpResponse> {
    let window = data.window();
    if let Err(msg) = window.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    if let Err(resp) = ensure_user(service, request, user_id).await {
        return Ok(resp);
    }

    let storage = service.get_storage(request);

    match storage.get_permission_by_id(data.permission_id).await {
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

    match storage
        .grant_user_permission(user_id, data.permission_id, window)
        .await
    {
        Ok(grant) => {
            service.invalidate(request).await;
            info!("Permission {} granted to user {}", data.permission_id, user_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                grant,
                "Permission granted successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Permission grant failed: {e}"),
            )),
        ),
    }
}

pub async fn revoke_permission(
    service: &PermissionService,
    request: &HttpRequest,
    user_id: i64,
    grant_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.revoke_user_permission(user_id, grant_id).await {
        Ok(true) => {
            service.invalidate(request).await;
            info!("Permission grant {} revoked from user {}", grant_id, user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Permission revoked successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Permission grant not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to revoke permission: {e}"),
            )),
        ),
    }
}

/// 查询有效权限；`user_id` 为空时查询当前用户
pub async fn effective_permissions(
    service: &PermissionService,
    request: &HttpRequest,
    user_id: Option<i64>,
) -> ActixResult<HttpResponse> {
    let user = match user_id {
        Some(id) => match ensure_user(service, request, id).await {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        },
        None => match RequireJWT::extract_user_claims(request) {
            Some(user) => user,
            None => {
                return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                    ErrorCode::Unauthorized,
                    "Unauthorized: missing user",
                )));
            }
        },
    };

    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    match require_permission::effective_permissions(storage.as_ref(), cache.as_ref(), &user).await
    {
        Ok(permissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EffectivePermissionsResponse {
                user_id: user.id,
                role: user.role.clone(),
                is_admin: user.is_admin(),
                permissions,
            },
            "Effective permissions retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to compute permissions: {e}"),
            )),
        ),
    }
}
