use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::PermissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    permissions::requests::{
        CreatePermissionRequest, PermissionListParams, PermissionListQuery,
        UpdatePermissionRequest,
    },
};
use crate::services::is_unique_violation;

pub async fn list_permissions(
    service: &PermissionService,
    request: &HttpRequest,
    query: PermissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_permissions_with_pagination(PermissionListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Permission list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve permission list: {e}"),
            )),
        ),
    }
}

pub async fn get_permission(
    service: &PermissionService,
    request: &HttpRequest,
    permission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_permission_by_id(permission_id).await {
        Ok(Some(permission)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            permission,
            "Permission retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PermissionNotFound,
            "Permission not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get permission: {e}"),
            )),
        ),
    }
}

pub async fn create_permission(
    service: &PermissionService,
    request: &HttpRequest,
    mut permission_data: CreatePermissionRequest,
) -> ActixResult<HttpResponse> {
    permission_data.code = permission_data.code.trim().to_string();
    if let Err(msg) = permission_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.get_permission_by_code(&permission_data.code).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::PermissionAlreadyExists,
                "Permission code already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => error!("Failed to check permission code: {}", e),
    }

    match storage.create_permission(permission_data).await {
        Ok(permission) => {
            service.invalidate(request).await;
            info!("Permission {} created", permission.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                permission,
                "Permission created successfully",
            )))
        }
        Err(e) => {
            let msg = format!("Permission creation failed: {e}");
            error!("{}", msg);
            if is_unique_violation(&msg) {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::PermissionAlreadyExists,
                    "Permission code already exists",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
            }
        }
    }
}

pub async fn update_permission(
    service: &PermissionService,
    request: &HttpRequest,
    permission_id: i64,
    update_data: UpdatePermissionRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = update_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.update_permission(permission_id, update_data).await {
        Ok(Some(permission)) => {
            service.invalidate(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                permission,
                "Permission updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PermissionNotFound,
            "Permission not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Permission update failed: {e}"),
            )),
        ),
    }
}

pub async fn delete_permission(
    service: &PermissionService,
    request: &HttpRequest,
    permission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 角色关联与直接授权随外键级联删除
    match storage.delete_permission(permission_id).await {
        Ok(true) => {
            service.invalidate(request).await;
            info!("Permission {} deleted", permission_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Permission deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PermissionNotFound,
            "Permission not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Permission deletion failed: {e}"),
            )),
        ),
    }
}
