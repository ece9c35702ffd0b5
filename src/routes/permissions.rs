use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::permissions::defaults::codes;
use crate::models::permissions::requests::{
    AssignRoleRequest, CreatePermissionRequest, CreateRoleRequest, GrantPermissionRequest,
    PermissionListParams, RolePermissionRequest, UpdatePermissionRequest,
};
use crate::services::PermissionService;
use crate::utils::{SafeAssignmentIdI64, SafeIDI64, SafePermissionIdI64};

static PERMISSION_SERVICE: Lazy<PermissionService> = Lazy::new(PermissionService::new_lazy);

// 权限目录
pub async fn list_permissions(
    req: HttpRequest,
    query: web::Query<PermissionListParams>,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .list_permissions(&req, query.into_inner())
        .await
}

pub async fn create_permission(
    req: HttpRequest,
    permission_data: web::Json<CreatePermissionRequest>,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .create_permission(&req, permission_data.into_inner())
        .await
}

pub async fn get_permission(
    req: HttpRequest,
    permission_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE.get_permission(&req, permission_id.0).await
}

pub async fn update_permission(
    req: HttpRequest,
    permission_id: SafeIDI64,
    update_data: web::Json<UpdatePermissionRequest>,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .update_permission(&req, permission_id.0, update_data.into_inner())
        .await
}

pub async fn delete_permission(
    req: HttpRequest,
    permission_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .delete_permission(&req, permission_id.0)
        .await
}

// 角色
pub async fn list_roles(req: HttpRequest) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE.list_roles(&req).await
}

pub async fn create_role(
    req: HttpRequest,
    role_data: web::Json<CreateRoleRequest>,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .create_role(&req, role_data.into_inner())
        .await
}

pub async fn get_role(req: HttpRequest, role_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE.get_role(&req, role_id.0).await
}

pub async fn delete_role(req: HttpRequest, role_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE.delete_role(&req, role_id.0).await
}

pub async fn add_role_permission(
    req: HttpRequest,
    role_id: SafeIDI64,
    data: web::Json<RolePermissionRequest>,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .add_role_permission(&req, role_id.0, data.into_inner())
        .await
}

pub async fn remove_role_permission(
    req: HttpRequest,
    role_id: SafeIDI64,
    permission_id: SafePermissionIdI64,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .remove_role_permission(&req, role_id.0, permission_id.0)
        .await
}

// 用户授权
pub async fn list_user_assignments(
    req: HttpRequest,
    user_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .list_user_assignments(&req, user_id.0)
        .await
}

pub async fn assign_role(
    req: HttpRequest,
    user_id: SafeIDI64,
    data: web::Json<AssignRoleRequest>,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .assign_role(&req, user_id.0, data.into_inner())
        .await
}

pub async fn revoke_role(
    req: HttpRequest,
    user_id: SafeIDI64,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .revoke_role(&req, user_id.0, assignment_id.0)
        .await
}

pub async fn grant_permission(
    req: HttpRequest,
    user_id: SafeIDI64,
    data: web::Json<GrantPermissionRequest>,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .grant_permission(&req, user_id.0, data.into_inner())
        .await
}

pub async fn revoke_permission(
    req: HttpRequest,
    user_id: SafeIDI64,
    grant_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .revoke_permission(&req, user_id.0, grant_id.0)
        .await
}

pub async fn effective_permissions(
    req: HttpRequest,
    user_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE
        .effective_permissions(&req, user_id.0)
        .await
}

pub async fn my_permissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    PERMISSION_SERVICE.my_permissions(&req).await
}

pub fn configure_permission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/permissions")
            .wrap(middlewares::RequireJWT)
            // 任何登录用户都可以查询自己的有效权限
            .service(web::resource("/me").route(web::get().to(my_permissions)))
            .service(
                web::scope("")
                    .wrap(middlewares::RequirePermission::new(codes::PERMISSIONS_MANAGE))
                    .service(
                        web::resource("")
                            .route(web::get().to(list_permissions))
                            .route(web::post().to(create_permission)),
                    )
                    .service(
                        web::resource("/roles")
                            .route(web::get().to(list_roles))
                            .route(web::post().to(create_role)),
                    )
                    .service(
                        web::resource("/roles/{id}")
                            .route(web::get().to(get_role))
                            .route(web::delete().to(delete_role)),
                    )
                    .service(
                        web::resource("/roles/{id}/permissions")
                            .route(web::post().to(add_role_permission)),
                    )
                    .service(
                        web::resource("/roles/{id}/permissions/{permission_id}")
                            .route(web::delete().to(remove_role_permission)),
                    )
                    .service(
                        web::resource("/users/{id}").route(web::get().to(list_user_assignments)),
                    )
                    .service(
                        web::resource("/users/{id}/effective")
                            .route(web::get().to(effective_permissions)),
                    )
                    .service(
                        web::resource("/users/{id}/roles").route(web::post().to(assign_role)),
                    )
                    .service(
                        web::resource("/users/{id}/roles/{assignment_id}")
                            .route(web::delete().to(revoke_role)),
                    )
                    .service(
                        web::resource("/users/{id}/permissions")
                            .route(web::post().to(grant_permission)),
                    )
                    .service(
                        web::resource("/users/{id}/permissions/{assignment_id}")
                            .route(web::delete().to(revoke_permission)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(get_permission))
                            .route(web::put().to(update_permission))
                            .route(web::delete().to(delete_permission)),
                    ),
            ),
    );
}
