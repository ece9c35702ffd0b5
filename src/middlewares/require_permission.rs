/*!
 * 基于权限代码的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用。管理员直接放行；其他用户按有效权限集合判断，
 * 权限来源（含有效期）以 `perms:{user_id}` 缓存，任何权限相关的写操作都会清空缓存。
 *
 * ```rust,ignore
 * web::resource("")
 *     .route(web::post().to(create_announcement))
 *     .wrap(RequirePermission::new(codes::ANNOUNCEMENTS_CREATE))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use chrono::Utc;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{error, info};

use super::create_error_response;
use crate::cache::{self, ObjectCache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{
    ErrorCode, permissions::entities::PermissionSources, users::entities::User,
};
use crate::storage::Storage;

/// 计算用户当前的有效权限
///
/// 缓存中保存的是权限来源及其有效期，每次调用都按当前时间重新求值，
/// 缓存期间到期或生效的授权会立即体现。
pub async fn effective_permissions(
    storage: &dyn Storage,
    cache: &dyn ObjectCache,
    user: &User,
) -> Result<Vec<String>> {
    let sources =
        permission_sources(storage, cache, user, AppConfig::get().cache.default_ttl).await?;
    Ok(sources.effective_at(Utc::now()))
}

/// 读取用户的权限来源（优先读取缓存）
pub async fn permission_sources(
    storage: &dyn Storage,
    cache: &dyn ObjectCache,
    user: &User,
    ttl: u64,
) -> Result<PermissionSources> {
    let key = cache::permissions_key(user.id);
    if let Some(sources) = cache::get_json::<PermissionSources>(cache, &key).await {
        return Ok(sources);
    }

    let sources = storage.load_permission_sources(user).await?;
    cache::insert_json(cache, key, &sources, ttl).await;
    Ok(sources)
}

#[derive(Clone)]
pub struct RequirePermission {
    code: &'static str,
}

impl RequirePermission {
    pub fn new(code: &'static str) -> Self {
        Self { code }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            code: self.code,
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    code: &'static str,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let code = self.code;

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();
            let Some(user) = user else {
                info!("Permission check failed: no user in request, RequireJWT must run first");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if user.is_admin() {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let storage = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|s| s.get_ref().clone());
            let cache = req
                .app_data::<web::Data<Arc<dyn ObjectCache>>>()
                .map(|c| c.get_ref().clone());

            let granted = match (storage, cache) {
                (Some(storage), Some(cache)) => {
                    match effective_permissions(storage.as_ref(), cache.as_ref(), &user).await {
                        Ok(codes) => codes.iter().any(|c| c == code),
                        Err(e) => {
                            error!("Failed to load permissions for user {}: {}", user.id, e);
                            return Ok(req.into_response(
                                create_error_response(
                                    StatusCode::INTERNAL_SERVER_ERROR,
                                    ErrorCode::InternalServerError,
                                    "Failed to check permissions",
                                )
                                .map_into_right_body(),
                            ));
                        }
                    }
                }
                _ => {
                    error!("Storage or cache missing from app data");
                    false
                }
            };

            if granted {
                Ok(srv.call(req).await?.map_into_left_body())
            } else {
                info!("Permission {} denied for user {}", code, user.id);
                Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::PermissionDenied,
                        &format!("Missing permission: {code}"),
                    )
                    .map_into_right_body(),
                ))
            }
        })
    }
}
