use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::UserService;
use crate::{
    middlewares::RequireJWT,
    models::{
        ApiResponse, ErrorCode, academic::requests::CourseListQuery, users::entities::UserRole,
    },
};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Cannot delete current user",
        )));
    }

    let storage = service.get_storage(request);

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get user information: {e}"),
            )));
        }
    };

    // 课程随教师级联删除，仍有任教课程时拒绝
    if user.role == UserRole::Teacher {
        let query = CourseListQuery {
            page: Some(1),
            size: Some(1),
            teacher_id: Some(user_id),
            search: None,
        };
        match storage.list_courses_with_pagination(query).await {
            Ok(courses) if courses.pagination.total > 0 => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::Conflict,
                    format!(
                        "Teacher still assigned to {} course(s), reassign them first",
                        courses.pagination.total
                    ),
                )));
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to check courses of teacher {}: {}", user_id, e);
                return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("User deletion failed: {e}"),
                )));
            }
        }
    }

    match storage.delete_user(user_id).await {
        Ok(true) => {
            info!("User {} ({}) deleted", user.username, user.role);
            // 缓存中的有效权限与 JWT 用户信息失效
            service.get_cache(request).invalidate_all().await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("User deletion failed: {e}"),
            )),
        ),
    }
}
