use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use super::UserService;
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::academic::entities::Course;
use crate::models::academic::requests::CourseListQuery;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::responses::UserProfileResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 档案中最多列出的任教课程数
const PROFILE_COURSE_LIMIT: i64 = 100;

async fn profile_courses(storage: &Arc<dyn Storage>, user: &User) -> Result<Vec<Course>> {
    match user.role {
        UserRole::Student => storage.list_student_courses(user.id).await,
        UserRole::Teacher => {
            let query = CourseListQuery {
                page: Some(1),
                size: Some(PROFILE_COURSE_LIMIT),
                teacher_id: Some(user.id),
                search: None,
            };
            Ok(storage.list_courses_with_pagination(query).await?.items)
        }
        UserRole::Admin => Ok(Vec::new()),
    }
}

async fn build_profile(storage: &Arc<dyn Storage>, user: User) -> HttpResponse {
    match profile_courses(storage, &user).await {
        Ok(courses) => HttpResponse::Ok().json(ApiResponse::success(
            UserProfileResponse { user, courses },
            "User information retrieved successfully",
        )),
        Err(e) => {
            error!("Failed to load courses for user {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load user courses: {e}"),
            ))
        }
    }
}

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(build_profile(&storage, user).await),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get user information: {e}"),
            )),
        ),
    }
}

/// 当前登录用户的档案（JWT 中间件已加载用户）
pub async fn get_current_user(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);
    Ok(build_profile(&storage, user).await)
}
