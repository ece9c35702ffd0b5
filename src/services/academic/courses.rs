use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AcademicService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    academic::{
        requests::{CourseListParams, CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    common::pagination::paginate_slice,
    users::entities::UserRole,
};
use crate::services::is_unique_violation;
use crate::storage::Storage;

pub async fn list_courses(
    service: &AcademicService,
    request: &HttpRequest,
    query: CourseListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let (uid, role) = match (
        RequireJWT::extract_user_id(request),
        RequireJWT::extract_user_role(request),
    ) {
        (Some(uid), Some(role)) => (uid, role),
        _ => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user id",
            )));
        }
    };

    // 学生只能看到自己选修的课程
    if role == UserRole::Student {
        return match storage.list_student_courses(uid).await {
            Ok(courses) => {
                let (items, pagination) =
                    paginate_slice(courses, query.pagination.page, query.pagination.size);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    CourseListResponse { items, pagination },
                    "Course list retrieved successfully",
                )))
            }
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve course list: {e}"),
                )),
            ),
        };
    }

    match storage
        .list_courses_with_pagination(CourseListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve course list: {e}"),
            )),
        ),
    }
}

pub async fn create_course(
    service: &AcademicService,
    request: &HttpRequest,
    mut course_data: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    course_data.code = course_data.code.trim().to_uppercase();
    if let Err(msg) = course_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    // 课程代码唯一
    if let Ok(Some(_)) = storage.get_course_by_code(&course_data.code).await {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::CourseAlreadyExists,
            format!("Course code {} already exists", course_data.code),
        )));
    }

    if let Err(resp) = check_teacher(&storage, course_data.teacher_id).await {
        return Ok(resp);
    }

    match storage.create_course(course_data).await {
        Ok(course) => {
            info!("Course {} created", course.code);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(course, "Course created successfully")))
        }
        Err(e) => Ok(handle_course_write_error(&e.to_string())),
    }
}

pub async fn get_course(
    service: &AcademicService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get course information: {e}"),
            )),
        ),
    }
}

pub async fn update_course(
    service: &AcademicService,
    request: &HttpRequest,
    course_id: i64,
    update_data: UpdateCourseRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = update_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    if let Some(teacher_id) = update_data.teacher_id
        && let Err(resp) = check_teacher(&storage, teacher_id).await
    {
        return Ok(resp);
    }

    match storage.update_course(course_id, update_data).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(handle_course_write_error(&e.to_string())),
    }
}

pub async fn delete_course(
    service: &AcademicService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_course(course_id).await {
        Ok(true) => {
            info!("Course {} deleted", course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Course deletion failed: {e}"),
            )),
        ),
    }
}

/// 课程负责人必须是教师
async fn check_teacher(storage: &Arc<dyn Storage>, teacher_id: i64) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.role == UserRole::Teacher => Ok(()),
        Ok(Some(_)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Courses can only be assigned to teachers",
        ))),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Teacher not found",
        ))),
        Err(e) => {
            error!("Failed to get user by id: {}", e);
            Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching teacher",
                )),
            )
        }
    }
}

/// 错误响应辅助函数
fn handle_course_write_error(e: &str) -> HttpResponse {
    let msg = format!("Course write failed: {e}");
    error!("{}", msg);
    if is_unique_violation(&msg) {
        HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::CourseAlreadyExists,
            "Course code already exists",
        ))
    } else {
        HttpResponse::InternalServerError()
            .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg))
    }
}
