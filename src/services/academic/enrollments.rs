use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{AcademicService, load_course_for_staff};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    academic::{requests::EnrollStudentRequest, responses::EnrolledStudentListResponse},
    users::entities::UserRole,
};
use crate::services::is_unique_violation;

pub async fn list_course_students(
    service: &AcademicService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    if let Err(resp) = load_course_for_staff(&storage, &user, course_id).await {
        return Ok(resp);
    }

    match storage.list_course_students(course_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrolledStudentListResponse { course_id, items },
            "Course students retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve course students: {e}"),
            )),
        ),
    }
}

pub async fn enroll_student(
    service: &AcademicService,
    request: &HttpRequest,
    course_id: i64,
    enroll_data: EnrollStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    if let Err(resp) = load_course_for_staff(&storage, &user, course_id).await {
        return Ok(resp);
    }

    // 只有学生可以选课
    match storage.get_user_by_id(enroll_data.student_id).await {
        Ok(Some(student)) if student.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                "Only students can be enrolled",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get student: {e}"),
                )),
            );
        }
    }

    match storage.is_student_enrolled(course_id, enroll_data.student_id).await {
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "Student is already enrolled",
            )));
        }
        Ok(false) => {}
        Err(e) => error!("Failed to check enrollment: {}", e),
    }

    match storage.enroll_student(course_id, enroll_data.student_id).await {
        Ok(enrollment) => {
            info!(
                "Student {} enrolled in course {} by {}",
                enrollment.student_id, course_id, user.id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(enrollment, "Student enrolled successfully")))
        }
        Err(e) => {
            let msg = format!("Enrollment failed: {e}");
            error!("{}", msg);
            if is_unique_violation(&msg) {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::AlreadyEnrolled,
                    "Student is already enrolled",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
            }
        }
    }
}

pub async fn unenroll_student(
    service: &AcademicService,
    request: &HttpRequest,
    course_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    if let Err(resp) = load_course_for_staff(&storage, &user, course_id).await {
        return Ok(resp);
    }

    match storage.unenroll_student(course_id, student_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student unenrolled successfully"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Unenrollment failed: {e}"),
            )),
        ),
    }
}
