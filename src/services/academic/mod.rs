pub mod courses;
pub mod enrollments;
pub mod periods;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    academic::{
        entities::Course,
        requests::{
            CourseListParams, CreateCourseRequest, CreatePeriodRequest, EnrollStudentRequest,
            UpdateCourseRequest,
        },
    },
    users::entities::User,
};
use crate::storage::Storage;

pub struct AcademicService {
    storage: Option<Arc<dyn Storage>>,
}

impl AcademicService {
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

    // 学期
    pub async fn list_periods(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        periods::list_periods(self, request).await
    }

    pub async fn create_period(
        &self,
        request: &HttpRequest,
        period_data: CreatePeriodRequest,
    ) -> ActixResult<HttpResponse> {
        periods::create_period(self, request, period_data).await
    }

    pub async fn get_period(&self, request: &HttpRequest, period_id: i64) -> ActixResult<HttpResponse> {
        periods::get_period(self, request, period_id).await
    }

    pub async fn delete_period(
        &self,
        request: &HttpRequest,
        period_id: i64,
    ) -> ActixResult<HttpResponse> {
        periods::delete_period(self, request, period_id).await
    }

    // 课程
    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        query: CourseListParams,
    ) -> ActixResult<HttpResponse> {
        courses::list_courses(self, request, query).await
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        course_data: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        courses::create_course(self, request, course_data).await
    }

    pub async fn get_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        courses::get_course(self, request, course_id).await
    }

    pub async fn update_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        update_data: UpdateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        courses::update_course(self, request, course_id, update_data).await
    }

    pub async fn delete_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        courses::delete_course(self, request, course_id).await
    }

    // 选课
    pub async fn list_course_students(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        enrollments::list_course_students(self, request, course_id).await
    }

    pub async fn enroll_student(
        &self,
        request: &HttpRequest,
        course_id: i64,
        enroll_data: EnrollStudentRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::enroll_student(self, request, course_id, enroll_data).await
    }

    pub async fn unenroll_student(
        &self,
        request: &HttpRequest,
        course_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        enrollments::unenroll_student(self, request, course_id, student_id).await
    }
}

/// 加载课程并确认当前用户是管理员或该课程教师
pub(crate) async fn load_course_for_staff(
    storage: &Arc<dyn Storage>,
    user: &User,
    course_id: i64,
) -> Result<Course, HttpResponse> {
    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get course information: {e}"),
                )),
            );
        }
    };

    if !user.is_admin() && course.teacher_id != user.id {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "Only the course teacher or an admin can perform this action",
        )));
    }

    Ok(course)
}
