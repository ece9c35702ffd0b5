use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academic::requests::{
    CourseListParams, CreateCourseRequest, CreatePeriodRequest, EnrollStudentRequest,
    UpdateCourseRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AcademicService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 ACADEMIC_SERVICE 实例
static ACADEMIC_SERVICE: Lazy<AcademicService> = Lazy::new(AcademicService::new_lazy);

// 学期
pub async fn list_periods(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_periods(&req).await
}

pub async fn create_period(
    req: HttpRequest,
    period_data: web::Json<CreatePeriodRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_period(&req, period_data.into_inner())
        .await
}

pub async fn get_period(req: HttpRequest, period_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_period(&req, period_id.0).await
}

pub async fn delete_period(req: HttpRequest, period_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_period(&req, period_id.0).await
}

// 课程
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_course(&req, course_data.into_inner())
        .await
}

pub async fn get_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_course(&req, course_id.0).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeIDI64,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_course(&req, course_id.0, update_data.into_inner())
        .await
}

pub async fn delete_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_course(&req, course_id.0).await
}

// 选课
pub async fn list_course_students(
    req: HttpRequest,
    course_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_course_students(&req, course_id.0).await
}

pub async fn enroll_student(
    req: HttpRequest,
    course_id: SafeIDI64,
    enroll_data: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .enroll_student(&req, course_id.0, enroll_data.into_inner())
        .await
}

pub async fn unenroll_student(
    req: HttpRequest,
    course_id: SafeIDI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .unenroll_student(&req, course_id.0, student_id.0)
        .await
}

// 配置路由
pub fn configure_academic_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/periods")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_periods)).route(
                    web::post()
                        .to(create_period)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}").route(web::get().to(get_period)).route(
                    web::delete()
                        .to(delete_period)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );

    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                // 学生只看到自己选修的课程
                web::resource("").route(web::get().to(list_courses)).route(
                    web::post()
                        .to(create_course)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}/students")
                    .route(
                        web::get()
                            .to(list_course_students)
                            // 课程教师或管理员
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::post()
                            .to(enroll_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/students/{student_id}").route(
                    web::delete()
                        .to(unenroll_student)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_course))
                    .route(
                        web::put()
                            .to(update_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
