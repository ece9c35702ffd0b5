use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::{
    BulkGradeRequest, CourseResultsParams, GradeListParams, RecordGradeRequest,
    StudentReportParams, UpdateGradeRequest,
};
use crate::models::permissions::defaults::codes;
use crate::services::GradeService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_evaluation_grades(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
    query: web::Query<GradeListParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .list_grades(&req, evaluation_id.0, query.into_inner())
        .await
}

pub async fn record_bulk_grades(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
    bulk_data: web::Json<BulkGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .record_bulk(&req, evaluation_id.0, bulk_data.into_inner())
        .await
}

pub async fn record_grade(
    req: HttpRequest,
    grade_data: web::Json<RecordGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.record_grade(&req, grade_data.into_inner()).await
}

pub async fn update_grade(
    req: HttpRequest,
    grade_id: SafeIDI64,
    update_data: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .update_grade(&req, grade_id.0, update_data.into_inner())
        .await
}

pub async fn delete_grade(req: HttpRequest, grade_id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.delete_grade(&req, grade_id.0).await
}

pub async fn course_results(
    req: HttpRequest,
    course_id: SafeIDI64,
    query: web::Query<CourseResultsParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .course_results(&req, course_id.0, query.into_inner())
        .await
}

pub async fn student_report(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<StudentReportParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .student_report(&req, student_id.0, query.into_inner())
        .await
}

pub async fn my_report(
    req: HttpRequest,
    query: web::Query<StudentReportParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.my_report(&req, query.into_inner()).await
}

pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::post()
                        .to(record_grade)
                        .wrap(middlewares::RequirePermission::new(codes::GRADES_RECORD)),
                ),
            )
            .service(
                web::resource("/me").route(
                    web::get()
                        .to(my_report)
                        .wrap(middlewares::RequirePermission::new(codes::GRADES_VIEW_OWN)),
                ),
            )
            .service(
                web::resource("/courses/{id}").route(
                    web::get()
                        .to(course_results)
                        .wrap(middlewares::RequirePermission::new(codes::GRADES_READ)),
                ),
            )
            .service(
                web::resource("/students/{student_id}").route(
                    web::get()
                        .to(student_report)
                        .wrap(middlewares::RequirePermission::new(codes::GRADES_READ)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_grade)
                            .wrap(middlewares::RequirePermission::new(codes::GRADES_RECORD)),
                    )
                    .route(
                        web::delete()
                            .to(delete_grade)
                            .wrap(middlewares::RequirePermission::new(codes::GRADES_RECORD)),
                    ),
            ),
    );
}
