use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::grades::{list_evaluation_grades, record_bulk_grades};
use crate::middlewares;
use crate::models::evaluations::requests::{
    CreateEvaluationRequest, EvaluationListParams, UpdateEvaluationRequest,
};
use crate::models::permissions::defaults::codes;
use crate::services::EvaluationService;
use crate::utils::SafeIDI64;

static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

pub async fn list_evaluations(
    req: HttpRequest,
    query: web::Query<EvaluationListParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_evaluations(&req, query.into_inner())
        .await
}

pub async fn create_evaluation(
    req: HttpRequest,
    evaluation_data: web::Json<CreateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .create_evaluation(&req, evaluation_data.into_inner())
        .await
}

pub async fn get_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.get_evaluation(&req, evaluation_id.0).await
}

pub async fn update_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
    update_data: web::Json<UpdateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .update_evaluation(&req, evaluation_id.0, update_data.into_inner())
        .await
}

pub async fn delete_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .delete_evaluation(&req, evaluation_id.0)
        .await
}

pub async fn get_evaluation_stats(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_evaluation_stats(&req, evaluation_id.0)
        .await
}

pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_evaluations)).route(
                    web::post()
                        .to(create_evaluation)
                        .wrap(middlewares::RequirePermission::new(codes::EVALUATIONS_MANAGE)),
                ),
            )
            .service(
                web::resource("/{id}/stats").route(
                    web::get()
                        .to(get_evaluation_stats)
                        .wrap(middlewares::RequirePermission::new(codes::GRADES_READ)),
                ),
            )
            .service(
                web::resource("/{id}/grades")
                    .route(
                        web::get()
                            .to(list_evaluation_grades)
                            .wrap(middlewares::RequirePermission::new(codes::GRADES_READ)),
                    )
                    .route(
                        web::post()
                            .to(record_bulk_grades)
                            .wrap(middlewares::RequirePermission::new(codes::GRADES_RECORD)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_evaluation))
                    .route(
                        web::put()
                            .to(update_evaluation)
                            .wrap(middlewares::RequirePermission::new(codes::EVALUATIONS_MANAGE)),
                    )
                    .route(
                        web::delete()
                            .to(delete_evaluation)
                            .wrap(middlewares::RequirePermission::new(codes::EVALUATIONS_MANAGE)),
                    ),
            ),
    );
}
