use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{EvaluationService, check_weight_budget, load_evaluation};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    evaluations::requests::{
        CreateEvaluationRequest, EvaluationListParams, EvaluationListQuery,
        UpdateEvaluationRequest,
    },
};
use crate::services::academic::load_course_for_staff;

pub async fn list_evaluations(
    service: &EvaluationService,
    request: &HttpRequest,
    query: EvaluationListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_evaluations_with_pagination(EvaluationListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Evaluation list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve evaluation list: {e}"),
            )),
        ),
    }
}

pub async fn get_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            evaluation,
            "Evaluation retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

pub async fn create_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_data: CreateEvaluationRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = evaluation_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    if let Err(resp) = load_course_for_staff(&storage, &user, evaluation_data.course_id).await {
        return Ok(resp);
    }

    match storage.get_period_by_id(evaluation_data.period_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::PeriodNotFound,
                "Period not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get period: {e}"),
                )),
            );
        }
    }

    if let Err(resp) = check_weight_budget(
        &storage,
        evaluation_data.course_id,
        evaluation_data.period_id,
        evaluation_data.weight,
        None,
    )
    .await
    {
        return Ok(resp);
    }

    match storage.create_evaluation(user.id, evaluation_data).await {
        Ok(evaluation) => {
            info!(
                "Evaluation {} created for course {} by user {}",
                evaluation.id, evaluation.course_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                evaluation,
                "Evaluation created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create evaluation: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Evaluation creation failed: {e}"),
                )),
            )
        }
    }
}

pub async fn update_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: i64,
    update_data: UpdateEvaluationRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = update_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    let current = match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = load_course_for_staff(&storage, &user, current.course_id).await {
        return Ok(resp);
    }

    if let Some(weight) = update_data.weight
        && let Err(resp) = check_weight_budget(
            &storage,
            current.course_id,
            current.period_id,
            weight,
            Some(evaluation_id),
        )
        .await
    {
        return Ok(resp);
    }

    match storage.update_evaluation(evaluation_id, update_data).await {
        Ok(Some(evaluation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            evaluation,
            "Evaluation updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) => {
            error!("Failed to update evaluation {}: {}", evaluation_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Evaluation update failed: {e}"),
                )),
            )
        }
    }
}

pub async fn delete_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    let current = match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = load_course_for_staff(&storage, &user, current.course_id).await {
        return Ok(resp);
    }

    // 评估下的成绩随外键级联删除
    match storage.delete_evaluation(evaluation_id).await {
        Ok(true) => {
            info!("Evaluation {} deleted by user {}", evaluation_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Evaluation deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Evaluation deletion failed: {e}"),
            )),
        ),
    }
}
