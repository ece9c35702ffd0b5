pub mod crud;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    evaluations::{
        entities::{Evaluation, exceeds_weight_limit},
        requests::{CreateEvaluationRequest, EvaluationListParams, UpdateEvaluationRequest},
    },
};
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
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

    pub async fn list_evaluations(
        &self,
        request: &HttpRequest,
        query: EvaluationListParams,
    ) -> ActixResult<HttpResponse> {
        crud::list_evaluations(self, request, query).await
    }

    pub async fn get_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        crud::get_evaluation(self, request, evaluation_id).await
    }

    pub async fn create_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_data: CreateEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        crud::create_evaluation(self, request, evaluation_data).await
    }

    pub async fn update_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
        update_data: UpdateEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        crud::update_evaluation(self, request, evaluation_id, update_data).await
    }

    pub async fn delete_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        crud::delete_evaluation(self, request, evaluation_id).await
    }

    pub async fn get_evaluation_stats(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        stats::get_evaluation_stats(self, request, evaluation_id).await
    }
}

/// 按 ID 加载评估
pub(crate) async fn load_evaluation(
    storage: &Arc<dyn Storage>,
    evaluation_id: i64,
) -> Result<Evaluation, HttpResponse> {
    match storage.get_evaluation_by_id(evaluation_id).await {
        Ok(Some(evaluation)) => Ok(evaluation),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get evaluation: {e}"),
            )),
        ),
    }
}

/// 校验加入新权重后同一课程同一学期的权重总和不超过上限
async fn check_weight_budget(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    period_id: i64,
    weight: f64,
    exclude_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let existing = storage
        .total_evaluation_weight(course_id, period_id, exclude_id)
        .await
        .map_err(|e| {
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to sum evaluation weights: {e}"),
            ))
        })?;

    if exceeds_weight_limit(existing, weight) {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EvaluationWeightExceeded,
            format!(
                "Total weight would exceed 100 (current {existing}, requested {weight})"
            ),
        )));
    }
    Ok(())
}
