use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AcademicService;
use crate::models::{
    ApiResponse, ErrorCode,
    academic::{requests::CreatePeriodRequest, responses::PeriodListResponse},
};
use crate::services::is_unique_violation;

pub async fn list_periods(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_periods().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PeriodListResponse { items },
            "Period list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve period list: {e}"),
            )),
        ),
    }
}

pub async fn create_period(
    service: &AcademicService,
    request: &HttpRequest,
    period_data: CreatePeriodRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = period_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.get_period_by_name(period_data.name.trim()).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::PeriodAlreadyExists,
                "Period name already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to check period name: {}", e);
        }
    }

    match storage.create_period(period_data).await {
        Ok(period) => {
            info!("Period {} created", period.name);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(period, "Period created successfully")))
        }
        Err(e) => {
            let msg = format!("Period creation failed: {e}");
            error!("{}", msg);
            if is_unique_violation(&msg) {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::PeriodAlreadyExists,
                    "Period name already exists",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
            }
        }
    }
}

pub async fn get_period(
    service: &AcademicService,
    request: &HttpRequest,
    period_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_period_by_id(period_id).await {
        Ok(Some(period)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            period,
            "Period retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PeriodNotFound,
            "Period not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get period: {e}"),
            )),
        ),
    }
}

pub async fn delete_period(
    service: &AcademicService,
    request: &HttpRequest,
    period_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 学期下的评估与成绩级联删除
    match storage.delete_period(period_id).await {
        Ok(true) => {
            info!("Period {} deleted", period_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Period deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PeriodNotFound,
            "Period not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Period deletion failed: {e}"),
            )),
        ),
    }
}
