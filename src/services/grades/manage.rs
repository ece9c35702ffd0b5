use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::{GradeService, load_gradable_evaluation};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    evaluations::entities::Evaluation,
    grades::{
        entities::Grade,
        requests::{GradeListParams, UpdateGradeRequest, validate_comment},
        responses::GradeItem,
    },
    users::entities::User,
};
use crate::storage::Storage;

pub async fn list_grades(
    service: &GradeService,
    request: &HttpRequest,
    evaluation_id: i64,
    query: GradeListParams,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    if let Err(resp) = load_gradable_evaluation(&storage, &user, evaluation_id).await {
        return Ok(resp);
    }

    match storage
        .list_grades_by_evaluation(evaluation_id, query.pagination.page, query.pagination.size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grade list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve grade list: {e}"),
            )),
        ),
    }
}

/// 加载成绩并确认当前用户可以修改
async fn load_owned_grade(
    storage: &Arc<dyn Storage>,
    user: &User,
    grade_id: i64,
) -> Result<(Grade, Evaluation), HttpResponse> {
    let grade = match storage.get_grade_by_id(grade_id).await {
        Ok(Some(grade)) => grade,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GradeNotFound,
                "Grade not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get grade: {e}"),
                )),
            );
        }
    };
    let evaluation = load_gradable_evaluation(storage, user, grade.evaluation_id).await?;
    Ok((grade, evaluation))
}

pub async fn update_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
    update_data: UpdateGradeRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    let (current, evaluation) = match load_owned_grade(&storage, &user, grade_id).await {
        Ok(loaded) => loaded,
        Err(resp) => return Ok(resp),
    };

    let value = match update_data.value.as_ref().map(|v| v.resolve(evaluation.scale)) {
        Some(Ok(value)) => Some(value),
        Some(Err(msg)) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::GradeValueInvalid, msg)));
        }
        None => None,
    };

    // 合并后的评语需满足计分方式要求
    let merged_comment = update_data
        .comment
        .as_deref()
        .or(current.comment.as_deref());
    if let Err(msg) = validate_comment(evaluation.scale, merged_comment) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    match storage
        .update_grade(grade_id, value, update_data.comment, user.id)
        .await
    {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeItem::from(grade),
            "Grade updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Grade update failed: {e}"),
            )),
        ),
    }
}

pub async fn delete_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    if let Err(resp) = load_owned_grade(&storage, &user, grade_id).await {
        return Ok(resp);
    }

    match storage.delete_grade(grade_id).await {
        Ok(true) => {
            info!("Grade {} deleted by user {}", grade_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Grade deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Grade deletion failed: {e}"),
            )),
        ),
    }
}
