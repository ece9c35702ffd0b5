use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EvaluationService, load_evaluation};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, evaluations::responses::EvaluationStatsResponse,
};
use crate::services::academic::load_course_for_staff;
use crate::services::grades::aggregate::{distribution, summarize};

pub async fn get_evaluation_stats(
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

    let evaluation = match load_evaluation(&storage, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = load_course_for_staff(&storage, &user, evaluation.course_id).await {
        return Ok(resp);
    }

    let enrolled_count = match storage.list_course_students(evaluation.course_id).await {
        Ok(students) => students.len() as i64,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to count enrolled students: {e}"),
                )),
            );
        }
    };

    let grades = match storage
        .list_grades_for_evaluations(&[evaluation_id], None)
        .await
    {
        Ok(grades) => grades,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load grades: {e}"),
                )),
            );
        }
    };

    let values: Vec<f64> = grades.iter().map(|g| g.value).collect();

    let response = EvaluationStatsResponse {
        evaluation_id,
        enrolled_count,
        graded_count: values.len() as i64,
        summary: summarize(&values),
        distribution: distribution(&values),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Evaluation statistics retrieved successfully",
    )))
}
