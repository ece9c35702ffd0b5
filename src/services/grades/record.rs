use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{GradeService, enrolled_student_ids, load_gradable_evaluation};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    evaluations::entities::Evaluation,
    grades::{
        requests::{BulkGradeRequest, GradeInput, RecordGradeRequest, validate_comment},
        responses::{BulkGradeResponse, GradeItem},
    },
};
use crate::storage::GradeWrite;

/// 按评估的计分方式校验单条成绩
fn prepare_write(
    evaluation: &Evaluation,
    student_id: i64,
    value: &GradeInput,
    comment: Option<String>,
) -> Result<GradeWrite, String> {
    let value = value.resolve(evaluation.scale)?;
    validate_comment(evaluation.scale, comment.as_deref())?;
    Ok(GradeWrite {
        student_id,
        value,
        comment,
    })
}

pub async fn record_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_data: RecordGradeRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    let evaluation = match load_gradable_evaluation(&storage, &user, grade_data.evaluation_id).await
    {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    let write = match prepare_write(
        &evaluation,
        grade_data.student_id,
        &grade_data.value,
        grade_data.comment,
    ) {
        Ok(write) => write,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::GradeValueInvalid, msg)));
        }
    };

    match storage
        .is_student_enrolled(evaluation.course_id, write.student_id)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::StudentNotEnrolled,
                "Student is not enrolled in this course",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check enrollment: {e}"),
                )),
            );
        }
    }

    match storage
        .upsert_grades(evaluation.id, user.id, vec![write])
        .await
    {
        Ok(mut grades) if !grades.is_empty() => {
            let grade = grades.remove(0);
            info!(
                "Grade recorded for student {} on evaluation {} by user {}",
                grade.student_id, grade.evaluation_id, user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                GradeItem::from(grade),
                "Grade recorded successfully",
            )))
        }
        Ok(_) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Grade was not saved",
            )),
        ),
        Err(e) => {
            error!("Failed to record grade: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to record grade: {e}"),
                )),
            )
        }
    }
}

pub async fn record_bulk(
    service: &GradeService,
    request: &HttpRequest,
    evaluation_id: i64,
    bulk_data: BulkGradeRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = bulk_data.validate_shape() {
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

    let evaluation = match load_gradable_evaluation(&storage, &user, evaluation_id).await {
        Ok(evaluation) => evaluation,
        Err(resp) => return Ok(resp),
    };

    let enrolled = match enrolled_student_ids(&storage, evaluation.course_id).await {
        Ok(ids) => ids,
        Err(resp) => return Ok(resp),
    };

    // 任意一条不合法则整批拒绝
    let mut writes = Vec::with_capacity(bulk_data.grades.len());
    for item in bulk_data.grades {
        if !enrolled.contains(&item.student_id) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::StudentNotEnrolled,
                format!("Student {} is not enrolled in this course", item.student_id),
            )));
        }
        match prepare_write(&evaluation, item.student_id, &item.value, item.comment) {
            Ok(write) => writes.push(write),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::GradeValueInvalid,
                    format!("Student {}: {msg}", item.student_id),
                )));
            }
        }
    }

    match storage.upsert_grades(evaluation.id, user.id, writes).await {
        Ok(grades) => {
            info!(
                "{} grades recorded on evaluation {} by user {}",
                grades.len(),
                evaluation.id,
                user.id
            );
            let items: Vec<GradeItem> = grades.into_iter().map(GradeItem::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BulkGradeResponse {
                    evaluation_id: evaluation.id,
                    saved: items.len() as i64,
                    items,
                },
                "Grades recorded successfully",
            )))
        }
        Err(e) => {
            error!("Failed to record grades in bulk: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to record grades: {e}"),
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::{EvaluationScale, EvaluationType};
    use chrono::Utc;

    fn evaluation(scale: EvaluationScale) -> Evaluation {
        Evaluation {
            id: 4,
            name: "Exposición".to_string(),
            description: None,
            evaluation_type: EvaluationType::Presentation,
            scale,
            weight: 20.0,
            scheduled_at: None,
            course_id: 2,
            period_id: 1,
            created_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_prepare_write_maps_literal() {
        let write = prepare_write(
            &evaluation(EvaluationScale::Literal),
            9,
            &GradeInput::Literal("A".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(write.student_id, 9);
        assert_eq!(write.value, 15.5);
    }

    #[test]
    fn test_prepare_write_requires_descriptive_comment() {
        let eval = evaluation(EvaluationScale::Descriptive);
        assert!(prepare_write(&eval, 9, &GradeInput::Score(14.0), None).is_err());
        let write = prepare_write(
            &eval,
            9,
            &GradeInput::Score(14.0),
            Some("Expone con claridad".to_string()),
        )
        .unwrap();
        assert_eq!(write.comment.as_deref(), Some("Expone con claridad"));
    }

    #[test]
    fn test_prepare_write_rejects_out_of_range() {
        let eval = evaluation(EvaluationScale::Numeric);
        assert!(prepare_write(&eval, 9, &GradeInput::Score(21.0), None).is_err());
    }
}
