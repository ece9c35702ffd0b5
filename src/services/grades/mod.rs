pub mod aggregate;
pub mod manage;
pub mod record;
pub mod reports;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    evaluations::entities::Evaluation,
    grades::requests::{
        BulkGradeRequest, CourseResultsParams, GradeListParams, RecordGradeRequest,
        StudentReportParams, UpdateGradeRequest,
    },
    users::entities::User,
};
use crate::services::academic::load_course_for_staff;
use crate::services::evaluations::load_evaluation;
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
        query: GradeListParams,
    ) -> ActixResult<HttpResponse> {
        manage::list_grades(self, request, evaluation_id, query).await
    }

    pub async fn record_grade(
        &self,
        request: &HttpRequest,
        grade_data: RecordGradeRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_grade(self, request, grade_data).await
    }

    pub async fn record_bulk(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
        bulk_data: BulkGradeRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_bulk(self, request, evaluation_id, bulk_data).await
    }

    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
        update_data: UpdateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_grade(self, request, grade_id, update_data).await
    }

    pub async fn delete_grade(&self, request: &HttpRequest, grade_id: i64) -> ActixResult<HttpResponse> {
        manage::delete_grade(self, request, grade_id).await
    }

    pub async fn course_results(
        &self,
        request: &HttpRequest,
        course_id: i64,
        query: CourseResultsParams,
    ) -> ActixResult<HttpResponse> {
        reports::course_results(self, request, course_id, query).await
    }

    pub async fn student_report(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: StudentReportParams,
    ) -> ActixResult<HttpResponse> {
        reports::student_report(self, request, student_id, query).await
    }

    pub async fn my_report(
        &self,
        request: &HttpRequest,
        query: StudentReportParams,
    ) -> ActixResult<HttpResponse> {
        reports::my_report(self, request, query).await
    }
}

/// 加载评估并确认当前用户可以为其录入成绩
async fn load_gradable_evaluation(
    storage: &Arc<dyn Storage>,
    user: &User,
    evaluation_id: i64,
) -> Result<Evaluation, HttpResponse> {
    let evaluation = load_evaluation(storage, evaluation_id).await?;
    load_course_for_staff(storage, user, evaluation.course_id).await?;
    Ok(evaluation)
}

/// 课程已选学生 ID 集合
async fn enrolled_student_ids(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> Result<HashSet<i64>, HttpResponse> {
    match storage.list_course_students(course_id).await {
        Ok(students) => Ok(students.into_iter().map(|s| s.student.id).collect()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load course students: {e}"),
            )),
        ),
    }
}
