use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;

use super::GradeService;
use super::aggregate::{
    course_results as build_results, courses_visible_to, level_distribution, round2,
};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    grades::{
        entities::GradeLevel,
        requests::{CourseResultsParams, StudentReportParams},
        responses::{CourseResultsResponse, StudentReportResponse},
    },
    users::entities::{User, UserRole, UserSummary},
};
use crate::services::academic::load_course_for_staff;
use crate::storage::Storage;

fn internal_error(context: &str, e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {e}"),
    ))
}

pub async fn course_results(
    service: &GradeService,
    request: &HttpRequest,
    course_id: i64,
    query: CourseResultsParams,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    if let Err(resp) = load_course_for_staff(&storage, &user, course_id).await {
        return Ok(resp);
    }

    let evaluations = match storage
        .list_evaluations_for_courses(&[course_id], query.period_id)
        .await
    {
        Ok(list) => list,
        Err(e) => return Ok(internal_error("Failed to load evaluations", e)),
    };
    let evaluation_ids: Vec<i64> = evaluations.iter().map(|e| e.id).collect();

    let grades = match storage
        .list_grades_for_evaluations(&evaluation_ids, None)
        .await
    {
        Ok(list) => list,
        Err(e) => return Ok(internal_error("Failed to load grades", e)),
    };

    let mut students: Vec<UserSummary> = match storage.list_course_students(course_id).await {
        Ok(list) => list.into_iter().map(|s| s.student).collect(),
        Err(e) => return Ok(internal_error("Failed to load course students", e)),
    };

    // 已退课但仍有成绩的学生同样列出
    let known: HashSet<i64> = students.iter().map(|s| s.id).collect();
    let mut missing: Vec<i64> = grades
        .iter()
        .map(|g| g.student_id)
        .filter(|id| !known.contains(id))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    if !missing.is_empty() {
        match storage.get_user_summaries(&missing).await {
            Ok(extra) => students.extend(extra),
            Err(e) => return Ok(internal_error("Failed to load students", e)),
        }
    }

    let (items, summary) = build_results(&students, &evaluations, &grades);
    let response = CourseResultsResponse {
        course_id,
        period_id: query.period_id,
        summary,
        distribution: level_distribution(items.iter().map(|r| r.classification)),
        items,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Course results retrieved successfully",
    )))
}

/// 生成学生某学期的成绩单；`viewer` 不为空时只包含其可见的课程
async fn build_report(
    storage: &Arc<dyn Storage>,
    student: &User,
    viewer: Option<&User>,
    period_id: i64,
) -> Result<StudentReportResponse, HttpResponse> {
    let mut courses = storage
        .list_student_courses(student.id)
        .await
        .map_err(|e| internal_error("Failed to load student courses", e))?;
    if let Some(viewer) = viewer {
        courses = courses_visible_to(courses, viewer);
    }
    let course_ids: Vec<i64> = courses.iter().map(|c| c.id).collect();

    let evaluations = storage
        .list_evaluations_for_courses(&course_ids, period_id)
        .await
        .map_err(|e| internal_error("Failed to load evaluations", e))?;
    let evaluation_ids: Vec<i64> = evaluations.iter().map(|e| e.id).collect();

    let grades = storage
        .list_grades_for_evaluations(&evaluation_ids, Some(student.id))
        .await
        .map_err(|e| internal_error("Failed to load grades", e))?;

    let (items, overall) = super::aggregate::student_report(&courses, &evaluations, &grades);

    Ok(StudentReportResponse {
        student: UserSummary::from(student),
        period_id,
        items,
        overall_average: round2(overall),
        overall_classification: GradeLevel::from_score(overall),
    })
}

pub async fn student_report(
    service: &GradeService,
    request: &HttpRequest,
    student_id: i64,
    query: StudentReportParams,
) -> ActixResult<HttpResponse> {
    let Some(viewer) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };
    let storage = service.get_storage(request);

    let student = match storage.get_user_by_id(student_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => user,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get student", e)),
    };

    match build_report(&storage, &student, Some(&viewer), query.period_id).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Student report retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

pub async fn my_report(
    service: &GradeService,
    request: &HttpRequest,
    query: StudentReportParams,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    if user.role != UserRole::Student {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Only students have a grade report",
        )));
    }

    let storage = service.get_storage(request);

    match build_report(&storage, &user, None, query.period_id).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Grade report retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
