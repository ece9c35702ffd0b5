//! JSON 与查询参数反序列化失败时的统一响应

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON 参数错误 {}: {}", req.path(), err);
    let (response, message) = match &err {
        JsonPayloadError::ContentType => (
            HttpResponse::UnsupportedMediaType(),
            "请求体必须是 application/json".to_string(),
        ),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => (
            HttpResponse::PayloadTooLarge(),
            "请求体过大".to_string(),
        ),
        _ => (HttpResponse::BadRequest(), format!("请求参数错误: {err}")),
    };
    let mut builder = response;
    let body = builder.json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, body).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("查询参数错误 {}: {}", req.path(), err);
    let message = format!("查询参数错误: {err}");
    let body =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, body).into()
}
