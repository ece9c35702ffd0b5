//! 路径参数提取器
//!
//! 在进入处理函数之前校验路径中的 ID，非法值统一返回 400 响应。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_path_id(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(param).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let message = format!("无效的路径参数 {param}: '{raw}'");
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

macro_rules! safe_path_id {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_path_id(req, $param).map($name))
                }
            }
        )*
    };
}

safe_path_id! {
    SafeIDI64 => "id",
    SafeStudentIdI64 => "student_id",
    SafePermissionIdI64 => "permission_id",
    SafeAssignmentIdI64 => "assignment_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_rejects_non_numeric_and_non_positive() {
        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("student_id", "0").to_http_request();
        assert!(SafeStudentIdI64::extract(&req).await.is_err());
    }
}
