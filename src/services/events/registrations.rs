use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EventService, load_organized_event};
use crate::errors::SchoolHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    events::{entities::RegistrationRejection, responses::EventAttendeeListResponse},
};

/// 报名拒绝原因对应的错误码
fn rejection_code(rejection: RegistrationRejection) -> ErrorCode {
    match rejection {
        RegistrationRejection::Full => ErrorCode::EventFull,
        RegistrationRejection::AlreadyRegistered => ErrorCode::EventAlreadyRegistered,
        RegistrationRejection::NotRequired
        | RegistrationRejection::Cancelled
        | RegistrationRejection::Closed => ErrorCode::EventRegistrationClosed,
    }
}

pub async fn register(
    service: &EventService,
    request: &HttpRequest,
    event_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let storage = service.get_storage(request);

    match storage.register_for_event(event_id, user_id).await {
        Ok(Ok(registration)) => {
            info!("User {} registered for event {}", user_id, event_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                registration,
                "Registered successfully",
            )))
        }
        Ok(Err(rejection)) => {
            let code = rejection_code(rejection);
            let response = match rejection {
                RegistrationRejection::AlreadyRegistered => HttpResponse::Conflict(),
                _ => HttpResponse::BadRequest(),
            }
            .json(ApiResponse::error_empty(code, rejection.message()));
            Ok(response)
        }
        Err(SchoolHubError::NotFound(_)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::EventNotFound, "Event not found"),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Registration failed: {e}"),
            )),
        ),
    }
}

pub async fn unregister(
    service: &EventService,
    request: &HttpRequest,
    event_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let storage = service.get_storage(request);

    match storage.cancel_event_registration(event_id, user_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Registration cancelled successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EventRegistrationNotFound,
            "Registration not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to cancel registration: {e}"),
            )),
        ),
    }
}

pub async fn list_attendees(
    service: &EventService,
    request: &HttpRequest,
    event_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    if let Err(resp) = load_organized_event(&storage, &user, event_id).await {
        return Ok(resp);
    }

    match storage.list_event_attendees(event_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EventAttendeeListResponse { event_id, items },
            "Attendees retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve attendees: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_codes() {
        assert_eq!(rejection_code(RegistrationRejection::Full), ErrorCode::EventFull);
        assert_eq!(
            rejection_code(RegistrationRejection::AlreadyRegistered),
            ErrorCode::EventAlreadyRegistered
        );
        assert_eq!(
            rejection_code(RegistrationRejection::Cancelled),
            ErrorCode::EventRegistrationClosed
        );
    }
}
