use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AnnouncementService, load_owned_announcement};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    announcement_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    if let Err(resp) = load_owned_announcement(&storage, &user, announcement_id).await {
        return Ok(resp);
    }

    match storage.delete_announcement(announcement_id).await {
        Ok(true) => {
            info!("Announcement {} deleted by user {}", announcement_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Announcement deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Announcement deletion failed: {e}"),
            )),
        ),
    }
}
