use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{error, info};

use super::AnnouncementService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{requests::CreateAnnouncementRequest, responses::AnnouncementItem},
};

pub async fn create_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    announcement_data: CreateAnnouncementRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = announcement_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let Some(author_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let storage = service.get_storage(request);

    match storage
        .create_announcement(author_id, announcement_data)
        .await
    {
        Ok(announcement) => {
            info!("Announcement {} created by user {}", announcement.id, author_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                AnnouncementItem::at(announcement, Utc::now()),
                "Announcement created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create announcement: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Announcement creation failed: {e}"),
                )),
            )
        }
    }
}
