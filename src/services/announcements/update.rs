use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::error;

use super::{AnnouncementService, load_owned_announcement};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{requests::UpdateAnnouncementRequest, responses::AnnouncementItem},
};

pub async fn update_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    announcement_id: i64,
    update_data: UpdateAnnouncementRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = update_data.validate() {
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

    let current = match load_owned_announcement(&storage, &user, announcement_id).await {
        Ok(announcement) => announcement,
        Err(resp) => return Ok(resp),
    };

    // 合并后的时间与受众需要整体满足约束
    let publish_at = update_data.publish_at.unwrap_or(current.publish_at);
    let expires_at = update_data.expires_at.unwrap_or(current.expires_at);
    if expires_at.is_some_and(|exp| exp <= publish_at) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "过期时间必须晚于发布时间",
        )));
    }
    let any_audience = update_data.for_students.unwrap_or(current.for_students)
        || update_data.for_teachers.unwrap_or(current.for_teachers)
        || update_data.for_parents.unwrap_or(current.for_parents);
    if !any_audience {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "至少需要选择一个受众",
        )));
    }

    match storage
        .update_announcement(announcement_id, update_data)
        .await
    {
        Ok(Some(announcement)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnnouncementItem::at(announcement, Utc::now()),
            "Announcement updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        ))),
        Err(e) => {
            error!("Failed to update announcement {}: {}", announcement_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Announcement update failed: {e}"),
                )),
            )
        }
    }
}
