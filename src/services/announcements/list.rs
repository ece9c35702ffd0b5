use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::AnnouncementService;
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{
        entities::AnnouncementFilter,
        requests::{AnnouncementListParams, AnnouncementListQuery},
        responses::{AnnouncementItem, AnnouncementListResponse},
    },
    common::{apply_filter, paginate_slice},
};

pub async fn list_announcements(
    service: &AnnouncementService,
    request: &HttpRequest,
    query: AnnouncementListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 受众、作者下推到数据库；关键词与派生状态在内存中过滤
    let storage_query = AnnouncementListQuery {
        audience: query.audience,
        author_id: query.author_id,
    };

    let announcements = match storage.list_announcements(storage_query).await {
        Ok(list) => list,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve announcement list: {e}"),
                )),
            );
        }
    };

    let now = Utc::now();
    let filter = AnnouncementFilter {
        search: query.search,
        audience: query.audience,
        status: query.status,
        author_id: query.author_id,
        now,
    };
    let filtered = apply_filter(announcements, &filter);
    let (page_items, pagination) =
        paginate_slice(filtered, query.pagination.page, query.pagination.size);

    let items = page_items
        .into_iter()
        .map(|a| AnnouncementItem::at(a, now))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AnnouncementListResponse { items, pagination },
        "Announcement list retrieved successfully",
    )))
}
