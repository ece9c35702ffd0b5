use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::EventService;
use crate::models::{
    ApiResponse, ErrorCode,
    common::{apply_filter, paginate_slice},
    events::{
        entities::EventFilter,
        requests::{EventListParams, EventListQuery},
        responses::{EventItem, EventListResponse},
    },
};

pub async fn list_events(
    service: &EventService,
    request: &HttpRequest,
    query: EventListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let storage_query = EventListQuery {
        event_type: query.event_type,
        modality: query.modality,
        from: query.from,
        to: query.to,
    };

    let events = match storage.list_events(storage_query).await {
        Ok(events) => events,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve event list: {e}"),
                )),
            );
        }
    };

    // 状态为派生字段，在内存中过滤后再分页
    let now = Utc::now();
    let filter = EventFilter {
        search: query.search,
        event_type: query.event_type,
        modality: query.modality,
        status: query.status,
        from: query.from,
        to: query.to,
        now,
    };
    let filtered = apply_filter(events, &filter);
    let (page_events, pagination) =
        paginate_slice(filtered, query.pagination.page, query.pagination.size);

    let ids: Vec<i64> = page_events.iter().map(|e| e.id).collect();
    let counts = match storage.count_event_registrations(&ids).await {
        Ok(counts) => counts,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to count event registrations: {e}"),
                )),
            );
        }
    };

    let items = page_events
        .into_iter()
        .map(|event| {
            let count = counts.get(&event.id).copied().unwrap_or(0);
            EventItem::at(event, count, now)
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EventListResponse { items, pagination },
        "Event list retrieved successfully",
    )))
}
