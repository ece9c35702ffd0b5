use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{error, info};

use super::{EventService, load_organized_event, registered_count};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    events::{
        entities::Event,
        requests::{CreateEventRequest, EventFields, UpdateEventRequest},
        responses::EventItem,
    },
};

pub async fn get_event(
    service: &EventService,
    request: &HttpRequest,
    event_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_event_by_id(event_id).await {
        Ok(Some(event)) => {
            let count = registered_count(&storage, event.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                EventItem::at(event, count, Utc::now()),
                "Event retrieved successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EventNotFound,
            "Event not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get event: {e}"),
            )),
        ),
    }
}

pub async fn create_event(
    service: &EventService,
    request: &HttpRequest,
    event_data: CreateEventRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = event_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let Some(organizer_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let storage = service.get_storage(request);

    match storage.create_event(organizer_id, event_data).await {
        Ok(event) => {
            info!("Event {} created by user {}", event.id, organizer_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                EventItem::at(event, 0, Utc::now()),
                "Event created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create event: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Event creation failed: {e}"),
                )),
            )
        }
    }
}

/// 更新后的字段组合
fn merged_fields<'a>(current: &'a Event, update: &'a UpdateEventRequest) -> EventFields<'a> {
    EventFields {
        title: update.title.as_deref().unwrap_or(&current.title),
        description: update
            .description
            .as_deref()
            .or(current.description.as_deref()),
        start_at: update.start_at.unwrap_or(current.start_at),
        end_at: update.end_at.unwrap_or(current.end_at),
        location: update.location.as_deref().or(current.location.as_deref()),
        modality: update.modality.unwrap_or(current.modality),
        meeting_url: update
            .meeting_url
            .as_deref()
            .or(current.meeting_url.as_deref()),
        capacity: update.capacity.or(current.capacity),
        registration_deadline: update
            .registration_deadline
            .or(current.registration_deadline),
    }
}

pub async fn update_event(
    service: &EventService,
    request: &HttpRequest,
    event_id: i64,
    update_data: UpdateEventRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )));
    };

    let storage = service.get_storage(request);

    let current = match load_organized_event(&storage, &user, event_id).await {
        Ok(event) => event,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = merged_fields(&current, &update_data).validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    match storage.update_event(event_id, update_data).await {
        Ok(Some(event)) => {
            let count = registered_count(&storage, event.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                EventItem::at(event, count, Utc::now()),
                "Event updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EventNotFound,
            "Event not found",
        ))),
        Err(e) => {
            error!("Failed to update event {}: {}", event_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Event update failed: {e}"),
                )),
            )
        }
    }
}

pub async fn delete_event(
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

    match storage.delete_event(event_id).await {
        Ok(true) => {
            info!("Event {} deleted by user {}", event_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Event deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EventNotFound,
            "Event not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Event deletion failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events::entities::{EventModality, EventType};
    use chrono::{Duration, TimeZone};

    fn event() -> Event {
        let start = Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap();
        Event {
            id: 7,
            title: "Olimpiada deportiva".to_string(),
            description: None,
            event_type: EventType::Sports,
            start_at: start,
            end_at: start + Duration::hours(6),
            all_day: false,
            location: Some("Estadio".to_string()),
            modality: EventModality::InPerson,
            meeting_url: None,
            requires_registration: true,
            capacity: Some(30),
            registration_deadline: None,
            cancelled: false,
            organizer_id: 2,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_merged_fields_validate_against_current_values() {
        let current = event();

        // 只修改结束时间，且早于原开始时间
        let update = UpdateEventRequest {
            end_at: Some(current.start_at - Duration::hours(1)),
            ..Default::default()
        };
        assert!(merged_fields(&current, &update).validate().is_err());

        // 切换为线上活动但未提供链接
        let update = UpdateEventRequest {
            modality: Some(EventModality::Virtual),
            ..Default::default()
        };
        assert!(merged_fields(&current, &update).validate().is_err());

        let update = UpdateEventRequest {
            title: Some("Olimpiada 2025".to_string()),
            ..Default::default()
        };
        let fields = merged_fields(&current, &update);
        assert_eq!(fields.title, "Olimpiada 2025");
        assert_eq!(fields.location, Some("Estadio"));
        assert!(fields.validate().is_ok());
    }
}
