pub mod crud;
pub mod list;
pub mod registrations;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    events::{
        entities::Event,
        requests::{CreateEventRequest, EventListParams, UpdateEventRequest},
    },
    users::entities::User,
};
use crate::storage::Storage;

pub struct EventService {
    storage: Option<Arc<dyn Storage>>,
}

impl EventService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_events(
        &self,
        request: &HttpRequest,
        query: EventListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_events(self, request, query).await
    }

    pub async fn get_event(&self, request: &HttpRequest, event_id: i64) -> ActixResult<HttpResponse> {
        crud::get_event(self, request, event_id).await
    }

    pub async fn create_event(
        &self,
        request: &HttpRequest,
        event_data: CreateEventRequest,
    ) -> ActixResult<HttpResponse> {
        crud::create_event(self, request, event_data).await
    }

    pub async fn update_event(
        &self,
        request: &HttpRequest,
        event_id: i64,
        update_data: UpdateEventRequest,
    ) -> ActixResult<HttpResponse> {
        crud::update_event(self, request, event_id, update_data).await
    }

    pub async fn delete_event(
        &self,
        request: &HttpRequest,
        event_id: i64,
    ) -> ActixResult<HttpResponse> {
        crud::delete_event(self, request, event_id).await
    }

    pub async fn register(&self, request: &HttpRequest, event_id: i64) -> ActixResult<HttpResponse> {
        registrations::register(self, request, event_id).await
    }

    pub async fn unregister(
        &self,
        request: &HttpRequest,
        event_id: i64,
    ) -> ActixResult<HttpResponse> {
        registrations::unregister(self, request, event_id).await
    }

    pub async fn list_attendees(
        &self,
        request: &HttpRequest,
        event_id: i64,
    ) -> ActixResult<HttpResponse> {
        registrations::list_attendees(self, request, event_id).await
    }
}

/// 加载活动并确认当前用户是组织者或管理员
async fn load_organized_event(
    storage: &Arc<dyn Storage>,
    user: &User,
    event_id: i64,
) -> Result<Event, HttpResponse> {
    let event = match storage.get_event_by_id(event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EventNotFound,
                "Event not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get event: {e}"),
                )),
            );
        }
    };

    if !user.is_admin() && event.organizer_id != user.id {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EventPermissionDenied,
            "Only the organizer or an admin can manage this event",
        )));
    }

    Ok(event)
}

/// 查询单个活动的报名人数
async fn registered_count(storage: &Arc<dyn Storage>, event_id: i64) -> i64 {
    match storage.count_event_registrations(&[event_id]).await {
        Ok(counts) => counts.get(&event_id).copied().unwrap_or(0),
        Err(e) => {
            tracing::warn!("Failed to count registrations for event {}: {}", event_id, e);
            0
        }
    }
}
