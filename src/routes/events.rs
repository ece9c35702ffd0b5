use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::events::requests::{CreateEventRequest, EventListParams, UpdateEventRequest};
use crate::models::permissions::defaults::codes;
use crate::services::EventService;
use crate::utils::SafeIDI64;

static EVENT_SERVICE: Lazy<EventService> = Lazy::new(EventService::new_lazy);

pub async fn list_events(
    req: HttpRequest,
    query: web::Query<EventListParams>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.list_events(&req, query.into_inner()).await
}

pub async fn create_event(
    req: HttpRequest,
    event_data: web::Json<CreateEventRequest>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.create_event(&req, event_data.into_inner()).await
}

pub async fn get_event(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.get_event(&req, event_id.0).await
}

pub async fn update_event(
    req: HttpRequest,
    event_id: SafeIDI64,
    update_data: web::Json<UpdateEventRequest>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE
        .update_event(&req, event_id.0, update_data.into_inner())
        .await
}

pub async fn delete_event(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.delete_event(&req, event_id.0).await
}

pub async fn register(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.register(&req, event_id.0).await
}

pub async fn unregister(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.unregister(&req, event_id.0).await
}

pub async fn list_attendees(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.list_attendees(&req, event_id.0).await
}

pub fn configure_event_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/events")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_events)).route(
                    web::post()
                        .to(create_event)
                        .wrap(middlewares::RequirePermission::new(codes::EVENTS_CREATE)),
                ),
            )
            .service(
                web::resource("/{id}/registration")
                    .route(
                        web::post()
                            .to(register)
                            .wrap(middlewares::RequirePermission::new(codes::EVENTS_REGISTER)),
                    )
                    // 取消本人报名
                    .route(web::delete().to(unregister)),
            )
            .service(
                // 组织者或管理员
                web::resource("/{id}/attendees").route(web::get().to(list_attendees)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_event))
                    .route(web::put().to(update_event))
                    .route(web::delete().to(delete_event)),
            ),
    );
}
