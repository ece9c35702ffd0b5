use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::announcements::requests::{
    AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::models::permissions::defaults::codes;
use crate::services::AnnouncementService;
use crate::utils::SafeIDI64;

static ANNOUNCEMENT_SERVICE: Lazy<AnnouncementService> =
    Lazy::new(AnnouncementService::new_lazy);

pub async fn list_announcements(
    req: HttpRequest,
    query: web::Query<AnnouncementListParams>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .list_announcements(&req, query.into_inner())
        .await
}

pub async fn create_announcement(
    req: HttpRequest,
    announcement_data: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .create_announcement(&req, announcement_data.into_inner())
        .await
}

pub async fn get_announcement(
    req: HttpRequest,
    announcement_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .get_announcement(&req, announcement_id.0)
        .await
}

pub async fn update_announcement(
    req: HttpRequest,
    announcement_id: SafeIDI64,
    update_data: web::Json<UpdateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .update_announcement(&req, announcement_id.0, update_data.into_inner())
        .await
}

pub async fn delete_announcement(
    req: HttpRequest,
    announcement_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .delete_announcement(&req, announcement_id.0)
        .await
}

pub fn configure_announcement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/announcements")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_announcements))
                    .route(
                        web::post()
                            .to(create_announcement)
                            .wrap(middlewares::RequirePermission::new(
                                codes::ANNOUNCEMENTS_CREATE,
                            )),
                    ),
            )
            .service(
                // 作者或管理员才能修改，由服务层校验
                web::resource("/{id}")
                    .route(web::get().to(get_announcement))
                    .route(web::put().to(update_announcement))
                    .route(web::delete().to(delete_announcement)),
            ),
    );
}
