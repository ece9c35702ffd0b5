pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{
        entities::Announcement,
        requests::{AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    },
    users::entities::User,
};
use crate::storage::Storage;

pub struct AnnouncementService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnnouncementService {
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

    pub async fn list_announcements(
        &self,
        request: &HttpRequest,
        query: AnnouncementListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_announcements(self, request, query).await
    }

    pub async fn get_announcement(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_announcement(self, request, announcement_id).await
    }

    pub async fn create_announcement(
        &self,
        request: &HttpRequest,
        announcement_data: CreateAnnouncementRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_announcement(self, request, announcement_data).await
    }

    pub async fn update_announcement(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
        update_data: UpdateAnnouncementRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_announcement(self, request, announcement_id, update_data).await
    }

    pub async fn delete_announcement(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_announcement(self, request, announcement_id).await
    }
}

/// 加载公告并确认当前用户是作者或管理员
async fn load_owned_announcement(
    storage: &Arc<dyn Storage>,
    user: &User,
    announcement_id: i64,
) -> Result<Announcement, HttpResponse> {
    let announcement = match storage.get_announcement_by_id(announcement_id).await {
        Ok(Some(announcement)) => announcement,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AnnouncementNotFound,
                "Announcement not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get announcement: {e}"),
                )),
            );
        }
    };

    if !user.is_admin() && announcement.author_id != user.id {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AnnouncementPermissionDenied,
            "Only the author or an admin can modify this announcement",
        )));
    }

    Ok(announcement)
}
