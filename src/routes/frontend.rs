//! 前端静态资源路由
//!
//! 嵌入 `frontend/dist/` 构建产物，未命中的非 API 路径回退到 `index.html`，
//! 开发时可用 `frontend-custom/` 目录覆盖单个文件。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::{Component, Path};

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const CUSTOM_DIR: &str = "./frontend-custom";

fn extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

fn get_mime_type(path: &str) -> &'static str {
    match extension(path) {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" | "webmanifest" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// 带 hash 的构建产物可长期缓存
fn is_immutable_asset(path: &str) -> bool {
    path.starts_with("assets/")
        && matches!(
            extension(path),
            "js" | "css" | "woff" | "woff2" | "ttf" | "png" | "jpg" | "jpeg" | "svg" | "webp"
        )
}

/// 只接受普通的相对路径段
fn is_safe_path(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

/// 替换 HTML 中的占位符
fn render_html(content: &[u8], system_name: &str) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%BASE_PATH%", "")
        .replace("%APP_NAME%", system_name)
        .into_bytes()
}

fn get_file(path: &str) -> Option<Vec<u8>> {
    if !is_safe_path(path) {
        return None;
    }
    std::fs::read(Path::new(CUSTOM_DIR).join(path))
        .ok()
        .or_else(|| FrontendAssets::get(path).map(|f| f.data.to_vec()))
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    // 未注册的 API 路径返回统一 JSON 结构
    if path == "api" || path.starts_with("api/") {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("No API route for /{path}"),
        )));
    }

    let (content, file_path) = match (path.is_empty(), get_file(path)) {
        (false, Some(data)) => (Some(data), path),
        _ => (get_file("index.html"), "index.html"),
    };

    let Some(mut data) = content else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(
                "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>SchoolHub</title></head>\
                 <body><h1>Frontend Not Found</h1>\
                 <p>Build the frontend first: <code>cd frontend &amp;&amp; bun run build</code></p>\
                 </body></html>",
            ));
    };

    let mime = get_mime_type(file_path);
    if mime.starts_with("text/html") {
        data = render_html(&data, &AppConfig::get().app.system_name);
    }

    let cache_control = if is_immutable_asset(file_path) {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache, no-store, must-revalidate"
    };

    Ok(HttpResponse::Ok()
        .content_type(mime)
        .insert_header(("Cache-Control", cache_control))
        .body(data))
}

/// 所有非 API 的 GET 请求交给前端处理，需最后注册
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("assets/app.mjs"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(get_mime_type("logo.svg"), "image/svg+xml");
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_immutable_assets() {
        assert!(is_immutable_asset("assets/index-3f2a.js"));
        assert!(!is_immutable_asset("favicon.png"));
        assert!(!is_immutable_asset("index.html"));
    }

    #[test]
    fn test_safe_path() {
        assert!(is_safe_path("assets/app.js"));
        assert!(!is_safe_path("../config.toml"));
        assert!(!is_safe_path("/etc/passwd"));
    }

    #[test]
    fn test_render_html() {
        let html = b"<title>%APP_NAME%</title><base href=\"%BASE_PATH%/\">";
        let out = String::from_utf8(render_html(html, "SchoolHub")).unwrap();
        assert_eq!(out, "<title>SchoolHub</title><base href=\"/\">");
    }
}
