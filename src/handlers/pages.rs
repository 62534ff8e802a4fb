//! 页面处理器
//!
//! 页面 HTML 缓存在 KV 中，未部署时返回占位页面

use actix_web::{http::header::ContentType, web, HttpResponse, Result};
use crate::state::AppState;

pub const INDEX_PLACEHOLDER: &str = "<h1>Block Trade DT</h1><p>正在部署中...</p>";
pub const TRENDS_PLACEHOLDER: &str = "<h1>实时趋势</h1><p>正在部署中...</p>";

async fn render_page(state: &AppState, key: &str, placeholder: &str) -> HttpResponse {
    let html = match state.store.get(key).await {
        Ok(Some(html)) => html,
        Ok(None) => placeholder.to_string(),
        Err(e) => {
            log::warn!("读取页面 {} 失败: {}", key, e);
            placeholder.to_string()
        }
    };

    HttpResponse::Ok().content_type(ContentType::html()).body(html)
}

/// GET /
pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(render_page(&state, "index.html", INDEX_PLACEHOLDER).await)
}

/// GET /trends
pub async fn trends(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(render_page(&state, "trends.html", TRENDS_PLACEHOLDER).await)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/trends", web::get().to(trends));
}
