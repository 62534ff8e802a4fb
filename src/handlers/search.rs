//! 检索处理器
//!
//! - POST /api/search（带有效令牌时记录检索历史）
//! - GET /api/search/history（需要 Authorization: Bearer <token>）

use actix_web::{web, HttpRequest, HttpResponse, Result};
use crate::handlers::auth::{bearer_token, error_response};
use crate::models::{ErrorBody, SearchRequest, SearchResponse};
use crate::services::auth_service::AuthError;
use crate::services::search_service;
use crate::state::AppState;

/// POST /api/search
///
/// 令牌缺失或无效时按匿名检索处理，不记录历史
pub async fn search(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SearchRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    let results = search_service::rank(&request.query, request.top_k);
    let summary = request.use_llm.then(|| search_service::summarize(&request.query));

    log::debug!("检索 \"{}\" 返回 {} 条结果", request.query, results.len());

    if let Some(username) = bearer_token(&req).and_then(|t| state.auth.authenticate(t).ok()) {
        if let Err(e) = state
            .history
            .record(&username, &request.query, results.len(), request.use_llm)
            .await
        {
            log::warn!("记录检索历史失败 {}: {}", username, e);
        }
    }

    Ok(HttpResponse::Ok().json(SearchResponse {
        total: results.len(),
        results,
        summary,
    }))
}

/// GET /api/search/history
pub async fn history(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(error_response(AuthError::InvalidToken));
    };
    let username = match state.auth.authenticate(token) {
        Ok(username) => username,
        Err(e) => return Ok(error_response(e)),
    };

    match state.history.recent(&username).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(entries)),
        Err(e) => {
            log::error!("读取检索历史失败 {}: {}", username, e);
            Ok(HttpResponse::InternalServerError().json(ErrorBody::new("服务器内部错误")))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/search", web::post().to(search))
        .route("/search/history", web::get().to(history));
}
