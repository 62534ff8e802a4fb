//! 用户认证处理器
//!
//! - POST /api/register
//! - POST /api/login
//! - GET /api/user/profile（需要 Authorization: Bearer <token>）

use actix_web::{web, HttpRequest, HttpResponse, Result};
use crate::models::{ErrorBody, LoginRequest, MessageBody, RegisterRequest};
use crate::services::auth_service::AuthError;
use crate::state::AppState;

/// 认证错误转换为 HTTP 响应
pub(crate) fn error_response(err: AuthError) -> HttpResponse {
    match &err {
        AuthError::DuplicateUser => HttpResponse::BadRequest().json(ErrorBody::new(err.to_string())),
        AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::TokenExpired => {
            HttpResponse::Unauthorized().json(ErrorBody::new(err.to_string()))
        }
        AuthError::Internal(e) => {
            log::error!("认证服务内部错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorBody::new("服务器内部错误"))
        }
    }
}

/// POST /api/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    match state.auth.register(&body).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageBody::new("注册成功"))),
        Err(e) => Ok(error_response(e)),
    }
}

/// POST /api/login
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> Result<HttpResponse> {
    match state.auth.login(&body).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(error_response(e)),
    }
}

/// 取出 `Authorization: Bearer <token>` 中的令牌
pub(crate) fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// GET /api/user/profile
pub async fn profile(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(error_response(AuthError::InvalidToken));
    };

    let result = match state.auth.authenticate(token) {
        Ok(username) => state.auth.profile(&username).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(profile) => Ok(HttpResponse::Ok().json(profile)),
        Err(e) => Ok(error_response(e)),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/user/profile", web::get().to(profile));
}
