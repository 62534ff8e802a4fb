use actix_web::{web, HttpResponse, Result};
use crate::models::{get_beijing_time, HealthStatus};

pub async fn health_check() -> Result<HttpResponse> {
    let response = HealthStatus {
        status: "ok".to_string(),
        timestamp: get_beijing_time(),
    };
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
