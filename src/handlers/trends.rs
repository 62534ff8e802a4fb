use actix_web::{web, HttpResponse, Result};
use crate::models::TrendsData;
use crate::services::market_service::{generate_daily_stats, generate_snapshot, shanghai_today};

/// GET /api/trends/data
///
/// 每次请求重新生成快照和 30 日统计
pub async fn get_trends_data() -> Result<HttpResponse> {
    let mut rng = rand::thread_rng();
    let data = TrendsData {
        market_data: generate_snapshot(&mut rng),
        daily_stats: generate_daily_stats(&mut rng, shanghai_today()),
    };
    Ok(HttpResponse::Ok().json(data))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/trends/data", web::get().to(get_trends_data));
}
