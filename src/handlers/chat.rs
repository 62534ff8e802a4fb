//! AI 对话处理器
//!
//! 上游失败时仍返回 200，响应中 `success` 为 false

use actix_web::{web, HttpResponse, Result};
use crate::models::{
    ChatRequest, InvestmentAdviceRequest, InvestmentAdviceResponse, MarketAnalysisRequest,
    MarketAnalysisResponse,
};
use crate::services::market_service::generate_snapshot;
use crate::state::AppState;

/// POST /api/chat
///
/// 没有自定义提示词和历史时按单条消息对话处理
pub async fn chat(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> Result<HttpResponse> {
    let request = body.into_inner();
    let outcome = if request.system_prompt.is_none() && request.conversation_history.is_none() {
        state.chat.chat(&request.message).await
    } else {
        state.chat.converse(&request).await
    };
    Ok(HttpResponse::Ok().json(outcome.into_reply()))
}

/// POST /api/chat/analyze
///
/// 未提供行情数据时使用实时生成的快照
pub async fn analyze_market(
    state: web::Data<AppState>,
    body: web::Json<MarketAnalysisRequest>,
) -> Result<HttpResponse> {
    let market = match body.into_inner().market_data {
        Some(market) => market,
        None => generate_snapshot(&mut rand::thread_rng()),
    };

    let reply = state.chat.analyze_market(&market).await.into_reply();
    Ok(HttpResponse::Ok().json(MarketAnalysisResponse {
        analysis: reply.response,
        market_data: market,
        timestamp: reply.timestamp,
        success: reply.success,
    }))
}

/// POST /api/chat/advice
pub async fn investment_advice(
    state: web::Data<AppState>,
    body: web::Json<InvestmentAdviceRequest>,
) -> Result<HttpResponse> {
    let reply = state.chat.investment_advice(&body.query).await.into_reply();
    Ok(HttpResponse::Ok().json(InvestmentAdviceResponse {
        advice: reply.response,
        timestamp: reply.timestamp,
        success: reply.success,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/chat")
            .route("", web::post().to(chat))
            .route("/analyze", web::post().to(analyze_market))
            .route("/advice", web::post().to(investment_advice))
    );
}
