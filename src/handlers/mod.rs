pub mod health;
pub mod pages;
pub mod trends;
pub mod search;
pub mod chat;
pub mod auth;

use actix_web::{error::InternalError, web, HttpResponse};
use crate::models::ErrorBody;

/// 请求体不是合法 JSON 时返回 `{"error": ...}`
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorBody::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(pages::config)
        .service(
            web::scope("/api")
                .configure(health::config)
                .configure(trends::config)
                .configure(search::config)
                .configure(chat::config)
                .configure(auth::config)
        );
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;
    use std::sync::Arc;

    use crate::config::{AppConfig, ChatConfig};
    use crate::services::kv_store::{KvStore, MemoryStore};
    use crate::state::AppState;

    /// 测试用状态：内存存储，AI 上游指向不可达地址
    pub fn test_state() -> web::Data<AppState> {
        test_state_with(Arc::new(MemoryStore::new()))
    }

    pub fn test_state_with(store: Arc<dyn KvStore>) -> web::Data<AppState> {
        let config = AppConfig {
            chat: ChatConfig {
                base_url: "http://127.0.0.1:1/chat".to_string(),
                timeout_secs: 2,
                connect_timeout_secs: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        web::Data::new(AppState::new(&config, store).unwrap())
    }
}
