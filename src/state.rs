//! 应用共享状态
//!
//! 存储、AI 代理、认证和检索历史服务在启动时创建，通过 `web::Data` 注入每个处理器

use anyhow::Result;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::auth_service::AuthService;
use crate::services::chat_service::ChatProxy;
use crate::services::history_service::SearchHistory;
use crate::services::kv_store::KvStore;

pub struct AppState {
    /// 键值存储（用户记录、检索历史、页面缓存）
    pub store: Arc<dyn KvStore>,
    /// AI 对话代理
    pub chat: ChatProxy,
    /// 认证服务
    pub auth: AuthService,
    /// 检索历史
    pub history: SearchHistory,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn KvStore>) -> Result<Self> {
        Ok(Self {
            chat: ChatProxy::new(config.chat.clone())?,
            auth: AuthService::new(store.clone(), &config.auth),
            history: SearchHistory::new(store.clone()),
            store,
        })
    }
}
