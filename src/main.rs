//! Block Trade DT 后端服务
//!
//! 提供页面、模拟行情、模拟检索、AI 对话代理和用户注册登录的 HTTP API

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务
mod state;      // 共享状态

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::CorsMiddleware;
use crate::services::kv_store::{preload_pages, KvStore, MemoryStore};
use crate::state::AppState;

/// 应用程序入口
///
/// 加载配置、预加载页面后启动 HTTP 服务器
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 初始化日志系统，默认日志级别为 info
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load();
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());

    if let Some(dir) = &config.site.pages_dir {
        match preload_pages(&*store, dir).await {
            Ok(count) => log::info!("从 {} 预加载 {} 个页面", dir, count),
            Err(e) => log::warn!("预加载页面失败: {}", e),
        }
    }

    let state = AppState::new(&config, store)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let state = web::Data::new(state);

    let bind_addr = config.bind_addr();
    log::info!("启动 Block Trade DT 后端服务，监听 {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(CorsMiddleware)  // 跨域头，OPTIONS 直接返回
            .wrap(Logger::default())  // 添加请求日志中间件
            .configure(handlers::config)  // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
