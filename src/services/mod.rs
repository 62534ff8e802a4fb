//! 业务逻辑服务模块
//!
//! 封装模拟数据生成、检索、AI 对话和用户认证逻辑

pub mod kv_store;        // 键值存储
pub mod market_service;  // 模拟行情数据
pub mod search_service;  // 模拟检索
pub mod history_service; // 检索历史
pub mod chat_service;    // 智谱 AI 对话代理
pub mod auth_service;    // 用户注册/登录
