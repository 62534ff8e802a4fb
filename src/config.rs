//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，密钥可由环境变量覆盖

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 智谱 AI 对话配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// 对话补全接口地址
    #[serde(default = "default_chat_url")]
    pub base_url: String,
    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,
    /// 采样温度
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// API Key（为空时请求会被上游拒绝，走降级回复）
    #[serde(default)]
    pub api_key: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 签名密钥
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// 令牌有效期（秒）
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
}

/// 站点页面配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// 启动时预加载到 KV 的页面目录（index.html / trends.html）
    #[serde(default)]
    pub pages_dir: Option<String>,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 对话配置
    #[serde(default)]
    pub chat: ChatConfig,
    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,
    /// 站点配置
    #[serde(default)]
    pub site: SiteConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_chat_url() -> String { "https://open.bigmodel.cn/api/paas/v4/chat/completions".to_string() }
fn default_model() -> String { "glm-4".to_string() }
fn default_temperature() -> f64 { 0.7 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_jwt_secret() -> String { "block-trade-dt-secret-key".to_string() }
fn default_token_ttl() -> i64 { 3600 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_chat_url(),
            model: default_model(),
            temperature: default_temperature(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值，最后应用环境变量
    pub fn load() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        let mut config = None;
        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(loaded) => {
                        log::info!("从 {} 加载配置成功", path);
                        config = Some(loaded);
                        break;
                    }
                    Err(e) => {
                        log::warn!("加载配置文件 {} 失败: {}", path, e);
                    }
                }
            }
        }

        let mut config = config.unwrap_or_else(|| {
            log::info!("使用默认配置");
            Self::default()
        });
        config.apply_env();
        config
    }

    /// 环境变量覆盖密钥配置
    fn apply_env(&mut self) {
        match env::var("ZHIPU_API_KEY") {
            Ok(key) if !key.is_empty() => self.chat.api_key = key,
            _ if self.chat.api_key.is_empty() => {
                log::warn!("未设置 ZHIPU_API_KEY 环境变量，AI 对话将返回降级回复");
            }
            _ => {}
        }

        match env::var("JWT_SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => self.auth.jwt_secret = secret,
            _ if self.auth.jwt_secret == default_jwt_secret() => {
                log::warn!("未设置 JWT_SECRET_KEY 环境变量，使用默认值");
            }
            _ => {}
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
