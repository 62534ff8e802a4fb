//! 智谱 AI 对话代理
//!
//! 把用户消息转发给对话补全接口，并统一响应格式。
//! 上游的任何失败（网络、状态码、报文）都在这里吞掉，转为降级回复，
//! 不会向调用方返回错误。

use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;

use crate::config::ChatConfig;
use crate::models::{
    get_beijing_time, ChatMessage, ChatReply, ChatRequest, CompletionRequest, CompletionResponse,
    MarketSnapshot,
};

/// 上游不可用时的降级回复
pub const FALLBACK_REPLY: &str = "抱歉，AI服务暂时不可用。";

/// 默认系统提示词
pub const DEFAULT_SYSTEM_PROMPT: &str = "你是一个专业的金融分析师，请用中文回答用户的问题。";

/// 市场分析系统提示词
pub const ANALYST_SYSTEM_PROMPT: &str = "你是一个专业的金融分析师，专门分析大宗交易市场数据。\
请根据提供的数据进行专业分析，包括：市场趋势、成交量、溢价/折价情况，并给出投资参考。\
请用专业、准确的语言回答，并给出具体的数字支持。";

/// 投资建议系统提示词
pub const ADVISOR_SYSTEM_PROMPT: &str = "你是一个专业的投资顾问，专门为大宗交易投资者提供建议。\
请提供客观、专业的分析，基于数据给出参考，并提醒投资风险。不提供具体的买卖建议，只提供分析参考。";

/// 对话结果
///
/// `Answered` 表示上游正常返回，`Fallback` 表示上游失败后的降级回复
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Answered(ChatReply),
    Fallback(ChatReply),
}

impl ChatOutcome {
    fn answered(content: String) -> Self {
        ChatOutcome::Answered(ChatReply {
            response: content,
            timestamp: get_beijing_time(),
            success: true,
        })
    }

    fn fallback() -> Self {
        ChatOutcome::Fallback(ChatReply {
            response: FALLBACK_REPLY.to_string(),
            timestamp: get_beijing_time(),
            success: false,
        })
    }

    pub fn into_reply(self) -> ChatReply {
        match self {
            ChatOutcome::Answered(reply) | ChatOutcome::Fallback(reply) => reply,
        }
    }
}

/// 对话代理
pub struct ChatProxy {
    /// HTTP 客户端
    client: Client,
    /// 上游配置
    config: ChatConfig,
}

impl ChatProxy {
    /// 创建对话代理，客户端带请求超时和连接超时
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// 单条消息对话，使用默认系统提示词
    pub async fn chat(&self, message: &str) -> ChatOutcome {
        self.converse(&ChatRequest {
            message: message.to_string(),
            ..Default::default()
        })
        .await
    }

    /// 完整对话请求：系统提示词 + 历史消息 + 当前消息
    pub async fn converse(&self, request: &ChatRequest) -> ChatOutcome {
        let system_prompt = request
            .system_prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);

        let mut messages = vec![ChatMessage::system(system_prompt)];
        if let Some(history) = &request.conversation_history {
            messages.extend(history.iter().cloned());
        }
        messages.push(ChatMessage::user(request.message.as_str()));

        self.send(messages).await
    }

    /// 分析大盘快照
    pub async fn analyze_market(&self, market: &MarketSnapshot) -> ChatOutcome {
        let message = format!(
            "请分析以下大宗交易市场数据：\n\
             上证指数: {}\n涨跌幅: {}%\n总成交额: {}万\n溢价成交: {}万\n折价成交: {}万\n\n\
             请提供详细的市场分析。",
            market.shanghai_index,
            market.shanghai_change,
            market.total_volume,
            market.premium_volume,
            market.discount_volume,
        );

        self.send(vec![
            ChatMessage::system(ANALYST_SYSTEM_PROMPT),
            ChatMessage::user(message),
        ])
        .await
    }

    /// 获取投资建议
    pub async fn investment_advice(&self, query: &str) -> ChatOutcome {
        self.send(vec![
            ChatMessage::system(ADVISOR_SYSTEM_PROMPT),
            ChatMessage::user(query),
        ])
        .await
    }

    async fn send(&self, messages: Vec<ChatMessage>) -> ChatOutcome {
        match self.complete(messages).await {
            Ok(content) => ChatOutcome::answered(content),
            Err(e) => {
                log::warn!("AI 对话请求失败: {}", e);
                ChatOutcome::fallback()
            }
        }
    }

    /// 调用对话补全接口，返回第一条回复内容
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        log::debug!("请求 AI 对话 URL: {}", self.config.base_url);

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("AI 接口返回错误状态: {}", response.status()));
        }

        let data: CompletionResponse = response.json().await?;
        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| anyhow!("AI 响应缺少回复内容"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use serde_json::{json, Value};
    use std::net::TcpListener;

    /// 启动本地假上游，对任意请求返回固定状态码和报文
    fn spawn_upstream(status: StatusCode, body: Value) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            let body = body.clone();
            App::new().default_service(web::to(move || {
                let body = body.clone();
                async move { HttpResponse::build(status).json(body) }
            }))
        })
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
        actix_web::rt::spawn(server);

        format!("http://127.0.0.1:{}/api/paas/v4/chat/completions", port)
    }

    /// 启动本地假上游，把收到的消息角色和内容拼接后作为回复
    fn spawn_echo_upstream() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(|| {
            App::new().default_service(web::to(|body: web::Json<Value>| async move {
                let echoed: Vec<String> = body["messages"]
                    .as_array()
                    .map(|msgs| {
                        msgs.iter()
                            .map(|m| {
                                format!(
                                    "{}:{}",
                                    m["role"].as_str().unwrap_or(""),
                                    m["content"].as_str().unwrap_or("")
                                )
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                HttpResponse::Ok().json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": echoed.join("|") } }]
                }))
            }))
        })
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
        actix_web::rt::spawn(server);

        format!("http://127.0.0.1:{}/chat", port)
    }

    fn proxy_for(base_url: String) -> ChatProxy {
        ChatProxy::new(ChatConfig {
            base_url,
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
            ..Default::default()
        })
        .unwrap()
    }

    #[actix_web::test]
    async fn test_chat_success() {
        let url = spawn_upstream(
            StatusCode::OK,
            json!({ "choices": [{ "message": { "role": "assistant", "content": "大宗交易活跃" } }] }),
        );
        let outcome = proxy_for(url).chat("今天行情如何").await;

        assert!(matches!(outcome, ChatOutcome::Answered(_)));
        let reply = outcome.into_reply();
        assert!(reply.success);
        assert_eq!(reply.response, "大宗交易活跃");
    }

    #[actix_web::test]
    async fn test_chat_non_2xx_falls_back() {
        let url = spawn_upstream(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" }));
        let reply = proxy_for(url).chat("你好").await.into_reply();

        assert!(!reply.success);
        assert_eq!(reply.response, FALLBACK_REPLY);
    }

    #[actix_web::test]
    async fn test_chat_unauthorized_falls_back() {
        let url = spawn_upstream(StatusCode::UNAUTHORIZED, json!({ "error": "invalid key" }));
        let outcome = proxy_for(url).chat("你好").await;

        assert!(matches!(outcome, ChatOutcome::Fallback(_)));
    }

    #[actix_web::test]
    async fn test_chat_missing_choices_falls_back() {
        let url = spawn_upstream(StatusCode::OK, json!({ "id": "x", "choices": [] }));
        let reply = proxy_for(url).chat("你好").await.into_reply();

        assert!(!reply.success);
        assert_eq!(reply.response, FALLBACK_REPLY);
    }

    #[actix_web::test]
    async fn test_chat_transport_error_falls_back() {
        let reply = proxy_for("http://127.0.0.1:1/chat".to_string())
            .chat("你好")
            .await
            .into_reply();

        assert!(!reply.success);
        assert_eq!(reply.response, FALLBACK_REPLY);
    }

    #[actix_web::test]
    async fn test_chat_sends_system_and_user_turns() {
        let reply = proxy_for(spawn_echo_upstream()).chat("铜价").await.into_reply();

        assert!(reply.success);
        assert_eq!(
            reply.response,
            format!("system:{}|user:铜价", DEFAULT_SYSTEM_PROMPT)
        );
    }

    #[actix_web::test]
    async fn test_converse_with_prompt_and_history() {
        let request = ChatRequest {
            message: "继续".to_string(),
            system_prompt: Some("你是助手".to_string()),
            conversation_history: Some(vec![
                ChatMessage::user("第一问"),
                ChatMessage { role: "assistant".to_string(), content: "第一答".to_string() },
            ]),
        };
        let reply = proxy_for(spawn_echo_upstream()).converse(&request).await.into_reply();

        assert_eq!(
            reply.response,
            "system:你是助手|user:第一问|assistant:第一答|user:继续"
        );
    }

    #[actix_web::test]
    async fn test_analyze_market_includes_figures() {
        let market = MarketSnapshot {
            shanghai_index: 3612.5,
            shanghai_change: -1.2,
            total_volume: 60000.0,
            premium_volume: 300.0,
            discount_volume: 50000.0,
        };
        let reply = proxy_for(spawn_echo_upstream())
            .analyze_market(&market)
            .await
            .into_reply();

        assert!(reply.success);
        assert!(reply.response.starts_with("system:你是一个专业的金融分析师"));
        assert!(reply.response.contains("上证指数: 3612.5"));
        assert!(reply.response.contains("涨跌幅: -1.2%"));
    }
}
