//! AI 对话数据模型
//!
//! 包括对外接口的请求/响应和智谱 AI 上游接口的报文结构

use serde::{Deserialize, Serialize};

use super::MarketSnapshot;

/// 单轮对话消息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// 对话请求
#[derive(Debug, Deserialize, Default)]
pub struct ChatRequest {
    /// 用户消息
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub message: String,
    /// 自定义系统提示词
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// 历史对话，插入在系统提示词与当前消息之间
    #[serde(default)]
    pub conversation_history: Option<Vec<ChatMessage>>,
}

/// 对话响应
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: String,
    pub success: bool,
}

/// 市场分析请求
#[derive(Debug, Deserialize, Default)]
pub struct MarketAnalysisRequest {
    /// 为空时使用实时生成的快照
    #[serde(default)]
    pub market_data: Option<MarketSnapshot>,
}

/// 市场分析响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MarketAnalysisResponse {
    pub analysis: String,
    pub market_data: MarketSnapshot,
    pub timestamp: String,
    pub success: bool,
}

/// 投资建议请求
#[derive(Debug, Deserialize, Default)]
pub struct InvestmentAdviceRequest {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub query: String,
}

/// 投资建议响应
#[derive(Debug, Serialize, Deserialize)]
pub struct InvestmentAdviceResponse {
    pub advice: String,
    pub timestamp: String,
    pub success: bool,
}

// ==================== 智谱 AI 上游报文 ====================

/// 对话补全请求体
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

/// 对话补全响应体（只解析需要的字段）
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}
