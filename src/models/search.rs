//! 检索数据模型

use serde::{Deserialize, Serialize};

/// 检索请求
///
/// 缺失字段使用默认值，`null` 按零值处理，不做校验
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// 查询关键词
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub query: String,
    /// 返回数量
    #[serde(default = "default_top_k", deserialize_with = "super::null_as_default")]
    pub top_k: i64,
    /// 是否生成摘要
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub use_llm: bool,
}

fn default_top_k() -> i64 { 10 }

/// 单条检索结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchResult {
    pub id: u32,
    pub title: String,
    pub content: String,
    /// 相关度分数 [0, 1]
    pub score: f64,
    pub timestamp: String,
}

/// 检索响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    /// 仅在 use_llm 为 true 时有值
    pub summary: Option<String>,
    pub total: usize,
}

/// 检索历史记录
///
/// 登录用户每次检索追加一条，按用户保存在 `history:<username>` 下
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchHistoryEntry {
    /// 用户内递增编号，从 1 开始
    pub id: u64,
    pub query: String,
    pub results_count: usize,
    pub use_llm: bool,
    /// 检索时间（北京时间 RFC 3339）
    pub search_time: String,
}
