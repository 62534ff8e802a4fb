//! 模拟检索服务
//!
//! 用固定模板拼接查询词生成检索结果，分数固定递减，不做真实相关度计算

use crate::models::{get_beijing_time, SearchResult};

/// 结果模板：(标题格式, 内容格式, 分数)，`{}` 处替换为查询词
const TEMPLATES: [(&str, &str, f64); 3] = [
    ("{}相关交易记录", "这是关于{}的详细交易信息...", 0.95),
    ("{}市场分析报告", "基于{}的市场趋势分析...", 0.87),
    ("{}投资建议", "针对{}的专业投资建议...", 0.82),
];

/// 按模板顺序返回前 `top_k` 条结果，`top_k <= 0` 返回空
pub fn rank(query: &str, top_k: i64) -> Vec<SearchResult> {
    let limit = top_k.clamp(0, TEMPLATES.len() as i64) as usize;
    let timestamp = get_beijing_time();

    TEMPLATES
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, (title, content, score))| SearchResult {
            id: i as u32 + 1,
            title: title.replace("{}", query),
            content: content.replace("{}", query),
            score: *score,
            timestamp: timestamp.clone(),
        })
        .collect()
}

/// 检索结果摘要
pub fn summarize(query: &str) -> String {
    format!("关于\"{}\"的搜索结果摘要...", query)
}
