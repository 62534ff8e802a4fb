//! 行情数据模型
//!
//! 定义大盘快照和每日大宗交易统计的数据结构

use serde::{Deserialize, Serialize};

/// 大盘实时快照
///
/// 每次请求重新生成，不做持久化
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MarketSnapshot {
    /// 上证指数
    pub shanghai_index: f64,
    /// 涨跌幅（百分比）
    pub shanghai_change: f64,
    /// 总成交额（万元）
    pub total_volume: f64,
    /// 溢价成交额（万元）
    pub premium_volume: f64,
    /// 折价成交额（万元）
    pub discount_volume: f64,
}

/// 单日大宗交易统计
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyStat {
    /// 日期（YYYY-MM-DD）
    pub date: String,
    /// 收盘指数
    pub index: f64,
    /// 涨跌幅（百分比）
    pub change: f64,
    /// 总成交额（万元）
    pub total_volume: f64,
    /// 溢价成交额（万元）
    pub premium_volume: f64,
    /// 溢价成交占比（百分比）
    pub premium_ratio: f64,
    /// 折价成交额（万元）
    pub discount_volume: f64,
    /// 折价成交占比（百分比）
    pub discount_ratio: f64,
}

/// 趋势页数据
#[derive(Debug, Serialize, Deserialize)]
pub struct TrendsData {
    pub market_data: MarketSnapshot,
    pub daily_stats: Vec<DailyStat>,
}
