//! 模拟行情数据服务
//!
//! 生成大盘快照和近 30 日大宗交易统计。
//! 所有字段在各自区间内独立均匀取值，字段之间、请求之间互不相关。
//! 随机源和当前日期由调用方传入，便于测试时固定。

use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Asia::Shanghai;
use rand::Rng;
use std::ops::RangeInclusive;

use crate::models::{DailyStat, MarketSnapshot};

/// 统计序列天数
pub const DAILY_STATS_DAYS: i64 = 30;

// ==================== 快照字段区间 ====================

pub const SNAPSHOT_INDEX: RangeInclusive<f64> = 3500.0..=3700.0;
pub const SNAPSHOT_CHANGE: RangeInclusive<f64> = -2.0..=2.0;
pub const SNAPSHOT_TOTAL_VOLUME: RangeInclusive<f64> = 50_000.0..=80_000.0;
pub const SNAPSHOT_PREMIUM_VOLUME: RangeInclusive<f64> = 200.0..=500.0;
pub const SNAPSHOT_DISCOUNT_VOLUME: RangeInclusive<f64> = 45_000.0..=75_000.0;

// ==================== 每日统计字段区间 ====================

pub const DAILY_INDEX: RangeInclusive<f64> = 3450.0..=3750.0;
pub const DAILY_CHANGE: RangeInclusive<f64> = -3.0..=3.0;
pub const DAILY_TOTAL_VOLUME: RangeInclusive<f64> = 40_000.0..=90_000.0;
pub const DAILY_PREMIUM_VOLUME: RangeInclusive<f64> = 100.0..=800.0;
pub const DAILY_PREMIUM_RATIO: RangeInclusive<f64> = 0.5..=2.5;
pub const DAILY_DISCOUNT_VOLUME: RangeInclusive<f64> = 35_000.0..=85_000.0;
pub const DAILY_DISCOUNT_RATIO: RangeInclusive<f64> = 97.5..=99.5;

/// 保留两位小数
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 区间内均匀取值并保留两位小数
fn sample<R: Rng>(rng: &mut R, range: RangeInclusive<f64>) -> f64 {
    round2(rng.gen_range(range))
}

/// 当前北京时间的日期
pub fn shanghai_today() -> NaiveDate {
    Utc::now().with_timezone(&Shanghai).date_naive()
}

/// 生成大盘快照
pub fn generate_snapshot<R: Rng>(rng: &mut R) -> MarketSnapshot {
    MarketSnapshot {
        shanghai_index: sample(rng, SNAPSHOT_INDEX),
        shanghai_change: sample(rng, SNAPSHOT_CHANGE),
        total_volume: sample(rng, SNAPSHOT_TOTAL_VOLUME),
        premium_volume: sample(rng, SNAPSHOT_PREMIUM_VOLUME),
        discount_volume: sample(rng, SNAPSHOT_DISCOUNT_VOLUME),
    }
}

/// 生成截至 `today` 的 30 日统计，按日期升序
pub fn generate_daily_stats<R: Rng>(rng: &mut R, today: NaiveDate) -> Vec<DailyStat> {
    (0..DAILY_STATS_DAYS)
        .rev()
        .map(|days_ago| {
            let date = today - Duration::days(days_ago);
            DailyStat {
                date: date.format("%Y-%m-%d").to_string(),
                index: sample(rng, DAILY_INDEX),
                change: sample(rng, DAILY_CHANGE),
                total_volume: sample(rng, DAILY_TOTAL_VOLUME),
                premium_volume: sample(rng, DAILY_PREMIUM_VOLUME),
                premium_ratio: sample(rng, DAILY_PREMIUM_RATIO),
                discount_volume: sample(rng, DAILY_DISCOUNT_VOLUME),
                discount_ratio: sample(rng, DAILY_DISCOUNT_RATIO),
            }
        })
        .collect()
}
