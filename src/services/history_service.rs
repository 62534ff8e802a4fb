//! 检索历史
//!
//! 每个用户一份列表，JSON 数组保存在 `history:<username>` 下，
//! 最新的记录在前，只保留最近 `HISTORY_LIMIT` 条。

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::{get_beijing_time, SearchHistoryEntry};
use crate::services::kv_store::KvStore;

/// 每个用户保留的历史条数
pub const HISTORY_LIMIT: usize = 20;

fn history_key(username: &str) -> String {
    format!("history:{}", username)
}

/// 检索历史服务
pub struct SearchHistory {
    store: Arc<dyn KvStore>,
    /// 串行化读改写，避免并发检索丢记录
    write_lock: Mutex<()>,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// 追加一条检索记录，返回写入的记录
    pub async fn record(
        &self,
        username: &str,
        query: &str,
        results_count: usize,
        use_llm: bool,
    ) -> Result<SearchHistoryEntry> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.recent(username).await?;
        let entry = SearchHistoryEntry {
            id: entries.first().map_or(1, |latest| latest.id + 1),
            query: query.to_string(),
            results_count,
            use_llm,
            search_time: get_beijing_time(),
        };

        entries.insert(0, entry.clone());
        entries.truncate(HISTORY_LIMIT);
        self.store
            .put(&history_key(username), serde_json::to_string(&entries)?)
            .await?;

        log::debug!("记录检索历史 {} #{}: {}", username, entry.id, entry.query);
        Ok(entry)
    }

    /// 最近的检索记录，最新的在前
    pub async fn recent(&self, username: &str) -> Result<Vec<SearchHistoryEntry>> {
        match self.store.get(&history_key(username)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}
