//! 键值存储
//!
//! 用户记录和页面缓存都保存在字符串键值存储中。
//! 这里定义存储接口，并提供基于 DashMap 的内存实现。

use anyhow::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fs;
use std::path::Path;

/// 预加载的页面文件名，同时也是 KV 中的键
pub const PAGE_KEYS: [&str; 2] = ["index.html", "trends.html"];

/// 字符串键值存储
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 读取键对应的值，不存在返回 None
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 写入（覆盖）键值
    async fn put(&self, key: &str, value: String) -> Result<()>;

    /// 键不存在时写入，返回是否写入成功
    ///
    /// 检查与写入是原子的，并发注册同名用户时只有一个能成功
    async fn put_if_absent(&self, key: &str, value: String) -> Result<bool>;
}

/// 内存键值存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: String) -> Result<bool> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            }
        }
    }
}

/// 从目录预加载页面到存储
///
/// 返回加载成功的页面数量，缺失的文件跳过
pub async fn preload_pages<P: AsRef<Path>>(store: &dyn KvStore, dir: P) -> Result<usize> {
    let dir = dir.as_ref();
    let mut loaded = 0;

    for key in PAGE_KEYS {
        let path = dir.join(key);
        if !path.exists() {
            log::warn!("页面文件不存在，跳过: {}", path.display());
            continue;
        }
        let html = fs::read_to_string(&path)?;
        store.put(key, html).await?;
        log::info!("已加载页面 {}", key);
        loaded += 1;
    }

    Ok(loaded)
}
