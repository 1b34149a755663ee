// ==========================================
// 住所排班引擎 - 键值存储
// ==========================================
// 职责: 以固定 key 存取整段 JSON 记录集合
// 约束: 只做全量读 / 全量写，不做增量持久化
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 固定存储键
pub mod store_keys {
    pub const SHIFTS: &str = "shifts";
    pub const SWAP_REQUESTS: &str = "swapRequests";
}

/// 外部键值存储接口
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>>;

    fn put(&self, key: &str, value: &str) -> RepositoryResult<()>;
}

/// 读取 JSON 数组记录，key 不存在时返回空集合
pub fn load_records<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> RepositoryResult<Vec<T>> {
    match store.get(key)? {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(&raw).map_err(|e| RepositoryError::SerializationError {
                key: key.to_string(),
                message: e.to_string(),
            })
        }
        _ => Ok(Vec::new()),
    }
}

/// 全量写回 JSON 数组记录
pub fn save_records<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    records: &[T],
) -> RepositoryResult<()> {
    let raw = serde_json::to_string(records).map_err(|e| RepositoryError::SerializationError {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.put(key, &raw)
}

// ==========================================
// SqliteKvStore - SQLite 后端
// ==========================================
pub struct SqliteKvStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKvStore {
    /// 打开数据库文件并确保 kv_store 表存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与 ConfigManager 共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

// ==========================================
// InMemoryKvStore - 内存后端（测试 / 演示）
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
