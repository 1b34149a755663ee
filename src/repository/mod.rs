// ==========================================
// 住所排班引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 通过外部键值存储全量读写 JSON 记录集合
// ==========================================

pub mod error;
pub mod kv_store;
pub mod schedule_repo;
pub mod swap_request_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use kv_store::{store_keys, InMemoryKvStore, KeyValueStore, SqliteKvStore};
pub use schedule_repo::ScheduleRepository;
pub use swap_request_repo::SwapRequestRepository;
