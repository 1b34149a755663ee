// ==========================================
// 住所排班引擎 - 换班申请仓储
// ==========================================
// 红线: Repository 不含业务逻辑（状态机在领域层）
// ==========================================

use crate::domain::swap::{SwapRequest, SwapRequestStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kv_store::{load_records, save_records, store_keys, KeyValueStore};
use std::sync::Arc;

pub struct SwapRequestRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SwapRequestRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> RepositoryResult<Vec<SwapRequest>> {
        load_records(self.store.as_ref(), store_keys::SWAP_REQUESTS)
    }

    pub fn list_by_status(&self, status: SwapRequestStatus) -> RepositoryResult<Vec<SwapRequest>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.status == status)
            .collect())
    }

    pub fn find(&self, request_id: &str) -> RepositoryResult<Option<SwapRequest>> {
        Ok(self.list()?.into_iter().find(|r| r.id == request_id))
    }

    /// 追加一条记录（全量读 + 全量写）
    pub fn append(&self, request: &SwapRequest) -> RepositoryResult<()> {
        let mut all = self.list()?;
        all.push(request.clone());
        save_records(self.store.as_ref(), store_keys::SWAP_REQUESTS, &all)
    }

    /// 按 ID 覆盖已有记录
    pub fn update(&self, request: &SwapRequest) -> RepositoryResult<()> {
        let mut all = self.list()?;
        let slot = all
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "SwapRequest".to_string(),
                id: request.id.clone(),
            })?;
        *slot = request.clone();
        save_records(self.store.as_ref(), store_keys::SWAP_REQUESTS, &all)
    }
}
