// ==========================================
// 住所排班引擎 - 换班申请台账
// ==========================================
// 职责: 创建换班申请并驱动其状态机
// 约束: 新建申请一律为 Pending，expires_at = created_at + 有效期
//       过期时间只做记录，不会自动改变状态
// ==========================================

use crate::domain::shift::Shift;
use crate::domain::swap::{SwapRequest, SwapRequestStatus};
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::SwapRequestRepository;
use crate::config::SwapWeights;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

pub struct SwapRequestLedger {
    repo: SwapRequestRepository,
    ttl: Duration,
}

impl SwapRequestLedger {
    /// # 参数
    /// - repo: 换班申请仓储
    /// - ttl_hours: 申请有效期（小时），非正数或超出范围时使用默认有效期
    pub fn new(repo: SwapRequestRepository, ttl_hours: i64) -> Self {
        let ttl = match Duration::try_hours(ttl_hours).filter(|d| *d > Duration::zero()) {
            Some(ttl) => ttl,
            None => {
                let default_hours = SwapWeights::default().request_ttl_hours;
                warn!(ttl_hours, default_hours, "换班申请有效期无效，使用默认值");
                Duration::hours(default_hours)
            }
        };
        Self { repo, ttl }
    }

    pub fn create(
        &self,
        from_shift: &Shift,
        from_staff_id: &str,
        to_staff_id: &str,
        message: &str,
    ) -> EngineResult<SwapRequest> {
        self.create_at(from_shift, from_staff_id, to_staff_id, message, Utc::now())
    }

    /// 以指定时间创建（便于测试与回放）
    pub fn create_at(
        &self,
        from_shift: &Shift,
        from_staff_id: &str,
        to_staff_id: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<SwapRequest> {
        let request = SwapRequest::new_pending(
            Uuid::new_v4().to_string(),
            from_shift.id.clone(),
            from_staff_id.to_string(),
            to_staff_id.to_string(),
            message.to_string(),
            now,
            self.ttl,
        )
        .ok_or_else(|| EngineError::SwapExpiryOutOfRange {
            created_at: now.to_rfc3339(),
            ttl_hours: self.ttl.num_hours(),
        })?;
        self.repo.append(&request)?;

        info!(
            request_id = %request.id,
            shift_id = %request.from_shift_id,
            from = %request.from_staff_id,
            to = %request.to_staff_id,
            "换班申请已创建"
        );
        Ok(request)
    }

    pub fn accept(&self, request_id: &str) -> EngineResult<SwapRequest> {
        self.transition(request_id, SwapRequestStatus::Accepted)
    }

    pub fn reject(&self, request_id: &str) -> EngineResult<SwapRequest> {
        self.transition(request_id, SwapRequestStatus::Rejected)
    }

    pub fn approve(&self, request_id: &str) -> EngineResult<SwapRequest> {
        self.transition(request_id, SwapRequestStatus::Approved)
    }

    pub fn list(&self) -> EngineResult<Vec<SwapRequest>> {
        Ok(self.repo.list()?)
    }

    pub fn list_pending(&self) -> EngineResult<Vec<SwapRequest>> {
        Ok(self.repo.list_by_status(SwapRequestStatus::Pending)?)
    }

    fn transition(&self, request_id: &str, to: SwapRequestStatus) -> EngineResult<SwapRequest> {
        let mut request = self
            .repo
            .find(request_id)?
            .ok_or_else(|| EngineError::SwapRequestNotFound(request_id.to_string()))?;

        let from = request.status;
        request.transition_to(to)?;
        self.repo.update(&request)?;

        info!(request_id, %from, %to, "换班申请状态变更");
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{shift_type_ids, ShiftCatalog};
    use crate::repository::{InMemoryKvStore, KeyValueStore};
    use chrono::{NaiveDate, TimeZone};
    use std::sync::Arc;

    fn ledger() -> SwapRequestLedger {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKvStore::new());
        SwapRequestLedger::new(SwapRequestRepository::new(store), 24)
    }

    fn shift() -> Shift {
        let catalog = ShiftCatalog::default_catalog();
        Shift::new(
            NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            catalog.get(shift_type_ids::LATE_FULL).unwrap(),
        )
    }

    #[test]
    fn test_create_records_pending_request_with_24h_expiry() {
        let ledger = ledger();
        let t = Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap();

        let req = ledger.create_at(&shift(), "s1", "s2", "kan jij?", t).unwrap();

        assert_eq!(req.status, SwapRequestStatus::Pending);
        assert_eq!(req.created_at, t);
        assert_eq!(req.expires_at, t + Duration::milliseconds(86_400_000));
        assert_eq!(ledger.list().unwrap(), vec![req.clone()]);
        assert_eq!(ledger.list_pending().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_ttl_falls_back_to_default() {
        let t = Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap();
        for ttl_hours in [0, -5, 10_000_000_000, i64::MAX] {
            let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKvStore::new());
            let ledger = SwapRequestLedger::new(SwapRequestRepository::new(store), ttl_hours);
            let req = ledger.create_at(&shift(), "s1", "s2", "", t).unwrap();
            assert_eq!(req.expires_at - req.created_at, Duration::hours(24));
        }
    }

    #[test]
    fn test_expiry_overflow_is_an_error_and_nothing_is_stored() {
        let ledger = ledger();
        let err = ledger
            .create_at(&shift(), "s1", "s2", "", DateTime::<Utc>::MAX_UTC)
            .unwrap_err();
        assert!(matches!(err, EngineError::SwapExpiryOutOfRange { ttl_hours: 24, .. }));
        assert!(ledger.list().unwrap().is_empty());
    }

    #[test]
    fn test_state_machine_is_persisted() {
        let ledger = ledger();
        let req = ledger.create(&shift(), "s1", "s2", "").unwrap();

        ledger.accept(&req.id).unwrap();
        let approved = ledger.approve(&req.id).unwrap();
        assert_eq!(approved.status, SwapRequestStatus::Approved);
        assert!(ledger.list_pending().unwrap().is_empty());

        let err = ledger.reject(&req.id).unwrap_err();
        assert!(matches!(err, EngineError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_unknown_request_id() {
        let err = ledger().accept("missing").unwrap_err();
        assert!(matches!(err, EngineError::SwapRequestNotFound(_)));
    }
}
