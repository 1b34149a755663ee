// ==========================================
// 住所排班引擎 - 引擎门面
// ==========================================
// 职责: 组装各子引擎，对外暴露六个业务操作
//   compute_workload / detect_conflicts / rank /
//   auto_fill_open_shifts / suggest / create_swap_request
// 红线: 班次集合的唯一写入方是自动填充
// ==========================================

use crate::catalog::{ShiftCatalog, StaffRoster};
use crate::config::{ConfigManager, EngineConfig};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::conflict::{Conflict, Suggestion};
use crate::domain::shift::{Shift, StaffId};
use crate::domain::staff::StaffMember;
use crate::domain::swap::SwapRequest;
use crate::domain::workload::WorkloadStat;
use crate::engine::autofill::{AutoFillEngine, AutoFillReport};
use crate::engine::conflict::ConflictDetector;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::events::NotificationSink;
use crate::engine::jitter::JitterSource;
use crate::engine::ranker::{CandidateRanker, RankedCandidate};
use crate::engine::swap_ledger::SwapRequestLedger;
use crate::engine::swap_suggestion::SwapSuggestionEngine;
use crate::engine::workload::WorkloadAnalyzer;
use crate::repository::{KeyValueStore, ScheduleRepository, SqliteKvStore, SwapRequestRepository};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct ShiftEngine {
    catalog: Arc<ShiftCatalog>,
    roster: Arc<StaffRoster>,
    config: EngineConfig,
    schedule: ScheduleRepository,
    analyzer: WorkloadAnalyzer,
    detector: ConflictDetector,
    ranker: CandidateRanker,
    autofill: AutoFillEngine,
    swaps: SwapSuggestionEngine,
    ledger: SwapRequestLedger,
}

impl ShiftEngine {
    /// 基于任意键值存储组装引擎
    ///
    /// # 参数
    /// - store: 班次与换班申请的存储后端
    /// - catalog / roster: 静态目录
    /// - config: 引擎参数
    /// - jitter: 排序抖动源
    /// - notifier: 通知出口
    pub fn with_store(
        store: Arc<dyn KeyValueStore>,
        catalog: ShiftCatalog,
        roster: StaffRoster,
        config: EngineConfig,
        jitter: Box<dyn JitterSource>,
        notifier: Arc<dyn NotificationSink>,
    ) -> EngineResult<Self> {
        let catalog = Arc::new(catalog);
        let roster = Arc::new(roster);

        let schedule = ScheduleRepository::load(Arc::clone(&store))?;
        let analyzer = WorkloadAnalyzer::new(
            Arc::clone(&catalog),
            Arc::clone(&roster),
            config.workload.aggregation_order,
        );
        let detector = ConflictDetector::new(config.rest.clone());
        let ranker = CandidateRanker::new(
            Arc::clone(&catalog),
            Arc::clone(&roster),
            config.ranking.clone(),
            jitter,
        );
        let autofill = AutoFillEngine::new(
            Arc::clone(&catalog),
            analyzer.clone(),
            detector.clone(),
            notifier,
        );
        let swaps = SwapSuggestionEngine::new(
            Arc::clone(&catalog),
            Arc::clone(&roster),
            analyzer.clone(),
            detector.clone(),
            config.swap.clone(),
        );
        let ledger = SwapRequestLedger::new(
            SwapRequestRepository::new(store),
            config.swap.request_ttl_hours,
        );

        info!(
            shifts = schedule.shifts().len(),
            staff = roster.len(),
            shift_types = catalog.len(),
            aggregation_order = %config.workload.aggregation_order,
            "排班引擎已就绪"
        );

        Ok(Self {
            catalog,
            roster,
            config,
            schedule,
            analyzer,
            detector,
            ranker,
            autofill,
            swaps,
            ledger,
        })
    }

    /// 打开 SQLite 数据库，读取 config_kv 覆写并组装引擎
    ///
    /// ConfigManager 与 SqliteKvStore 共享同一连接
    pub fn from_sqlite(
        db_path: &str,
        catalog: ShiftCatalog,
        roster: StaffRoster,
        jitter: Box<dyn JitterSource>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        let conn = Arc::new(Mutex::new(conn));

        let config = ConfigManager::from_connection(Arc::clone(&conn))?.load_engine_config()?;
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKvStore::from_connection(conn)?);

        Ok(Self::with_store(store, catalog, roster, config, jitter, notifier)?)
    }

    pub fn catalog(&self) -> &ShiftCatalog {
        &self.catalog
    }

    pub fn roster(&self) -> &StaffRoster {
        &self.roster
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 只读访问班次快照
    pub fn schedule(&self) -> &ScheduleRepository {
        &self.schedule
    }

    pub fn ledger(&self) -> &SwapRequestLedger {
        &self.ledger
    }

    /// 从存储重新加载班次集合
    pub fn reload(&mut self) -> EngineResult<()> {
        Ok(self.schedule.reload()?)
    }

    /// 为日期区间补齐缺失的空班次，返回新建数量
    pub fn ensure_shifts_for_range(&mut self, start: NaiveDate, end: NaiveDate) -> EngineResult<usize> {
        Ok(self.schedule.ensure_shifts_for_range(&self.catalog, start, end)?)
    }

    // ==========================================
    // 对外操作
    // ==========================================

    /// 对任意班次集合计算负载
    pub fn compute_workload(&self, shifts: &[Shift]) -> HashMap<StaffId, WorkloadStat> {
        self.analyzer.compute_workload(shifts)
    }

    /// 对当前快照计算负载
    pub fn current_workload(&self) -> HashMap<StaffId, WorkloadStat> {
        self.analyzer.compute_workload(self.schedule.shifts())
    }

    pub fn detect_conflicts(&self, shift_id: &str, staff_id: &str) -> Vec<Conflict> {
        self.detector
            .detect_conflicts(self.schedule.shifts(), shift_id, staff_id)
    }

    /// 候选人排序（仅返回员工）
    pub fn rank(
        &mut self,
        shift_type_id: &str,
        date: NaiveDate,
        exclude_ids: &[StaffId],
    ) -> EngineResult<Vec<StaffMember>> {
        Ok(self
            .rank_detailed(shift_type_id, date, exclude_ids)?
            .into_iter()
            .map(|c| c.staff)
            .collect())
    }

    /// 候选人排序（含评分明细）
    pub fn rank_detailed(
        &mut self,
        shift_type_id: &str,
        date: NaiveDate,
        exclude_ids: &[StaffId],
    ) -> EngineResult<Vec<RankedCandidate>> {
        let workload = self.analyzer.compute_workload(self.schedule.shifts());
        self.ranker.rank(&workload, shift_type_id, date, exclude_ids)
    }

    /// 自动填充，返回新增分配数；失败时记录日志并返回 0
    pub fn auto_fill_open_shifts(&mut self) -> usize {
        match self.try_auto_fill() {
            Ok(report) => report.change_count(),
            Err(e) => {
                warn!(error = %e, "自动填充失败，未写入任何分配");
                0
            }
        }
    }

    /// 自动填充，返回完整报告
    pub fn try_auto_fill(&mut self) -> EngineResult<AutoFillReport> {
        self.autofill
            .auto_fill_open_shifts(&mut self.schedule, &mut self.ranker)
    }

    pub fn suggest(&self, shift_id: &str) -> Vec<Suggestion> {
        self.swaps.suggest(self.schedule.shifts(), shift_id)
    }

    /// 为快照中的班次创建换班申请
    ///
    /// # 错误
    /// - ShiftNotFound: 班次不在快照中
    /// - StaffNotFound: 发起人或接收人不在名册中
    /// - StaffNotAssigned: 发起人未排入该班次
    /// - SwapExpiryOutOfRange: 过期时间超出时间范围
    pub fn create_swap_request(
        &self,
        shift_id: &str,
        from_staff_id: &str,
        to_staff_id: &str,
        message: &str,
    ) -> EngineResult<SwapRequest> {
        let shift = self
            .schedule
            .find(shift_id)
            .ok_or_else(|| EngineError::ShiftNotFound(shift_id.to_string()))?;

        for staff_id in [from_staff_id, to_staff_id] {
            if !self.roster.contains(staff_id) {
                return Err(EngineError::StaffNotFound(staff_id.to_string()));
            }
        }
        if !shift.is_assigned(from_staff_id) {
            return Err(EngineError::StaffNotAssigned {
                staff_id: from_staff_id.to_string(),
                shift_id: shift_id.to_string(),
            });
        }

        self.ledger.create(shift, from_staff_id, to_staff_id, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::shift_type_ids::{EARLY_FULL, EARLY_INTERMEDIATE};
    use crate::domain::types::Role;
    use crate::engine::events::RecordingNotificationSink;
    use crate::engine::jitter::ZeroJitter;
    use crate::repository::InMemoryKvStore;

    fn engine(roster: Vec<StaffMember>) -> (ShiftEngine, RecordingNotificationSink) {
        let sink = RecordingNotificationSink::new();
        let engine = ShiftEngine::with_store(
            Arc::new(InMemoryKvStore::new()),
            ShiftCatalog::default_catalog(),
            StaffRoster::new(roster),
            EngineConfig::default(),
            Box::new(ZeroJitter),
            Arc::new(sink.clone()),
        )
        .unwrap();
        (engine, sink)
    }

    fn wed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    #[test]
    fn test_facade_fills_and_reports_count() {
        let (mut engine, sink) = engine(vec![
            StaffMember::new("a", "Anna", Role::Woonbegeleider),
            StaffMember::new("b", "Bram", Role::Woonbegeleider),
            StaffMember::new("c", "Cor", Role::Woonbegeleider),
        ]);
        engine.ensure_shifts_for_range(wed(), wed()).unwrap();

        // 四个班次容量合计 2 + 1 + 1 + 2，但同日重叠限制了可排人数
        let count = engine.auto_fill_open_shifts();
        assert!(count > 0);
        assert_eq!(sink.len(), count);
        for shift in engine.schedule().shifts() {
            let max = engine.catalog().get(&shift.shift_type_id).unwrap().max_staff;
            assert!(shift.assigned_staff_ids.len() <= max);
        }
    }

    #[test]
    fn test_rank_unknown_type_is_an_error() {
        let (mut engine, _) = engine(vec![StaffMember::new("a", "Anna", Role::Woonbegeleider)]);
        let err = engine.rank("night", wed(), &[]).unwrap_err();
        assert!(matches!(err, EngineError::ShiftTypeNotFound(_)));
    }

    #[test]
    fn test_rank_filters_coordinators_for_ineligible_types() {
        let (mut engine, _) = engine(vec![
            StaffMember::new("a", "Anna", Role::Woonbegeleider),
            StaffMember::new("f", "Fatima", Role::Coordinator),
        ]);
        let full = engine.rank(EARLY_FULL, wed(), &[]).unwrap();
        assert_eq!(full.len(), 1);
        let inter = engine.rank(EARLY_INTERMEDIATE, wed(), &[]).unwrap();
        assert_eq!(inter.len(), 2);
    }

    #[test]
    fn test_swap_request_for_unknown_shift() {
        let (engine, _) = engine(vec![]);
        let err = engine
            .create_swap_request("2025-03-12_early_full", "a", "b", "")
            .unwrap_err();
        assert!(matches!(err, EngineError::ShiftNotFound(_)));
        assert!(engine.suggest("2025-03-12_early_full").is_empty());
        assert!(engine.detect_conflicts("nope", "a").is_empty());
    }

    #[test]
    fn test_swap_request_requires_known_and_assigned_staff() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKvStore::new());
        let catalog = ShiftCatalog::default_catalog();
        let mut shift = Shift::new(wed(), catalog.get(EARLY_FULL).unwrap());
        shift.assigned_staff_ids = vec!["a".to_string()];
        ScheduleRepository::with_shifts(Arc::clone(&store), vec![shift]).unwrap();

        let engine = ShiftEngine::with_store(
            store,
            catalog,
            StaffRoster::new(vec![
                StaffMember::new("a", "Anna", Role::Woonbegeleider),
                StaffMember::new("b", "Bram", Role::Woonbegeleider),
            ]),
            EngineConfig::default(),
            Box::new(ZeroJitter),
            Arc::new(RecordingNotificationSink::new()),
        )
        .unwrap();
        let shift_id = "2025-03-12_early_full";

        let err = engine.create_swap_request(shift_id, "ghost", "b", "").unwrap_err();
        assert!(matches!(err, EngineError::StaffNotFound(id) if id == "ghost"));

        let err = engine.create_swap_request(shift_id, "a", "ghost", "").unwrap_err();
        assert!(matches!(err, EngineError::StaffNotFound(id) if id == "ghost"));

        let err = engine.create_swap_request(shift_id, "b", "a", "").unwrap_err();
        assert!(
            matches!(err, EngineError::StaffNotAssigned { staff_id, .. } if staff_id == "b")
        );
        assert!(engine.ledger().list().unwrap().is_empty());

        let req = engine.create_swap_request(shift_id, "a", "b", "").unwrap();
        assert_eq!(req.from_staff_id, "a");
        assert_eq!(engine.ledger().list().unwrap().len(), 1);
    }
}
