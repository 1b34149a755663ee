// ==========================================
// 住所排班引擎 - 自动填充引擎
// ==========================================
// 职责: 为人手不足的班次按排序结果分配员工
// 输入: ScheduleRepository（唯一写入方）+ CandidateRanker
// 输出: AutoFillReport + 一次全量写回
// ==========================================
// 流程（按存储顺序逐个班次）:
// 1) needed = max_staff - 当前人数，<= 0 跳过
// 2) 基于工作副本重算负载并排序候选人（排除已分配者）
// 3) 逐个候选人做冲突检测，无冲突即分配，直到 needed 归零或候选耗尽
// 4) 全部处理完成后一次写回存储，写回成功后逐条发出分配通知
// ==========================================

use crate::catalog::ShiftCatalog;
use crate::domain::conflict::Conflict;
use crate::domain::shift::{ShiftId, StaffId};
use crate::domain::types::NotificationKind;
use crate::engine::conflict::ConflictDetector;
use crate::engine::error::EngineResult;
use crate::engine::events::NotificationSink;
use crate::engine::ranker::CandidateRanker;
use crate::engine::workload::WorkloadAnalyzer;
use crate::repository::ScheduleRepository;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// 单个班次的填充结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShiftFillOutcome {
    pub shift_id: ShiftId,
    pub needed: usize,
    pub assigned: Vec<StaffId>,
    /// 因冲突被跳过的候选人
    pub rejected: Vec<(StaffId, Vec<Conflict>)>,
    /// 候选耗尽后仍缺的人数
    pub unfilled: usize,
}

/// 未处理的班次及原因
#[derive(Debug, Clone, Serialize)]
pub struct SkippedShift {
    pub shift_id: ShiftId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AutoFillReport {
    pub outcomes: Vec<ShiftFillOutcome>,
    pub skipped: Vec<SkippedShift>,
    pub assignments: usize,
}

impl AutoFillReport {
    /// 新增分配总数
    pub fn change_count(&self) -> usize {
        self.assignments
    }

    /// 至少新增一人的班次数
    pub fn shifts_changed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.assigned.is_empty()).count()
    }
}

pub struct AutoFillEngine {
    catalog: Arc<ShiftCatalog>,
    analyzer: WorkloadAnalyzer,
    detector: ConflictDetector,
    notifier: Arc<dyn NotificationSink>,
}

impl AutoFillEngine {
    pub fn new(
        catalog: Arc<ShiftCatalog>,
        analyzer: WorkloadAnalyzer,
        detector: ConflictDetector,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            catalog,
            analyzer,
            detector,
            notifier,
        }
    }

    /// 填充所有人手不足的班次
    ///
    /// 写回失败时内存快照保持不变，错误向上返回。
    #[instrument(skip_all, fields(shift_count = repo.shifts().len()))]
    pub fn auto_fill_open_shifts(
        &self,
        repo: &mut ScheduleRepository,
        ranker: &mut CandidateRanker,
    ) -> EngineResult<AutoFillReport> {
        let mut working = repo.working_copy();
        let mut report = AutoFillReport::default();
        let mut pending_notices: Vec<String> = Vec::new();

        for idx in 0..working.len() {
            let shift_type_id = working[idx].shift_type_id.clone();
            let Some(shift_type) = self.catalog.get(&shift_type_id) else {
                warn!(
                    shift_id = %working[idx].id,
                    shift_type_id = %shift_type_id,
                    "班次类型不在目录中，跳过自动填充"
                );
                report.skipped.push(SkippedShift {
                    shift_id: working[idx].id.clone(),
                    reason: format!("SHIFT_TYPE_NOT_FOUND: {}", shift_type_id),
                });
                continue;
            };

            let current = working[idx].assigned_staff_ids.len();
            if current >= shift_type.max_staff {
                continue;
            }

            let mut outcome = ShiftFillOutcome {
                shift_id: working[idx].id.clone(),
                needed: shift_type.max_staff - current,
                ..ShiftFillOutcome::default()
            };
            let mut needed = outcome.needed;

            let workload = self.analyzer.compute_workload(&working);
            let exclude = working[idx].assigned_staff_ids.clone();
            let ranked = ranker.rank_for_type(&workload, shift_type, working[idx].date, &exclude);

            for candidate in ranked {
                if needed == 0 {
                    break;
                }
                let staff_id = candidate.staff.id;

                let conflicts = self
                    .detector
                    .detect_for_shift(&working, &working[idx], &staff_id);
                if !conflicts.is_empty() {
                    debug!(
                        shift_id = %outcome.shift_id,
                        staff_id = %staff_id,
                        conflicts = conflicts.len(),
                        "候选人存在冲突，跳过"
                    );
                    outcome.rejected.push((staff_id, conflicts));
                    continue;
                }

                if working[idx].assign(&staff_id) {
                    needed -= 1;
                    report.assignments += 1;
                    pending_notices.push(format!(
                        "{} 已自动排入 {} {}",
                        candidate.staff.name, working[idx].date, shift_type.name
                    ));
                    outcome.assigned.push(staff_id);
                }
            }

            outcome.unfilled = needed;
            if needed > 0 {
                debug!(
                    shift_id = %outcome.shift_id,
                    unfilled = needed,
                    "候选人耗尽，班次仍缺人"
                );
            }
            report.outcomes.push(outcome);
        }

        if report.assignments > 0 {
            repo.replace_all(working)?;
            for notice in &pending_notices {
                self.notifier.notify(notice, NotificationKind::Success);
            }
        }

        info!(
            open_shifts = report.outcomes.len(),
            skipped = report.skipped.len(),
            assignments = report.assignments,
            shifts_changed = report.shifts_changed(),
            "自动填充完成"
        );

        Ok(report)
    }
}
