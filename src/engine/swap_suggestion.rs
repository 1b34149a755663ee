// ==========================================
// 住所排班引擎 - 换班建议
// ==========================================
// 职责: 为指定班次推荐可接手的员工（只读）
// 评分:
//   +20 consecutive_days > 2               理由: 连续班次过多
//   +15 周末目标且 weekend_shifts < 1      理由: 周末班偏少
//   +10 早班目标且晚班多于早班             理由: 晚班多于早班
// 理由按以上顺序覆盖，仅保留最后命中的一条
// 0 分与存在冲突的候选人不返回，最多返回 suggestion_limit 条
// ==========================================

use crate::catalog::{ShiftCatalog, StaffRoster};
use crate::config::SwapWeights;
use crate::domain::conflict::{Suggestion, SwapReason};
use crate::domain::shift::Shift;
use crate::domain::types::ShiftCategory;
use crate::engine::conflict::ConflictDetector;
use crate::engine::workload::WorkloadAnalyzer;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct SwapSuggestionEngine {
    catalog: Arc<ShiftCatalog>,
    roster: Arc<StaffRoster>,
    analyzer: WorkloadAnalyzer,
    detector: ConflictDetector,
    weights: SwapWeights,
}

impl SwapSuggestionEngine {
    pub fn new(
        catalog: Arc<ShiftCatalog>,
        roster: Arc<StaffRoster>,
        analyzer: WorkloadAnalyzer,
        detector: ConflictDetector,
        weights: SwapWeights,
    ) -> Self {
        Self {
            catalog,
            roster,
            analyzer,
            detector,
            weights,
        }
    }

    /// 推荐换班对象；班次或班次类型未知时返回空列表
    #[instrument(skip(self, shifts), fields(shift_count = shifts.len()))]
    pub fn suggest(&self, shifts: &[Shift], shift_id: &str) -> Vec<Suggestion> {
        let Some(target) = shifts.iter().find(|s| s.id == shift_id) else {
            return Vec::new();
        };
        let Some(shift_type) = self.catalog.get(&target.shift_type_id) else {
            warn!(
                shift_id,
                shift_type_id = %target.shift_type_id,
                "班次类型不在目录中，无法给出换班建议"
            );
            return Vec::new();
        };

        let w = &self.weights;
        let workload = self.analyzer.compute_workload(shifts);
        let weekend = target.is_weekend();
        let early_target = shift_type.category == ShiftCategory::Early;

        let mut suggestions: Vec<Suggestion> = Vec::new();
        for member in self.roster.iter().filter(|m| !target.is_assigned(&m.id)) {
            let Some(stat) = workload.get(&member.id) else {
                continue;
            };

            let mut score = 0;
            let mut reason = None;
            if stat.consecutive_days > w.consecutive_threshold {
                score += w.consecutive_bonus;
                reason = Some(SwapReason::TooManyConsecutiveShifts);
            }
            if weekend && stat.weekend_shifts < w.weekend_threshold {
                score += w.weekend_bonus;
                reason = Some(SwapReason::FewWeekendShifts);
            }
            if early_target && stat.late_shifts > stat.early_shifts {
                score += w.balance_bonus;
                reason = Some(SwapReason::MoreLateThanEarlyShifts);
            }

            let Some(reason) = reason else {
                continue;
            };
            if score == 0 {
                continue;
            }

            let conflicts = self.detector.detect_for_shift(shifts, target, &member.id);
            if !conflicts.is_empty() {
                debug!(staff_id = %member.id, conflicts = conflicts.len(), "换班候选人存在冲突");
                continue;
            }

            suggestions.push(Suggestion {
                staff: member.clone(),
                reason,
                score,
                conflicts,
            });
        }

        suggestions.sort_by(|a, b| b.score.cmp(&a.score));
        suggestions.truncate(w.suggestion_limit);
        suggestions
    }
}
