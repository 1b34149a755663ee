// ==========================================
// 住所排班引擎 - 候选人排序
// ==========================================
// 职责: 为空缺班次筛选合格员工并按公平性评分排序
// 输入: 班次类型 + 日期 + 排除名单 + 负载统计
// 输出: 按分数降序的候选人列表（附评分明细）
// ==========================================
// 评分（越高越优先）:
// 1) (20 - total_shifts) * 2          负载越低越优先
// 2) +10 早晚班平衡                   目标早班且晚班多 / 目标晚班且早班多
// 3) +15 周末公平                     周末且周末班 < 2 / 工作日且周末班 > 1
// 4) +5  疲劳控制                     consecutive_days < 2
// 5) + [0, 5) 抖动                    打破平分
// ==========================================

use crate::catalog::{ShiftCatalog, StaffRoster};
use crate::config::RankingWeights;
use crate::domain::shift::{is_weekend, ShiftType, StaffId};
use crate::domain::staff::StaffMember;
use crate::domain::types::ShiftCategory;
use crate::domain::workload::WorkloadStat;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::jitter::JitterSource;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 评分明细
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub load: f64,
    pub balance: f64,
    pub weekend: f64,
    pub fatigue: f64,
    pub jitter: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.load + self.balance + self.weekend + self.fatigue + self.jitter
    }

    /// 不含抖动的基础分
    pub fn base(&self) -> f64 {
        self.load + self.balance + self.weekend + self.fatigue
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub staff: StaffMember,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

pub struct CandidateRanker {
    catalog: Arc<ShiftCatalog>,
    roster: Arc<StaffRoster>,
    weights: RankingWeights,
    jitter: Box<dyn JitterSource>,
}

impl CandidateRanker {
    pub fn new(
        catalog: Arc<ShiftCatalog>,
        roster: Arc<StaffRoster>,
        weights: RankingWeights,
        jitter: Box<dyn JitterSource>,
    ) -> Self {
        Self {
            catalog,
            roster,
            weights,
            jitter,
        }
    }

    /// 对指定班次类型和日期排序候选人
    ///
    /// # 错误
    /// - ShiftTypeNotFound: 班次类型不在目录中
    pub fn rank(
        &mut self,
        workload: &HashMap<StaffId, WorkloadStat>,
        shift_type_id: &str,
        date: NaiveDate,
        exclude_ids: &[StaffId],
    ) -> EngineResult<Vec<RankedCandidate>> {
        let catalog = Arc::clone(&self.catalog);
        let shift_type = catalog
            .get(shift_type_id)
            .ok_or_else(|| EngineError::ShiftTypeNotFound(shift_type_id.to_string()))?;

        Ok(self.rank_for_type(workload, shift_type, date, exclude_ids))
    }

    /// 对已解析的班次类型排序候选人
    pub fn rank_for_type(
        &mut self,
        workload: &HashMap<StaffId, WorkloadStat>,
        shift_type: &ShiftType,
        date: NaiveDate,
        exclude_ids: &[StaffId],
    ) -> Vec<RankedCandidate> {
        let weekend = is_weekend(date);
        let roster = Arc::clone(&self.roster);
        let zero = WorkloadStat::default();
        let weights = &self.weights;
        let jitter = &mut self.jitter;

        let mut ranked: Vec<RankedCandidate> = roster
            .iter()
            .filter(|m| !exclude_ids.iter().any(|id| id == &m.id))
            .filter(|m| m.is_eligible_for(shift_type))
            .map(|member| {
                let stat = workload.get(&member.id).unwrap_or(&zero);
                let mut breakdown = base_score(weights, stat, shift_type.category, weekend);
                breakdown.jitter = jitter.next_jitter(weights.jitter_max);
                RankedCandidate {
                    staff: member.clone(),
                    score: breakdown.total(),
                    breakdown,
                }
            })
            .collect();

        // 稳定排序，同分保持名册顺序
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            shift_type_id = %shift_type.id,
            %date,
            candidates = ranked.len(),
            top = ranked.first().map(|c| c.staff.id.as_str()).unwrap_or("-"),
            "候选人排序完成"
        );

        ranked
    }
}

fn base_score(
    w: &RankingWeights,
    stat: &WorkloadStat,
    target: ShiftCategory,
    weekend: bool,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown {
        load: (f64::from(w.base_shift_cap) - f64::from(stat.total_shifts))
            * f64::from(w.load_multiplier),
        ..ScoreBreakdown::default()
    };

    let needs_balance = match target {
        ShiftCategory::Early => stat.late_shifts > stat.early_shifts,
        ShiftCategory::Late => stat.early_shifts > stat.late_shifts,
    };
    if needs_balance {
        breakdown.balance = f64::from(w.balance_bonus);
    }

    let weekend_fair = if weekend {
        stat.weekend_shifts < w.weekend_low_threshold
    } else {
        stat.weekend_shifts > w.weekend_high_threshold
    };
    if weekend_fair {
        breakdown.weekend = f64::from(w.weekend_bonus);
    }

    if stat.consecutive_days < w.fatigue_threshold {
        breakdown.fatigue = f64::from(w.fatigue_bonus);
    }

    breakdown
}
