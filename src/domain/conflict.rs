// ==========================================
// 住所排班引擎 - 冲突与换班建议值对象
// ==========================================

use crate::domain::shift::ShiftId;
use crate::domain::staff::StaffMember;
use crate::domain::types::ConflictType;
use serde::Serialize;
use std::fmt;

/// 排班冲突（值对象，由 ConflictDetector 产出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    /// 与之冲突的既有班次
    pub shift_id: ShiftId,
    pub message: String,
}

/// 换班建议理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapReason {
    TooManyConsecutiveShifts,
    FewWeekendShifts,
    MoreLateThanEarlyShifts,
}

impl fmt::Display for SwapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapReason::TooManyConsecutiveShifts => write!(f, "too many consecutive shifts"),
            SwapReason::FewWeekendShifts => write!(f, "few weekend shifts"),
            SwapReason::MoreLateThanEarlyShifts => write!(f, "more late than early shifts"),
        }
    }
}

/// 换班建议
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub staff: StaffMember,
    pub reason: SwapReason,
    pub score: i32,
    /// 返回的建议均无冲突，保留字段供调用方展示
    pub conflicts: Vec<Conflict>,
}
