// ==========================================
// 住所排班引擎 - 工作负载统计（派生值，不落库）
// ==========================================

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadStat {
    pub total_shifts: u32,
    pub early_shifts: u32,
    pub late_shifts: u32,
    pub weekend_shifts: u32,
    pub consecutive_days: u32,
    pub last_shift_date: Option<NaiveDate>,
}
