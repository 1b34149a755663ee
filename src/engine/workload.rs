// ==========================================
// 住所排班引擎 - 工作负载分析
// ==========================================
// 职责: 从班次快照派生每名员工的负载统计
// 输入: Shift 集合 + 员工名册 + 班次目录
// 输出: HashMap<StaffId, WorkloadStat>（每次按需重算，不落库）
// ==========================================
// 说明: consecutive_days 的累计依赖遍历顺序。
//       AggregationOrder::Stored 保持存储顺序，
//       AggregationOrder::Chronological 先按日期稳定排序。
// ==========================================

use crate::catalog::{ShiftCatalog, StaffRoster};
use crate::config::AggregationOrder;
use crate::domain::shift::{Shift, StaffId};
use crate::domain::types::ShiftCategory;
use crate::domain::workload::WorkloadStat;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{trace, warn};

#[derive(Clone)]
pub struct WorkloadAnalyzer {
    catalog: Arc<ShiftCatalog>,
    roster: Arc<StaffRoster>,
    order: AggregationOrder,
}

impl WorkloadAnalyzer {
    pub fn new(catalog: Arc<ShiftCatalog>, roster: Arc<StaffRoster>, order: AggregationOrder) -> Self {
        Self {
            catalog,
            roster,
            order,
        }
    }

    pub fn order(&self) -> AggregationOrder {
        self.order
    }

    /// 计算全部员工的负载统计
    ///
    /// 规则:
    /// 1) 名册中每名员工先置零
    /// 2) 每个分配: total +1，早班/晚班按班次类别 +1，周六日 weekend +1
    /// 3) 与上一次班次日期相差恰好 1 天时 consecutive +1
    /// 4) last_shift_date 始终更新为当前班次日期
    ///
    /// 名册外的员工 ID 与目录外的班次类型静默跳过。
    pub fn compute_workload(&self, shifts: &[Shift]) -> HashMap<StaffId, WorkloadStat> {
        let mut stats: HashMap<StaffId, WorkloadStat> = self
            .roster
            .iter()
            .map(|m| (m.id.clone(), WorkloadStat::default()))
            .collect();

        let mut ordered: Vec<&Shift> = shifts.iter().collect();
        if self.order == AggregationOrder::Chronological {
            ordered.sort_by_key(|s| s.date);
        }

        for shift in ordered {
            let Some(shift_type) = self.catalog.get(&shift.shift_type_id) else {
                warn!(
                    shift_id = %shift.id,
                    shift_type_id = %shift.shift_type_id,
                    "班次类型不在目录中，负载统计跳过该班次"
                );
                continue;
            };
            let weekend = shift.is_weekend();

            for staff_id in &shift.assigned_staff_ids {
                let Some(stat) = stats.get_mut(staff_id) else {
                    trace!(staff_id = %staff_id, "员工不在名册中，跳过");
                    continue;
                };

                stat.total_shifts += 1;
                match shift_type.category {
                    ShiftCategory::Early => stat.early_shifts += 1,
                    ShiftCategory::Late => stat.late_shifts += 1,
                }
                if weekend {
                    stat.weekend_shifts += 1;
                }
                if let Some(last) = stat.last_shift_date {
                    if (shift.date - last).num_days().abs() == 1 {
                        stat.consecutive_days += 1;
                    }
                }
                stat.last_shift_date = Some(shift.date);
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::shift_type_ids::{EARLY_FULL, LATE_FULL};
    use crate::domain::staff::StaffMember;
    use crate::domain::types::Role;
    use chrono::NaiveDate;

    fn analyzer(order: AggregationOrder) -> WorkloadAnalyzer {
        let roster = StaffRoster::new(vec![
            StaffMember::new("a", "A", Role::Woonbegeleider),
            StaffMember::new("b", "B", Role::Woonbegeleider),
        ]);
        WorkloadAnalyzer::new(
            Arc::new(ShiftCatalog::default_catalog()),
            Arc::new(roster),
            order,
        )
    }

    fn shift(day: u32, type_id: &str, staff: &[&str]) -> Shift {
        let catalog = ShiftCatalog::default_catalog();
        // 2025-03-03 是周一
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let mut s = Shift::new(date, catalog.get(type_id).unwrap());
        s.assigned_staff_ids = staff.iter().map(|x| x.to_string()).collect();
        s
    }

    #[test]
    fn test_empty_shift_list_yields_zeroed_stats_for_everyone() {
        let stats = analyzer(AggregationOrder::Stored).compute_workload(&[]);
        assert_eq!(stats.len(), 2);
        assert!(stats.values().all(|s| *s == WorkloadStat::default()));
    }

    #[test]
    fn test_counts_categories_weekends_and_consecutive_days() {
        let shifts = vec![
            shift(7, EARLY_FULL, &["a"]), // 周五
            shift(8, LATE_FULL, &["a"]),  // 周六
            shift(9, LATE_FULL, &["a", "b"]), // 周日
        ];
        let stats = analyzer(AggregationOrder::Stored).compute_workload(&shifts);

        let a = &stats["a"];
        assert_eq!(a.total_shifts, 3);
        assert_eq!(a.early_shifts, 1);
        assert_eq!(a.late_shifts, 2);
        assert_eq!(a.weekend_shifts, 2);
        assert_eq!(a.consecutive_days, 2);
        assert_eq!(a.last_shift_date, NaiveDate::from_ymd_opt(2025, 3, 9));

        let b = &stats["b"];
        assert_eq!(b.total_shifts, 1);
        assert_eq!(b.consecutive_days, 0);
    }

    #[test]
    fn test_unknown_staff_and_unknown_shift_type_are_skipped() {
        let mut odd = shift(4, EARLY_FULL, &["a"]);
        odd.shift_type_id = "night".to_string();
        let shifts = vec![shift(3, EARLY_FULL, &["ghost", "b"]), odd];

        let stats = analyzer(AggregationOrder::Stored).compute_workload(&shifts);
        assert!(!stats.contains_key("ghost"));
        assert_eq!(stats["b"].total_shifts, 1);
        assert_eq!(stats["a"].total_shifts, 0);
    }

    #[test]
    fn test_stored_order_is_order_sensitive() {
        // 存储顺序 3, 5, 4: 3->5 差 2 天, 5->4 差 1 天
        let shifts = vec![
            shift(3, EARLY_FULL, &["a"]),
            shift(5, EARLY_FULL, &["a"]),
            shift(4, EARLY_FULL, &["a"]),
        ];
        let stored = analyzer(AggregationOrder::Stored).compute_workload(&shifts);
        assert_eq!(stored["a"].consecutive_days, 1);
        assert_eq!(stored["a"].last_shift_date, NaiveDate::from_ymd_opt(2025, 3, 4));

        let chrono_order = analyzer(AggregationOrder::Chronological).compute_workload(&shifts);
        assert_eq!(chrono_order["a"].consecutive_days, 2);
        assert_eq!(chrono_order["a"].last_shift_date, NaiveDate::from_ymd_opt(2025, 3, 5));
    }
}
