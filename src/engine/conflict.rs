// ==========================================
// 住所排班引擎 - 排班冲突检测
// ==========================================
// 职责: 判断把员工排入某班次是否与其既有分配冲突
// 规则:
// - overlap: 同日其它班次（小时粒度）时段相交
// - rest:    前一日最晚结束的班次 >= 22 点且目标班次 <= 9 点开始
// 红线: 只读，不修改班次集合
// ==========================================

use crate::config::RestRuleConfig;
use crate::domain::conflict::Conflict;
use crate::domain::shift::Shift;
use crate::domain::types::ConflictType;

#[derive(Debug, Clone)]
pub struct ConflictDetector {
    rest: RestRuleConfig,
}

impl ConflictDetector {
    pub fn new(rest: RestRuleConfig) -> Self {
        Self { rest }
    }

    /// 按班次 ID 检测冲突；班次 ID 未知时返回空列表
    pub fn detect_conflicts(&self, shifts: &[Shift], shift_id: &str, staff_id: &str) -> Vec<Conflict> {
        match shifts.iter().find(|s| s.id == shift_id) {
            Some(target) => self.detect_for_shift(shifts, target, staff_id),
            None => Vec::new(),
        }
    }

    /// 对已解析的目标班次检测冲突
    pub fn detect_for_shift(&self, shifts: &[Shift], target: &Shift, staff_id: &str) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        // === overlap ===
        let target_start = target.start_hour();
        let target_end = target.end_hour();
        for other in shifts.iter().filter(|s| {
            s.id != target.id && s.date == target.date && s.is_assigned(staff_id)
        }) {
            if target_start < other.end_hour() && target_end > other.start_hour() {
                conflicts.push(Conflict {
                    conflict_type: ConflictType::Overlap,
                    shift_id: other.id.clone(),
                    message: format!(
                        "时段重叠: 已排入 {} {}-{}",
                        other.date,
                        other.start_time.format("%H:%M"),
                        other.end_time.format("%H:%M")
                    ),
                });
            }
        }

        // === rest ===
        if let Some(prev_date) = target.date.pred_opt() {
            let latest_prev = shifts
                .iter()
                .filter(|s| s.date == prev_date && s.is_assigned(staff_id))
                .max_by_key(|s| s.end_hour());

            if let Some(prev) = latest_prev {
                if prev.end_hour() >= self.rest.late_end_hour
                    && target_start <= self.rest.early_start_hour
                {
                    conflicts.push(Conflict {
                        conflict_type: ConflictType::Rest,
                        shift_id: prev.id.clone(),
                        message: format!(
                            "休息不足: 前一日班次 {} 结束于 {}，本班次 {} 开始",
                            prev.date,
                            prev.end_time.format("%H:%M"),
                            target.start_time.format("%H:%M")
                        ),
                    });
                }
            }
        }

        conflicts
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(RestRuleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ShiftStatus;
    use chrono::{NaiveDate, NaiveTime};

    fn shift(id: &str, day: u32, start: u32, end: u32, staff: &[&str]) -> Shift {
        Shift {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            shift_type_id: id.to_string(),
            start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
            assigned_staff_ids: staff.iter().map(|s| s.to_string()).collect(),
            status: ShiftStatus::Scheduled,
            check_ins: vec![],
            check_outs: vec![],
        }
    }

    #[test]
    fn test_overlapping_same_day_shifts() {
        let shifts = vec![
            shift("early", 10, 7, 15, &["s1"]),
            shift("mid", 10, 9, 17, &["s1"]),
        ];
        let conflicts = ConflictDetector::default().detect_conflicts(&shifts, "mid", "s1");

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Overlap);
        assert_eq!(conflicts[0].shift_id, "early");
    }

    #[test]
    fn test_adjacent_shifts_do_not_overlap() {
        let shifts = vec![
            shift("early", 10, 7, 15, &["s1"]),
            shift("late", 10, 15, 23, &["s1"]),
        ];
        let conflicts = ConflictDetector::default().detect_conflicts(&shifts, "late", "s1");
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_late_then_early_violates_rest() {
        let shifts = vec![
            shift("late_d", 10, 15, 23, &["s1"]),
            shift("early_d1", 11, 7, 15, &[]),
        ];
        let conflicts = ConflictDetector::default().detect_conflicts(&shifts, "early_d1", "s1");

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Rest);
        assert_eq!(conflicts[0].shift_id, "late_d");
    }

    #[test]
    fn test_previous_day_ending_at_17_is_fine() {
        let shifts = vec![
            shift("mid_d", 10, 9, 17, &["s1"]),
            shift("early_d1", 11, 7, 15, &[]),
        ];
        assert!(ConflictDetector::default()
            .detect_conflicts(&shifts, "early_d1", "s1")
            .is_empty());
    }

    #[test]
    fn test_rest_uses_latest_previous_shift() {
        let shifts = vec![
            shift("a", 10, 7, 15, &["s1"]),
            shift("b", 10, 14, 22, &["s1"]),
            shift("target", 11, 9, 17, &[]),
        ];
        let conflicts = ConflictDetector::default().detect_conflicts(&shifts, "target", "s1");
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].shift_id, "b");
    }

    #[test]
    fn test_unknown_shift_or_other_staff_yields_nothing() {
        let shifts = vec![shift("early", 10, 7, 15, &["s1"]), shift("mid", 10, 9, 17, &[])];
        let detector = ConflictDetector::default();

        assert!(detector.detect_conflicts(&shifts, "missing", "s1").is_empty());
        assert!(detector.detect_conflicts(&shifts, "mid", "s2").is_empty());
    }

    #[test]
    fn test_custom_rest_window() {
        let shifts = vec![
            shift("late_d", 10, 14, 22, &["s1"]),
            shift("early_d1", 11, 7, 15, &[]),
        ];
        let strict = ConflictDetector::new(RestRuleConfig {
            late_end_hour: 23,
            early_start_hour: 9,
        });
        assert!(strict.detect_conflicts(&shifts, "early_d1", "s1").is_empty());
    }
}
