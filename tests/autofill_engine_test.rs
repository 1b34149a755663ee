// ==========================================
// AutoFillEngine 集成测试
// ==========================================
// 测试目标: 容量上限、协调员限制、冲突规避、批量落库与通知
// ==========================================


use shelter_shift_engine::catalog::shift_type_ids::{
    EARLY_FULL, EARLY_INTERMEDIATE, LATE_FULL, LATE_INTERMEDIATE,
};
use shelter_shift_engine::catalog::StaffRoster;
use shelter_shift_engine::config::{config_keys, ConfigManager};
use shelter_shift_engine::domain::{NotificationKind, Role, StaffMember};
use test_helpers::{
    build_engine, build_seeded_engine, create_test_db, date, seed_shifts, shift,
    three_woonbegeleiders,
};

#[test]
fn test_single_weekday_early_full_is_filled_with_two_of_three() {
    let (_tmp, db_path) = create_test_db().unwrap();
    // 2025-03-12 周三
    let wed = date(2025, 3, 12);
    seed_shifts(&db_path, vec![shift(wed, EARLY_FULL, &[])]).unwrap();

    let (mut engine, sink) = build_engine(&db_path, three_woonbegeleiders()).unwrap();

    // 基础分全部为 (20 - 0) * 2 + 5 = 45，零抖动下按名册顺序
    let ranked = engine.rank_detailed(EARLY_FULL, wed, &[]).unwrap();
    assert_eq!(ranked.len(), 3);
    assert!(ranked.iter().all(|c| c.breakdown.base() == 45.0));

    let report = engine.try_auto_fill().unwrap();
    assert_eq!(report.change_count(), 2);
    assert_eq!(report.shifts_changed(), 1);

    let filled = engine.schedule().find("2025-03-12_early_full").unwrap();
    assert_eq!(filled.assigned_staff_ids, vec!["staff_a", "staff_b"]);

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|(_, kind)| *kind == NotificationKind::Success));
}

#[test]
fn test_assignments_are_persisted_in_one_write() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let wed = date(2025, 3, 12);
    seed_shifts(&db_path, vec![shift(wed, EARLY_FULL, &[])]).unwrap();

    {
        let (mut engine, _) = build_engine(&db_path, three_woonbegeleiders()).unwrap();
        assert_eq!(engine.auto_fill_open_shifts(), 2);
    }

    let (engine, _) = build_engine(&db_path, three_woonbegeleiders()).unwrap();
    let reloaded = engine.schedule().find("2025-03-12_early_full").unwrap();
    assert_eq!(reloaded.assigned_staff_ids.len(), 2);
}

#[test]
fn test_full_shifts_are_left_alone_and_nothing_is_written() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let wed = date(2025, 3, 12);
    seed_shifts(&db_path, vec![shift(wed, EARLY_FULL, &["staff_a", "staff_b"])]).unwrap();

    let (mut engine, sink) = build_engine(&db_path, three_woonbegeleiders()).unwrap();
    let report = engine.try_auto_fill().unwrap();

    assert_eq!(report.change_count(), 0);
    assert!(report.outcomes.is_empty());
    assert!(sink.is_empty());
}

#[test]
fn test_capacity_and_coordinator_invariants_over_two_weeks() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let mut engine = build_seeded_engine(&db_path, StaffRoster::default_roster(), 7).unwrap();
    engine
        .ensure_shifts_for_range(date(2025, 3, 3), date(2025, 3, 16))
        .unwrap();

    let count = engine.auto_fill_open_shifts();
    assert!(count > 0);

    let coordinators: Vec<String> = engine
        .roster()
        .iter()
        .filter(|m| m.role == Role::Coordinator)
        .map(|m| m.id.clone())
        .collect();
    assert!(!coordinators.is_empty());

    for s in engine.schedule().shifts() {
        let shift_type = engine.catalog().get(&s.shift_type_id).unwrap();
        assert!(s.assigned_staff_ids.len() <= shift_type.max_staff);
        if s.shift_type_id != EARLY_INTERMEDIATE {
            assert!(s.assigned_staff_ids.iter().all(|id| !coordinators.contains(id)));
        }
        // 每个已分配员工都不与其它分配冲突
        for staff_id in &s.assigned_staff_ids {
            assert!(engine.detect_conflicts(&s.id, staff_id).is_empty());
        }
    }
}

#[test]
fn test_conflicting_candidates_are_skipped() {
    let (_tmp, db_path) = create_test_db().unwrap();
    // staff_a 周二晚班到 23 点，周三早班 07 点开始 -> rest 冲突
    let tue = date(2025, 3, 11);
    let wed = date(2025, 3, 12);
    seed_shifts(
        &db_path,
        vec![
            shift(tue, LATE_FULL, &["staff_a", "staff_b"]),
            shift(wed, EARLY_FULL, &[]),
        ],
    )
    .unwrap();

    let roster = StaffRoster::new(vec![
        StaffMember::new("staff_a", "Anouk", Role::Woonbegeleider),
        StaffMember::new("staff_b", "Bas", Role::Woonbegeleider),
        StaffMember::new("staff_c", "Chantal", Role::Woonbegeleider),
    ]);
    let (mut engine, _) = build_engine(&db_path, roster).unwrap();
    let report = engine.try_auto_fill().unwrap();

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.assigned, vec!["staff_c"]);
    assert_eq!(outcome.rejected.len(), 2);
    assert_eq!(outcome.unfilled, 1);
}

#[test]
fn test_unknown_shift_type_is_skipped_not_fatal() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let wed = date(2025, 3, 12);
    let mut night = shift(wed, LATE_INTERMEDIATE, &[]);
    night.shift_type_id = "night".to_string();
    night.id = "2025-03-12_night".to_string();
    seed_shifts(&db_path, vec![night, shift(wed, LATE_FULL, &[])]).unwrap();

    let (mut engine, _) = build_engine(&db_path, three_woonbegeleiders()).unwrap();
    let report = engine.try_auto_fill().unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].reason.starts_with("SHIFT_TYPE_NOT_FOUND"));
    assert_eq!(report.change_count(), 2);
}

#[test]
fn test_oversized_load_multiplier_in_config_does_not_break_autofill() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let wed = date(2025, 3, 12);
    seed_shifts(&db_path, vec![shift(wed, EARLY_FULL, &[])]).unwrap();
    ConfigManager::new(&db_path)
        .unwrap()
        .set_config_value(config_keys::RANK_LOAD_MULTIPLIER, "2000000000")
        .unwrap();

    let (mut engine, sink) = build_engine(&db_path, three_woonbegeleiders()).unwrap();
    assert_eq!(engine.config().ranking.load_multiplier, 2);

    assert_eq!(engine.auto_fill_open_shifts(), 2);
    assert_eq!(sink.len(), 2);
}
