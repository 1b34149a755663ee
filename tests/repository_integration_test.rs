// ==========================================
// 仓储层集成测试
// ==========================================
// 测试目标: SQLite 键值存储、班次唯一性、区间补齐、JSON 记录格式
// ==========================================


use shelter_shift_engine::catalog::shift_type_ids::EARLY_FULL;
use shelter_shift_engine::catalog::ShiftCatalog;
use shelter_shift_engine::repository::{
    store_keys, KeyValueStore, RepositoryError, ScheduleRepository, SqliteKvStore,
};
use std::sync::Arc;
use test_helpers::{create_test_db, date, shift};

fn sqlite_store(db_path: &str) -> Arc<dyn KeyValueStore> {
    Arc::new(SqliteKvStore::new(db_path).unwrap())
}

#[test]
fn test_missing_key_loads_empty_schedule() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = ScheduleRepository::load(sqlite_store(&db_path)).unwrap();
    assert!(repo.shifts().is_empty());
}

#[test]
fn test_create_shift_enforces_one_per_date_and_type() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let catalog = ShiftCatalog::default_catalog();
    let early = catalog.get(EARLY_FULL).unwrap();
    let mut repo = ScheduleRepository::load(sqlite_store(&db_path)).unwrap();

    let created = repo.create_shift(date(2025, 3, 12), early).unwrap();
    assert_eq!(created.id, "2025-03-12_early_full");

    let err = repo.create_shift(date(2025, 3, 12), early).unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));

    let reopened = ScheduleRepository::load(sqlite_store(&db_path)).unwrap();
    assert_eq!(reopened.shifts().len(), 1);
}

#[test]
fn test_ensure_shifts_for_range_is_idempotent() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let catalog = ShiftCatalog::default_catalog();
    let mut repo = ScheduleRepository::load(sqlite_store(&db_path)).unwrap();

    let first = repo
        .ensure_shifts_for_range(&catalog, date(2025, 3, 10), date(2025, 3, 16))
        .unwrap();
    assert_eq!(first, 7 * catalog.len());

    let second = repo
        .ensure_shifts_for_range(&catalog, date(2025, 3, 10), date(2025, 3, 16))
        .unwrap();
    assert_eq!(second, 0);

    assert_eq!(repo.shifts_on(date(2025, 3, 12)).count(), catalog.len());
    assert!(repo
        .find_by_date_and_type(date(2025, 3, 16), EARLY_FULL)
        .is_some());
}

#[test]
fn test_shift_records_are_camel_case_json() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let store = sqlite_store(&db_path);
    ScheduleRepository::with_shifts(
        Arc::clone(&store),
        vec![shift(date(2025, 3, 12), EARLY_FULL, &["staff_a"])],
    )
    .unwrap();

    let raw = store.get(store_keys::SHIFTS).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value[0];
    assert_eq!(record["shiftTypeId"], "early_full");
    assert_eq!(record["assignedStaffIds"][0], "staff_a");
    assert_eq!(record["startTime"], "07:00");
    assert_eq!(record["date"], "2025-03-12");
}

#[test]
fn test_corrupt_json_is_a_serialization_error() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let store = sqlite_store(&db_path);
    store.put(store_keys::SHIFTS, "{not json").unwrap();

    let err = ScheduleRepository::load(store).err().unwrap();
    assert!(matches!(err, RepositoryError::SerializationError { .. }));
}
