// ==========================================
// 住所排班引擎 - 班次类型目录
// ==========================================

use crate::domain::shift::ShiftType;
use crate::domain::types::ShiftCategory;
use chrono::NaiveTime;

/// 内置班次类型 ID
pub mod shift_type_ids {
    pub const EARLY_FULL: &str = "early_full";
    /// 唯一允许协调员排入的班次
    pub const EARLY_INTERMEDIATE: &str = "early_intermediate";
    pub const LATE_INTERMEDIATE: &str = "late_intermediate";
    pub const LATE_FULL: &str = "late_full";
}

#[derive(Debug, Clone, Default)]
pub struct ShiftCatalog {
    types: Vec<ShiftType>,
}

impl ShiftCatalog {
    pub fn new(types: Vec<ShiftType>) -> Self {
        Self { types }
    }

    /// 住所默认班次目录
    pub fn default_catalog() -> Self {
        Self::new(vec![
            shift_type(
                shift_type_ids::EARLY_FULL,
                "Vroege dienst",
                (7, 15),
                2,
                ShiftCategory::Early,
                false,
            ),
            shift_type(
                shift_type_ids::EARLY_INTERMEDIATE,
                "Tussendienst vroeg",
                (9, 17),
                1,
                ShiftCategory::Early,
                true,
            ),
            shift_type(
                shift_type_ids::LATE_INTERMEDIATE,
                "Tussendienst laat",
                (14, 22),
                1,
                ShiftCategory::Late,
                false,
            ),
            shift_type(
                shift_type_ids::LATE_FULL,
                "Late dienst",
                (15, 23),
                2,
                ShiftCategory::Late,
                false,
            ),
        ])
    }

    pub fn get(&self, shift_type_id: &str) -> Option<&ShiftType> {
        self.types.iter().find(|t| t.id == shift_type_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShiftType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn shift_type(
    id: &str,
    name: &str,
    (start_hour, end_hour): (u32, u32),
    max_staff: usize,
    category: ShiftCategory,
    coordinator_eligible: bool,
) -> ShiftType {
    ShiftType {
        id: id.to_string(),
        name: name.to_string(),
        start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap_or(NaiveTime::MIN),
        end_time: NaiveTime::from_hms_opt(end_hour, 0, 0).unwrap_or(NaiveTime::MIN),
        max_staff,
        category,
        coordinator_eligible,
    }
}
