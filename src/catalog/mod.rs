// ==========================================
// 住所排班引擎 - 静态目录层
// ==========================================
// 职责: 班次类型目录 + 员工名册（加载一次，之后只读）
// ==========================================

pub mod shift_catalog;
pub mod staff_roster;

pub use shift_catalog::{shift_type_ids, ShiftCatalog};
pub use staff_roster::StaffRoster;
