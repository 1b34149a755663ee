// ==========================================
// 住所排班引擎 - 员工领域模型
// ==========================================

use crate::domain::shift::{ShiftType, StaffId};
use crate::domain::types::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub role: Role,
}

impl StaffMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    /// 角色准入：协调员只能排入允许协调员的班次类型
    pub fn is_eligible_for(&self, shift_type: &ShiftType) -> bool {
        self.role != Role::Coordinator || shift_type.coordinator_eligible
    }
}
