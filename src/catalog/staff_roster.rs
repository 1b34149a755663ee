// ==========================================
// 住所排班引擎 - 员工名册
// ==========================================

use crate::domain::staff::StaffMember;
use crate::domain::types::Role;

#[derive(Debug, Clone, Default)]
pub struct StaffRoster {
    members: Vec<StaffMember>,
}

impl StaffRoster {
    pub fn new(members: Vec<StaffMember>) -> Self {
        Self { members }
    }

    /// 演示/初始化用的默认名册
    pub fn default_roster() -> Self {
        Self::new(vec![
            StaffMember::new("staff_anna", "Anna de Vries", Role::Woonbegeleider),
            StaffMember::new("staff_bram", "Bram Jansen", Role::Woonbegeleider),
            StaffMember::new("staff_chantal", "Chantal Bakker", Role::Woonbegeleider),
            StaffMember::new("staff_daan", "Daan Visser", Role::Woonbegeleider),
            StaffMember::new("staff_eva", "Eva Smit", Role::Invalkracht),
            StaffMember::new("staff_fatima", "Fatima el Amrani", Role::Coordinator),
        ])
    }

    pub fn get(&self, staff_id: &str) -> Option<&StaffMember> {
        self.members.iter().find(|m| m.id == staff_id)
    }

    pub fn contains(&self, staff_id: &str) -> bool {
        self.get(staff_id).is_some()
    }

    /// 按名册登记顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &StaffMember> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
