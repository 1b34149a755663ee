// ==========================================
// 住所排班引擎 - 领域类型定义
// ==========================================
// 红线: 班次早晚分类使用显式枚举，不做名称字符串匹配
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 班次类别 (Shift Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftCategory {
    Early, // 早班
    Late,  // 晚班
}

impl fmt::Display for ShiftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftCategory::Early => write!(f, "early"),
            ShiftCategory::Late => write!(f, "late"),
        }
    }
}

// ==========================================
// 员工角色 (Role)
// ==========================================
// Coordinator 仅可排入允许协调员的班次类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Woonbegeleider, // 住所辅导员
    Coordinator,    // 协调员
    Invalkracht,    // 临时替班
}

impl Role {
    /// 从导入文件中的角色文本解析（大小写不敏感）
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "woonbegeleider" => Some(Role::Woonbegeleider),
            "coordinator" => Some(Role::Coordinator),
            "invalkracht" => Some(Role::Invalkracht),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Woonbegeleider => write!(f, "Woonbegeleider"),
            Role::Coordinator => write!(f, "Coordinator"),
            Role::Invalkracht => write!(f, "Invalkracht"),
        }
    }
}

// ==========================================
// 班次状态 (Shift Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    #[default]
    Scheduled, // 已排定
    InProgress, // 进行中
    Completed,  // 已完成
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftStatus::Scheduled => write!(f, "scheduled"),
            ShiftStatus::InProgress => write!(f, "in_progress"),
            ShiftStatus::Completed => write!(f, "completed"),
        }
    }
}

// ==========================================
// 冲突类型 (Conflict Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    Overlap, // 同日时段重叠
    Rest,    // 晚班接早班，休息不足
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictType::Overlap => write!(f, "overlap"),
            ConflictType::Rest => write!(f, "rest"),
        }
    }
}

// ==========================================
// 通知类型 (Notification Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Info => write!(f, "info"),
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Warning => write!(f, "warning"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("coordinator"), Some(Role::Coordinator));
        assert_eq!(Role::parse(" Woonbegeleider "), Some(Role::Woonbegeleider));
        assert_eq!(Role::parse("kok"), None);
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(serde_json::to_string(&ConflictType::Rest).unwrap(), "\"rest\"");
        assert_eq!(serde_json::to_string(&ShiftCategory::Early).unwrap(), "\"early\"");
        assert_eq!(
            serde_json::to_string(&ShiftStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
