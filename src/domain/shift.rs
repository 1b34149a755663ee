// ==========================================
// 住所排班引擎 - 班次领域模型
// ==========================================
// 不变式:
// - |assigned_staff_ids| <= shift_type.max_staff
// - 每个 (date, shift_type_id) 只存在一个 Shift
// - date 创建后不可变
// ==========================================

use crate::domain::types::{ShiftCategory, ShiftStatus};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

pub type StaffId = String;
pub type ShiftId = String;
pub type ShiftTypeId = String;

// ==========================================
// ShiftType - 班次类型定义（静态目录项）
// ==========================================
/// 协调员准入只看 `coordinator_eligible`，不看 id。
/// `ShiftCatalog::default_catalog()` 中仅 `early_intermediate` 为 true；
/// 其他途径构造的目录需自行设置，缺省字段反序列化为 false。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftType {
    pub id: ShiftTypeId,
    pub name: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub max_staff: usize,
    pub category: ShiftCategory,
    /// 是否允许协调员排入（缺省 false）
    #[serde(default)]
    pub coordinator_eligible: bool,
}

// ==========================================
// 签到 / 签退记录（由外部界面层写入）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub staff_id: StaffId,
    pub timestamp: DateTime<Utc>,
    pub is_late: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOut {
    pub staff_id: StaffId,
    pub timestamp: DateTime<Utc>,
}

// ==========================================
// Shift - 具体某日的班次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub date: NaiveDate,
    pub shift_type_id: ShiftTypeId,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub assigned_staff_ids: Vec<StaffId>,
    #[serde(default)]
    pub status: ShiftStatus,
    #[serde(default)]
    pub check_ins: Vec<CheckIn>,
    #[serde(default)]
    pub check_outs: Vec<CheckOut>,
}

impl Shift {
    /// 按班次类型创建空班次，ID 由日期和类型派生
    pub fn new(date: NaiveDate, shift_type: &ShiftType) -> Self {
        Self {
            id: Self::derive_id(date, &shift_type.id),
            date,
            shift_type_id: shift_type.id.clone(),
            start_time: shift_type.start_time,
            end_time: shift_type.end_time,
            assigned_staff_ids: Vec::new(),
            status: ShiftStatus::Scheduled,
            check_ins: Vec::new(),
            check_outs: Vec::new(),
        }
    }

    pub fn derive_id(date: NaiveDate, shift_type_id: &str) -> ShiftId {
        format!("{}_{}", date.format("%Y-%m-%d"), shift_type_id)
    }

    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    pub fn end_hour(&self) -> u32 {
        self.end_time.hour()
    }

    pub fn is_assigned(&self, staff_id: &str) -> bool {
        self.assigned_staff_ids.iter().any(|id| id == staff_id)
    }

    pub fn is_weekend(&self) -> bool {
        is_weekend(self.date)
    }

    /// 追加分配（集合语义，重复分配返回 false）
    ///
    /// 仅 crate 内部可调用：唯一写入方是自动填充引擎。
    pub(crate) fn assign(&mut self, staff_id: &str) -> bool {
        if self.is_assigned(staff_id) {
            return false;
        }
        self.assigned_staff_ids.push(staff_id.to_string());
        true
    }
}

/// 周六、周日视为周末
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// ==========================================
// "HH:MM" 时间格式序列化
// ==========================================
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        // 兼容带秒的旧数据
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
