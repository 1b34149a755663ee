// ==========================================
// 住所排班引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod conflict;
pub mod shift;
pub mod staff;
pub mod swap;
pub mod types;
pub mod workload;

// 重导出核心类型
pub use conflict::{Conflict, Suggestion, SwapReason};
pub use shift::{is_weekend, CheckIn, CheckOut, Shift, ShiftId, ShiftType, ShiftTypeId, StaffId};
pub use staff::StaffMember;
pub use swap::{SwapRequest, SwapRequestStatus, TransitionRejected};
pub use types::{ConflictType, NotificationKind, Role, ShiftCategory, ShiftStatus};
pub use workload::WorkloadStat;
