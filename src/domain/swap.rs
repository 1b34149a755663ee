// ==========================================
// 住所排班引擎 - 换班申请领域模型
// ==========================================
// 状态机:
//   Pending  -> Accepted | Rejected
//   Accepted -> Approved
// Rejected / Approved 为终态
// expires_at 仅为记录值，不会被自动执行
// ==========================================

use crate::domain::shift::{ShiftId, StaffId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapRequestStatus {
    Pending,
    Accepted,
    Rejected,
    Approved,
}

impl SwapRequestStatus {
    pub fn can_transition_to(self, to: SwapRequestStatus) -> bool {
        use SwapRequestStatus::*;
        matches!(
            (self, to),
            (Pending, Accepted) | (Pending, Rejected) | (Accepted, Approved)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SwapRequestStatus::Rejected | SwapRequestStatus::Approved)
    }
}

impl fmt::Display for SwapRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapRequestStatus::Pending => write!(f, "pending"),
            SwapRequestStatus::Accepted => write!(f, "accepted"),
            SwapRequestStatus::Rejected => write!(f, "rejected"),
            SwapRequestStatus::Approved => write!(f, "approved"),
        }
    }
}

/// 非法状态转换
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无效的状态转换: from={from} to={to}")]
pub struct TransitionRejected {
    pub from: SwapRequestStatus,
    pub to: SwapRequestStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: String,
    pub from_shift_id: ShiftId,
    pub from_staff_id: StaffId,
    pub to_staff_id: StaffId,
    pub message: String,
    pub status: SwapRequestStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SwapRequest {
    /// 新建申请，初始状态固定为 Pending
    ///
    /// created_at + ttl 超出时间范围时返回 None
    pub fn new_pending(
        id: String,
        from_shift_id: ShiftId,
        from_staff_id: StaffId,
        to_staff_id: StaffId,
        message: String,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = created_at.checked_add_signed(ttl)?;
        Some(Self {
            id,
            from_shift_id,
            from_staff_id,
            to_staff_id,
            message,
            status: SwapRequestStatus::Pending,
            created_at,
            expires_at,
        })
    }

    /// 仅供调用方显式比较，过期不会改变状态
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn transition_to(&mut self, to: SwapRequestStatus) -> Result<(), TransitionRejected> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionRejected {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
