// ==========================================
// 住所排班引擎 - 引擎层错误类型
// ==========================================

use crate::domain::swap::TransitionRejected;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("班次未找到: shift_id={0}")]
    ShiftNotFound(String),

    /// 班次类型查找失败（显式返回，不做空值解引用）
    #[error("班次类型未找到: shift_type_id={0}")]
    ShiftTypeNotFound(String),

    #[error("员工未找到: staff_id={0}")]
    StaffNotFound(String),

    #[error("员工未排入该班次: staff_id={staff_id} shift_id={shift_id}")]
    StaffNotAssigned { staff_id: String, shift_id: String },

    /// created_at + 有效期超出可表示的时间范围
    #[error("换班申请过期时间溢出: created_at={created_at} ttl_hours={ttl_hours}")]
    SwapExpiryOutOfRange { created_at: String, ttl_hours: i64 },

    #[error("换班申请未找到: request_id={0}")]
    SwapRequestNotFound(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<TransitionRejected> for EngineError {
    fn from(err: TransitionRejected) -> Self {
        EngineError::InvalidStateTransition {
            from: err.from.to_string(),
            to: err.to.to_string(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
