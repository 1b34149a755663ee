// ==========================================
// 住所排班引擎 - 核心库
// ==========================================
// 职责: 班次负载统计、冲突检测、候选人排序、
//       自动填充、换班建议与换班申请
// 技术栈: Rust + SQLite（键值存储）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 静态目录 - 班次类型与员工名册
pub mod catalog;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 员工名册
pub mod importer;

// 配置层 - 引擎参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ConflictType, NotificationKind, Role, ShiftCategory, ShiftStatus};

// 领域实体
pub use domain::{
    Conflict, Shift, ShiftType, StaffMember, Suggestion, SwapReason, SwapRequest,
    SwapRequestStatus, WorkloadStat,
};

// 静态目录
pub use catalog::{ShiftCatalog, StaffRoster};

// 引擎
pub use engine::{
    AutoFillEngine, AutoFillReport, CandidateRanker, ConflictDetector, EngineError,
    EngineResult, ShiftEngine, SwapRequestLedger, SwapSuggestionEngine, WorkloadAnalyzer,
};

// 配置
pub use config::{ConfigManager, EngineConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "住所排班引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
