// ==========================================
// 住所排班引擎 - 引擎层
// ==========================================
// 职责: 负载统计、冲突检测、候选人排序、自动填充、换班建议与申请
// 红线: 引擎不拼 SQL，持久化只经由仓储层
// ==========================================

pub mod autofill;
pub mod conflict;
pub mod error;
pub mod events;
pub mod jitter;
pub mod ranker;
pub mod service;
pub mod swap_ledger;
pub mod swap_suggestion;
pub mod workload;

// 重导出核心引擎
pub use autofill::{AutoFillEngine, AutoFillReport, ShiftFillOutcome, SkippedShift};
pub use conflict::ConflictDetector;
pub use error::{EngineError, EngineResult};
pub use events::{
    NoOpNotificationSink, NotificationSink, RecordingNotificationSink, TracingNotificationSink,
};
pub use jitter::{JitterSource, RandomJitter, ZeroJitter};
pub use ranker::{CandidateRanker, RankedCandidate, ScoreBreakdown};
pub use service::ShiftEngine;
pub use swap_ledger::SwapRequestLedger;
pub use swap_suggestion::SwapSuggestionEngine;
pub use workload::WorkloadAnalyzer;
