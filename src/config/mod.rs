// ==========================================
// 住所排班引擎 - 配置层
// ==========================================
// 职责: 引擎参数默认值 + config_kv 覆写
// ==========================================

pub mod config_manager;
pub mod engine_config;

// 重导出核心配置类型
pub use config_manager::{config_bounds, config_keys, ConfigManager};
pub use engine_config::{
    AggregationOrder, EngineConfig, RankingWeights, RestRuleConfig, SwapWeights, WorkloadConfig,
};
