use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 引擎参数全集（所有字段均有默认值，config_kv 中的配置项逐个覆写）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub rest: RestRuleConfig,
    #[serde(default)]
    pub ranking: RankingWeights,
    #[serde(default)]
    pub swap: SwapWeights,
    #[serde(default)]
    pub workload: WorkloadConfig,
}

/// 休息时间规则：前一日晚班结束 >= late_end_hour 且当日开始 <= early_start_hour 视为冲突
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestRuleConfig {
    pub late_end_hour: u32,
    pub early_start_hour: u32,
}

impl Default for RestRuleConfig {
    fn default() -> Self {
        Self {
            late_end_hour: 22,
            early_start_hour: 9,
        }
    }
}

/// 候选人评分权重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    /// 负载项: (base_shift_cap - total_shifts) * load_multiplier
    pub base_shift_cap: i32,
    pub load_multiplier: i32,
    /// 早晚班平衡加分
    pub balance_bonus: i32,
    /// 周末公平加分
    pub weekend_bonus: i32,
    /// 目标为周末时，weekend_shifts 低于该值加分
    pub weekend_low_threshold: u32,
    /// 目标为工作日时，weekend_shifts 高于该值加分
    pub weekend_high_threshold: u32,
    /// 疲劳控制加分（consecutive_days < fatigue_threshold）
    pub fatigue_bonus: i32,
    pub fatigue_threshold: u32,
    /// 抖动上限，取值区间 [0, jitter_max)
    pub jitter_max: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            base_shift_cap: 20,
            load_multiplier: 2,
            balance_bonus: 10,
            weekend_bonus: 15,
            weekend_low_threshold: 2,
            weekend_high_threshold: 1,
            fatigue_bonus: 5,
            fatigue_threshold: 2,
            jitter_max: 5.0,
        }
    }
}

/// 换班建议权重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapWeights {
    pub consecutive_bonus: i32,
    /// consecutive_days 大于该值时加分
    pub consecutive_threshold: u32,
    pub weekend_bonus: i32,
    /// 周末目标且 weekend_shifts 低于该值时加分
    pub weekend_threshold: u32,
    pub balance_bonus: i32,
    pub suggestion_limit: usize,
    /// 换班申请有效期（小时）
    pub request_ttl_hours: i64,
}

impl Default for SwapWeights {
    fn default() -> Self {
        Self {
            consecutive_bonus: 20,
            consecutive_threshold: 2,
            weekend_bonus: 15,
            weekend_threshold: 1,
            balance_bonus: 10,
            suggestion_limit: 5,
            request_ttl_hours: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkloadConfig {
    #[serde(default)]
    pub aggregation_order: AggregationOrder,
}

/// 负载统计的遍历顺序
///
/// - Stored: 按存储顺序遍历（consecutive_days 依赖存储顺序）
/// - Chronological: 先按日期排序再遍历
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationOrder {
    #[default]
    Stored,
    Chronological,
}

impl fmt::Display for AggregationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationOrder::Stored => write!(f, "STORED"),
            AggregationOrder::Chronological => write!(f, "CHRONOLOGICAL"),
        }
    }
}

impl FromStr for AggregationOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STORED" => Ok(AggregationOrder::Stored),
            "CHRONOLOGICAL" => Ok(AggregationOrder::Chronological),
            other => Err(format!("unknown aggregation order: {}", other)),
        }
    }
}
