// ==========================================
// 住所排班引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config::{AggregationOrder, EngineConfig};
use crate::db::{init_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 配置键
pub mod config_keys {
    pub const REST_LATE_END_HOUR: &str = "rest_late_end_hour";
    pub const REST_EARLY_START_HOUR: &str = "rest_early_start_hour";

    pub const RANK_BASE_SHIFT_CAP: &str = "rank_base_shift_cap";
    pub const RANK_LOAD_MULTIPLIER: &str = "rank_load_multiplier";
    pub const RANK_BALANCE_BONUS: &str = "rank_balance_bonus";
    pub const RANK_WEEKEND_BONUS: &str = "rank_weekend_bonus";
    pub const RANK_WEEKEND_LOW_THRESHOLD: &str = "rank_weekend_low_threshold";
    pub const RANK_WEEKEND_HIGH_THRESHOLD: &str = "rank_weekend_high_threshold";
    pub const RANK_FATIGUE_BONUS: &str = "rank_fatigue_bonus";
    pub const RANK_FATIGUE_THRESHOLD: &str = "rank_fatigue_threshold";
    pub const RANK_JITTER_MAX: &str = "rank_jitter_max";

    pub const SWAP_CONSECUTIVE_BONUS: &str = "swap_consecutive_bonus";
    pub const SWAP_CONSECUTIVE_THRESHOLD: &str = "swap_consecutive_threshold";
    pub const SWAP_WEEKEND_BONUS: &str = "swap_weekend_bonus";
    pub const SWAP_WEEKEND_THRESHOLD: &str = "swap_weekend_threshold";
    pub const SWAP_BALANCE_BONUS: &str = "swap_balance_bonus";
    pub const SWAP_SUGGESTION_LIMIT: &str = "swap_suggestion_limit";
    pub const SWAP_REQUEST_TTL_HOURS: &str = "swap_request_ttl_hours";

    pub const WORKLOAD_AGGREGATION_ORDER: &str = "workload_aggregation_order";
}

/// 数值配置的取值区间，超出区间的覆写被忽略
pub mod config_bounds {
    use std::ops::RangeInclusive;

    pub const REST_HOUR: RangeInclusive<u32> = 0..=24;
    pub const SHIFT_CAP: RangeInclusive<i32> = 0..=10_000;
    pub const WEIGHT: RangeInclusive<i32> = -1_000..=1_000;
    pub const THRESHOLD: RangeInclusive<u32> = 0..=1_000;
    pub const JITTER_MAX: RangeInclusive<f64> = 0.0..=100.0;
    pub const SUGGESTION_LIMIT: RangeInclusive<usize> = 0..=1_000;
    /// 换班申请有效期：1 小时至 1 年
    pub const REQUEST_TTL_HOURS: RangeInclusive<i64> = 1..=8_760;
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            init_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取并解析配置值；不存在或无法解析时返回默认值
    fn get_parsed_or<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr,
    {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    warn!(key, value = %raw, "配置值无法解析，使用默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 读取数值配置；超出取值区间（含 NaN）时告警并返回默认值
    fn get_bounded_or<T>(
        &self,
        key: &str,
        default: T,
        bounds: RangeInclusive<T>,
    ) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + PartialOrd + Display + Copy,
    {
        let value = self.get_parsed_or(key, default)?;
        if bounds.contains(&value) {
            Ok(value)
        } else {
            warn!(
                key,
                value = %value,
                min = %bounds.start(),
                max = %bounds.end(),
                "配置值超出取值区间，使用默认值"
            );
            Ok(default)
        }
    }

    /// 加载生效的引擎配置（默认值 + config_kv 覆写）
    pub fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        use config_keys::*;

        let mut cfg = EngineConfig::default();

        // ===== 休息规则 =====
        cfg.rest.late_end_hour =
            self.get_bounded_or(REST_LATE_END_HOUR, cfg.rest.late_end_hour, config_bounds::REST_HOUR)?;
        cfg.rest.early_start_hour = self.get_bounded_or(
            REST_EARLY_START_HOUR,
            cfg.rest.early_start_hour,
            config_bounds::REST_HOUR,
        )?;

        // ===== 候选人评分 =====
        let r = &mut cfg.ranking;
        r.base_shift_cap =
            self.get_bounded_or(RANK_BASE_SHIFT_CAP, r.base_shift_cap, config_bounds::SHIFT_CAP)?;
        r.load_multiplier =
            self.get_bounded_or(RANK_LOAD_MULTIPLIER, r.load_multiplier, config_bounds::WEIGHT)?;
        r.balance_bonus =
            self.get_bounded_or(RANK_BALANCE_BONUS, r.balance_bonus, config_bounds::WEIGHT)?;
        r.weekend_bonus =
            self.get_bounded_or(RANK_WEEKEND_BONUS, r.weekend_bonus, config_bounds::WEIGHT)?;
        r.weekend_low_threshold = self.get_bounded_or(
            RANK_WEEKEND_LOW_THRESHOLD,
            r.weekend_low_threshold,
            config_bounds::THRESHOLD,
        )?;
        r.weekend_high_threshold = self.get_bounded_or(
            RANK_WEEKEND_HIGH_THRESHOLD,
            r.weekend_high_threshold,
            config_bounds::THRESHOLD,
        )?;
        r.fatigue_bonus =
            self.get_bounded_or(RANK_FATIGUE_BONUS, r.fatigue_bonus, config_bounds::WEIGHT)?;
        r.fatigue_threshold = self.get_bounded_or(
            RANK_FATIGUE_THRESHOLD,
            r.fatigue_threshold,
            config_bounds::THRESHOLD,
        )?;
        r.jitter_max = self.get_bounded_or(RANK_JITTER_MAX, r.jitter_max, config_bounds::JITTER_MAX)?;

        // ===== 换班建议 =====
        let s = &mut cfg.swap;
        s.consecutive_bonus =
            self.get_bounded_or(SWAP_CONSECUTIVE_BONUS, s.consecutive_bonus, config_bounds::WEIGHT)?;
        s.consecutive_threshold = self.get_bounded_or(
            SWAP_CONSECUTIVE_THRESHOLD,
            s.consecutive_threshold,
            config_bounds::THRESHOLD,
        )?;
        s.weekend_bonus =
            self.get_bounded_or(SWAP_WEEKEND_BONUS, s.weekend_bonus, config_bounds::WEIGHT)?;
        s.weekend_threshold = self.get_bounded_or(
            SWAP_WEEKEND_THRESHOLD,
            s.weekend_threshold,
            config_bounds::THRESHOLD,
        )?;
        s.balance_bonus =
            self.get_bounded_or(SWAP_BALANCE_BONUS, s.balance_bonus, config_bounds::WEIGHT)?;
        s.suggestion_limit = self.get_bounded_or(
            SWAP_SUGGESTION_LIMIT,
            s.suggestion_limit,
            config_bounds::SUGGESTION_LIMIT,
        )?;
        s.request_ttl_hours = self.get_bounded_or(
            SWAP_REQUEST_TTL_HOURS,
            s.request_ttl_hours,
            config_bounds::REQUEST_TTL_HOURS,
        )?;

        // ===== 负载统计 =====
        cfg.workload.aggregation_order = self.get_parsed_or(
            WORKLOAD_AGGREGATION_ORDER,
            AggregationOrder::default(),
        )?;

        Ok(cfg)
    }

    /// 生效配置快照（JSON），用于排查评分结果
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let cfg = self.load_engine_config()?;
        Ok(serde_json::to_string(&cfg)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        ConfigManager::from_connection(conn).unwrap()
    }

    #[test]
    fn test_empty_table_yields_defaults() {
        let cfg = manager().load_engine_config().unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let mgr = manager();
        mgr.set_config_value(config_keys::REST_LATE_END_HOUR, "21").unwrap();
        mgr.set_config_value(config_keys::SWAP_SUGGESTION_LIMIT, "3").unwrap();
        mgr.set_config_value(config_keys::WORKLOAD_AGGREGATION_ORDER, "chronological")
            .unwrap();

        let cfg = mgr.load_engine_config().unwrap();
        assert_eq!(cfg.rest.late_end_hour, 21);
        assert_eq!(cfg.swap.suggestion_limit, 3);
        assert_eq!(cfg.workload.aggregation_order, AggregationOrder::Chronological);
    }

    #[test]
    fn test_unparsable_value_falls_back() {
        let mgr = manager();
        mgr.set_config_value(config_keys::RANK_JITTER_MAX, "veel").unwrap();

        let cfg = mgr.load_engine_config().unwrap();
        assert_eq!(cfg.ranking.jitter_max, 5.0);
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let mgr = manager();
        mgr.set_config_value(config_keys::RANK_LOAD_MULTIPLIER, "2000000000").unwrap();
        mgr.set_config_value(config_keys::RANK_JITTER_MAX, "NaN").unwrap();
        mgr.set_config_value(config_keys::SWAP_REQUEST_TTL_HOURS, "-5").unwrap();
        mgr.set_config_value(config_keys::RANK_BALANCE_BONUS, "-1000").unwrap();

        let cfg = mgr.load_engine_config().unwrap();
        assert_eq!(cfg.ranking.load_multiplier, 2);
        assert_eq!(cfg.ranking.jitter_max, 5.0);
        assert_eq!(cfg.swap.request_ttl_hours, 24);
        // 区间边界本身有效
        assert_eq!(cfg.ranking.balance_bonus, -1000);
    }

    #[test]
    fn test_snapshot_is_json() {
        let snapshot = manager().get_config_snapshot().unwrap();
        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(value["rest"]["late_end_hour"], 22);
    }
}
