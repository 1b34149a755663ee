// ==========================================
// 住所排班引擎 - 命令行入口
// ==========================================
// 用法:
//   shelter-shift-engine seed [start YYYY-MM-DD] [days]
//   shelter-shift-engine workload
//   shelter-shift-engine conflicts <shift_id> <staff_id>
//   shelter-shift-engine rank <shift_type_id> <date>
//   shelter-shift-engine autofill
//   shelter-shift-engine suggest <shift_id>
//   shelter-shift-engine swap <shift_id> <from_staff> <to_staff> [message]
//   shelter-shift-engine swaps
//
// 环境变量:
//   SHELTER_SHIFT_DB_PATH  数据库文件（默认位于用户数据目录）
//   SHELTER_SHIFT_ROSTER   员工名册文件 (.csv/.xlsx)，缺省使用内置名册
//   SHELTER_SHIFT_LOG_FORMAT=json  以 JSON 格式输出日志
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use shelter_shift_engine::catalog::{ShiftCatalog, StaffRoster};
use shelter_shift_engine::db::default_db_path;
use shelter_shift_engine::engine::{RandomJitter, ShiftEngine, TracingNotificationSink};
use shelter_shift_engine::importer::import_roster;
use shelter_shift_engine::{logging, APP_NAME, VERSION};
use std::collections::BTreeMap;
use std::sync::Arc;

const ROSTER_ENV: &str = "SHELTER_SHIFT_ROSTER";
const LOG_FORMAT_ENV: &str = "SHELTER_SHIFT_LOG_FORMAT";
const DEFAULT_SEED_DAYS: i64 = 14;

fn main() -> Result<()> {
    match std::env::var(LOG_FORMAT_ENV) {
        Ok(format) if format.trim().eq_ignore_ascii_case("json") => logging::init_json(),
        _ => logging::init(),
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    let db_path = default_db_path();
    tracing::info!(app = APP_NAME, version = VERSION, db_path = %db_path, "启动");

    let roster = load_roster()?;
    let mut engine = ShiftEngine::from_sqlite(
        &db_path,
        ShiftCatalog::default_catalog(),
        roster,
        Box::new(RandomJitter::from_entropy()),
        Arc::new(TracingNotificationSink),
    )
    .map_err(|e| anyhow!("引擎初始化失败: {}", e))?;

    match (command, &args[1..]) {
        ("seed", rest) => {
            let start = match rest.first() {
                Some(raw) => parse_date(raw)?,
                None => Local::now().date_naive(),
            };
            let days = match rest.get(1) {
                Some(raw) => raw.parse::<i64>().context("days 必须为整数")?,
                None => DEFAULT_SEED_DAYS,
            };
            if days < 1 {
                bail!("days 必须 >= 1");
            }
            let end = start + Duration::days(days - 1);
            let created = engine.ensure_shifts_for_range(start, end)?;
            println!("created={} range={}..={}", created, start, end);
        }
        ("workload", _) => {
            let stats: BTreeMap<_, _> = engine.current_workload().into_iter().collect();
            print_json(&stats)?;
        }
        ("conflicts", [shift_id, staff_id, ..]) => {
            print_json(&engine.detect_conflicts(shift_id, staff_id))?;
        }
        ("rank", [shift_type_id, date, ..]) => {
            let date = parse_date(date)?;
            print_json(&engine.rank_detailed(shift_type_id, date, &[])?)?;
        }
        ("autofill", _) => {
            let report = engine.try_auto_fill()?;
            print_json(&report)?;
            println!(
                "assignments={} shifts_changed={}",
                report.change_count(),
                report.shifts_changed()
            );
        }
        ("suggest", [shift_id, ..]) => {
            print_json(&engine.suggest(shift_id))?;
        }
        ("swap", [shift_id, from, to, rest @ ..]) => {
            let message = rest.join(" ");
            print_json(&engine.create_swap_request(shift_id, from, to, &message)?)?;
        }
        ("swaps", _) => {
            print_json(&engine.ledger().list()?)?;
        }
        _ => {
            print_usage();
            bail!("未知命令或参数不足: {}", args.join(" "));
        }
    }

    Ok(())
}

fn load_roster() -> Result<StaffRoster> {
    match std::env::var(ROSTER_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            import_roster(path.trim()).with_context(|| format!("员工名册导入失败: {}", path))
        }
        _ => Ok(StaffRoster::default_roster()),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("日期格式错误（期望 YYYY-MM-DD）: {}", raw))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_usage() {
    eprintln!("{} v{}", APP_NAME, VERSION);
    eprintln!("用法:");
    eprintln!("  seed [start YYYY-MM-DD] [days]");
    eprintln!("  workload");
    eprintln!("  conflicts <shift_id> <staff_id>");
    eprintln!("  rank <shift_type_id> <date>");
    eprintln!("  autofill");
    eprintln!("  suggest <shift_id>");
    eprintln!("  swap <shift_id> <from_staff> <to_staff> [message]");
    eprintln!("  swaps");
}
