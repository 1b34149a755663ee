// ==========================================
// 住所排班引擎 - 员工名册导入
// ==========================================
// 输入: CSV / XLSX，表头 id, name, role（大小写不敏感）
// 输出: StaffRoster（保持文件行顺序）
// 校验: 必填字段非空、角色可识别、ID 不重复
// ==========================================

use crate::catalog::StaffRoster;
use crate::domain::staff::StaffMember;
use crate::domain::types::Role;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// 从文件导入员工名册
pub fn import_roster<P: AsRef<Path>>(path: P) -> ImportResult<StaffRoster> {
    let path = path.as_ref();
    let records = UniversalFileParser.parse(path)?;
    let roster = roster_from_records(&records)?;

    info!(file = %path.display(), staff = roster.len(), "员工名册导入完成");
    Ok(roster)
}

/// 将原始行映射为名册；行号从 1 开始（不含表头）
pub fn roster_from_records(records: &[RawRecord]) -> ImportResult<StaffRoster> {
    let mut seen = HashSet::new();
    let mut members = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let row = idx + 1;
        let id = required(record, "id", row)?;
        let name = required(record, "name", row)?;
        let raw_role = required(record, "role", row)?;
        let role = Role::parse(&raw_role).ok_or_else(|| ImportError::FieldMappingError {
            row,
            message: format!("未知角色: {}", raw_role),
        })?;

        if !seen.insert(id.clone()) {
            return Err(ImportError::DuplicateStaffId { row, staff_id: id });
        }
        members.push(StaffMember::new(id, name, role));
    }

    Ok(StaffRoster::new(members))
}

fn required(record: &RawRecord, field: &str, row: usize) -> ImportResult<String> {
    record
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(field))
        .map(|(_, v)| v.clone())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ImportError::FieldMappingError {
            row,
            message: format!("缺少字段: {}", field),
        })
}
