// ==========================================
// 住所排班引擎 - 导入层
// ==========================================
// 职责: 从外部文件导入员工名册
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod roster_importer;

pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
pub use roster_importer::{import_roster, roster_from_records};
