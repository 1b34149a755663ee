// ==========================================
// 住所排班引擎 - 班次仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 独占持有 Shift 集合，提供只读快照与全量替换
// 约束: 分配写入 (replace_all) 仅对 crate 内部开放，
//       唯一写入方是 AutoFillEngine
// ==========================================

use crate::catalog::ShiftCatalog;
use crate::domain::shift::{Shift, ShiftType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kv_store::{load_records, save_records, store_keys, KeyValueStore};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

pub struct ScheduleRepository {
    store: Arc<dyn KeyValueStore>,
    shifts: Vec<Shift>,
}

impl ScheduleRepository {
    /// 从存储全量加载
    pub fn load(store: Arc<dyn KeyValueStore>) -> RepositoryResult<Self> {
        let shifts: Vec<Shift> = load_records(store.as_ref(), store_keys::SHIFTS)?;
        debug!(shift_count = shifts.len(), "班次集合已加载");
        Ok(Self { store, shifts })
    }

    /// 以给定班次初始化并立即写入存储
    pub fn with_shifts(store: Arc<dyn KeyValueStore>, shifts: Vec<Shift>) -> RepositoryResult<Self> {
        save_records(store.as_ref(), store_keys::SHIFTS, &shifts)?;
        Ok(Self { store, shifts })
    }

    /// 丢弃内存副本，重新从存储读取
    pub fn reload(&mut self) -> RepositoryResult<()> {
        self.shifts = load_records(self.store.as_ref(), store_keys::SHIFTS)?;
        Ok(())
    }

    /// 当前快照（按存储顺序）
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn find(&self, shift_id: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.id == shift_id)
    }

    pub fn find_by_date_and_type(&self, date: NaiveDate, shift_type_id: &str) -> Option<&Shift> {
        self.shifts
            .iter()
            .find(|s| s.date == date && s.shift_type_id == shift_type_id)
    }

    pub fn shifts_on(&self, date: NaiveDate) -> impl Iterator<Item = &Shift> {
        self.shifts.iter().filter(move |s| s.date == date)
    }

    /// 新建空班次
    ///
    /// 每个 (date, shift_type_id) 只允许一条记录。
    pub fn create_shift(&mut self, date: NaiveDate, shift_type: &ShiftType) -> RepositoryResult<Shift> {
        if self.find_by_date_and_type(date, &shift_type.id).is_some() {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "shift already exists: date={}, shift_type_id={}",
                date, shift_type.id
            )));
        }

        let shift = Shift::new(date, shift_type);
        let mut next = self.shifts.clone();
        next.push(shift.clone());
        self.persist(next)?;
        Ok(shift)
    }

    /// 为日期区间 [start, end] 补齐缺失的班次（目录顺序），返回新建数量
    pub fn ensure_shifts_for_range(
        &mut self,
        catalog: &ShiftCatalog,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<usize> {
        let mut next = self.shifts.clone();
        let mut created = 0;

        for date in start.iter_days().take_while(|d| *d <= end) {
            for shift_type in catalog.iter() {
                let exists = next
                    .iter()
                    .any(|s| s.date == date && s.shift_type_id == shift_type.id);
                if !exists {
                    next.push(Shift::new(date, shift_type));
                    created += 1;
                }
            }
        }

        if created > 0 {
            self.persist(next)?;
        }
        Ok(created)
    }

    /// 工作副本（供唯一写入方修改）
    pub(crate) fn working_copy(&self) -> Vec<Shift> {
        self.shifts.clone()
    }

    /// 全量替换：先写存储，成功后再替换内存快照
    pub(crate) fn replace_all(&mut self, shifts: Vec<Shift>) -> RepositoryResult<()> {
        self.persist(shifts)
    }

    fn persist(&mut self, shifts: Vec<Shift>) -> RepositoryResult<()> {
        save_records(self.store.as_ref(), store_keys::SHIFTS, &shifts)?;
        self.shifts = shifts;
        Ok(())
    }
}
