// ==========================================
// 住所排班引擎 - 通知发布
// ==========================================
// 职责: 定义通知出口 trait，引擎只决定"是否通知"与"通知内容"
// 说明: 投递方式由外部界面层实现
// ==========================================

use crate::domain::types::NotificationKind;
use std::sync::{Arc, Mutex};

/// 通知出口 Trait
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// 空操作出口
///
/// 用于不需要通知的场景（如 CLI 批处理）
#[derive(Debug, Clone, Default)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn notify(&self, message: &str, kind: NotificationKind) {
        tracing::debug!(%kind, msg = message, "NoOpNotificationSink: 跳过通知");
    }
}

/// 日志出口：把通知写入 tracing
#[derive(Debug, Clone, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error => tracing::error!(%kind, "{}", message),
            NotificationKind::Warning => tracing::warn!(%kind, "{}", message),
            _ => tracing::info!(%kind, "{}", message),
        }
    }
}

/// 记录型出口：保存所有通知，供测试断言
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationSink {
    records: Arc<Mutex<Vec<(String, NotificationKind)>>>,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(String, NotificationKind)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, message: &str, kind: NotificationKind) {
        if let Ok(mut records) = self.records.lock() {
            records.push((message.to_string(), kind));
        }
    }
}
