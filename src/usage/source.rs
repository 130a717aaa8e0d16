// 使用事件源 - 系统事件服务与应用注册表的进程内模拟

use crate::models::UsageEvent;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// 使用事件源接口
///
/// 聚合引擎只依赖这个边界：权限检查、按窗口查询事件、
/// 按包名查询显示名称。查询失败返回 None 表示应用已卸载等
/// 元数据不可用的情况
#[async_trait]
pub trait UsageEventSource: Send + Sync {
    /// 是否拥有读取使用事件的权限
    async fn has_permission(&self) -> bool;

    /// 查询时间窗口内的事件，按时间戳非降序返回
    async fn query_events(&self, start: i64, end: i64) -> Result<Vec<UsageEvent>>;

    /// 查询应用的显示名称，未注册（如已卸载）返回 None
    async fn lookup_display_name(&self, package_id: &str) -> Option<String>;
}

/// 进程内事件日志 - 默认的事件源实现
///
/// 事件由前端通过命令追加，应用名称通过注册表维护，
/// 数据只在内存中保留当天，不跨运行持久化
pub struct EventLog {
    /// 追加顺序保存的事件
    events: RwLock<Vec<UsageEvent>>,
    /// 包名 -> 显示名称注册表
    registry: RwLock<HashMap<String, String>>,
    /// 模拟的权限开关
    permission_granted: RwLock<bool>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            registry: RwLock::new(HashMap::new()),
            permission_granted: RwLock::new(true),
        }
    }

    /// 追加一条使用事件
    pub async fn record(&self, event: UsageEvent) {
        let mut events = self.events.write().await;
        events.push(event);
    }

    /// 注册应用的显示名称
    pub async fn register_app(&self, package_id: String, display_name: String) {
        let mut registry = self.registry.write().await;
        registry.insert(package_id, display_name);
    }

    /// 设置权限开关
    pub async fn set_permission(&self, granted: bool) {
        let mut permission = self.permission_granted.write().await;
        *permission = granted;
    }

    /// 清空事件（换日时调用）
    pub async fn clear_events(&self) {
        let mut events = self.events.write().await;
        let count = events.len();
        events.clear();
        debug!("已清空 {} 条使用事件", count);
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageEventSource for EventLog {
    async fn has_permission(&self) -> bool {
        *self.permission_granted.read().await
    }

    async fn query_events(&self, start: i64, end: i64) -> Result<Vec<UsageEvent>> {
        let events = self.events.read().await;
        let mut selected: Vec<UsageEvent> = events
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect();
        // 追加顺序不保证时间顺序，查询侧统一排序
        selected.sort_by_key(|e| e.timestamp);
        Ok(selected)
    }

    async fn lookup_display_name(&self, package_id: &str) -> Option<String> {
        let registry = self.registry.read().await;
        registry.get(package_id).cloned()
    }
}
