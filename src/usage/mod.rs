// 使用统计模块 - 事件源、聚合器、分类器与指标的组合

pub mod aggregator;
pub mod classifier;
pub mod metrics;
pub mod source;

use crate::models::{AppUsageInfo, UsageSnapshot};
use aggregator::{aggregate, AggregationRules};
use chrono::{Local, NaiveTime};
use classifier::CategoryRules;
use source::UsageEventSource;
use std::sync::Arc;
use tracing::{info, warn};

/// 使用统计收集器 - 组合事件源、聚合器和分类器
pub struct UsageCollector {
    source: Arc<dyn UsageEventSource>,
}

impl UsageCollector {
    pub fn new(source: Arc<dyn UsageEventSource>) -> Self {
        Self { source }
    }

    /// 统计今日（本地零点到现在）的应用使用情况
    ///
    /// 权限缺失返回带标记的空快照而不是错误，
    /// 显示名称查询失败只丢弃受影响的应用并计数
    pub async fn snapshot_today(
        &self,
        rules: &AggregationRules,
        category_rules: &CategoryRules,
    ) -> UsageSnapshot {
        let now = Local::now();
        let window_start = now
            .with_time(NaiveTime::MIN)
            .single()
            .unwrap_or(now)
            .timestamp_millis();
        let window_end = now.timestamp_millis();

        self.snapshot_window(window_start, window_end, rules, category_rules)
            .await
    }

    /// 统计指定窗口内的应用使用情况
    pub async fn snapshot_window(
        &self,
        window_start: i64,
        window_end: i64,
        rules: &AggregationRules,
        category_rules: &CategoryRules,
    ) -> UsageSnapshot {
        if !self.source.has_permission().await {
            warn!("事件源权限缺失, 返回空的使用统计");
            return UsageSnapshot::permission_denied(window_start, window_end);
        }

        let events = match self.source.query_events(window_start, window_end).await {
            Ok(events) => events,
            Err(e) => {
                // 事件源整体不可用时退化为空结果，不让上层崩溃
                warn!("查询使用事件失败: {}", e);
                return UsageSnapshot {
                    window_start,
                    window_end,
                    permission_denied: false,
                    apps: Vec::new(),
                    skipped_malformed: 0,
                    dropped_lookup: 0,
                };
            }
        };

        let outcome = aggregate(&events, window_end, rules);

        let mut apps = Vec::with_capacity(outcome.totals.len());
        let mut dropped_lookup = 0usize;
        for (package_id, total) in outcome.totals {
            match self.source.lookup_display_name(&package_id).await {
                Some(display_name) => {
                    let category = category_rules.classify(&package_id);
                    apps.push(AppUsageInfo {
                        package_id,
                        display_name,
                        total_foreground_millis: total,
                        category,
                    });
                }
                None => {
                    // 应用元数据不可用（如已卸载），只丢弃这一个包
                    dropped_lookup += 1;
                }
            }
        }

        // 按使用时长降序，同时长按包名升序
        apps.sort_by(|a, b| {
            b.total_foreground_millis
                .cmp(&a.total_foreground_millis)
                .then_with(|| a.package_id.cmp(&b.package_id))
        });

        info!(
            "使用统计完成: {} 个应用, 跳过 {} 条坏事件, 丢弃 {} 个无名称应用",
            apps.len(),
            outcome.skipped_malformed,
            dropped_lookup
        );

        UsageSnapshot {
            window_start,
            window_end,
            permission_denied: false,
            apps,
            skipped_malformed: outcome.skipped_malformed,
            dropped_lookup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppCategory, EventKind, UsageEvent};
    use source::EventLog;

    async fn seeded_log() -> Arc<EventLog> {
        let log = Arc::new(EventLog::new());
        log.register_app("com.instagram.android".to_string(), "Instagram".to_string())
            .await;
        log.register_app("com.example.reader".to_string(), "Reader".to_string())
            .await;
        log
    }

    #[tokio::test]
    async fn test_snapshot_classifies_and_sorts() {
        let log = seeded_log().await;
        log.record(UsageEvent::new("com.instagram.android", 0, EventKind::Foreground))
            .await;
        log.record(UsageEvent::new(
            "com.instagram.android",
            120_000,
            EventKind::Background,
        ))
        .await;
        log.record(UsageEvent::new("com.example.reader", 0, EventKind::Foreground))
            .await;
        log.record(UsageEvent::new(
            "com.example.reader",
            300_000,
            EventKind::Background,
        ))
        .await;

        let collector = UsageCollector::new(log);
        let snapshot = collector
            .snapshot_window(
                0,
                400_000,
                &AggregationRules::default(),
                &CategoryRules::default(),
            )
            .await;

        assert!(!snapshot.permission_denied);
        assert_eq!(snapshot.apps.len(), 2);
        assert_eq!(snapshot.apps[0].package_id, "com.example.reader");
        assert_eq!(snapshot.apps[0].total_foreground_millis, 300_000);
        assert_eq!(snapshot.apps[1].category, AppCategory::SocialMedia);
    }

    #[tokio::test]
    async fn test_permission_denied_gives_empty_snapshot() {
        let log = seeded_log().await;
        log.record(UsageEvent::new("com.instagram.android", 0, EventKind::Foreground))
            .await;
        log.set_permission(false).await;

        let collector = UsageCollector::new(log);
        let snapshot = collector
            .snapshot_window(
                0,
                400_000,
                &AggregationRules::default(),
                &CategoryRules::default(),
            )
            .await;

        assert!(snapshot.permission_denied);
        assert!(snapshot.apps.is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_package_dropped_and_counted() {
        let log = seeded_log().await;
        log.record(UsageEvent::new("com.gone.app", 0, EventKind::Foreground))
            .await;
        log.record(UsageEvent::new("com.gone.app", 120_000, EventKind::Background))
            .await;
        log.record(UsageEvent::new("com.example.reader", 0, EventKind::Foreground))
            .await;
        log.record(UsageEvent::new(
            "com.example.reader",
            120_000,
            EventKind::Background,
        ))
        .await;

        let collector = UsageCollector::new(log);
        let snapshot = collector
            .snapshot_window(
                0,
                400_000,
                &AggregationRules::default(),
                &CategoryRules::default(),
            )
            .await;

        assert_eq!(snapshot.dropped_lookup, 1);
        assert_eq!(snapshot.apps.len(), 1);
        assert_eq!(snapshot.apps[0].package_id, "com.example.reader");
    }
}
