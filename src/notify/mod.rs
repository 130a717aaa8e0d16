// 告警模块 - 社交媒体使用超过阈值时通知用户

use crate::event_bus::{AppEvent, EventBus};
use crate::models::{AppCategory, UsageAlert};
use crate::usage::metrics::format_duration;
use chrono::Utc;
use std::sync::Arc;
use tauri::{AppHandle, Emitter};
use tracing::info;
use uuid::Uuid;

/// 社交媒体使用超过阈值时构造告警，未超过返回 None
///
/// 重复发送同样的告警是无害的，查询本身是幂等读取
pub fn build_social_media_alert(social_millis: i64, threshold_millis: i64) -> Option<UsageAlert> {
    if social_millis <= threshold_millis {
        return None;
    }

    let formatted = format_duration(social_millis);
    Some(UsageAlert {
        id: Uuid::new_v4().to_string(),
        title: "Social Media Usage Alert".to_string(),
        message: format!(
            "You've used social media for {} today. Consider taking a break!",
            formatted
        ),
        category: AppCategory::SocialMedia,
        usage_millis: social_millis,
        timestamp: Utc::now(),
    })
}

/// 告警分发器 - 把告警推到事件总线和前端
pub struct AlertDispatcher {
    event_bus: Arc<EventBus>,
}

impl AlertDispatcher {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self { event_bus }
    }

    /// 检查社交媒体用量并在超阈值时分发告警
    pub fn check_and_dispatch(
        &self,
        app: Option<&AppHandle>,
        social_millis: i64,
        threshold_millis: i64,
    ) -> Option<UsageAlert> {
        let alert = build_social_media_alert(social_millis, threshold_millis)?;

        info!(
            "社交媒体使用超过阈值: {} > {}, 发出告警",
            format_duration(social_millis),
            format_duration(threshold_millis)
        );

        self.event_bus.publish(AppEvent::UsageAlertTriggered {
            alert: alert.clone(),
        });

        if let Some(app) = app {
            let _ = app.emit("usage-alert", &alert);
        }

        Some(alert)
    }
}
