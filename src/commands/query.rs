//! 使用统计查询命令
//!
//! 提供各类使用数据查询接口，包括：
//! - 今日使用快照
//! - 屏幕时间/类别时间总览
//! - 时长格式化

use crate::event_bus::AppEvent;
use crate::models::{AppCategory, UsageOverview, UsageSnapshot};
use crate::usage::metrics;
use crate::AppState;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 类别时间条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTimeEntry {
    pub category: AppCategory,
    pub label: String,
    pub millis: i64,
    pub formatted: String,
}

/// 根据当前配置生成今日使用快照
pub(crate) async fn today_snapshot(state: &AppState) -> UsageSnapshot {
    let config = state.settings.get().await;
    state
        .collector
        .snapshot_today(&config.aggregation_rules, &config.category_rules)
        .await
}

/// 把快照组合成前端总览，必要时触发社交媒体告警
pub(crate) async fn build_overview(
    state: &AppState,
    app: Option<&tauri::AppHandle>,
    top_n: usize,
) -> UsageOverview {
    let config = state.settings.get().await;
    let snapshot = today_snapshot(state).await;

    let total_screen_time = metrics::total_screen_time(&snapshot.apps);
    let social_media_time = metrics::category_time(&snapshot.apps, AppCategory::SocialMedia);
    let top_apps = metrics::top_apps(&snapshot.apps, top_n);

    let alert = if snapshot.permission_denied {
        None
    } else {
        state
            .alerts
            .check_and_dispatch(app, social_media_time, config.alert_threshold_millis)
    };

    state.event_bus.publish(AppEvent::UsageRefreshed {
        app_count: snapshot.apps.len(),
        total_screen_time,
        timestamp: Utc::now(),
    });

    UsageOverview {
        total_screen_time,
        social_media_time,
        total_screen_time_text: metrics::format_duration(total_screen_time),
        social_media_time_text: metrics::format_duration(social_media_time),
        top_apps,
        alert,
        permission_denied: snapshot.permission_denied,
    }
}

/// 获取今日使用快照（按时长降序的应用列表及异常计数）
#[tauri::command]
pub async fn get_usage_snapshot(
    state: tauri::State<'_, AppState>,
) -> Result<UsageSnapshot, String> {
    Ok(today_snapshot(&state).await)
}

/// 获取今日使用总览（总时长、社交媒体时长、前N应用、告警）
#[tauri::command]
pub async fn get_usage_overview(
    state: tauri::State<'_, AppState>,
    app: tauri::AppHandle,
    top_n: Option<usize>,
) -> Result<UsageOverview, String> {
    Ok(build_overview(&state, Some(&app), top_n.unwrap_or(5)).await)
}

/// 获取各类别的使用时间分布
#[tauri::command]
pub async fn get_category_times(
    state: tauri::State<'_, AppState>,
) -> Result<Vec<CategoryTimeEntry>, String> {
    let snapshot = today_snapshot(&state).await;
    Ok(AppCategory::ALL
        .iter()
        .map(|category| {
            let millis = metrics::category_time(&snapshot.apps, *category);
            CategoryTimeEntry {
                category: *category,
                label: category.to_chinese().to_string(),
                millis,
                formatted: metrics::format_duration(millis),
            }
        })
        .collect())
}

/// 格式化毫秒时长为可读文本
#[tauri::command]
pub fn format_millis(millis: i64) -> String {
    metrics::format_duration(millis)
}
