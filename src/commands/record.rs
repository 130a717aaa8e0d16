//! 使用事件记录命令
//!
//! 前端把前台/后台切换事件和应用注册信息写入进程内事件日志

use crate::models::{EventKind, UsageEvent};
use crate::AppState;
use tracing::info;

/// 记录一条使用事件
#[tauri::command]
pub async fn record_usage_event(
    state: tauri::State<'_, AppState>,
    package_id: String,
    timestamp: i64,
    kind: EventKind,
) -> Result<(), String> {
    state
        .event_log
        .record(UsageEvent::new(package_id, timestamp, kind))
        .await;
    Ok(())
}

/// 批量记录使用事件
#[tauri::command]
pub async fn record_usage_events(
    state: tauri::State<'_, AppState>,
    events: Vec<UsageEvent>,
) -> Result<usize, String> {
    let count = events.len();
    for event in events {
        state.event_log.record(event).await;
    }
    info!("批量记录 {} 条使用事件", count);
    Ok(count)
}

/// 注册应用的显示名称
#[tauri::command]
pub async fn register_app(
    state: tauri::State<'_, AppState>,
    package_id: String,
    display_name: String,
) -> Result<(), String> {
    state.event_log.register_app(package_id, display_name).await;
    Ok(())
}

/// 设置事件源权限开关
#[tauri::command]
pub async fn set_usage_permission(
    state: tauri::State<'_, AppState>,
    granted: bool,
) -> Result<(), String> {
    state.event_log.set_permission(granted).await;
    info!("使用事件权限已设置为: {}", granted);
    Ok(())
}

/// 清空当前事件日志（换日时调用）
#[tauri::command]
pub async fn clear_usage_events(state: tauri::State<'_, AppState>) -> Result<(), String> {
    state.event_log.clear_events().await;
    Ok(())
}
