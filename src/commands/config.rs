//! 配置管理命令
//!
//! 提供应用配置的读取和更新接口，包括：
//! - 应用配置的获取和部分更新
//! - API密钥配置状态查询
//! - 日志目录

use crate::event_bus::AppEvent;
use crate::models::{looks_configured, ApiKeyStatus, AppConfig, PersistedAppConfig};
use crate::AppState;
use tracing::info;

/// 获取应用配置
#[tauri::command]
pub async fn get_app_config(
    state: tauri::State<'_, AppState>,
) -> Result<PersistedAppConfig, String> {
    Ok(state.settings.get().await)
}

/// 更新配置（部分更新，未提供的字段保持不变）
#[tauri::command]
pub async fn update_config(
    state: tauri::State<'_, AppState>,
    config: AppConfig,
) -> Result<PersistedAppConfig, String> {
    let updated_config = state
        .settings
        .update(config.clone())
        .await
        .map_err(|e| e.to_string())?;

    // 更新告警阈值
    if let Some(threshold) = config.alert_threshold_millis {
        info!("社交媒体告警阈值更新为: {}ms", threshold);
    }

    // 更新日志配置
    if let Some(logger_settings) = config.logger_settings {
        state
            .log_broadcaster
            .set_enabled(logger_settings.enable_frontend_logging);
        info!(
            "前端日志推送已{}",
            if logger_settings.enable_frontend_logging {
                "启用"
            } else {
                "禁用"
            }
        );
    }

    state.event_bus.publish(AppEvent::ConfigUpdated {
        config_type: "app".to_string(),
    });

    Ok(updated_config)
}

/// 查询API密钥配置状态
#[tauri::command]
pub async fn get_api_key_status(
    state: tauri::State<'_, AppState>,
) -> Result<ApiKeyStatus, String> {
    let config = state.settings.get().await;
    Ok(ApiKeyStatus {
        assistant_configured: looks_configured(&config.assistant_config.api_key),
        emotion_configured: looks_configured(&config.emotion_config.api_token),
    })
}

/// 获取日志目录路径
#[tauri::command]
pub fn get_log_dir() -> Result<String, String> {
    let log_dir = if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").map_err(|e| e.to_string())?;
        format!("{}/Library/Logs/wellbeing-analyzer", home)
    } else if cfg!(target_os = "windows") {
        let appdata = std::env::var("APPDATA").map_err(|e| e.to_string())?;
        format!("{}\\wellbeing-analyzer\\logs", appdata)
    } else {
        let home = std::env::var("HOME").map_err(|e| e.to_string())?;
        format!("{}/.local/share/wellbeing-analyzer/logs", home)
    };
    Ok(log_dir)
}
