//! 健康助手聊天命令
//!
//! 把用户提问连同今日使用数据上下文转发给聊天服务

use crate::commands::query::build_overview;
use crate::models::looks_configured;
use crate::AppState;
use tracing::{info, warn};

/// 发送聊天消息并返回助手回复
#[tauri::command]
pub async fn send_chat_message(
    state: tauri::State<'_, AppState>,
    message: String,
) -> Result<String, String> {
    let message = message.trim().to_string();
    if message.is_empty() {
        return Err("消息不能为空".to_string());
    }

    let config = state.settings.get().await;
    if !looks_configured(&config.assistant_config.api_key) {
        warn!("聊天助手API密钥未配置");
        return Err("请先在设置中配置聊天助手的API密钥".to_string());
    }

    // 带上今日使用数据作为上下文，聊天失败不影响使用统计本身
    let overview = build_overview(&state, None, 3).await;

    info!("处理聊天请求, 长度: {} 字符", message.len());
    state
        .assistant
        .chat(&config.assistant_config, &message, Some(&overview))
        .await
        .map_err(|e| e.to_string())
}

/// 测试聊天助手API连接
#[tauri::command]
pub async fn test_assistant_api(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let config = state.settings.get().await;
    if !looks_configured(&config.assistant_config.api_key) {
        return Err("请先配置聊天助手的API密钥".to_string());
    }

    state
        .assistant
        .test_connection(&config.assistant_config)
        .await
        .map_err(|e| e.to_string())
}
