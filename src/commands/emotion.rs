//! 情绪识别命令
//!
//! 文本情绪检测，并把结果与今日使用数据关联

use crate::commands::query::build_overview;
use crate::event_bus::AppEvent;
use crate::models::{looks_configured, EmotionAnalysis};
use crate::AppState;
use tracing::{info, warn};

/// 分析文本情绪并返回带使用数据洞察的结果
#[tauri::command]
pub async fn analyze_emotion(
    state: tauri::State<'_, AppState>,
    text: String,
) -> Result<EmotionAnalysis, String> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err("请输入你的感受".to_string());
    }

    let config = state.settings.get().await;
    if !looks_configured(&config.emotion_config.api_token) {
        warn!("情绪识别API令牌未配置");
        return Err("请先在设置中配置情绪识别的API令牌".to_string());
    }

    let overview = build_overview(&state, None, 3).await;

    info!("处理情绪识别请求, 长度: {} 字符", text.len());
    let analysis = state
        .emotion
        .analyze(&config.emotion_config, &text, Some(&overview))
        .await
        .map_err(|e| e.to_string())?;

    if let Some(top) = analysis.emotions.first() {
        state.event_bus.publish(AppEvent::EmotionDetected {
            top_emotion: top.label.clone(),
            score: top.score,
        });
    }

    Ok(analysis)
}

/// 测试情绪识别API连接
#[tauri::command]
pub async fn test_emotion_api(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let config = state.settings.get().await;
    if !looks_configured(&config.emotion_config.api_token) {
        return Err("请先配置情绪识别的API令牌".to_string());
    }

    let emotions = state
        .emotion
        .detect(&config.emotion_config, "I am feeling great today")
        .await
        .map_err(|e| e.to_string())?;

    Ok(format!(
        "连接成功, 识别到情绪: {} ({:.0}%)",
        emotions[0].label,
        emotions[0].score * 100.0
    ))
}
