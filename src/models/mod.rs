// 数据模型模块 - 定义所有的数据结构

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 重新导出其他模块的类型
pub use crate::usage::aggregator::AggregationRules;
pub use crate::usage::classifier::CategoryRules;

/// 使用事件类型（前台/后台切换）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// 应用进入前台
    Foreground,
    /// 应用退到后台
    Background,
}

/// 原始使用事件 - 由事件源按时间顺序提供
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    /// 应用包名
    pub package_id: String,
    /// 事件时间戳（毫秒）
    pub timestamp: i64,
    /// 事件类型
    pub kind: EventKind,
}

impl UsageEvent {
    pub fn new(package_id: impl Into<String>, timestamp: i64, kind: EventKind) -> Self {
        Self {
            package_id: package_id.into(),
            timestamp,
            kind,
        }
    }
}

/// 应用类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppCategory {
    SocialMedia,   // 社交媒体
    Productivity,  // 效率工具
    Entertainment, // 娱乐
    Others,        // 其他
}

impl AppCategory {
    /// 所有类别（用于遍历统计）
    pub const ALL: [AppCategory; 4] = [
        Self::SocialMedia,
        Self::Productivity,
        Self::Entertainment,
        Self::Others,
    ];

    /// 获取类别的中文名称
    pub fn to_chinese(&self) -> &str {
        match self {
            Self::SocialMedia => "社交媒体",
            Self::Productivity => "效率工具",
            Self::Entertainment => "娱乐",
            Self::Others => "其他",
        }
    }

    /// 获取类别的颜色（用于UI显示）
    pub fn color(&self) -> &str {
        match self {
            Self::SocialMedia => "#FF69B4",
            Self::Productivity => "#409EFF",
            Self::Entertainment => "#FFC107",
            Self::Others => "#909399",
        }
    }
}

/// 单个应用的使用信息 - 每次查询重新生成，不跨查询复用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUsageInfo {
    /// 应用包名
    pub package_id: String,
    /// 应用显示名称
    pub display_name: String,
    /// 窗口内前台使用总时长（毫秒，恒为正）
    pub total_foreground_millis: i64,
    /// 应用类别
    pub category: AppCategory,
}

/// 一次使用统计查询的完整结果
///
/// 权限缺失、坏记录数量都作为数据的一部分返回，
/// 调用方根据字段自行决定如何展示，不走异常控制流
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// 统计窗口起点（今日零点，毫秒）
    pub window_start: i64,
    /// 统计窗口终点（查询时刻，毫秒）
    pub window_end: i64,
    /// 事件源权限是否缺失（缺失时 apps 为空）
    pub permission_denied: bool,
    /// 保留下来的应用列表（按使用时长降序）
    pub apps: Vec<AppUsageInfo>,
    /// 被跳过的坏事件数量（缺少包名）
    pub skipped_malformed: usize,
    /// 因显示名称查询失败而丢弃的应用数量
    pub dropped_lookup: usize,
}

impl UsageSnapshot {
    /// 权限缺失时的空结果
    pub fn permission_denied(window_start: i64, window_end: i64) -> Self {
        Self {
            window_start,
            window_end,
            permission_denied: true,
            apps: Vec::new(),
            skipped_malformed: 0,
            dropped_lookup: 0,
        }
    }
}

/// 使用统计总览（前端展示用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageOverview {
    /// 总屏幕时间（毫秒）
    pub total_screen_time: i64,
    /// 社交媒体使用时间（毫秒）
    pub social_media_time: i64,
    /// 格式化后的总屏幕时间
    pub total_screen_time_text: String,
    /// 格式化后的社交媒体时间
    pub social_media_time_text: String,
    /// 使用时长前N的应用
    pub top_apps: Vec<AppUsageInfo>,
    /// 本次查询触发的告警（未超阈值时为空）
    pub alert: Option<UsageAlert>,
    /// 事件源权限是否缺失
    pub permission_denied: bool,
}

/// 使用告警 - 社交媒体超过阈值时发出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageAlert {
    /// 告警唯一ID
    pub id: String,
    /// 标题
    pub title: String,
    /// 告警内容
    pub message: String,
    /// 触发类别
    pub category: AppCategory,
    /// 实际使用时长（毫秒）
    pub usage_millis: i64,
    /// 触发时间
    pub timestamp: DateTime<Utc>,
}

/// 单条情绪识别结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionResult {
    /// 情绪标签（如 joy / sadness / anger）
    pub label: String,
    /// 置信度（0-1）
    pub score: f64,
}

/// 情绪分析的完整输出（识别结果 + 与使用数据的关联洞察）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionAnalysis {
    /// 所有情绪结果（按置信度降序）
    pub emotions: Vec<EmotionResult>,
    /// 置信度最高的情绪标签
    pub top_emotion: String,
    /// 对应的表情符号
    pub emoji: String,
    /// 结合今日使用数据生成的洞察文本
    pub usage_insight: Option<String>,
}

/// 应用配置（部分更新用，字段均可选）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 聊天助手配置
    pub assistant_config: Option<AssistantConfig>,
    /// 情绪识别配置
    pub emotion_config: Option<EmotionConfig>,
    /// 社交媒体告警阈值（毫秒）
    pub alert_threshold_millis: Option<i64>,
    /// 聚合规则（排除集、最小时长）
    pub aggregation_rules: Option<AggregationRules>,
    /// 分类规则（社交集合、关键词列表）
    pub category_rules: Option<CategoryRules>,
    /// 日志配置
    pub logger_settings: Option<LoggerSettings>,
}

/// 聊天助手配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// API密钥
    pub api_key: String,
    /// 模型名称
    #[serde(default = "default_assistant_model")]
    pub model: String,
    /// API基础URL
    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,
}

fn default_assistant_model() -> String {
    "gemini-pro".to_string()
}

fn default_assistant_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_assistant_model(),
            base_url: default_assistant_base_url(),
        }
    }
}

/// 情绪识别配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionConfig {
    /// API令牌
    pub api_token: String,
    /// 模型名称
    #[serde(default = "default_emotion_model")]
    pub model: String,
    /// API基础URL
    #[serde(default = "default_emotion_base_url")]
    pub base_url: String,
}

fn default_emotion_model() -> String {
    "j-hartmann/emotion-english-distilroberta-base".to_string()
}

fn default_emotion_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            model: default_emotion_model(),
            base_url: default_emotion_base_url(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// 是否把日志推送到前端
    pub enable_frontend_logging: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            enable_frontend_logging: true,
        }
    }
}

/// 社交媒体告警阈值默认值：3小时
pub const DEFAULT_ALERT_THRESHOLD_MILLIS: i64 = 3 * 60 * 60 * 1000;

fn default_alert_threshold() -> i64 {
    DEFAULT_ALERT_THRESHOLD_MILLIS
}

/// 持久化的应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedAppConfig {
    /// 聊天助手配置
    #[serde(default)]
    pub assistant_config: AssistantConfig,
    /// 情绪识别配置
    #[serde(default)]
    pub emotion_config: EmotionConfig,
    /// 社交媒体告警阈值（毫秒）
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold_millis: i64,
    /// 聚合规则
    #[serde(default)]
    pub aggregation_rules: AggregationRules,
    /// 分类规则
    #[serde(default)]
    pub category_rules: CategoryRules,
    /// 日志配置
    #[serde(default)]
    pub logger_settings: LoggerSettings,
}

impl Default for PersistedAppConfig {
    fn default() -> Self {
        Self {
            assistant_config: AssistantConfig::default(),
            emotion_config: EmotionConfig::default(),
            alert_threshold_millis: DEFAULT_ALERT_THRESHOLD_MILLIS,
            aggregation_rules: AggregationRules::default(),
            category_rules: CategoryRules::default(),
            logger_settings: LoggerSettings::default(),
        }
    }
}

/// API密钥配置状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyStatus {
    /// 聊天助手密钥是否可用
    pub assistant_configured: bool,
    /// 情绪识别令牌是否可用
    pub emotion_configured: bool,
}

/// 判断密钥是否像一个真实密钥（非空、非占位符、长度合理）
pub fn looks_configured(key: &str) -> bool {
    !key.trim().is_empty() && !key.contains("YOUR_") && key.len() > 10
}

/// API响应包装
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_configured() {
        assert!(!looks_configured(""));
        assert!(!looks_configured("   "));
        assert!(!looks_configured("YOUR_API_KEY_HERE"));
        assert!(!looks_configured("short"));
        assert!(looks_configured("AIzaSyD4f8a9b0c1d2e3f4"));
    }

    #[test]
    fn test_persisted_config_defaults() {
        let config = PersistedAppConfig::default();
        assert_eq!(config.alert_threshold_millis, 10_800_000);
        assert!(config.assistant_config.api_key.is_empty());
        assert_eq!(config.assistant_config.model, "gemini-pro");
        assert!(config
            .emotion_config
            .model
            .contains("emotion-english-distilroberta-base"));
    }

    #[test]
    fn test_partial_config_deserialization() {
        // 旧配置文件缺少新字段时应能回退到默认值
        let json = r#"{"assistant_config": {"api_key": "k"}}"#;
        let config: PersistedAppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.assistant_config.api_key, "k");
        assert_eq!(config.alert_threshold_millis, 10_800_000);
        assert_eq!(config.aggregation_rules.min_usage_millis, 60_000);
    }
}
