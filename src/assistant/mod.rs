// 健康助手模块 - 带使用数据上下文的AI聊天

pub mod gemini;

use crate::models::{AssistantConfig, UsageOverview};
use anyhow::Result;
use gemini::GeminiClient;
use reqwest::Client;
use tracing::info;

/// 健康助手管理器 - 在用户提问外包裹使用数据上下文
pub struct AssistantManager {
    client: GeminiClient,
}

impl AssistantManager {
    pub fn new(http_client: Client) -> Self {
        Self {
            client: GeminiClient::new(http_client),
        }
    }

    /// 回答用户的健康问题，附带今日使用数据作为上下文
    pub async fn chat(
        &self,
        config: &AssistantConfig,
        message: &str,
        overview: Option<&UsageOverview>,
    ) -> Result<String> {
        let context = usage_context(overview);
        let prompt = build_prompt(message, &context);
        info!("发送聊天请求, 上下文: {}", context);
        self.client.generate(config, prompt).await
    }

    /// 用一条简短请求验证API配置是否可用
    pub async fn test_connection(&self, config: &AssistantConfig) -> Result<String> {
        self.client
            .generate(config, "Reply with a short greeting.".to_string())
            .await
    }
}

/// 把今日使用总览压缩成一行上下文文本
fn usage_context(overview: Option<&UsageOverview>) -> String {
    match overview {
        Some(o) if o.permission_denied => "Usage stats permission not granted.".to_string(),
        Some(o) => {
            let top_names: Vec<&str> = o
                .top_apps
                .iter()
                .take(3)
                .map(|app| app.display_name.as_str())
                .collect();
            format!(
                "Current usage stats: Total screen time: {}, Social media: {}, Top apps: {}",
                o.total_screen_time_text,
                o.social_media_time_text,
                top_names.join(", ")
            )
        }
        None => "Unable to fetch usage stats.".to_string(),
    }
}

/// 构造带上下文的完整提示词
fn build_prompt(user_message: &str, usage_context: &str) -> String {
    format!(
        "You are a helpful Digital Wellbeing Assistant. Your role is to help users understand \
         their app usage patterns and provide tips for healthier digital habits.\n\n\
         Context about the user's current usage: {}\n\n\
         User's question: {}\n\n\
         Please provide a helpful, friendly, and concise response. Focus on digital wellbeing, \
         screen time management, and healthy tech habits. Keep responses under 200 words.",
        usage_context, user_message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppCategory, AppUsageInfo};

    fn overview() -> UsageOverview {
        UsageOverview {
            total_screen_time: 7_200_000,
            social_media_time: 3_600_000,
            total_screen_time_text: "2h 0m".to_string(),
            social_media_time_text: "1h 0m".to_string(),
            top_apps: vec![
                AppUsageInfo {
                    package_id: "com.instagram.android".to_string(),
                    display_name: "Instagram".to_string(),
                    total_foreground_millis: 3_600_000,
                    category: AppCategory::SocialMedia,
                },
                AppUsageInfo {
                    package_id: "com.example.reader".to_string(),
                    display_name: "Reader".to_string(),
                    total_foreground_millis: 3_600_000,
                    category: AppCategory::Others,
                },
            ],
            alert: None,
            permission_denied: false,
        }
    }

    #[test]
    fn test_usage_context_with_stats() {
        let context = usage_context(Some(&overview()));
        assert!(context.contains("Total screen time: 2h 0m"));
        assert!(context.contains("Social media: 1h 0m"));
        assert!(context.contains("Instagram, Reader"));
    }

    #[test]
    fn test_usage_context_permission_denied() {
        let mut o = overview();
        o.permission_denied = true;
        assert_eq!(usage_context(Some(&o)), "Usage stats permission not granted.");
    }

    #[test]
    fn test_prompt_contains_question_and_context() {
        let prompt = build_prompt("How do I cut down on scrolling?", "ctx");
        assert!(prompt.contains("Digital Wellbeing Assistant"));
        assert!(prompt.contains("ctx"));
        assert!(prompt.contains("How do I cut down on scrolling?"));
        assert!(prompt.contains("under 200 words"));
    }
}
