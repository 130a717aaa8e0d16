// 情绪识别模块 - 文本情绪检测与使用数据关联洞察

use crate::models::{EmotionAnalysis, EmotionConfig, EmotionResult, UsageOverview};
use anyhow::Result;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

/// 情绪识别请求体
#[derive(Debug, Clone, Serialize)]
pub struct EmotionRequest {
    pub inputs: String,
}

/// 情绪识别客户端（接受共享的HTTP客户端以复用连接池）
pub struct EmotionDetector {
    client: Client,
}

impl EmotionDetector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 检测文本中的情绪，结果按置信度降序返回
    pub async fn detect(&self, config: &EmotionConfig, text: &str) -> Result<Vec<EmotionResult>> {
        if config.api_token.is_empty() {
            return Err(anyhow::anyhow!("API token未配置"));
        }

        let url = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", config.api_token))
            .json(&EmotionRequest {
                inputs: text.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("情绪识别 API 错误: {} - {}", status, error_text);
            return Err(anyhow::anyhow!("情绪识别 API 错误: {}", status));
        }

        let mut emotions: Vec<EmotionResult> = response.json().await?;
        if emotions.is_empty() {
            return Err(anyhow::anyhow!("情绪识别结果为空"));
        }

        emotions.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!("情绪识别完成: {} ({:.0}%)", emotions[0].label, emotions[0].score * 100.0);
        Ok(emotions)
    }

    /// 检测情绪并附带使用数据关联洞察
    pub async fn analyze(
        &self,
        config: &EmotionConfig,
        text: &str,
        overview: Option<&UsageOverview>,
    ) -> Result<EmotionAnalysis> {
        let emotions = self.detect(config, text).await?;
        let top_emotion = emotions[0].label.clone();
        let emoji = emotion_emoji(&top_emotion).to_string();
        let usage_insight = overview.map(|o| correlation_insight(&top_emotion, o));

        Ok(EmotionAnalysis {
            emotions,
            top_emotion,
            emoji,
            usage_insight,
        })
    }
}

/// 情绪标签对应的表情符号
pub fn emotion_emoji(emotion: &str) -> &'static str {
    match emotion.to_lowercase().as_str() {
        "joy" | "happy" => "😊",
        "sadness" | "sad" => "😢",
        "anger" | "angry" => "😠",
        "fear" | "anxious" => "😰",
        "stress" | "stressed" => "😓",
        "neutral" => "😐",
        _ => "🤔",
    }
}

/// 把主导情绪和今日使用数据组合成洞察文本
pub fn correlation_insight(emotion: &str, overview: &UsageOverview) -> String {
    if overview.permission_denied {
        return "Usage stats permission not granted. Enable it to see correlations.".to_string();
    }

    let emotion_lower = emotion.to_lowercase();
    let mut text = String::new();
    text.push_str("📊 Usage Correlation:\n\n");
    text.push_str(&format!("You seem {} and your usage today:\n", emotion_lower));
    text.push_str(&format!(
        "• Total screen time: {}\n",
        overview.total_screen_time_text
    ));
    text.push_str(&format!(
        "• Social media: {}\n",
        overview.social_media_time_text
    ));

    if !overview.top_apps.is_empty() {
        let names: Vec<&str> = overview
            .top_apps
            .iter()
            .take(3)
            .map(|app| app.display_name.as_str())
            .collect();
        text.push_str(&format!("• Top apps: {}\n", names.join(", ")));
    }
    text.push('\n');

    let negative = emotion_lower.contains("sad")
        || emotion_lower.contains("anxious")
        || emotion_lower.contains("stressed")
        || emotion_lower.contains("fear")
        || emotion_lower.contains("anger");
    let positive = emotion_lower.contains("happy") || emotion_lower.contains("joy");

    if negative {
        let three_hours = 3 * 60 * 60 * 1000;
        if overview.social_media_time > three_hours {
            text.push_str(&format!(
                "💡 Insight: High social media usage ({}) might be contributing to your {} feelings. \
                 Consider taking breaks and limiting social media time.",
                overview.social_media_time_text, emotion_lower
            ));
        } else {
            text.push_str(
                "💡 Insight: Consider engaging in activities that boost your mood, \
                 like exercise, hobbies, or connecting with friends offline.",
            );
        }
    } else if positive {
        text.push_str(
            "💡 Insight: Great to see you're feeling positive! \
             Keep maintaining a healthy balance between screen time and real-world activities.",
        );
    } else {
        text.push_str(
            "💡 Insight: Monitor your screen time patterns and ensure \
             you're taking regular breaks from digital devices.",
        );
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppCategory, AppUsageInfo};

    fn overview(social_millis: i64) -> UsageOverview {
        UsageOverview {
            total_screen_time: social_millis + 1_800_000,
            social_media_time: social_millis,
            total_screen_time_text: "4h 0m".to_string(),
            social_media_time_text: "3h 30m".to_string(),
            top_apps: vec![AppUsageInfo {
                package_id: "com.instagram.android".to_string(),
                display_name: "Instagram".to_string(),
                total_foreground_millis: social_millis,
                category: AppCategory::SocialMedia,
            }],
            alert: None,
            permission_denied: false,
        }
    }

    #[test]
    fn test_request_serialization() {
        let request = EmotionRequest {
            inputs: "I feel great".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "I feel great");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"[{"label": "joy", "score": 0.92}, {"label": "sadness", "score": 0.03}]"#;
        let emotions: Vec<EmotionResult> = serde_json::from_str(json).unwrap();
        assert_eq!(emotions.len(), 2);
        assert_eq!(emotions[0].label, "joy");
    }

    #[test]
    fn test_emotion_emoji() {
        assert_eq!(emotion_emoji("joy"), "😊");
        assert_eq!(emotion_emoji("SADNESS"), "😢");
        assert_eq!(emotion_emoji("surprise"), "🤔");
    }

    #[test]
    fn test_negative_emotion_with_heavy_social_usage() {
        let insight = correlation_insight("sadness", &overview(12_600_000));
        assert!(insight.contains("High social media usage"));
        assert!(insight.contains("3h 30m"));
    }

    #[test]
    fn test_negative_emotion_with_light_social_usage() {
        let insight = correlation_insight("sadness", &overview(600_000));
        assert!(insight.contains("boost your mood"));
    }

    #[test]
    fn test_positive_emotion_insight() {
        let insight = correlation_insight("joy", &overview(600_000));
        assert!(insight.contains("feeling positive"));
    }

    #[test]
    fn test_permission_denied_insight() {
        let mut o = overview(0);
        o.permission_denied = true;
        let insight = correlation_insight("joy", &o);
        assert!(insight.contains("permission not granted"));
    }
}
