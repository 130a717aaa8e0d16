// Gemini 聊天客户端 - 静态类型的请求/响应模式

use crate::models::AssistantConfig;
use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// 聊天请求体
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub contents: Vec<Content>,
}

/// 消息内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// 文本片段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// 聊天响应体
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// 候选回复
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

impl ChatRequest {
    /// 由单条提示词构造请求
    pub fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

impl ChatResponse {
    /// 取首个候选回复的文本
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
    }
}

/// Gemini 客户端（接受共享的HTTP客户端以复用连接池）
pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 发送提示词并返回生成的文本
    pub async fn generate(&self, config: &AssistantConfig, prompt: String) -> Result<String> {
        if config.api_key.is_empty() {
            return Err(anyhow::anyhow!("API key未配置"));
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            config.base_url.trim_end_matches('/'),
            config.model,
            config.api_key
        );

        debug!("调用 Gemini API, 模型: {}", config.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&ChatRequest::from_prompt(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API 错误: {} - {}", status, error_text);
            return Err(anyhow::anyhow!("Gemini API 错误: {}", status));
        }

        // 畸形响应在这里以类型化解析错误暴露，不做动态字段访问
        let body: ChatResponse = response.json().await?;
        body.first_text()
            .map(|text| text.to_string())
            .ok_or_else(|| anyhow::anyhow!("Gemini 响应缺少候选内容"))
    }
}
