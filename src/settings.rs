use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::models::{AppConfig, PersistedAppConfig};

pub struct SettingsManager {
    path: PathBuf,
    data: RwLock<PersistedAppConfig>,
}

impl SettingsManager {
    pub async fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let initial = match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => {
                serde_json::from_slice::<PersistedAppConfig>(&bytes).unwrap_or_default()
            }
            _ => {
                let default = PersistedAppConfig::default();
                let json = serde_json::to_string_pretty(&default)?;
                tokio::fs::write(&path, json).await?;
                default
            }
        };

        Ok(Self {
            path,
            data: RwLock::new(initial),
        })
    }

    pub async fn get(&self) -> PersistedAppConfig {
        self.data.read().await.clone()
    }

    pub async fn update(&self, update: AppConfig) -> Result<PersistedAppConfig> {
        let mut config = self.data.write().await;

        if let Some(assistant) = update.assistant_config {
            config.assistant_config = assistant;
        }
        if let Some(emotion) = update.emotion_config {
            config.emotion_config = emotion;
        }
        if let Some(threshold) = update.alert_threshold_millis {
            config.alert_threshold_millis = threshold;
        }
        if let Some(rules) = update.aggregation_rules {
            config.aggregation_rules = rules;
        }
        if let Some(rules) = update.category_rules {
            config.category_rules = rules;
        }
        if let Some(logger) = update.logger_settings {
            config.logger_settings = logger;
        }

        self.save(&config).await?;
        Ok(config.clone())
    }

    async fn save(&self, config: &PersistedAppConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
