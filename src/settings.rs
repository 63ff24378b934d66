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

        if let Some(provider) = update.llm_provider {
            config.llm_provider = provider;
        }
        if let Some(product_type) = update.default_product_type {
            config.default_product_type = product_type;
        }
        if let Some(llm) = update.llm_config {
            config.llm_config = Some(llm);
        }
        if let Some(analysis) = update.analysis_settings {
            config.analysis_settings = analysis;
        }
        if let Some(export) = update.export_settings {
            config.export_settings = export;
        }
        if let Some(ui) = update.ui_settings {
            config.ui_settings = Some(ui);
        }
        if let Some(logger) = update.logger_settings {
            config.logger_settings = Some(logger);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExportFormat, ExportSettings, ProductType};

    #[tokio::test]
    async fn test_settings_create_and_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let manager = SettingsManager::new(path.clone()).await.unwrap();
        assert_eq!(manager.get().await.llm_provider, "qwen");

        let updated = manager
            .update(AppConfig {
                llm_provider: Some("backend".to_string()),
                default_product_type: Some(ProductType::Haircare),
                llm_config: None,
                analysis_settings: None,
                export_settings: Some(ExportSettings {
                    default_format: ExportFormat::Html,
                    output_dir: None,
                }),
                ui_settings: None,
                logger_settings: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.llm_provider, "backend");
        assert_eq!(updated.default_product_type, ProductType::Haircare);

        // 重新加载应读到已持久化的修改
        let reloaded = SettingsManager::new(path).await.unwrap();
        let config = reloaded.get().await;
        assert_eq!(config.llm_provider, "backend");
        assert_eq!(config.export_settings.default_format, ExportFormat::Html);
    }
}
