// LLM模块 - 管理AI提取与分析服务

pub mod backend;
pub mod plugin;
pub mod qwen;

pub use backend::BackendProvider;
pub use plugin::{ExtractionResult, LLMProvider, ProductType, ProviderCapabilities};
pub use qwen::QwenProvider;

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// LLM管理器
pub struct LLMManager {
    /// 当前使用的提供商
    provider: Box<dyn LLMProvider>,
    /// 配置锁
    config_lock: Arc<RwLock<LLMConfig>>,
    /// HTTP 客户端（用于重建 provider）
    http_client: reqwest::Client,
}

/// LLM配置
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMConfig {
    /// 当前使用的 provider: "qwen" 或 "backend"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Qwen配置
    #[serde(default)]
    pub qwen: QwenConfig,
    /// 自托管后端配置
    #[serde(default)]
    pub backend: BackendConfig,
    /// 请求策略
    #[serde(default)]
    pub request_policy: RequestPolicy,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            qwen: QwenConfig::default(),
            backend: BackendConfig::default(),
            request_policy: RequestPolicy::default(),
        }
    }
}

fn default_provider() -> String {
    "qwen".to_string()
}

/// Qwen配置
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QwenConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 图片最长边上限（像素）
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
}

impl Default for QwenConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            max_image_dimension: default_max_image_dimension(),
        }
    }
}

fn default_model() -> String {
    "qwen-vl-max-latest".to_string()
}

fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions".to_string()
}

fn default_max_image_dimension() -> u32 {
    1600
}

/// 自托管后端配置
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

/// 请求策略 - 网络层的超时与重试是显式决定，不再沿用"无策略"的默认
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct RequestPolicy {
    /// 单次请求超时（秒）
    pub timeout_secs: u64,
    /// 最大尝试次数（含首次）
    pub max_retries: u32,
    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            max_retries: 3,
            retry_delay_ms: 1500,
        }
    }
}

impl LLMManager {
    /// 创建新的LLM管理器（接受共享的HTTP客户端以复用连接池）
    pub fn new(client: reqwest::Client) -> Self {
        // 默认使用 Qwen provider
        let provider: Box<dyn LLMProvider> = Box::new(QwenProvider::new(client.clone()));

        Self {
            provider,
            config_lock: Arc::new(RwLock::new(LLMConfig::default())),
            http_client: client,
        }
    }

    /// 获取当前配置
    pub async fn get_config(&self) -> LLMConfig {
        self.config_lock.read().await.clone()
    }

    /// 配置当前 provider
    pub async fn configure(&mut self, config: LLMConfig) -> Result<()> {
        // provider 名称变化时先切换实例
        let current_name = self.provider.name().to_string();
        if current_name != config.provider {
            self.switch_provider(&config.provider).await?;
        }

        match config.provider.as_str() {
            "qwen" => {
                let provider_config = serde_json::to_value(&config.qwen)?;
                self.provider.configure(provider_config)?;
            }
            "backend" => {
                let provider_config = serde_json::to_value(&config.backend)?;
                self.provider.configure(provider_config)?;
            }
            other => {
                warn!("未知的 provider: {}", other);
            }
        }

        let mut current = self.config_lock.write().await;
        *current = config;
        info!("LLM配置已更新: provider={}", current.provider);

        Ok(())
    }

    /// 切换 provider
    pub async fn switch_provider(&mut self, provider_name: &str) -> Result<()> {
        if self.provider.name() == provider_name {
            info!("Provider 已经是 {}，无需切换", provider_name);
            return Ok(());
        }

        info!(
            "切换 LLM provider: {} -> {}",
            self.provider.name(),
            provider_name
        );

        match provider_name {
            "qwen" => {
                self.provider = Box::new(QwenProvider::new(self.http_client.clone()));
            }
            "backend" => {
                self.provider = Box::new(BackendProvider::new(self.http_client.clone()));
            }
            _ => {
                return Err(anyhow!("不支持的 provider: {}", provider_name));
            }
        }

        let mut config = self.config_lock.write().await;
        config.provider = provider_name.to_string();
        Ok(())
    }

    /// 检查当前 provider 是否已配置
    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// 从标签图片提取成分文本（带超时与重试）
    pub async fn extract_ingredients(
        &self,
        image_path: &str,
        product_type: ProductType,
    ) -> Result<ExtractionResult> {
        let policy = self.config_lock.read().await.request_policy;
        self.with_retry(&policy, "提取", || {
            self.provider.extract_ingredients(image_path, product_type)
        })
        .await
    }

    /// 分析成分文本，返回分析服务的原始响应（带超时与重试）
    pub async fn analyze_ingredients(
        &self,
        ingredients: &str,
        product_type: ProductType,
    ) -> Result<String> {
        let policy = self.config_lock.read().await.request_policy;
        self.with_retry(&policy, "分析", || {
            self.provider.analyze_ingredients(ingredients, product_type)
        })
        .await
    }

    /// 按请求策略执行操作：每次尝试独立超时，失败后等待固定间隔重试
    async fn with_retry<T, F, Fut>(
        &self,
        policy: &RequestPolicy,
        op_name: &str,
        operation: F,
    ) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let timeout = std::time::Duration::from_secs(policy.timeout_secs);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = match tokio::time::timeout(timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!("{}请求超时（{}秒）", op_name, policy.timeout_secs)),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt >= policy.max_retries {
                        return Err(e.context(format!("{}失败（已尝试 {} 次）", op_name, attempt)));
                    }
                    warn!(
                        "{}失败 (尝试 {}/{}): {}, 等待 {}ms 后重试...",
                        op_name, attempt, policy.max_retries, e, policy.retry_delay_ms
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(policy.retry_delay_ms))
                        .await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_switch_provider() {
        let mut manager = LLMManager::new(reqwest::Client::new());
        assert_eq!(manager.provider.name(), "qwen");

        manager.switch_provider("backend").await.unwrap();
        assert_eq!(manager.provider.name(), "backend");
        assert_eq!(manager.get_config().await.provider, "backend");

        assert!(manager.switch_provider("unknown").await.is_err());
    }

    #[tokio::test]
    async fn test_configure_applies_provider() {
        let mut manager = LLMManager::new(reqwest::Client::new());

        let mut config = LLMConfig::default();
        config.provider = "backend".to_string();
        config.backend.base_url = "http://127.0.0.1:9000".to_string();

        manager.configure(config).await.unwrap();
        assert_eq!(manager.provider.name(), "backend");
        // backend provider 无需密钥
        assert!(manager.is_configured());
    }

    #[test]
    fn test_request_policy_defaults() {
        let policy = RequestPolicy::default();
        assert_eq!(policy.timeout_secs, 120);
        assert_eq!(policy.max_retries, 3);
    }

    #[test]
    fn test_llm_config_deserialize_partial() {
        // 旧版设置文件缺少新字段时应回退默认值
        let config: LLMConfig = serde_json::from_str(r#"{"provider": "backend"}"#).unwrap();
        assert_eq!(config.provider, "backend");
        assert_eq!(config.request_policy.max_retries, 3);
        assert_eq!(config.qwen.model, "qwen-vl-max-latest");
    }
}
