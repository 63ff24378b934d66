// 阿里通义千问提供商实现 - 通过OpenAI兼容接口直接调用视觉模型
//
// 提取与分析共用同一个chat completions端点：
// 提取请求携带标签图片（base64），分析请求只携带成分文本

use super::plugin::*;
use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

/// 标签照片送入模型前的最长边上限（像素）
const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 1600;

/// Qwen提供商（阿里通义千问）
pub struct QwenProvider {
    api_key: Option<String>,
    model: String,
    client: Client,
    base_url: String,
    /// 图片最长边上限，超出则先缩放再编码
    max_image_dimension: u32,
}

impl QwenProvider {
    /// 创建新的Qwen提供商（接受共享的HTTP客户端以复用连接池）
    pub fn new(client: Client) -> Self {
        Self {
            api_key: None,
            model: "qwen-vl-max-latest".to_string(),
            client,
            base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions"
                .to_string(),
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
        }
    }

    /// 设置API密钥
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// 设置模型
    pub fn set_model(&mut self, model: String) {
        self.model = model;
    }

    /// 读取标签图片并转换为base64（JPEG编码）
    ///
    /// 手机拍摄的标签照片往往远超模型需要的分辨率，超出上限时先等比缩小
    async fn image_to_base64(&self, path: &str) -> Result<String> {
        let path = path.to_string();
        let max_dim = self.max_image_dimension;

        // image crate 是同步解码，放到阻塞线程中执行
        let jpeg_bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let img = image::open(&path)?;
            let img = if img.width().max(img.height()) > max_dim {
                img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            } else {
                img
            };

            let mut buf = std::io::Cursor::new(Vec::new());
            img.write_to(&mut buf, image::ImageOutputFormat::Jpeg(85))?;
            Ok(buf.into_inner())
        })
        .await??;

        Ok(general_purpose::STANDARD.encode(&jpeg_bytes))
    }

    /// 调用Qwen chat completions接口
    async fn call_qwen_api(&self, prompt: String, image_base64: Option<String>) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Qwen API key未配置"))?;

        let start_time = std::time::Instant::now();

        // 构建消息内容
        let mut content_parts = vec![];
        if let Some(base64) = image_base64 {
            content_parts.push(json!({
                "type": "image_url",
                "image_url": {
                    "url": format!("data:image/jpeg;base64,{}", base64)
                }
            }));
        }
        content_parts.push(json!({
            "type": "text",
            "text": prompt
        }));

        let request_body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": content_parts
                }
            ],
            "max_tokens": 2000,
            "temperature": 0.3
        });

        debug!(
            "调用Qwen API: model={}, base_url={}",
            self.model, self.base_url
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            // 4xx不重试，由上层的重试策略依据错误类型决定
            return Err(anyhow::anyhow!(
                "Qwen API调用失败 (status {}): {}",
                status.as_u16(),
                error_text
            ));
        }

        let response_data: QwenResponse = response.json().await?;

        if let Some(finish_reason) = response_data
            .choices
            .first()
            .and_then(|c| c.finish_reason.as_ref())
        {
            if finish_reason == "length" {
                warn!("LLM 响应因达到 token 限制而被截断 (finish_reason=length)");
            }
        }

        let content = response_data
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("Qwen响应中没有choices"))?;

        info!(
            "Qwen API调用完成，耗时 {}ms，返回 {} 字符",
            start_time.elapsed().as_millis(),
            content.len()
        );

        Ok(content)
    }
}

#[async_trait]
impl LLMProvider for QwenProvider {
    fn as_any(&mut self) -> &mut dyn std::any::Any {
        self
    }

    async fn extract_ingredients(
        &self,
        image_path: &str,
        product_type: ProductType,
    ) -> Result<ExtractionResult> {
        info!("Qwen提取成分: image={}", image_path);

        let base64 = self.image_to_base64(image_path).await?;
        let prompt = build_extract_prompt(product_type);
        let content = self.call_qwen_api(prompt, Some(base64)).await?;

        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.contains("NO_INGREDIENTS_FOUND") {
            return Ok(ExtractionResult {
                ingredients: String::new(),
                warning: Some("未能从图片中识别到成分列表".to_string()),
            });
        }

        Ok(ExtractionResult {
            ingredients: trimmed.to_string(),
            warning: None,
        })
    }

    async fn analyze_ingredients(
        &self,
        ingredients: &str,
        product_type: ProductType,
    ) -> Result<String> {
        info!(
            "Qwen分析成分: {} 字符, product_type={}",
            ingredients.len(),
            product_type.as_str()
        );

        let prompt = build_analyze_prompt(ingredients, product_type);
        self.call_qwen_api(prompt, None).await
    }

    fn name(&self) -> &str {
        "qwen"
    }

    fn configure(&mut self, config: serde_json::Value) -> Result<()> {
        if let Some(api_key) = config.get("api_key").and_then(|v| v.as_str()) {
            if !api_key.is_empty() {
                self.api_key = Some(api_key.to_string());
            }
        }
        if let Some(model) = config.get("model").and_then(|v| v.as_str()) {
            if !model.is_empty() {
                self.model = model.to_string();
            }
        }
        if let Some(base_url) = config.get("base_url").and_then(|v| v.as_str()) {
            if !base_url.is_empty() {
                self.base_url = base_url.to_string();
            }
        }
        if let Some(dim) = config.get("max_image_dimension").and_then(|v| v.as_u64()) {
            if dim > 0 {
                self.max_image_dimension = dim as u32;
            }
        }

        info!("Qwen provider已配置: model={}", self.model);
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Qwen API响应结构
#[derive(Debug, Deserialize)]
struct QwenResponse {
    choices: Vec<QwenChoice>,
}

#[derive(Debug, Deserialize)]
struct QwenChoice {
    message: QwenMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QwenMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qwen_response() {
        let json = r#"{
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "Beneficial Ingredients ✅:\n* Glycerin - humectant"
                    },
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 100, "completion_tokens": 20}
        }"#;

        let response: QwenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert!(response.choices[0].message.content.contains("Glycerin"));
        assert_eq!(
            response.choices[0].finish_reason.as_deref(),
            Some("stop")
        );
    }

    #[test]
    fn test_configure_updates_fields() {
        let mut provider = QwenProvider::new(Client::new());
        assert!(!provider.is_configured());

        provider
            .configure(serde_json::json!({
                "api_key": "sk-test",
                "model": "qwen-vl-plus",
                "max_image_dimension": 1200
            }))
            .unwrap();

        assert!(provider.is_configured());
        assert_eq!(provider.model, "qwen-vl-plus");
        assert_eq!(provider.max_image_dimension, 1200);
    }

    #[test]
    fn test_configure_ignores_empty_values() {
        let mut provider = QwenProvider::new(Client::new());
        provider
            .configure(serde_json::json!({"api_key": "", "model": ""}))
            .unwrap();

        assert!(!provider.is_configured());
        assert_eq!(provider.model, "qwen-vl-max-latest");
    }
}
