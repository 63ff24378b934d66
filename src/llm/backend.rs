// 自托管后端提供商实现 - 调用 /extract 与 /analyze 两个HTTP接口
//
// 接口契约：
//   POST /extract  multipart(image, product_type) -> {"ingredients": "...", "warning": "..."}
//   POST /analyze  json {"ingredients", "product_type"} -> {"result": "<分析文本>"}

use super::plugin::*;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use tracing::{debug, info};

/// 自托管后端提供商
pub struct BackendProvider {
    client: Client,
    base_url: String,
}

impl BackendProvider {
    /// 创建新的后端提供商（接受共享的HTTP客户端以复用连接池）
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: "http://localhost:8000".to_string(),
        }
    }

    /// 设置后端地址
    pub fn set_base_url(&mut self, base_url: String) {
        self.base_url = base_url.trim_end_matches('/').to_string();
    }
}

#[async_trait]
impl LLMProvider for BackendProvider {
    fn as_any(&mut self) -> &mut dyn std::any::Any {
        self
    }

    async fn extract_ingredients(
        &self,
        image_path: &str,
        product_type: ProductType,
    ) -> Result<ExtractionResult> {
        let path = Path::new(image_path);
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("无效的图片路径: {}", image_path))?
            .to_string();

        let image_bytes = tokio::fs::read(image_path).await?;

        let form = multipart::Form::new()
            .text("product_type", product_type.as_str().to_string())
            .part(
                "image",
                multipart::Part::bytes(image_bytes).file_name(file_name),
            );

        let endpoint = format!("{}/extract", self.base_url);
        debug!("调用后端提取接口: {}", endpoint);

        let response = self.client.post(&endpoint).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response
                .json::<BackendError>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            return Err(anyhow::anyhow!("后端提取接口调用失败: {}", error));
        }

        let data: ExtractResponse = response.json().await?;
        info!(
            "后端提取完成: {} 字符, warning={:?}",
            data.ingredients.as_deref().map(str::len).unwrap_or(0),
            data.warning
        );

        Ok(ExtractionResult {
            ingredients: data.ingredients.unwrap_or_default(),
            warning: data.warning,
        })
    }

    async fn analyze_ingredients(
        &self,
        ingredients: &str,
        product_type: ProductType,
    ) -> Result<String> {
        let endpoint = format!("{}/analyze", self.base_url);
        debug!("调用后端分析接口: {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&json!({
                "ingredients": ingredients,
                "product_type": product_type.as_str()
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            // 分析接口的错误信息放在 result 字段里
            let error = response
                .json::<AnalyzeResponse>()
                .await
                .map(|e| e.result)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            return Err(anyhow::anyhow!("后端分析接口调用失败: {}", error));
        }

        let data: AnalyzeResponse = response.json().await?;
        Ok(data.result)
    }

    fn name(&self) -> &str {
        "backend"
    }

    fn configure(&mut self, config: serde_json::Value) -> Result<()> {
        if let Some(base_url) = config.get("base_url").and_then(|v| v.as_str()) {
            if !base_url.is_empty() {
                self.set_base_url(base_url.to_string());
            }
        }

        info!("Backend provider已配置: base_url={}", self.base_url);
        Ok(())
    }

    // 后端自带默认地址，无需额外配置即可使用
    fn is_configured(&self) -> bool {
        true
    }
}

/// /extract 响应
#[derive(Debug, Deserialize)]
struct ExtractResponse {
    ingredients: Option<String>,
    warning: Option<String>,
}

/// /analyze 响应
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    result: String,
}

/// 后端错误响应
#[derive(Debug, Deserialize)]
struct BackendError {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract_response() {
        let ok: ExtractResponse =
            serde_json::from_str(r#"{"ingredients": "Aqua, Glycerin"}"#).unwrap();
        assert_eq!(ok.ingredients.as_deref(), Some("Aqua, Glycerin"));
        assert!(ok.warning.is_none());

        let warned: ExtractResponse = serde_json::from_str(
            r#"{"ingredients": null, "warning": "Could not extract any ingredients"}"#,
        )
        .unwrap();
        assert!(warned.ingredients.is_none());
        assert!(warned.warning.is_some());
    }

    #[test]
    fn test_parse_analyze_response() {
        let data: AnalyzeResponse =
            serde_json::from_str(r#"{"result": "Beneficial Ingredients ✅:\n* A"}"#).unwrap();
        assert!(data.result.starts_with("Beneficial"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let mut provider = BackendProvider::new(Client::new());
        provider.set_base_url("http://127.0.0.1:9000/".to_string());
        assert_eq!(provider.base_url, "http://127.0.0.1:9000");
    }
}
