// LLM插件系统 - 定义提供商接口和数据结构

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 产品类型 - 决定提取与分析提示词的侧重点
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// 护肤品
    Skincare,
    /// 洗护发产品
    Haircare,
    /// 彩妆
    Makeup,
    /// 其他
    Other,
}

impl Default for ProductType {
    fn default() -> Self {
        Self::Skincare
    }
}

impl ProductType {
    /// 提示词中使用的英文描述
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skincare => "skincare",
            Self::Haircare => "haircare",
            Self::Makeup => "makeup",
            Self::Other => "other",
        }
    }

    /// UI显示用的中文名称
    pub fn to_chinese(&self) -> &str {
        match self {
            Self::Skincare => "护肤品",
            Self::Haircare => "洗护发",
            Self::Makeup => "彩妆",
            Self::Other => "其他",
        }
    }
}

/// 提取结果
///
/// `ingredients` 为空且 `warning` 有值时，表示图片中没有可用的成分文字，
/// 调用方应将其作为前置条件失败处理，不得把占位文本送入分析
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// 识别出的成分文本
    pub ingredients: String,
    /// 提取质量警告（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ExtractionResult {
    /// 是否提取到了可分析的文本
    pub fn has_ingredients(&self) -> bool {
        !self.ingredients.trim().is_empty()
    }
}

/// LLM提供商接口
#[async_trait]
pub trait LLMProvider: Send + Sync + std::any::Any {
    /// 转换为Any trait（用于向下转型）
    fn as_any(&mut self) -> &mut dyn std::any::Any;

    /// 从产品标签图片中提取成分文本
    ///
    /// # 参数
    /// * `image_path` - 标签图片的文件路径
    /// * `product_type` - 产品类型
    ///
    /// # 返回
    /// * 提取结果（成分文本 + 可选警告）
    async fn extract_ingredients(
        &self,
        image_path: &str,
        product_type: ProductType,
    ) -> Result<ExtractionResult>;

    /// 分析成分文本，返回分析服务的原始响应文本
    ///
    /// # 参数
    /// * `ingredients` - 成分文本
    /// * `product_type` - 产品类型
    ///
    /// # 返回
    /// * 分析文本（由解释器进一步解析）
    async fn analyze_ingredients(
        &self,
        ingredients: &str,
        product_type: ProductType,
    ) -> Result<String>;

    /// 获取提供商名称
    fn name(&self) -> &str;

    /// 配置提供商
    ///
    /// # 参数
    /// * `config` - JSON格式的配置
    fn configure(&mut self, config: serde_json::Value) -> Result<()>;

    /// 检查提供商是否已配置
    fn is_configured(&self) -> bool;

    /// 获取支持的功能
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }
}

/// 提供商能力
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// 是否支持视觉提取
    pub vision_support: bool,
    /// 最大输入token数
    pub max_input_tokens: usize,
    /// 支持的图片格式
    pub supported_image_formats: Vec<String>,
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self {
            vision_support: true,
            max_input_tokens: 128000,
            supported_image_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// 构建成分提取提示词
pub(crate) fn build_extract_prompt(product_type: ProductType) -> String {
    format!(
        r#"You are reading the ingredient label of a {} product.
Transcribe the INCI ingredient list printed on the label, exactly as written.

Rules:
- Output ONLY the ingredient list, comma separated, nothing else
- Preserve the original ingredient names and order
- If no ingredient list is visible in the image, output exactly: NO_INGREDIENTS_FOUND"#,
        product_type.as_str()
    )
}

/// 构建成分分析提示词
///
/// 输出格式必须与解释器识别的小节标题保持一致
pub(crate) fn build_analyze_prompt(ingredients: &str, product_type: ProductType) -> String {
    format!(
        r#"Analyze the following {} product ingredients for a general consumer.

Ingredients:
{}

Respond in EXACTLY this format, using these four section headers:

Beneficial Ingredients ✅:
* <ingredient> - <one short sentence>

Harmful Ingredients ❌:
* <ingredient> - <one short sentence>

Neutral/Conditional Ingredients ⚠️:
* <ingredient> - <one short sentence>

Suitability Recommendation 🎯: <one or two sentences on which skin/hair types this product suits>

Rules:
- Every ingredient line starts with "* "
- Omit bullet lines for a section with no matching ingredients, but keep the header
- Do not add any other sections or commentary"#,
        product_type.as_str(),
        ingredients.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_serde() {
        let json = serde_json::to_string(&ProductType::Skincare).unwrap();
        assert_eq!(json, "\"skincare\"");

        let back: ProductType = serde_json::from_str("\"haircare\"").unwrap();
        assert_eq!(back, ProductType::Haircare);
    }

    #[test]
    fn test_extraction_result_has_ingredients() {
        let empty = ExtractionResult {
            ingredients: "   ".to_string(),
            warning: Some("未识别到文字".to_string()),
        };
        assert!(!empty.has_ingredients());

        let ok = ExtractionResult {
            ingredients: "Aqua, Glycerin".to_string(),
            warning: None,
        };
        assert!(ok.has_ingredients());
    }

    #[test]
    fn test_analyze_prompt_contains_section_headers() {
        let prompt = build_analyze_prompt("Aqua, Glycerin", ProductType::Skincare);
        assert!(prompt.contains("Beneficial Ingredients ✅:"));
        assert!(prompt.contains("Harmful Ingredients ❌:"));
        assert!(prompt.contains("Neutral/Conditional Ingredients ⚠️:"));
        assert!(prompt.contains("Suitability Recommendation 🎯:"));
        assert!(prompt.contains("Aqua, Glycerin"));
    }
}
