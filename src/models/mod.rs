// 数据模型模块 - 定义所有的数据结构

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 重新导出其他模块的类型
pub use crate::analysis::{AnalysisReport, CategoryCounts, ChartSpec, ReportLine};
pub use crate::llm::{ExtractionResult, ProductType};

/// 应用配置（部分更新，所有字段可选）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM提供商
    pub llm_provider: Option<String>,
    /// 默认产品类型
    pub default_product_type: Option<ProductType>,
    /// LLM配置
    pub llm_config: Option<crate::llm::LLMConfig>,
    /// 分析设置
    pub analysis_settings: Option<AnalysisSettings>,
    /// 导出设置
    pub export_settings: Option<ExportSettings>,
    /// UI设置
    pub ui_settings: Option<UISettings>,
    /// 日志设置
    pub logger_settings: Option<LoggerSettings>,
}

/// 持久化的应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedAppConfig {
    /// LLM提供商
    pub llm_provider: String,
    /// 默认产品类型
    #[serde(default)]
    pub default_product_type: ProductType,
    /// LLM配置
    pub llm_config: Option<crate::llm::LLMConfig>,
    /// 分析设置
    #[serde(default)]
    pub analysis_settings: AnalysisSettings,
    /// 导出设置
    #[serde(default)]
    pub export_settings: ExportSettings,
    /// UI设置
    pub ui_settings: Option<UISettings>,
    /// 日志设置
    pub logger_settings: Option<LoggerSettings>,
}

impl Default for PersistedAppConfig {
    fn default() -> Self {
        Self {
            llm_provider: "qwen".to_string(),
            default_product_type: ProductType::default(),
            llm_config: None,
            analysis_settings: AnalysisSettings::default(),
            export_settings: ExportSettings::default(),
            ui_settings: Some(UISettings::default()),
            logger_settings: Some(LoggerSettings::default()),
        }
    }
}

/// 分析设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// 严格解析：分析文本中一个小节都没识别到时按错误处理
    pub strict_parsing: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            strict_parsing: false,
        }
    }
}

/// 导出设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// 默认导出格式
    pub default_format: ExportFormat,
    /// 自定义导出目录（None时使用应用数据目录下的reports）
    pub output_dir: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Markdown,
            output_dir: None,
        }
    }
}

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Html,
    Json,
}

impl ExportFormat {
    /// 文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

/// UI设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UISettings {
    /// 主题（light/dark）
    pub theme: String,
    /// 语言
    pub language: String,
}

impl Default for UISettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            language: "zh-CN".to_string(),
        }
    }
}

/// 日志设置
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

/// 系统状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    /// 是否正在提取成分
    pub is_extracting: bool,
    /// 是否正在分析
    pub is_analyzing: bool,
    /// 最后提取时间
    pub last_extract_time: Option<DateTime<Utc>>,
    /// 最后分析时间
    pub last_analysis_time: Option<DateTime<Utc>>,
    /// 本次运行完成的分析次数
    pub analysis_count: u32,
    /// 错误信息
    pub last_error: Option<String>,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            is_extracting: false,
            is_analyzing: false,
            last_extract_time: None,
            last_analysis_time: None,
            analysis_count: 0,
            last_error: None,
        }
    }
}

/// 一次完整分析的产出 - 计数、图表与可渲染行均派生自同一份分析文本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// 分析服务返回的原始文本
    pub raw_text: String,
    /// 解析结果（计数 + 可渲染行）
    pub report: AnalysisReport,
    /// 图表描述
    pub chart: ChartSpec,
    /// 产品类型
    pub product_type: ProductType,
    /// 分析时间
    pub analyzed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_config_defaults() {
        let config = PersistedAppConfig::default();
        assert_eq!(config.llm_provider, "qwen");
        assert_eq!(config.default_product_type, ProductType::Skincare);
        assert_eq!(config.export_settings.default_format, ExportFormat::Markdown);
        assert!(!config.analysis_settings.strict_parsing);
    }

    #[test]
    fn test_persisted_config_tolerates_missing_fields() {
        // 旧版本的设置文件缺少新增字段时应能反序列化
        let json = r#"{"llm_provider": "backend", "llm_config": null, "ui_settings": null, "logger_settings": null}"#;
        let config: PersistedAppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.llm_provider, "backend");
        assert_eq!(config.default_product_type, ProductType::Skincare);
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Markdown.extension(), "md");
        assert_eq!(ExportFormat::Html.extension(), "html");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }
}
