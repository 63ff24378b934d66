//! 报告导出模块
//!
//! 将分析结果渲染为 Markdown / HTML / JSON 并写入报告目录。
//! 像素级的 PNG/PDF 截图导出由前端完成，Rust 侧只负责结构化格式

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;
use uuid::Uuid;

use crate::analysis::{Category, LineStyle};
use crate::models::{AnalysisOutcome, ExportFormat};

/// 报告导出器
pub struct ReportExporter {
    /// 报告输出目录
    output_dir: PathBuf,
}

impl ReportExporter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// 当前输出目录
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 导出分析结果
    ///
    /// 文件名带时间戳和短随机后缀，避免同一分钟内多次导出互相覆盖；
    /// 先写临时文件再重命名，失败时不会留下半成品
    pub async fn export(
        &self,
        outcome: &AnalysisOutcome,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("创建报告目录失败: {}", self.output_dir.display()))?;

        let content = match format {
            ExportFormat::Markdown => render_markdown(outcome),
            ExportFormat::Html => render_html(outcome),
            ExportFormat::Json => serde_json::to_string_pretty(outcome)?,
        };

        let suffix = Uuid::new_v4().simple().to_string();
        let file_name = format!(
            "label_analysis_{}_{}.{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            &suffix[..8],
            format.extension()
        );

        let final_path = self.output_dir.join(&file_name);
        let tmp_path = self.output_dir.join(format!(".{}.tmp", file_name));

        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &final_path).await?;

        info!("报告已导出: {}", final_path.display());
        Ok(final_path)
    }
}

/// 渲染Markdown报告
fn render_markdown(outcome: &AnalysisOutcome) -> String {
    let mut out = String::new();
    out.push_str("# 成分分析报告\n\n");
    out.push_str(&format!(
        "- 产品类型: {}\n- 分析时间: {}\n\n",
        outcome.product_type.to_chinese(),
        outcome.analyzed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    ));

    let counts = &outcome.report.counts;
    out.push_str(&format!(
        "| 有益 | 中性 | 警惕 |\n| --- | --- | --- |\n| {} | {} | {} |\n\n",
        counts.good, counts.neutral, counts.caution
    ));

    for line in &outcome.report.lines {
        match &line.style {
            LineStyle::Header(_) => out.push_str(&format!("\n**{}**\n\n", line.text)),
            LineStyle::Plain => out.push_str(&format!("- {}\n", line.text)),
        }
    }

    out
}

/// 渲染HTML报告
fn render_html(outcome: &AnalysisOutcome) -> String {
    let counts = &outcome.report.counts;
    let mut body = String::new();

    for line in &outcome.report.lines {
        let text = escape_html(&line.text);
        match &line.style {
            LineStyle::Header(Some(Category::Beneficial)) => {
                body.push_str(&format!("<li><strong class=\"text-beneficial\">{}</strong></li>\n", text));
            }
            LineStyle::Header(Some(Category::Neutral)) => {
                body.push_str(&format!("<li><strong class=\"text-neutral\">{}</strong></li>\n", text));
            }
            LineStyle::Header(Some(Category::Caution)) => {
                body.push_str(&format!("<li><strong class=\"text-caution\">{}</strong></li>\n", text));
            }
            LineStyle::Header(None) => {
                body.push_str(&format!("<li><strong>{}</strong></li>\n", text));
            }
            LineStyle::Plain => body.push_str(&format!("<li>{}</li>\n", text)),
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head><meta charset="utf-8"><title>成分分析报告</title></head>
<body>
<h1>成分分析报告</h1>
<p>产品类型: {} | 有益 {} / 中性 {} / 警惕 {}</p>
<ul>
{}</ul>
</body>
</html>
"#,
        outcome.product_type.to_chinese(),
        counts.good,
        counts.neutral,
        counts.caution,
        body
    )
}

/// 最小HTML转义
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ChartSpec, Interpreter};
    use crate::models::ProductType;
    use chrono::Utc;

    fn sample_outcome() -> AnalysisOutcome {
        let raw = "Beneficial Ingredients ✅:\n* Niacinamide\nHarmful Ingredients ❌:\n- Paraben";
        let report = Interpreter::default().interpret(raw).unwrap();
        let chart = ChartSpec::from_counts(&report.counts);
        AnalysisOutcome {
            raw_text: raw.to_string(),
            report,
            chart,
            product_type: ProductType::Skincare,
            analyzed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_export_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ReportExporter::new(dir.path().to_path_buf());

        let path = exporter
            .export(&sample_outcome(), ExportFormat::Markdown)
            .await
            .unwrap();

        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# 成分分析报告"));
        assert!(content.contains("**Beneficial Ingredients ✅:**"));
        assert!(content.contains("- Niacinamide"));
        // 临时文件不应残留
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_export_html_escapes_and_tags() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ReportExporter::new(dir.path().to_path_buf());

        let path = exporter
            .export(&sample_outcome(), ExportFormat::Html)
            .await
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("text-beneficial"));
        assert!(content.contains("text-caution"));
        assert!(content.contains("<li>Niacinamide</li>"));
    }

    #[tokio::test]
    async fn test_export_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ReportExporter::new(dir.path().to_path_buf());

        let outcome = sample_outcome();
        let path = exporter
            .export(&outcome, ExportFormat::Json)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: AnalysisOutcome = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.report.counts, outcome.report.counts);
    }

    #[tokio::test]
    async fn test_export_names_unique() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ReportExporter::new(dir.path().to_path_buf());
        let outcome = sample_outcome();

        let first = exporter
            .export(&outcome, ExportFormat::Markdown)
            .await
            .unwrap();
        let second = exporter
            .export(&outcome, ExportFormat::Markdown)
            .await
            .unwrap();
        assert_ne!(first, second);
    }
}
