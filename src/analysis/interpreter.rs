// 分析文本解释器 - 将AI返回的半结构化文本解析为分类计数和可渲染行
//
// 分析服务返回的是松散格式的自然语言文本，大致包含四个小节：
//   Beneficial Ingredients ✅: / Harmful Ingredients ❌: /
//   Neutral/Conditional Ingredients ⚠️: / Suitability Recommendation 🎯:
// 小节顺序不保证，任意子集可能缺失。解释器是纯函数：相同输入必得相同输出。

use anyhow::{anyhow, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 成分类别
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 有益成分
    Beneficial,
    /// 中性/条件性成分
    Neutral,
    /// 需警惕成分
    Caution,
}

/// 各类别的成分计数
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// 有益成分数量
    pub good: usize,
    /// 中性成分数量
    pub neutral: usize,
    /// 需警惕成分数量
    pub caution: usize,
}

impl CategoryCounts {
    /// 三个计数是否全部为零（解析质量信号）
    pub fn is_empty(&self) -> bool {
        self.good == 0 && self.neutral == 0 && self.caution == 0
    }
}

/// 行样式 - 前端据此决定普通渲染还是强调渲染
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "category")]
pub enum LineStyle {
    /// 普通文本行
    Plain,
    /// 小节标题行；类别为None表示无类别标题（如适用性建议）
    Header(Option<Category>),
}

/// 可渲染的报告行
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// 行文本（已去除行首的 `* ` / `- ` 标记）
    pub text: String,
    /// 行样式
    pub style: LineStyle,
}

/// 解析结果 - 计数与可渲染行派生自同一份输入快照
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// 各类别计数
    pub counts: CategoryCounts,
    /// 可渲染行
    pub lines: Vec<ReportLine>,
}

/// 所有小节计数均为零时的处理策略
///
/// 原始实现只打印警告并照常返回零计数；这里把该决定显式化为可配置项
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroMatchPolicy {
    /// 记录解析质量警告，返回零计数（默认）
    #[default]
    Warn,
    /// 视为错误返回给调用方
    Error,
}

/// 小节识别规则：正则模式到类别的映射
///
/// 标题措辞容易被AI改写，识别规则做成数据表，扩充措辞无需改动计数/格式化逻辑
struct HeaderRule {
    /// 匹配小节标题的正则（不区分大小写，emoji和冒号前空白可选）
    pattern: Regex,
    /// 标题对应的类别；None表示仅强调、不参与计数（适用性建议）
    category: Option<Category>,
}

/// 分析文本解释器
pub struct Interpreter {
    rules: Vec<HeaderRule>,
    /// 小节边界：下一个已识别标题关键词或编号列表项（行首）
    boundary: Regex,
    policy: ZeroMatchPolicy,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(ZeroMatchPolicy::default())
    }
}

impl Interpreter {
    /// 创建解释器（内置默认识别规则）
    pub fn new(policy: ZeroMatchPolicy) -> Self {
        // 正则均为字面常量，编译失败属于编程错误，由单元测试兜底
        let rules = vec![
            HeaderRule {
                pattern: Regex::new(r"(?i)beneficial\s+ingredients\s*✅?\s*:").unwrap(),
                category: Some(Category::Beneficial),
            },
            HeaderRule {
                pattern: Regex::new(r"(?i)harmful\s+ingredients\s*❌?\s*:").unwrap(),
                category: Some(Category::Caution),
            },
            HeaderRule {
                pattern: Regex::new(r"(?i)neutral(?:.+)ingredients\s*⚠?️?\s*:").unwrap(),
                category: Some(Category::Neutral),
            },
            HeaderRule {
                pattern: Regex::new(r"(?i)suitability\s+recommendation\s*🎯?\s*:").unwrap(),
                category: None,
            },
        ];

        let boundary =
            Regex::new(r"(?im)^\s*(\d+\.|beneficial|harmful|neutral|suitability)").unwrap();

        Self {
            rules,
            boundary,
            policy,
        }
    }

    /// 解析分析文本，产出计数与可渲染行
    ///
    /// 小节缺失或格式异常时对应计数退化为0，默认策略下不会返回错误
    pub fn interpret(&self, text: &str) -> Result<AnalysisReport> {
        let counts = self.count_categories(text)?;
        let lines = self.render_lines(text);
        Ok(AnalysisReport { counts, lines })
    }

    /// 统计各小节的列表项数量
    fn count_categories(&self, text: &str) -> Result<CategoryCounts> {
        let mut counts = CategoryCounts::default();

        for rule in &self.rules {
            let Some(category) = rule.category else {
                continue;
            };

            let count = self.count_section(text, &rule.pattern);
            match category {
                Category::Beneficial => counts.good = count,
                Category::Neutral => counts.neutral = count,
                Category::Caution => counts.caution = count,
            }
        }

        if counts.is_empty() {
            match self.policy {
                ZeroMatchPolicy::Warn => {
                    warn!("未能从分析文本中解析出任何成分计数，请检查返回格式");
                }
                ZeroMatchPolicy::Error => {
                    return Err(anyhow!("分析文本中未识别到任何成分小节"));
                }
            }
        }

        Ok(counts)
    }

    /// 统计单个小节内的列表项数量
    ///
    /// regex crate 不支持前瞻，小节范围用独立的边界正则确定：
    /// 从标题结束处到下一个已识别标题/编号列表项/文本末尾
    fn count_section(&self, text: &str, header: &Regex) -> usize {
        let Some(m) = header.find(text) else {
            return 0;
        };

        let rest = &text[m.end()..];
        let span = match self.boundary.find(rest) {
            Some(b) => &rest[..b.start()],
            None => rest,
        };

        span.lines()
            .filter(|line| {
                let trimmed = line.trim_start();
                trimmed.starts_with('*') || trimmed.starts_with('-')
            })
            .count()
    }

    /// 生成可渲染行：去空行、剥离行首列表标记、标注标题行
    fn render_lines(&self, text: &str) -> Vec<ReportLine> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                if let Some(rule) = self.rules.iter().find(|r| r.pattern.is_match(line)) {
                    return ReportLine {
                        text: line.to_string(),
                        style: LineStyle::Header(rule.category),
                    };
                }

                let text = if line.starts_with("* ") || line.starts_with("- ") {
                    line[2..].to_string()
                } else {
                    line.to_string()
                };

                ReportLine {
                    text,
                    style: LineStyle::Plain,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(text: &str) -> AnalysisReport {
        Interpreter::default().interpret(text).unwrap()
    }

    #[test]
    fn test_counts_basic_sections() {
        let report = interpret(
            "Beneficial Ingredients ✅:\n* A\n* B\nHarmful Ingredients ❌:\n- C",
        );
        assert_eq!(report.counts.good, 2);
        assert_eq!(report.counts.caution, 1);
        assert_eq!(report.counts.neutral, 0);
    }

    #[test]
    fn test_no_sections_returns_zero_counts() {
        let report = interpret("这是一段与成分无关的文本\n没有任何小节标题");
        assert!(report.counts.is_empty());
        // 非空行仍然进入可渲染输出
        assert_eq!(report.lines.len(), 2);
    }

    #[test]
    fn test_zero_match_policy_error() {
        let strict = Interpreter::new(ZeroMatchPolicy::Error);
        assert!(strict.interpret("无任何小节").is_err());
    }

    #[test]
    fn test_case_insensitive_headers() {
        let upper = interpret("HARMFUL INGREDIENTS ❌:\n* Alcohol");
        let lower = interpret("Harmful Ingredients ❌:\n* Alcohol");
        assert_eq!(upper.counts, lower.counts);
        assert_eq!(upper.counts.caution, 1);
    }

    #[test]
    fn test_header_without_emoji() {
        let report = interpret("Beneficial Ingredients:\n* Niacinamide");
        assert_eq!(report.counts.good, 1);
    }

    #[test]
    fn test_mixed_bullet_styles() {
        let report = interpret("Beneficial Ingredients ✅:\n* A\n- B");
        assert_eq!(report.counts.good, 2);
    }

    #[test]
    fn test_section_stops_at_numbered_marker() {
        let report = interpret("Beneficial Ingredients ✅:\n* A\n1. 其他内容\n* 不应计入");
        assert_eq!(report.counts.good, 1);
    }

    #[test]
    fn test_determinism() {
        let text = "Beneficial Ingredients ✅:\n* A\nNeutral/Conditional Ingredients ⚠️:\n- B";
        let first = interpret(text);
        let second = interpret(text);
        assert_eq!(first.counts, second.counts);
        assert_eq!(first.lines, second.lines);
    }

    #[test]
    fn test_bullet_stripping() {
        let report = interpret("* Retinol\nRetinol");
        assert_eq!(report.lines[0].text, "Retinol");
        assert_eq!(report.lines[1].text, "Retinol");
        assert_eq!(report.lines[0].style, LineStyle::Plain);
    }

    #[test]
    fn test_header_line_stays_emphasized() {
        let report = interpret("Harmful Ingredients ❌:\n* Paraben");
        assert_eq!(
            report.lines[0].style,
            LineStyle::Header(Some(Category::Caution))
        );
        assert_eq!(report.lines[0].text, "Harmful Ingredients ❌:");
    }

    #[test]
    fn test_full_report_parse() {
        let text = "Beneficial Ingredients ✅:\n* Niacinamide\n* Glycerin\nNeutral/Conditional Ingredients ⚠️:\n- Fragrance\nSuitability Recommendation 🎯: Suitable for dry skin.";
        let report = interpret(text);

        assert_eq!(report.counts.good, 2);
        assert_eq!(report.counts.neutral, 1);
        assert_eq!(report.counts.caution, 0);

        assert_eq!(
            report.lines[0].style,
            LineStyle::Header(Some(Category::Beneficial))
        );
        assert_eq!(report.lines[1].text, "Niacinamide");
        assert_eq!(report.lines[2].text, "Glycerin");
        assert_eq!(
            report.lines[3].style,
            LineStyle::Header(Some(Category::Neutral))
        );
        assert_eq!(report.lines[4].text, "Fragrance");
        // 适用性建议行原样保留并作为无类别标题强调
        assert_eq!(report.lines[5].style, LineStyle::Header(None));
        assert!(report.lines[5].text.contains("Suitable for dry skin."));
    }

    #[test]
    fn test_blank_lines_discarded() {
        let report = interpret("Beneficial Ingredients ✅:\n\n* A\n\n\n* B\n");
        assert_eq!(report.counts.good, 2);
        assert_eq!(report.lines.len(), 3);
    }

    #[test]
    fn test_sections_in_any_order() {
        let report = interpret(
            "Neutral/Conditional Ingredients ⚠️:\n- Fragrance\nBeneficial Ingredients ✅:\n* Glycerin",
        );
        assert_eq!(report.counts.neutral, 1);
        assert_eq!(report.counts.good, 1);
    }
}
