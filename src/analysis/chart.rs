// 图表描述构建 - 为前端生成环形图数据
//
// 每次分析生成一个全新的自有值，前端收到后销毁旧图表实例并整体替换，
// Rust侧不保留任何图表状态

use serde::{Deserialize, Serialize};

use super::interpreter::CategoryCounts;

/// 环形图数据集描述
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartSpec {
    /// 图表类型（固定为doughnut）
    pub chart_type: String,
    /// 分类标签
    pub labels: Vec<String>,
    /// 与标签一一对应的计数
    pub data: Vec<usize>,
    /// 各分类的填充色
    pub background_color: Vec<String>,
    /// 中心镂空比例
    pub cutout: String,
}

impl ChartSpec {
    /// 由分类计数构建图表描述
    pub fn from_counts(counts: &CategoryCounts) -> Self {
        Self {
            chart_type: "doughnut".to_string(),
            labels: vec![
                "Beneficial".to_string(),
                "Neutral".to_string(),
                "Caution".to_string(),
            ],
            data: vec![counts.good, counts.neutral, counts.caution],
            background_color: vec![
                "#4CAF50".to_string(),
                "#FFC107".to_string(),
                "#F44336".to_string(),
            ],
            cutout: "70%".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_spec_from_counts() {
        let counts = CategoryCounts {
            good: 2,
            neutral: 1,
            caution: 0,
        };
        let spec = ChartSpec::from_counts(&counts);

        assert_eq!(spec.chart_type, "doughnut");
        assert_eq!(spec.data, vec![2, 1, 0]);
        assert_eq!(spec.labels.len(), spec.background_color.len());
        assert_eq!(spec.labels.len(), spec.data.len());
    }

    #[test]
    fn test_chart_spec_is_fresh_value() {
        let counts = CategoryCounts::default();
        let first = ChartSpec::from_counts(&counts);
        let second = ChartSpec::from_counts(&counts);
        // 两次构建互不共享状态
        assert_eq!(first.data, second.data);
    }
}
