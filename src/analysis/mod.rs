//! 分析模块
//!
//! 负责核心的成分分析业务逻辑，包括：
//! - 分析文本的解析（分类计数 + 可渲染行）
//! - 前端图表数据的构建

pub mod chart;
pub mod interpreter;

// 重新导出常用结构体和函数
pub use chart::ChartSpec;
pub use interpreter::{
    AnalysisReport, Category, CategoryCounts, Interpreter, LineStyle, ReportLine, ZeroMatchPolicy,
};
