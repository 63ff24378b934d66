// 领域模块 - 用于组织应用的业务逻辑
//
// 将应用状态按业务领域分组,实现单一职责原则
// 包含3个领域:分析、报告、系统

pub mod analysis;
pub mod report;
pub mod system;

pub use analysis::AnalysisDomain;
pub use report::ReportDomain;
pub use system::SystemDomain;
