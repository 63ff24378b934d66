// 成分标签分析器 - Tauri应用主库

// 声明模块
pub mod actors;
pub mod analysis;
pub mod commands;
pub mod domains;
pub mod event_bus;
pub mod export;
pub mod llm;
pub mod logger;
pub mod models;
pub mod settings;
pub mod utils;

mod app;

use std::sync::Arc;

use domains::{AnalysisDomain, ReportDomain, SystemDomain};
use event_bus::EventBus;

pub use app::run;

/// 应用状态（按领域分组）
///
/// 将应用的共享组件重组为3个领域管理器，实现单一职责原则
/// - 分析领域：负责LLM调用与分析文本解析
/// - 报告领域：负责报告导出和设置管理
/// - 系统领域：负责系统状态、日志和基础设施
/// - 事件总线：用于领域间解耦通信
#[derive(Clone)]
pub struct AppState {
    /// 分析领域管理器
    pub analysis_domain: Arc<AnalysisDomain>,
    /// 报告领域管理器
    pub report_domain: Arc<ReportDomain>,
    /// 系统领域管理器
    pub system_domain: Arc<SystemDomain>,
    /// 事件总线
    pub event_bus: Arc<EventBus>,
}
