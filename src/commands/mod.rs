//! Tauri 命令模块
//!
//! 提供前端调用的所有 Tauri 命令接口，按功能分组：
//! - analysis: 成分提取与分析命令
//! - config: 配置管理命令
//! - export: 报告导出命令
//! - system: 系统状态命令

pub mod analysis;
pub mod config;
pub mod export;
pub mod system;

// 重新导出所有命令
pub use analysis::*;
pub use config::*;
pub use export::*;
pub use system::*;
