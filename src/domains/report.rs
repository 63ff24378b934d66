// 报告领域管理器
//
// 负责报告导出和设置管理相关的功能
// 包含 ReportExporter 和 SettingsManager 两个核心组件

use crate::export::ReportExporter;
use crate::settings::SettingsManager;
use std::sync::Arc;

/// 报告领域管理器 - 负责报告导出和设置
#[derive(Clone)]
pub struct ReportDomain {
    exporter: Arc<ReportExporter>,
    settings: Arc<SettingsManager>,
}

impl ReportDomain {
    /// 创建新的报告领域管理器
    pub fn new(exporter: Arc<ReportExporter>, settings: Arc<SettingsManager>) -> Self {
        Self { exporter, settings }
    }

    /// 获取报告导出器
    pub fn get_exporter(&self) -> &Arc<ReportExporter> {
        &self.exporter
    }

    /// 获取设置管理器
    pub fn get_settings(&self) -> &Arc<SettingsManager> {
        &self.settings
    }
}
