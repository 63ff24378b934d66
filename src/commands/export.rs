//! 报告导出命令

use crate::event_bus::AppEvent;
use crate::models::{AnalysisOutcome, ExportFormat};
use crate::utils::{open_folder_in_explorer, open_log_folder_impl};
use crate::AppState;
use tracing::info;

/// 导出分析报告
///
/// 未指定格式时使用设置中的默认导出格式
#[tauri::command]
pub async fn export_report(
    state: tauri::State<'_, AppState>,
    outcome: AnalysisOutcome,
    format: Option<ExportFormat>,
) -> Result<String, String> {
    let format = match format {
        Some(f) => f,
        None => {
            state
                .report_domain
                .get_settings()
                .get()
                .await
                .export_settings
                .default_format
        }
    };

    let path = state
        .report_domain
        .get_exporter()
        .export(&outcome, format)
        .await
        .map_err(|e| format!("导出报告失败: {}", e))?;

    state.event_bus.publish(AppEvent::ReportExported {
        path: path.clone(),
    });

    Ok(path.to_string_lossy().to_string())
}

/// 打开报告文件夹
#[tauri::command]
pub async fn open_report_folder(state: tauri::State<'_, AppState>) -> Result<(), String> {
    let dir = state.report_domain.get_exporter().output_dir().to_path_buf();
    info!("打开报告文件夹: {:?}", dir);
    open_folder_in_explorer(&dir)
}

/// 打开日志文件夹
#[tauri::command]
pub async fn open_log_folder() -> Result<(), String> {
    open_log_folder_impl()
}
