//! 系统状态命令

use crate::models::SystemStatus;
use crate::AppState;

/// 获取系统状态
#[tauri::command]
pub async fn get_system_status(state: tauri::State<'_, AppState>) -> Result<SystemStatus, String> {
    Ok(state.system_domain.get_status().get().await)
}
