//! 配置管理命令
//!
//! 提供应用配置的读取和更新接口，包括：
//! - 应用配置的获取和更新
//! - LLM 服务商配置与切换

use crate::event_bus::AppEvent;
use crate::llm::LLMConfig;
use crate::models::{AppConfig, PersistedAppConfig};
use crate::AppState;
use tracing::info;

/// 获取应用配置
#[tauri::command]
pub async fn get_app_config(
    state: tauri::State<'_, AppState>,
) -> Result<PersistedAppConfig, String> {
    Ok(state.report_domain.get_settings().get().await)
}

/// 更新配置
#[tauri::command]
pub async fn update_config(
    state: tauri::State<'_, AppState>,
    config: AppConfig,
) -> Result<PersistedAppConfig, String> {
    let updated_config = state
        .report_domain
        .get_settings()
        .update(config.clone())
        .await
        .map_err(|e| e.to_string())?;

    // 更新LLM配置
    if let Some(llm_config) = config.llm_config {
        state
            .analysis_domain
            .get_llm_handle()
            .configure(llm_config)
            .await
            .map_err(|e| e.to_string())?;
    } else if let Some(provider) = config.llm_provider {
        state
            .analysis_domain
            .get_llm_handle()
            .switch_provider(&provider)
            .await
            .map_err(|e| e.to_string())?;
    }

    // 更新日志配置
    if let Some(logger_settings) = config.logger_settings {
        state
            .system_domain
            .get_logger()
            .set_enabled(logger_settings.enable_frontend_logging);
        info!(
            "日志配置已更新: 前端日志推送 = {}",
            logger_settings.enable_frontend_logging
        );
    }

    state.event_bus.publish(AppEvent::ConfigUpdated {
        config_type: "app".to_string(),
    });

    Ok(updated_config)
}

/// 配置LLM提供商（统一接口）
#[tauri::command]
pub async fn configure_llm_provider(
    state: tauri::State<'_, AppState>,
    config: LLMConfig,
) -> Result<(), String> {
    info!("配置LLM提供商: {}", config.provider);

    state
        .analysis_domain
        .get_llm_handle()
        .configure(config.clone())
        .await
        .map_err(|e| e.to_string())?;

    // 同步持久化到设置文件
    state
        .report_domain
        .get_settings()
        .update(AppConfig {
            llm_provider: Some(config.provider.clone()),
            default_product_type: None,
            llm_config: Some(config),
            analysis_settings: None,
            export_settings: None,
            ui_settings: None,
            logger_settings: None,
        })
        .await
        .map_err(|e| e.to_string())?;

    state.event_bus.publish(AppEvent::ConfigUpdated {
        config_type: "llm".to_string(),
    });

    Ok(())
}
