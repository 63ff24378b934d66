//! 应用程序初始化和启动
//!
//! 负责 Tauri 应用的完整启动流程，包括：
//! - 日志系统初始化
//! - 环境变量配置（系统代理）
//! - 各领域模块初始化
//! - Actor 系统启动
//! - Tauri Builder 配置
//! - 命令注册

use std::path::PathBuf;
use std::sync::Arc;

use tauri::Manager;
use tracing::{debug, error, info};

use crate::actors::{LLMManagerActor, SystemStatusActor};
use crate::commands::*;
use crate::domains::{AnalysisDomain, ReportDomain, SystemDomain};
use crate::event_bus::EventBus;
use crate::export::ReportExporter;
use crate::llm::LLMManager;
use crate::logger;
use crate::settings::SettingsManager;
use crate::AppState;

/// 应用程序入口点
///
/// 初始化并启动 Tauri 应用，包含以下步骤：
/// 1. 日志系统初始化
/// 2. 系统代理配置（macOS/Windows 平台特定）
/// 3. 设置与领域模块初始化
/// 4. Actor 系统启动与初始 LLM 配置加载
/// 5. Tauri 命令注册
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // 创建日志广播器
    let log_broadcaster = Arc::new(logger::LogBroadcaster::new());

    // 初始化日志系统（带前端推送功能）
    logger::init_with_broadcaster(log_broadcaster.clone()).expect("Failed to initialize logger");

    tauri::Builder::default()
        .setup(move |app| {
            info!("初始化成分标签分析器...");

            // 读取系统代理并写入环境变量，分析服务的请求才能走代理
            #[cfg(target_os = "macos")]
            crate::utils::setup_system_proxy_macos();

            #[cfg(target_os = "windows")]
            crate::utils::setup_system_proxy_windows();

            // 设置日志广播器的 app handle
            log_broadcaster.set_app_handle(app.handle().clone());

            let app_dir = app.path().app_data_dir().map_err(|e| e.to_string())?;
            std::fs::create_dir_all(&app_dir).map_err(|e| e.to_string())?;

            let (state, llm_actor, status_actor, provider_name, llm_config_to_load) =
                tauri::async_runtime::block_on(async {
                    // 先初始化设置管理器，以便读取初始配置
                    let settings = Arc::new(
                        SettingsManager::new(app_dir.join("config.json"))
                            .await
                            .expect("设置管理器初始化失败"),
                    );

                    let initial_config = settings.get().await;

                    // 从配置中读取日志设置并应用
                    let logger_settings = initial_config.logger_settings.clone().unwrap_or_default();
                    log_broadcaster.set_enabled(logger_settings.enable_frontend_logging);
                    info!(
                        "日志推送已设置: {}",
                        logger_settings.enable_frontend_logging
                    );

                    // 创建共享的 HTTP 客户端（提取和分析请求复用连接池）
                    let http_client = reqwest::Client::builder()
                        .timeout(std::time::Duration::from_secs(300))
                        .pool_max_idle_per_host(10)
                        .build()
                        .expect("无法创建 HTTP 客户端");

                    // 初始化LLM管理器（使用Actor模式，无需外层锁）
                    // 注意：Actor 不在此处启动，而是在 Tauri 运行时中启动
                    let llm_manager = LLMManager::new(http_client.clone());
                    let (llm_actor, llm_handle) = LLMManagerActor::new(llm_manager);

                    // 初始化系统状态（使用Actor模式，无需锁）
                    let (status_actor, status_handle) = SystemStatusActor::new();

                    // 报告输出目录：配置的目录或应用数据目录下的 reports
                    let reports_dir = initial_config
                        .export_settings
                        .output_dir
                        .clone()
                        .map(PathBuf::from)
                        .unwrap_or_else(|| app_dir.join("reports"));
                    let exporter = Arc::new(ReportExporter::new(reports_dir));

                    // ==================== 组装领域管理器 ====================

                    let analysis_domain = Arc::new(AnalysisDomain::new(llm_handle.clone()));
                    let report_domain = Arc::new(ReportDomain::new(exporter, settings.clone()));
                    let system_domain = Arc::new(SystemDomain::new(
                        status_handle,
                        log_broadcaster.clone(),
                        http_client,
                    ));

                    // 创建事件总线（容量1000,足够缓冲）
                    let event_bus = Arc::new(EventBus::new(1000));

                    info!("领域管理器已初始化完成");

                    let app_state = AppState {
                        analysis_domain,
                        report_domain,
                        system_domain,
                        event_bus,
                    };

                    (
                        app_state,
                        llm_actor,
                        status_actor,
                        initial_config.llm_provider.clone(),
                        initial_config.llm_config.clone(),
                    )
                });

            // 启动 Actor 并加载初始 LLM 配置
            {
                let state_clone = state.clone();
                tauri::async_runtime::spawn(llm_actor.run());
                tauri::async_runtime::spawn(status_actor.run());

                tauri::async_runtime::spawn(async move {
                    let llm_handle = state_clone.analysis_domain.get_llm_handle();

                    if let Err(e) = llm_handle.switch_provider(&provider_name).await {
                        error!("切换 LLM provider 失败: {}", e);
                    }

                    if let Some(llm_config) = llm_config_to_load {
                        if let Err(e) = llm_handle.configure(llm_config).await {
                            error!("加载 LLM 配置失败: {}", e);
                        } else {
                            info!("已从配置文件加载 LLM 设置");
                        }
                    }
                });
            }

            // 后台订阅事件总线，统一记录事件轨迹
            {
                let mut receiver = state.event_bus.subscribe();
                tauri::async_runtime::spawn(async move {
                    loop {
                        match receiver.recv().await {
                            Ok(event) => debug!("应用事件: {:?}", event),
                            Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                                debug!("事件订阅滞后，跳过 {} 条", n);
                            }
                            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        }
                    }
                });
            }

            app.manage(state);
            Ok(())
        })
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            extract_ingredients,
            analyze_ingredients,
            analyze_label,
            get_app_config,
            update_config,
            configure_llm_provider,
            export_report,
            open_report_folder,
            open_log_folder,
            get_system_status,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
