//! 成分提取与分析命令
//!
//! 对应一次用户操作的两步流程：
//! 1. extract_ingredients: 标签图片 -> 成分文本（远程OCR/视觉模型）
//! 2. analyze_ingredients: 成分文本 -> 分析结果（远程分析 + 本地解析）
//!
//! 前置条件（图片无效、没有提取到文字、没有可分析文本）都在进入
//! 解释器之前检查并以明确的错误信息返回给前端

use crate::analysis::ChartSpec;
use crate::event_bus::AppEvent;
use crate::models::{AnalysisOutcome, ExtractionResult, ProductType};
use crate::utils::{validate_image_path, validate_ingredients_text};
use crate::AppState;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{info, warn};

/// 从标签图片提取成分文本
#[tauri::command]
pub async fn extract_ingredients(
    state: tauri::State<'_, AppState>,
    image_path: String,
    product_type: ProductType,
) -> Result<ExtractionResult, String> {
    validate_image_path(&image_path)?;

    info!("开始提取成分: {}", image_path);
    state.event_bus.publish(AppEvent::ExtractionStarted {
        image_path: PathBuf::from(&image_path),
    });
    state.system_domain.get_status().set_extracting(true).await;

    let result = state
        .analysis_domain
        .get_llm_handle()
        .extract(&image_path, product_type)
        .await;

    state.system_domain.get_status().set_extracting(false).await;

    match result {
        Ok(extraction) => {
            if extraction.has_ingredients() {
                info!("提取完成: {} 字符", extraction.ingredients.len());
                state.event_bus.publish(AppEvent::ExtractionCompleted {
                    image_path: PathBuf::from(&image_path),
                    char_count: extraction.ingredients.len(),
                });
            } else {
                warn!("图片中未识别到成分列表: {:?}", extraction.warning);
            }
            Ok(extraction)
        }
        Err(e) => {
            let message = format!("成分提取失败: {}", e);
            state
                .system_domain
                .get_status()
                .set_error(Some(message.clone()))
                .await;
            state.event_bus.publish(AppEvent::ExtractionFailed {
                image_path: PathBuf::from(&image_path),
                error: message.clone(),
            });
            Err(message)
        }
    }
}

/// 分析成分文本并解析为结构化结果
#[tauri::command]
pub async fn analyze_ingredients(
    state: tauri::State<'_, AppState>,
    ingredients: String,
    product_type: ProductType,
) -> Result<AnalysisOutcome, String> {
    // 前置条件：空文本与提取失败占位文本都不进入分析
    validate_ingredients_text(&ingredients)?;

    info!(
        "开始分析成分: {} 字符, product_type={}",
        ingredients.len(),
        product_type.as_str()
    );
    state
        .event_bus
        .publish(AppEvent::AnalysisStarted { product_type });
    state.system_domain.get_status().set_analyzing(true).await;

    let result = run_analysis(&state, &ingredients, product_type).await;

    state.system_domain.get_status().set_analyzing(false).await;

    match result {
        Ok(outcome) => {
            state.system_domain.get_status().record_analysis().await;
            state.event_bus.publish(AppEvent::AnalysisCompleted {
                product_type,
                counts: outcome.report.counts,
            });
            Ok(outcome)
        }
        Err(message) => {
            state
                .system_domain
                .get_status()
                .set_error(Some(message.clone()))
                .await;
            state
                .event_bus
                .publish(AppEvent::AnalysisFailed {
                    error: message.clone(),
                });
            Err(message)
        }
    }
}

/// 完整流程：提取后立即分析（对应前端的图片上传即分析）
#[tauri::command]
pub async fn analyze_label(
    state: tauri::State<'_, AppState>,
    image_path: String,
    product_type: ProductType,
) -> Result<AnalysisOutcome, String> {
    let extraction = extract_ingredients(state.clone(), image_path, product_type).await?;

    if !extraction.has_ingredients() {
        return Err(extraction
            .warning
            .unwrap_or_else(|| "未能从图片中提取到任何成分".to_string()));
    }

    analyze_ingredients(state, extraction.ingredients, product_type).await
}

/// 调用分析服务并解析响应
async fn run_analysis(
    state: &tauri::State<'_, AppState>,
    ingredients: &str,
    product_type: ProductType,
) -> Result<AnalysisOutcome, String> {
    let raw_text = state
        .analysis_domain
        .get_llm_handle()
        .analyze(ingredients, product_type)
        .await
        .map_err(|e| format!("分析失败: {}", e))?;

    // 计数与可渲染行派生自同一份响应快照
    let strict = state
        .report_domain
        .get_settings()
        .get()
        .await
        .analysis_settings
        .strict_parsing;

    let report = state
        .analysis_domain
        .interpreter_for(strict)
        .interpret(&raw_text)
        .map_err(|e| format!("解析分析文本失败: {}", e))?;

    let chart = ChartSpec::from_counts(&report.counts);

    Ok(AnalysisOutcome {
        raw_text,
        report,
        chart,
        product_type,
        analyzed_at: Utc::now(),
    })
}
