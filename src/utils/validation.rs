//! 输入验证工具函数
//!
//! 提供图片与成分文本的前置校验。"图片里没有提取到成分"和"没有可分析的文本"
//! 是两类不同的前置条件失败，都在进入解释器之前报告

use std::path::Path;

/// 支持的标签图片扩展名
const SUPPORTED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// 提取失败后写入输入框的占位文本，不得被送入分析
const EXTRACTION_PLACEHOLDERS: [&str; 2] = ["未能提取到成分", "No text extracted."];

/// 标签图片大小上限（字节）
const MAX_IMAGE_SIZE_BYTES: u64 = 20 * 1024 * 1024;

/// 验证标签图片路径是否可用
///
/// # 参数
/// - `path`: 图片文件路径
///
/// # 返回
/// - `Ok(())`: 验证通过
/// - `Err(String)`: 错误信息
pub fn validate_image_path(path: &str) -> Result<(), String> {
    let path = Path::new(path);

    if !path.exists() {
        return Err(format!("图片文件不存在: {}", path.display()));
    }
    if !path.is_file() {
        return Err(format!("不是有效的文件: {}", path.display()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !SUPPORTED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "不支持的图片格式: {}（支持 {}）",
            extension,
            SUPPORTED_IMAGE_EXTENSIONS.join("/")
        ));
    }

    let size = std::fs::metadata(path)
        .map_err(|e| format!("读取图片信息失败: {}", e))?
        .len();
    if size > MAX_IMAGE_SIZE_BYTES {
        return Err(format!(
            "图片过大: {:.1}MB（上限 {}MB）",
            size as f64 / (1024.0 * 1024.0),
            MAX_IMAGE_SIZE_BYTES / (1024 * 1024)
        ));
    }

    Ok(())
}

/// 验证成分文本是否可以送入分析
///
/// # 返回
/// - `Ok(())`: 验证通过
/// - `Err(String)`: 错误信息（空文本与占位文本给出不同的提示）
pub fn validate_ingredients_text(text: &str) -> Result<(), String> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err("没有可分析的成分文本".to_string());
    }

    if EXTRACTION_PLACEHOLDERS
        .iter()
        .any(|p| trimmed.eq_ignore_ascii_case(p))
    {
        return Err("未能从图片中提取到成分，请更换图片或手动输入".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_image_path_missing() {
        assert!(validate_image_path("/nonexistent/label.jpg").is_err());
    }

    #[test]
    fn test_validate_image_path_extension() {
        let dir = tempfile::tempdir().unwrap();

        let ok_path = dir.path().join("label.jpg");
        std::fs::File::create(&ok_path)
            .unwrap()
            .write_all(b"fake")
            .unwrap();
        assert!(validate_image_path(ok_path.to_str().unwrap()).is_ok());

        let bad_path = dir.path().join("label.bmp");
        std::fs::File::create(&bad_path).unwrap();
        assert!(validate_image_path(bad_path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_validate_ingredients_text() {
        assert!(validate_ingredients_text("Aqua, Glycerin").is_ok());

        // 空文本与占位文本是不同的错误
        let empty = validate_ingredients_text("   ").unwrap_err();
        let placeholder = validate_ingredients_text("No text extracted.").unwrap_err();
        assert_ne!(empty, placeholder);
    }
}
