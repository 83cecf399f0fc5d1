//! 工作目录与文件名管理模块
//!
//! # 设计思路
//!
//! 统一管理批处理涉及的文件系统操作：扫描待处理图片、创建备份目录、
//! 复制原图、生成带时间戳的新文件名。
//!
//! # 实现思路
//!
//! - 只扫描工作目录本层（不递归），扩展名大小写不敏感，结果按路径排序。
//! - 备份目录不存在时自动 `create_dir_all`，避免上层判断。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// 默认处理的图片扩展名。
pub const DEFAULT_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

/// 列出 `dir` 下扩展名命中 `extensions` 的文件（不递归、去重、排序）。
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::Storage(format!("读取目录 '{}' 失败: {}", dir.display(), e)))?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| has_image_extension(path, extensions))
        .collect();

    files.sort();
    files.dedup();
    Ok(files)
}

fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy().to_lowercase();
    extensions
        .iter()
        .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

/// 获取（必要时创建）备份目录。
pub fn ensure_backup_dir(dir: &Path, name: &str) -> Result<PathBuf, AppError> {
    let backup_dir = dir.join(name);
    if !backup_dir.exists() {
        fs::create_dir_all(&backup_dir).map_err(|e| {
            AppError::Storage(format!("创建备份目录 '{}' 失败: {}", backup_dir.display(), e))
        })?;
    }
    Ok(backup_dir)
}

/// 将原图按字节复制到备份目录，返回备份路径。
pub fn backup_original(path: &Path, backup_dir: &Path) -> Result<PathBuf, AppError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::Storage(format!("无效文件路径: {}", path.display())))?;
    let target = backup_dir.join(file_name);
    fs::copy(path, &target)?;
    Ok(target)
}

/// `image-001.jpg` + `1642345678` → `image-001_1642345678.jpg`
pub fn timestamped_file_name(original: &str, timestamp: i64) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| original.to_string());

    match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, timestamp, ext.to_string_lossy()),
        None => format!("{}_{}", stem, timestamp),
    }
}
