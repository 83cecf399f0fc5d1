//! # 目录表（CSV）模块
//!
//! ## 设计思路
//!
//! 图片按时间戳重命名后，目录表里引用旧文件名的 URL 必须同步改写，
//! 否则前端会继续请求旧地址。改写前总是先备份原文件。
//!
//! ## 实现思路
//!
//! - `patcher`：定位 URL 列、逐行替换文件名、备份并回写
//! - 失败不回滚已经重命名的图片，只向上报告警告

mod patcher;

use std::collections::BTreeMap;
use std::path::PathBuf;

pub use patcher::{PatchReport, backup_path_for, find_url_column, patch_catalog};

/// 旧文件名 → 新文件名。批处理期间只追加，结束时一次性消费。
pub type FilenameMapping = BTreeMap<String, String>;

/// 目录表改写参数。
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// 表头匹配关键词（大小写不敏感，包含即命中，取第一个命中的列）。
    pub column_hints: Vec<String>,
    /// URL 中图片目录标记；命中后取最后一次出现之后的部分作为文件名。
    ///
    /// 为 `None` 时退化为“URL 包含映射中任一旧文件名即替换”。
    pub url_marker: Option<String>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            column_hints: vec!["url".to_string(), "bricklink".to_string()],
            url_marker: Some("images_giant_booster/".to_string()),
        }
    }
}

/// 目录表处理错误。
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("目录表读写失败：{0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 解析失败：{0}")]
    Csv(#[from] csv::Error),

    #[error("目录表缺少表头：{0}")]
    MissingHeader(PathBuf),

    #[error("找不到 URL 列（表头：{header:?}，关键词：{hints:?}）")]
    UrlColumnNotFound { header: Vec<String>, hints: Vec<String> },
}
