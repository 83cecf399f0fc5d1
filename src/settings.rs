//! 批处理配置模块
//!
//! # 设计思路
//!
//! 三种历史脚本（纯白正方形 / 奶油色背景 / 目录表联动）只在少数开关上不同，
//! 统一为一个 `BatchSettings`，由模式预设给出初值。
//!
//! # 实现思路
//!
//! 生效顺序：模式预设 → JSON 配置文件（字段全部可选）→ 命令行参数 → 交互问答。
//! 配置文件解析失败直接报错，不做静默回退，避免“以为生效其实没生效”。

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::CatalogOptions;
use crate::error::AppError;
use crate::image_handler::{CREAM, NormalizeOptions, WHITE, format_color, parse_color};
use crate::storage::DEFAULT_EXTENSIONS;

/// 默认目录表文件名（与图片放在同一目录）。
pub const DEFAULT_CATALOG_FILE: &str = "lego_parts2.csv";
/// 默认备份子目录名。
pub const DEFAULT_BACKUP_DIR: &str = "backup_original";

/// 运行模式预设。
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PipelineMode {
    /// 纯白背景补方，原地覆盖。
    Square,
    /// 奶油色背景 + 近白替换，原地覆盖。
    Cream,
    /// 奶油色背景 + 边框 + 角点扰动 + 时间戳重命名 + 目录表改写。
    Catalog,
}

impl PipelineMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Cream => "cream",
            Self::Catalog => "catalog",
        }
    }
}

/// 一次批处理的完整配置。
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub normalize: NormalizeOptions,
    /// 输出文件名追加 Unix 时间戳，成功后删除原文件。
    pub rename_with_timestamp: bool,
    /// 处理前把原图复制到备份子目录。
    pub create_backup: bool,
    pub backup_dir_name: String,
    /// 目录表文件（相对工作目录）；`None` 表示不改写目录表。
    pub catalog_file: Option<String>,
    pub catalog: CatalogOptions,
    /// 处理的扩展名（大小写不敏感）。
    pub extensions: Vec<String>,
}

impl BatchSettings {
    pub fn for_mode(mode: PipelineMode) -> Self {
        let mut normalize = NormalizeOptions::default();
        let mut rename_with_timestamp = false;
        let mut catalog_file = None;

        match mode {
            PipelineMode::Square => {
                normalize.background_color = WHITE;
                normalize.replace_white = false;
            }
            PipelineMode::Cream => {
                normalize.background_color = CREAM;
                normalize.replace_white = true;
            }
            PipelineMode::Catalog => {
                normalize.background_color = CREAM;
                normalize.replace_white = true;
                normalize.add_border = true;
                normalize.add_cache_buster = true;
                rename_with_timestamp = true;
                catalog_file = Some(DEFAULT_CATALOG_FILE.to_string());
            }
        }

        Self {
            normalize,
            rename_with_timestamp,
            create_backup: false,
            backup_dir_name: DEFAULT_BACKUP_DIR.to_string(),
            catalog_file,
            catalog: CatalogOptions::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// 把配置文件中出现的字段覆盖到当前配置。
    pub fn apply_file(&mut self, file: SettingsFile) -> Result<(), AppError> {
        let image_err = |e: crate::image_handler::ImageError| AppError::Config(e.to_string());

        if let Some(color) = file.background {
            self.normalize.background_color = parse_color(&color).map_err(image_err)?;
        }
        if let Some(color) = file.pattern_color {
            self.normalize.pattern_color = parse_color(&color).map_err(image_err)?;
        }
        if let Some(padding) = file.padding {
            self.normalize.padding = padding;
        }
        if let Some(size) = file.final_size {
            self.normalize.final_size = size;
        }
        if let Some(replace) = file.replace_white {
            self.normalize.replace_white = replace;
        }
        if let Some(tolerance) = file.white_tolerance {
            self.normalize.white_tolerance = tolerance;
        }
        if let Some(border) = file.add_border {
            self.normalize.add_border = border;
        }
        if let Some(width) = file.border_width {
            self.normalize.border_width = width;
        }
        if let Some(buster) = file.add_cache_buster {
            self.normalize.add_cache_buster = buster;
        }
        if let Some(quality) = file.jpeg_quality {
            self.normalize.jpeg_quality = quality;
        }
        if let Some(limit) = file.max_file_size {
            self.normalize.max_file_size = limit;
        }
        if let Some(limit) = file.max_decoded_pixels {
            self.normalize.max_decoded_pixels = limit;
        }
        if let Some(rename) = file.rename_with_timestamp {
            self.rename_with_timestamp = rename;
        }
        if let Some(backup) = file.create_backup {
            self.create_backup = backup;
        }
        if let Some(name) = file.backup_dir_name {
            self.backup_dir_name = name;
        }
        if let Some(catalog) = file.catalog_file {
            self.catalog_file = Some(catalog).filter(|c| !c.trim().is_empty());
        }
        if let Some(hints) = file.catalog_column_hints {
            self.catalog.column_hints = hints;
        }
        if let Some(marker) = file.catalog_url_marker {
            self.catalog.url_marker = Some(marker).filter(|m| !m.is_empty());
        }
        if let Some(extensions) = file.extensions {
            self.extensions = extensions;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.normalize
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(AppError::Config("扩展名列表不能为空".to_string()));
        }
        if self.create_backup && self.backup_dir_name.trim().is_empty() {
            return Err(AppError::Config("备份目录名不能为空".to_string()));
        }
        if self.catalog_file.is_some() && self.catalog.column_hints.iter().all(|h| h.is_empty()) {
            return Err(AppError::Config("目录表列匹配关键词不能为空".to_string()));
        }

        Ok(())
    }

    /// 启动时打印给用户看的配置摘要。
    pub fn describe(&self) -> Vec<String> {
        let on_off = |flag: bool| if flag { "开启" } else { "关闭" };
        let n = &self.normalize;
        vec![
            format!("背景色: {}", format_color(n.background_color)),
            format!("留白: {}px", n.padding),
            format!("输出尺寸: {}x{}", n.final_size, n.final_size),
            format!("近白替换: {}（容差 {}）", on_off(n.replace_white), n.white_tolerance),
            format!("防删除边框: {}", on_off(n.add_border)),
            format!("缓存扰动: {}", on_off(n.add_cache_buster)),
            format!("时间戳重命名: {}", on_off(self.rename_with_timestamp)),
            format!("备份原图: {}", on_off(self.create_backup)),
            format!("目录表: {}", self.catalog_file.as_deref().unwrap_or("无")),
        ]
    }
}

/// JSON 配置文件结构，所有字段可选。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub background: Option<String>,
    pub padding: Option<u32>,
    pub final_size: Option<u32>,
    pub replace_white: Option<bool>,
    pub white_tolerance: Option<u8>,
    pub add_border: Option<bool>,
    pub border_width: Option<u32>,
    pub pattern_color: Option<String>,
    pub add_cache_buster: Option<bool>,
    pub jpeg_quality: Option<u8>,
    pub max_file_size: Option<u64>,
    pub max_decoded_pixels: Option<u64>,
    pub rename_with_timestamp: Option<bool>,
    pub create_backup: Option<bool>,
    pub backup_dir_name: Option<String>,
    pub catalog_file: Option<String>,
    pub catalog_column_hints: Option<Vec<String>>,
    pub catalog_url_marker: Option<String>,
    pub extensions: Option<Vec<String>>,
}

/// 读取并解析 JSON 配置文件。
pub fn load_settings_file(path: &Path) -> Result<SettingsFile, AppError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("读取配置文件 '{}' 失败: {}", path.display(), e))
    })?;

    serde_json::from_str::<SettingsFile>(&content)
        .map_err(|e| AppError::Config(format!("解析配置文件 '{}' 失败: {}", path.display(), e)))
}
