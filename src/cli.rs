//! 命令行参数模块
//!
//! 参数只做“覆盖”：未显式给出的开关保持模式预设 / 配置文件中的值。

use std::path::PathBuf;

use clap::Parser;

use crate::error::AppError;
use crate::image_handler::parse_color;
use crate::settings::{BatchSettings, PipelineMode, load_settings_file};

/// 将目录中的商品图片统一为带留白的正方形，并可同步更新目录表 URL。
#[derive(Parser, Debug)]
#[command(name = "normalize-images", version)]
#[command(about = "Pad product images to squares, resize, mark and patch catalog URLs")]
pub struct Cli {
    /// 工作目录（默认当前目录）
    #[arg(index = 1)]
    pub dir: Option<PathBuf>,

    /// 模式预设
    #[arg(long, value_enum, default_value_t = PipelineMode::Catalog)]
    pub mode: PipelineMode,

    /// JSON 配置文件，叠加在模式预设之上
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 四周留白像素
    #[arg(long)]
    pub padding: Option<u32>,

    /// 输出边长
    #[arg(long)]
    pub size: Option<u32>,

    /// 背景色：white / cream / RRGGBB
    #[arg(long)]
    pub background: Option<String>,

    /// 近白判定容差
    #[arg(long)]
    pub tolerance: Option<u8>,

    /// JPEG 质量（1~100）
    #[arg(long)]
    pub quality: Option<u8>,

    #[arg(long, overrides_with = "no_border")]
    pub border: bool,
    #[arg(long, overrides_with = "border")]
    pub no_border: bool,

    #[arg(long, overrides_with = "no_cache_buster")]
    pub cache_buster: bool,
    #[arg(long, overrides_with = "cache_buster")]
    pub no_cache_buster: bool,

    #[arg(long, overrides_with = "no_rename")]
    pub rename: bool,
    #[arg(long, overrides_with = "rename")]
    pub no_rename: bool,

    /// 处理前备份原图
    #[arg(long)]
    pub backup: bool,

    /// 目录表文件（相对工作目录）
    #[arg(long)]
    pub catalog: Option<String>,

    /// 不改写目录表
    #[arg(long, conflicts_with = "catalog")]
    pub no_catalog: bool,

    /// 逐项交互询问
    #[arg(short, long)]
    pub interactive: bool,

    /// 跳过最终确认
    #[arg(short, long)]
    pub yes: bool,
}

fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Cli {
    pub fn working_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// 模式预设 → 配置文件 → 命令行参数，得到最终配置。
    pub fn resolve_settings(&self) -> Result<BatchSettings, AppError> {
        let mut settings = BatchSettings::for_mode(self.mode);

        if let Some(path) = &self.config {
            settings.apply_file(load_settings_file(path)?)?;
        }

        let n = &mut settings.normalize;
        if let Some(padding) = self.padding {
            n.padding = padding;
        }
        if let Some(size) = self.size {
            n.final_size = size;
        }
        if let Some(color) = &self.background {
            n.background_color = parse_color(color).map_err(|e| AppError::Config(e.to_string()))?;
        }
        if let Some(tolerance) = self.tolerance {
            n.white_tolerance = tolerance;
        }
        if let Some(quality) = self.quality {
            n.jpeg_quality = quality;
        }
        if let Some(border) = toggle(self.border, self.no_border) {
            n.add_border = border;
        }
        if let Some(buster) = toggle(self.cache_buster, self.no_cache_buster) {
            n.add_cache_buster = buster;
        }
        if let Some(rename) = toggle(self.rename, self.no_rename) {
            settings.rename_with_timestamp = rename;
        }
        if self.backup {
            settings.create_backup = true;
        }
        if let Some(catalog) = &self.catalog {
            settings.catalog_file = Some(catalog.clone());
        }
        if self.no_catalog {
            settings.catalog_file = None;
        }

        settings.validate()?;
        Ok(settings)
    }
}
