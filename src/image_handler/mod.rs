//! # 图片处理模块（image_handler）
//!
//! ## 设计思路
//!
//! 该模块将“加载校验 → 背景归一化 → 留白补方 → 缩放 → 标记 → 写盘”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排整条处理流水线，记录阶段耗时
//! - `loader`：负责文件读取、签名校验、像素上限与解码
//! - `background`：透明合成与近白替换
//! - `pipeline`：留白、补齐正方形、缩放
//! - `marker`：防删除边框与角点缓存扰动
//! - `writer`：JPEG 编码与写盘
//! - `config/error/source`：参数、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! batch.rs（逐个文件）
//!    ↓
//! handler.rs::process_file
//!    ├─ loader.rs（读取 + 校验 + 解码）
//!    ├─ handler.rs::normalize（纯变换）
//!    │    ├─ background.rs
//!    │    ├─ pipeline.rs
//!    │    └─ marker.rs
//!    └─ writer.rs（JPEG 写盘）
//!    ↓
//! 返回 ImageError 给批处理层（记录日志、跳过该文件）
//! ```

mod background;
mod config;
mod error;
mod handler;
mod loader;
mod marker;
mod pipeline;
mod source;
mod writer;

pub use background::{flatten_onto_background, replace_near_white};
pub use config::{
    BackgroundPreset, CREAM, DEFAULT_PATTERN_COLOR, NormalizeOptions, WHITE, format_color, parse_color,
};
pub use error::ImageError;
pub use handler::ImageHandler;
pub use marker::{apply_border_pattern, apply_cache_buster, nudge_channel};
pub use pipeline::{pad_to_square, pad_with_border, resize_to_target};
pub use source::ProcessedImage;
