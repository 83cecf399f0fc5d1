//! # 中间模型
//!
//! 将“加载阶段”和“处理结果”解耦：
//! - `RawImageData` 表示已读取但未解码的字节
//! - `ProcessedImage` 表示单个文件处理完成后的摘要（供控制台输出）

use std::path::PathBuf;

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（文件名，用于日志与诊断）。
    pub(crate) source_hint: String,
}

/// 单个文件处理完成后的摘要。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    /// 实际写入的输出路径。
    pub output_path: PathBuf,
    /// 原始宽度（像素）。
    pub source_width: u32,
    /// 原始高度（像素）。
    pub source_height: u32,
    /// 输出边长（像素）。
    pub final_size: u32,
}
