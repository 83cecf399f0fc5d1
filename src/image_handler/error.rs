//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载单张图片处理链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让批处理层可按分支匹配（跳过该文件、继续下一张）。

/// 图片处理统一错误类型。
///
/// 该类型会在批处理层被上转为 `AppError`，或作为单文件失败原因打印到控制台。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}
