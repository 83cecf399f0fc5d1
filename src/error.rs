//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! 单张图片的失败（`ImageError`）在批处理层被吞掉并计入失败列表；
//! 只有会中止整次运行的错误才以 `AppError` 形式返回到 `main`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` / `CatalogError` / `io::Error` 提供 `From` 转换，无需手动 map。

use std::path::PathBuf;

use crate::catalog::CatalogError;
use crate::image_handler::ImageError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片处理流水线错误（读取 / 解码 / 变换 / 写入）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 目录表改写错误
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 工作目录或备份目录不可用
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 配置文件或命令行参数非法
    #[error("配置错误: {0}")]
    Config(String),

    /// 目录表模式下找不到目录表文件（启动即中止，不触碰任何图片）
    #[error("找不到目录表文件: {}", .0.display())]
    CatalogMissing(PathBuf),
}
