//! # 商品图片归一化工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main.rs ── cli（参数） ── prompt（可选交互问答）        │
//! │       │                                                  │
//! │       ↓ BatchSettings（模式预设 + 配置文件 + 参数）       │
//! │  batch ── 串行逐张处理 + 旧名→新名映射                    │
//! │   ├─ storage        扫描目录 / 备份 / 时间戳文件名        │
//! │   ├─ image_handler  读取·背景归一化·补方·缩放·标记·写盘  │
//! │   └─ catalog        CSV URL 列改写 + 备份                 │
//! │                                                          │
//! │  error ── AppError（统一错误类型）                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`image_handler`] | 单张图片的确定性归一化流水线 |
//! | [`catalog`] | 目录表 URL 列定位、文件名替换、备份回写 |
//! | [`batch`] | 串行批处理、失败跳过、汇总统计 |
//! | [`settings`] | 模式预设与 JSON 配置文件 |
//! | [`cli`] | 命令行参数与覆盖规则 |
//! | [`prompt`] | 交互问答（留白 / 备份 / 边框 / 扰动 / 确认） |
//! | [`storage`] | 工作目录扫描、备份目录、时间戳文件名 |

pub mod error;
pub mod batch;
pub mod catalog;
pub mod cli;
pub mod image_handler;
pub mod prompt;
pub mod settings;
pub mod storage;
