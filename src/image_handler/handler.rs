//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageHandler` 只负责流程编排，不关心文件从哪里来、批处理如何统计。
//! 处理链路固定为：
//! 1. 加载原始字节并校验
//! 2. 解码
//! 3. 背景归一化（透明合成 + 近白替换）
//! 4. 留白 + 补齐正方形
//! 5. 缩放到目标尺寸
//! 6. 可选标记（边框 → 角点扰动）
//! 7. JPEG 写盘
//!
//! ## 实现思路
//!
//! - 第 3~6 步是纯变换 `normalize`，不做任何 I/O，可单独测试。
//! - `process_file` 记录 `load/normalize/write/total` 阶段耗时，便于性能诊断。

use image::{DynamicImage, GenericImageView, RgbImage};
use std::path::Path;
use std::time::Instant;

use super::source::ProcessedImage;
use super::{ImageError, NormalizeOptions, background, marker, pipeline};

/// 图片处理器。
///
/// 持有一份已校验的参数，对每个文件执行相同的归一化流程。
#[derive(Debug, Clone)]
pub struct ImageHandler {
    pub(super) options: NormalizeOptions,
}

impl ImageHandler {
    /// 根据参数创建处理器，参数非法时直接返回错误。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use normalize_images::image_handler::{ImageHandler, NormalizeOptions};
    ///
    /// let handler = ImageHandler::new(NormalizeOptions::default())?;
    /// # Ok::<(), normalize_images::image_handler::ImageError>(())
    /// ```
    pub fn new(options: NormalizeOptions) -> Result<Self, ImageError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// 纯变换：任意颜色模式的输入 → `final_size × final_size` 的 RGB 图像。
    pub fn normalize(&self, image: &DynamicImage) -> Result<RgbImage, ImageError> {
        let options = &self.options;

        let mut rgb = background::flatten_onto_background(image, options.background_color);
        if options.replace_white {
            let replaced = background::replace_near_white(
                &mut rgb,
                options.background_color,
                options.white_tolerance,
            );
            log::debug!("🎨 近白像素替换：{} 个", replaced);
        }

        let (width, height) = rgb.dimensions();
        pipeline::check_canvas_limit(width, height, options.padding, options.max_decoded_pixels)?;
        let padded = pipeline::pad_with_border(&rgb, options.padding, options.background_color)?;
        let square = pipeline::pad_to_square(padded, options.background_color);
        let mut output = pipeline::resize_to_target(square, options.final_size, options.resize_filter)?;

        if options.add_border {
            marker::apply_border_pattern(&mut output, options.border_width, options.pattern_color);
        }
        if options.add_cache_buster {
            marker::apply_cache_buster(&mut output);
        }

        Ok(output)
    }

    /// 处理主入口：读取 `input`，归一化后写入 `output`（二者可相同，即原地覆盖）。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use normalize_images::image_handler::{ImageHandler, NormalizeOptions};
    /// use std::path::Path;
    ///
    /// let handler = ImageHandler::new(NormalizeOptions::default())?;
    /// handler.process_file(Path::new("a.png"), Path::new("a.png"))?;
    /// # Ok::<(), normalize_images::image_handler::ImageError>(())
    /// ```
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<ProcessedImage, ImageError> {
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = self.load_from_file(input)?;
        let decoded = self.decode(&raw)?;
        let (source_width, source_height) = decoded.dimensions();
        let load_elapsed = load_start.elapsed();

        let normalize_start = Instant::now();
        let normalized = self.normalize(&decoded)?;
        let normalize_elapsed = normalize_start.elapsed();

        let write_start = Instant::now();
        let written = self.write_jpeg(&normalized, output)?;
        let write_elapsed = write_start.elapsed();

        log::info!(
            "✅ 图片处理完成 - {} {}x{} -> {}x{} ({}KB) load={}ms normalize={}ms write={}ms total={}ms",
            raw.source_hint,
            source_width,
            source_height,
            self.options.final_size,
            self.options.final_size,
            written / 1024,
            load_elapsed.as_millis(),
            normalize_elapsed.as_millis(),
            write_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(ProcessedImage {
            output_path: output.to_path_buf(),
            source_width,
            source_height,
            final_size: self.options.final_size,
        })
    }
}
