//! # 留白与缩放流水线模块
//!
//! ## 设计思路
//!
//! 保证输出“必定是 final_size × final_size 的正方形”，且原图内容不变形、居中。
//!
//! ## 实现思路
//!
//! 1. 四周添加统一留白（`padding`）
//! 2. 短边补齐为正方形，偏移量向下取整居中；已是正方形时跳过
//! 3. 尺寸不等于目标时使用 Lanczos3 缩放；优先 `fast_image_resize`，失败回退 `image`
//!
//! 分配画布前先用 `check_canvas_limit` 估算最终正方形边长，超过像素上限直接拒绝，
//! 由批处理层按单文件失败处理。

use fast_image_resize as fr;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use super::ImageError;

/// 校验“留白 + 补齐正方形”后的画布像素数不超过 `max_pixels`。
pub(crate) fn check_canvas_limit(
    width: u32,
    height: u32,
    padding: u32,
    max_pixels: u64,
) -> Result<(), ImageError> {
    let side = width.max(height) as u64 + 2 * padding as u64;
    let pixels = side.saturating_mul(side);
    if pixels > max_pixels {
        return Err(ImageError::ResourceLimit(format!(
            "留白后画布过大：{}x{}（{} 像素，上限 {}）",
            side, side, pixels, max_pixels
        )));
    }
    Ok(())
}

/// 在图片四周添加 `padding` 像素的背景色留白。
pub fn pad_with_border(
    image: &RgbImage,
    padding: u32,
    background: Rgb<u8>,
) -> Result<RgbImage, ImageError> {
    if padding == 0 {
        return Ok(image.clone());
    }

    let (width, height) = image.dimensions();
    let extra = padding
        .checked_mul(2)
        .ok_or_else(|| ImageError::ResourceLimit(format!("留白过大：{}px", padding)))?;
    let padded_width = width
        .checked_add(extra)
        .ok_or_else(|| ImageError::ResourceLimit("留白后宽度溢出".to_string()))?;
    let padded_height = height
        .checked_add(extra)
        .ok_or_else(|| ImageError::ResourceLimit("留白后高度溢出".to_string()))?;

    let mut canvas = RgbImage::from_pixel(padded_width, padded_height, background);
    imageops::replace(&mut canvas, image, padding as i64, padding as i64);
    Ok(canvas)
}

/// 将图片补齐为正方形，原内容居中（奇数偏移向下取整）。
pub fn pad_to_square(image: RgbImage, background: Rgb<u8>) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == height {
        return image;
    }

    let side = width.max(height);
    let offset_x = (side - width) / 2;
    let offset_y = (side - height) / 2;

    log::debug!(
        "🧩 补齐正方形：{}x{} -> {}x{}（偏移 x={} y={}）",
        width,
        height,
        side,
        side,
        offset_x,
        offset_y
    );

    let mut canvas = RgbImage::from_pixel(side, side, background);
    imageops::replace(&mut canvas, &image, offset_x as i64, offset_y as i64);
    canvas
}

/// 缩放到 `target × target`；尺寸已符合时原样返回。
pub fn resize_to_target(
    image: RgbImage,
    target: u32,
    filter: FilterType,
) -> Result<RgbImage, ImageError> {
    if image.dimensions() == (target, target) {
        return Ok(image);
    }
    if target == 0 {
        return Err(ImageError::InvalidFormat("目标尺寸必须大于 0".to_string()));
    }

    match resize_with_fast_image_resize(&image, target, target, filter) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}",
                err
            );
            Ok(imageops::resize(&image, target, target, filter))
        }
    }
}

fn resize_with_fast_image_resize(
    image: &RgbImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbImage, ImageError> {
    let (src_width, src_height) = image.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| ImageError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x3);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    RgbImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ImageError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}
