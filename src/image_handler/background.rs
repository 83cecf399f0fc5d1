//! # 背景归一化模块
//!
//! ## 设计思路
//!
//! 目录展示要求背景色“精确一致”，否则后续留白与原图之间会出现色差接缝。
//! 因此分两步：
//! 1. 带透明通道的图片按 alpha 混合到不透明背景上
//! 2. 三通道都接近 255 的像素统一替换为目标背景色

use image::{DynamicImage, Rgb, RgbImage, Rgba};

/// 将任意颜色模式的图片转换为不透明 RGB。
///
/// 有 alpha 通道时以 alpha 作为混合权重叠加到 `background` 上；
/// 否则直接转换为三通道。
pub fn flatten_onto_background(image: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    RgbImage::from_fn(width, height, |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        Rgb([
            blend_channel(r, background[0], a),
            blend_channel(g, background[1], a),
            blend_channel(b, background[2], a),
        ])
    })
}

fn blend_channel(source: u8, background: u8, alpha: u8) -> u8 {
    let alpha = alpha as u32;
    let value = source as u32 * alpha + background as u32 * (255 - alpha);
    ((value + 127) / 255) as u8
}

/// 将近白像素替换为 `target`，返回被替换的像素数。
///
/// 三个通道都必须 `>= 255 - tolerance`（含边界）才算近白。
pub fn replace_near_white(image: &mut RgbImage, target: Rgb<u8>, tolerance: u8) -> usize {
    let threshold = u8::MAX.saturating_sub(tolerance);
    let mut replaced = 0;

    for pixel in image.pixels_mut() {
        if pixel.0.iter().all(|&channel| channel >= threshold) {
            *pixel = target;
            replaced += 1;
        }
    }

    replaced
}
