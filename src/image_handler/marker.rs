//! # 防缓存标记模块
//!
//! 下游图片缓存按内容哈希去重，重新上传的同名图片可能被判定为“未变化”。
//! 这里提供两种互相独立、可叠加的确定性标记：
//!
//! - 边框：最外圈 `border_width` 像素覆盖为接近背景的固定颜色
//! - 角点扰动：四个角各改动一个通道 ±1，肉眼不可见但会改变内容哈希

use image::{Rgb, RgbImage};

/// 覆盖四条边最外侧 `border_width` 行 / 列。
pub fn apply_border_pattern(image: &mut RgbImage, border_width: u32, color: Rgb<u8>) {
    if border_width == 0 {
        return;
    }

    let (width, height) = image.dimensions();
    let right = width.saturating_sub(border_width);
    let bottom = height.saturating_sub(border_width);

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        if x < border_width || y < border_width || x >= right || y >= bottom {
            *pixel = color;
        }
    }
}

/// 在四个角写入扰动：左上 R、右上 G、左下 B、右下 R。
pub fn apply_cache_buster(image: &mut RgbImage) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let corners = [
        (0, 0, 0),
        (width - 1, 0, 1),
        (0, height - 1, 2),
        (width - 1, height - 1, 0),
    ];

    for (x, y, channel) in corners {
        let pixel = image.get_pixel_mut(x, y);
        pixel.0[channel] = nudge_channel(pixel.0[channel]);
    }
}

/// 通道值 +1，已是 255 时 -1。
pub fn nudge_channel(value: u8) -> u8 {
    if value < u8::MAX { value + 1 } else { value - 1 }
}
