//! # 配置模块
//!
//! ## 设计思路
//!
//! 将单张图片归一化的所有“可调参数”集中到 `NormalizeOptions`，保证流水线是
//! `(输入图像, 参数) -> 输出图像` 的纯函数，便于测试与复用。
//! 背景色作为高层语义（white / cream），映射到底层 RGB 值。
//!
//! ## 实现思路
//!
//! - `Default` 提供目录展示用的默认参数（奶油色背景、20px 留白、256px 输出）。
//! - `BackgroundPreset` 负责背景色字符串解析与反向输出。
//! - `parse_color` 同时接受预设名与 `RRGGBB` 十六进制。
//! - `validate` 在构建处理器前拒绝不合理的参数组合。

use image::Rgb;
use image::imageops::FilterType;

use super::ImageError;

/// 纯白背景。
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
/// 奶油色背景 `#FFFFDD`。
pub const CREAM: Rgb<u8> = Rgb([255, 255, 221]);
/// 边框标记默认颜色：接近背景但不相同。
pub const DEFAULT_PATTERN_COLOR: Rgb<u8> = Rgb([220, 220, 190]);

/// 单张图片归一化参数。
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// 填充背景色，同时也是“近白像素”替换的目标色。
    pub background_color: Rgb<u8>,
    /// 正方形化之前四周统一添加的留白（像素）。
    pub padding: u32,
    /// 最终输出边长（像素）。
    pub final_size: u32,
    /// 是否把近白像素替换为背景色。
    pub replace_white: bool,
    /// 近白判定容差：三个通道都 `>= 255 - tolerance` 才算近白。
    pub white_tolerance: u8,
    /// 是否绘制防删除边框。
    pub add_border: bool,
    /// 边框宽度（像素）。
    pub border_width: u32,
    /// 边框颜色。
    pub pattern_color: Rgb<u8>,
    /// 是否在四角写入缓存扰动像素。
    pub add_cache_buster: bool,
    /// JPEG 输出质量（1~100）。
    pub jpeg_quality: u8,
    /// 缩放滤镜。
    pub resize_filter: FilterType,
    /// 读取原始文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            background_color: CREAM,
            padding: 20,
            final_size: 256,
            replace_white: true,
            white_tolerance: 10,
            add_border: false,
            border_width: 2,
            pattern_color: DEFAULT_PATTERN_COLOR,
            add_cache_buster: false,
            jpeg_quality: 95,
            resize_filter: FilterType::Lanczos3,
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
        }
    }
}

impl NormalizeOptions {
    /// 校验参数组合。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use normalize_images::image_handler::NormalizeOptions;
    ///
    /// NormalizeOptions::default().validate()?;
    /// # Ok::<(), normalize_images::image_handler::ImageError>(())
    /// ```
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.final_size == 0 {
            return Err(ImageError::InvalidFormat("final_size 必须大于 0".to_string()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ImageError::InvalidFormat(format!(
                "jpeg_quality 必须在 1~100 之间（当前：{}）",
                self.jpeg_quality
            )));
        }
        if self.add_border && self.border_width >= self.final_size {
            return Err(ImageError::InvalidFormat(format!(
                "border_width（{}）必须小于 final_size（{}）",
                self.border_width, self.final_size
            )));
        }
        if self.max_decoded_pixels == 0 {
            return Err(ImageError::InvalidFormat("max_decoded_pixels 必须大于 0".to_string()));
        }
        Ok(())
    }
}

/// 背景色预设。
///
/// - `White`：纯白，对应最初的“正方形化”脚本
/// - `Cream`：奶油色 `#FFFFDD`，对应目录展示脚本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundPreset {
    White,
    Cream,
}

impl BackgroundPreset {
    pub(crate) fn from_str(name: &str) -> Result<Self, ImageError> {
        match name.trim().to_lowercase().as_str() {
            "white" => Ok(Self::White),
            "cream" => Ok(Self::Cream),
            other => Err(ImageError::InvalidFormat(format!(
                "未知背景色预设：{}（可选：white / cream / RRGGBB）",
                other
            ))),
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Cream => "cream",
        }
    }

    pub fn color(self) -> Rgb<u8> {
        match self {
            Self::White => WHITE,
            Self::Cream => CREAM,
        }
    }
}

/// 解析颜色：预设名（white / cream）或 6 位十六进制（可带 `#`）。
pub fn parse_color(value: &str) -> Result<Rgb<u8>, ImageError> {
    if let Ok(preset) = BackgroundPreset::from_str(value) {
        return Ok(preset.color());
    }

    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ImageError::InvalidFormat(format!(
            "无法解析颜色：{}（可选：white / cream / RRGGBB）",
            value
        )));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|e| ImageError::InvalidFormat(format!("颜色通道解析失败：{}", e)))
    };

    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

/// 将颜色输出为稳定字符串，预设色输出名字，其余输出十六进制。
pub fn format_color(color: Rgb<u8>) -> String {
    for preset in [BackgroundPreset::White, BackgroundPreset::Cream] {
        if preset.color() == color {
            return preset.as_str().to_string();
        }
    }
    format!("{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        NormalizeOptions::default()
            .validate()
            .expect("default options should be valid");
    }

    #[test]
    fn validate_rejects_zero_size_and_bad_quality() {
        let mut options = NormalizeOptions::default();
        options.final_size = 0;
        assert!(matches!(options.validate(), Err(ImageError::InvalidFormat(_))));

        let mut options = NormalizeOptions::default();
        options.jpeg_quality = 0;
        assert!(matches!(options.validate(), Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn validate_rejects_border_wider_than_image() {
        let mut options = NormalizeOptions::default();
        options.add_border = true;
        options.final_size = 2;
        options.border_width = 2;
        assert!(matches!(options.validate(), Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn parse_color_accepts_presets_and_hex() {
        assert_eq!(parse_color("white").expect("white"), WHITE);
        assert_eq!(parse_color(" Cream ").expect("cream"), CREAM);
        assert_eq!(parse_color("#FFFFDD").expect("hex"), CREAM);
        assert_eq!(parse_color("0a0B0c").expect("hex"), Rgb([10, 11, 12]));
    }

    #[test]
    fn parse_color_rejects_garbage() {
        assert!(parse_color("beige").is_err());
        assert!(parse_color("#FFF").is_err());
        assert!(parse_color("GGGGGG").is_err());
    }

    #[test]
    fn format_color_prefers_preset_names() {
        assert_eq!(format_color(CREAM), "cream");
        assert_eq!(format_color(WHITE), "white");
        assert_eq!(format_color(Rgb([1, 2, 255])), "0102FF");
    }
}
