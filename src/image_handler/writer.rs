//! # 输出模块
//!
//! 先在内存中完成 JPEG 编码，再一次性写盘：编码失败时不会留下半截文件，
//! 原地覆盖模式下原图也保持完好。

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use std::path::Path;

use super::{ImageError, ImageHandler};

impl ImageHandler {
    /// 以配置的质量编码为 JPEG 并写入 `path`（已存在则覆盖）。
    pub(super) fn write_jpeg(&self, image: &RgbImage, path: &Path) -> Result<u64, ImageError> {
        let bytes = Self::encode_jpeg(image, self.options.jpeg_quality)?;

        std::fs::write(path, &bytes).map_err(|e| {
            ImageError::FileSystem(format!("写入图片失败：{}（{}）", path.display(), e))
        })?;

        Ok(bytes.len() as u64)
    }

    pub(crate) fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, ImageError> {
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality)
            .encode_image(image)
            .map_err(|e| ImageError::Encode(format!("JPEG 编码失败：{}", e)))?;
        Ok(bytes)
    }
}
