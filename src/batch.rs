//! 批处理编排模块
//!
//! # 设计思路
//!
//! 严格串行：一张图片读取、变换、写盘完成后才开始下一张。
//! 跨文件共享的只有“旧名 → 新名”映射（只追加、单写者）。
//!
//! # 实现思路
//!
//! 1. 目录表模式先确认目录表存在，不存在直接中止（此时尚未触碰任何图片）
//! 2. 扫描工作目录，可选创建备份目录
//! 3. 逐张处理：失败只记录并跳过；重命名模式下写盘成功才删除原图
//! 4. 有映射时改写目录表；改写失败只报告警告，不回滚已重命名的图片

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{FilenameMapping, PatchReport, patch_catalog};
use crate::error::AppError;
use crate::image_handler::{ImageHandler, ProcessedImage};
use crate::settings::BatchSettings;
use crate::storage;

/// 单个文件的失败记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_name: String,
    pub reason: String,
}

/// 目录表步骤的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOutcome {
    /// 未配置目录表，或没有任何文件被重命名。
    Skipped,
    Patched(PatchReport),
    /// 改写失败（例如找不到 URL 列），图片重命名不回滚。
    Failed(String),
}

/// 一次批处理的汇总。
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<FileFailure>,
    pub mapping: FilenameMapping,
    pub catalog: CatalogOutcome,
}

impl BatchSummary {
    fn empty() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failures: Vec::new(),
            mapping: FilenameMapping::new(),
            catalog: CatalogOutcome::Skipped,
        }
    }
}

/// 目录表模式下定位目录表文件；文件缺失时返回 `AppError::CatalogMissing`。
pub fn locate_catalog(dir: &Path, settings: &BatchSettings) -> Result<Option<PathBuf>, AppError> {
    let Some(name) = settings.catalog_file.as_deref() else {
        return Ok(None);
    };

    let path = dir.join(name);
    if !path.is_file() {
        return Err(AppError::CatalogMissing(path));
    }
    Ok(Some(path))
}

/// 单个文件处理成功后的控制台输出行。
fn processed_line(
    file_name: &str,
    processed: &ProcessedImage,
    padding: u32,
    new_name: Option<&str>,
) -> String {
    let dims = format!(
        "{}x{} → {}x{}，留白 {}px",
        processed.source_width,
        processed.source_height,
        processed.final_size,
        processed.final_size,
        padding
    );
    match new_name {
        Some(new_name) => format!("✓ 已处理并重命名: {} → {}（{}）", file_name, new_name, dims),
        None => format!("✓ 已处理: {}（{}）", file_name, dims),
    }
}

/// 批处理执行器。
pub struct BatchRunner {
    settings: BatchSettings,
    handler: ImageHandler,
}

impl BatchRunner {
    pub fn new(settings: BatchSettings) -> Result<Self, AppError> {
        settings.validate()?;
        let handler = ImageHandler::new(settings.normalize.clone())?;
        Ok(Self { settings, handler })
    }

    /// 以当前时间戳处理 `dir` 下的全部图片。
    pub fn run(&self, dir: &Path) -> Result<BatchSummary, AppError> {
        self.run_at(dir, chrono::Utc::now().timestamp())
    }

    /// 以指定时间戳处理；同一次运行内所有重命名共用该时间戳。
    pub fn run_at(&self, dir: &Path, timestamp: i64) -> Result<BatchSummary, AppError> {
        let catalog_path = locate_catalog(dir, &self.settings)?;
        let files = storage::list_images(dir, &self.settings.extensions)?;

        if files.is_empty() {
            println!("✗ 目录中没有找到图片：{}", dir.display());
            return Ok(BatchSummary::empty());
        }
        println!("✓ 找到 {} 张图片待处理", files.len());

        let backup_dir = if self.settings.create_backup {
            let backup_dir = storage::ensure_backup_dir(dir, &self.settings.backup_dir_name)?;
            println!("✓ 原图将备份到：{}", backup_dir.display());
            Some(backup_dir)
        } else {
            None
        };

        let mut summary = BatchSummary::empty();
        summary.total = files.len();

        for path in &files {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            if let Some(backup_dir) = &backup_dir {
                if let Err(err) = storage::backup_original(path, backup_dir) {
                    log::warn!("⚠️ 备份失败 {}: {}", file_name, err);
                    println!("⚠ 无法备份 {}: {}", file_name, err);
                }
            }

            match self.process_one(path, &file_name, timestamp) {
                Ok((processed, new_name)) => {
                    println!(
                        "{}",
                        processed_line(
                            &file_name,
                            &processed,
                            self.settings.normalize.padding,
                            new_name.as_deref()
                        )
                    );
                    if let Some(new_name) = new_name {
                        summary.mapping.insert(file_name, new_name);
                    }
                    summary.succeeded += 1;
                }
                Err(err) => {
                    log::error!("❌ 处理失败 {}: {}", file_name, err);
                    println!("✗ 处理失败: {}: {}", file_name, err);
                    summary.failures.push(FileFailure {
                        file_name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        println!("处理完成: {}/{} 张图片成功", summary.succeeded, summary.total);

        summary.catalog = match catalog_path {
            Some(csv_path) if !summary.mapping.is_empty() => {
                self.patch_catalog_step(&csv_path, &summary.mapping)
            }
            _ => CatalogOutcome::Skipped,
        };

        Ok(summary)
    }

    /// 处理单个文件；重命名模式下同时返回新文件名。
    fn process_one(
        &self,
        path: &Path,
        file_name: &str,
        timestamp: i64,
    ) -> Result<(ProcessedImage, Option<String>), AppError> {
        if !self.settings.rename_with_timestamp {
            let processed = self.handler.process_file(path, path)?;
            return Ok((processed, None));
        }

        let new_name = storage::timestamped_file_name(file_name, timestamp);
        let output = path.with_file_name(&new_name);
        let processed = self.handler.process_file(path, &output)?;

        if let Err(err) = fs::remove_file(path) {
            log::warn!("⚠️ 删除原图失败 {}: {}", file_name, err);
        }

        Ok((processed, Some(new_name)))
    }

    fn patch_catalog_step(&self, csv_path: &Path, mapping: &FilenameMapping) -> CatalogOutcome {
        println!("📝 正在更新目录表：{}", csv_path.display());

        match patch_catalog(csv_path, mapping, &self.settings.catalog) {
            Ok(report) => {
                println!(
                    "✓ 目录表已更新：列 {}，{} 条 URL 被修改，备份：{}",
                    report.column_name,
                    report.updated_rows,
                    report.backup_path.display()
                );
                CatalogOutcome::Patched(report)
            }
            Err(err) => {
                log::warn!("⚠️ 目录表更新中止: {}", err);
                println!("⚠ 目录表更新中止：{}（已重命名的图片不会回滚）", err);
                CatalogOutcome::Failed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PipelineMode;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("normalize-images-batch-test-{nanos}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn locate_catalog_is_noop_without_catalog_file() {
        let settings = BatchSettings::for_mode(PipelineMode::Square);
        let found = locate_catalog(Path::new("/nowhere"), &settings).expect("no catalog needed");
        assert!(found.is_none());
    }

    #[test]
    fn missing_catalog_aborts_before_touching_images() {
        let dir = unique_temp_dir();
        fs::write(dir.join("a.jpg"), b"not really an image").expect("write file");

        let runner = BatchRunner::new(BatchSettings::for_mode(PipelineMode::Catalog)).expect("runner");
        let result = runner.run_at(&dir, 1);

        assert!(matches!(result, Err(AppError::CatalogMissing(_))));
        assert_eq!(fs::read(dir.join("a.jpg")).expect("untouched"), b"not really an image");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_directory_yields_empty_summary() {
        let dir = unique_temp_dir();
        let runner = BatchRunner::new(BatchSettings::for_mode(PipelineMode::Square)).expect("runner");
        let summary = runner.run_at(&dir, 1).expect("run");

        assert_eq!(summary.total, 0);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.catalog, CatalogOutcome::Skipped);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn broken_file_is_skipped_not_fatal() {
        let dir = unique_temp_dir();
        fs::write(dir.join("broken.png"), b"garbage").expect("write file");

        let runner = BatchRunner::new(BatchSettings::for_mode(PipelineMode::Square)).expect("runner");
        let summary = runner.run_at(&dir, 1).expect("run");

        assert_eq!(summary.total, 1);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].file_name, "broken.png");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn oversized_padding_fails_per_file_and_batch_continues() {
        let dir = unique_temp_dir();
        image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]))
            .save_with_format(dir.join("tiny.png"), image::ImageFormat::Png)
            .expect("write png");

        let mut settings = BatchSettings::for_mode(PipelineMode::Square);
        settings.normalize.padding = 50_000;
        let runner = BatchRunner::new(settings).expect("runner");
        let summary = runner.run_at(&dir, 1).expect("run");

        assert_eq!(summary.total, 1);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].reason.contains("资源限制"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn processed_line_reports_source_dimensions() {
        let processed = ProcessedImage {
            output_path: PathBuf::from("a_1.jpg"),
            source_width: 100,
            source_height: 60,
            final_size: 256,
        };

        assert_eq!(
            processed_line("a.jpg", &processed, 20, None),
            "✓ 已处理: a.jpg（100x60 → 256x256，留白 20px）"
        );
        assert_eq!(
            processed_line("a.jpg", &processed, 20, Some("a_1.jpg")),
            "✓ 已处理并重命名: a.jpg → a_1.jpg（100x60 → 256x256，留白 20px）"
        );
    }

    #[test]
    fn invalid_settings_are_rejected_up_front() {
        let mut settings = BatchSettings::for_mode(PipelineMode::Square);
        settings.normalize.jpeg_quality = 0;
        assert!(matches!(BatchRunner::new(settings), Err(AppError::Config(_))));
    }
}
