use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::path::{Path, PathBuf};

use super::{CatalogError, CatalogOptions, FilenameMapping};

/// 一次改写的结果摘要。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub column_name: String,
    pub column_index: usize,
    pub updated_rows: usize,
    pub backup_path: PathBuf,
}

/// 在表头中查找第一个包含任一关键词的列。
pub fn find_url_column(header: &StringRecord, hints: &[String]) -> Option<usize> {
    let hints: Vec<String> = hints.iter().map(|h| h.to_lowercase()).collect();
    header.iter().position(|name| {
        let name = name.to_lowercase();
        hints.iter().any(|hint| !hint.is_empty() && name.contains(hint.as_str()))
    })
}

/// `lego_parts2.csv` → `lego_parts2_backup.csv`
pub fn backup_path_for(csv_path: &Path) -> PathBuf {
    let stem = csv_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_name = match csv_path.extension() {
        Some(ext) => format!("{}_backup.{}", stem, ext.to_string_lossy()),
        None => format!("{}_backup", stem),
    };
    csv_path.with_file_name(file_name)
}

/// 改写目录表中引用了已重命名图片的 URL。
///
/// 顺序：读取全部行 → 定位 URL 列 → 内存中替换 → 备份原文件 → 回写。
/// 找不到 URL 列时不备份也不写入。
pub fn patch_catalog(
    csv_path: &Path,
    mapping: &FilenameMapping,
    options: &CatalogOptions,
) -> Result<PatchReport, CatalogError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)?;

    let mut rows: Vec<StringRecord> = Vec::new();
    for record in reader.records() {
        rows.push(record?);
    }

    let header = rows
        .first()
        .ok_or_else(|| CatalogError::MissingHeader(csv_path.to_path_buf()))?;

    let column_index = find_url_column(header, &options.column_hints).ok_or_else(|| {
        CatalogError::UrlColumnNotFound {
            header: header.iter().map(str::to_string).collect(),
            hints: options.column_hints.clone(),
        }
    })?;
    let column_name = header.get(column_index).unwrap_or_default().to_string();

    log::info!("✓ 找到 URL 列：{}（index {}）", column_name, column_index);

    let mut updated_rows = 0;
    for row in rows.iter_mut().skip(1) {
        let Some(old_url) = row.get(column_index) else {
            continue;
        };
        let Some(new_url) = rewrite_url(old_url, mapping, options.url_marker.as_deref()) else {
            continue;
        };

        log::debug!("📝 {} → {}", old_url, new_url);
        *row = replace_field(row, column_index, &new_url);
        updated_rows += 1;
    }

    let backup_path = backup_path_for(csv_path);
    std::fs::copy(csv_path, &backup_path)?;
    log::info!("✓ 已备份原目录表：{}", backup_path.display());

    let mut writer = WriterBuilder::new().flexible(true).from_path(csv_path)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    log::info!("✓ 目录表已更新：{} 条 URL 被修改", updated_rows);

    Ok(PatchReport {
        column_name,
        column_index,
        updated_rows,
        backup_path,
    })
}

/// 计算替换后的 URL；无需替换时返回 `None`。
fn rewrite_url(url: &str, mapping: &FilenameMapping, marker: Option<&str>) -> Option<String> {
    match marker.filter(|m| !m.is_empty()) {
        Some(marker) => {
            let (_, old_filename) = url.rsplit_once(marker)?;
            let new_filename = mapping.get(old_filename)?;
            Some(url.replace(old_filename, new_filename))
        }
        None => {
            // 多个旧文件名同时命中时取最长的，避免 `a.jpg` 误伤 `aa.jpg`
            let (old_filename, new_filename) = mapping
                .iter()
                .filter(|(old, _)| !old.is_empty() && url.contains(old.as_str()))
                .max_by_key(|(old, _)| old.len())?;
            Some(url.replace(old_filename.as_str(), new_filename))
        }
    }
}

fn replace_field(row: &StringRecord, index: usize, value: &str) -> StringRecord {
    row.iter()
        .enumerate()
        .map(|(i, field)| if i == index { value } else { field })
        .collect()
}
