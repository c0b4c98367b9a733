//! 收据打包服务 - 业务能力层

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;

/// 打包结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub path: PathBuf,
    /// 压缩包内的条目名（相对收据目录，`/` 分隔）
    pub entries: Vec<String>,
}

/// 把 `source_dir` 下的所有文件写入 `zip_path`
///
/// 每次调用都从目录当前内容重写压缩包。目录不存在时生成空压缩包。
pub fn create_zip(source_dir: &Path, zip_path: &Path) -> Result<ArchiveReport, ArchiveError> {
    if let Some(parent) = zip_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut zip = ZipWriter::new(File::create(zip_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::new();

    if source_dir.is_dir() {
        for entry in WalkDir::new(source_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry_name(source_dir, entry.path());
            zip.start_file(name.as_str(), options)?;
            io::copy(&mut File::open(entry.path())?, &mut zip)?;
            entries.push(name);
        }
    } else {
        warn!("收据目录不存在: {}，将生成空压缩包", source_dir.display());
    }

    zip.finish()?;

    Ok(ArchiveReport {
        path: zip_path.to_path_buf(),
        entries,
    })
}

/// 打包收据，失败只记录日志
pub fn archive_receipts(receipts_dir: &Path, zip_path: &Path) -> Option<ArchiveReport> {
    match create_zip(receipts_dir, zip_path) {
        Ok(report) => {
            info!(
                "🗜️ 收据已打包: {} ({} 个文件)",
                report.path.display(),
                report.entries.len()
            );
            Some(report)
        }
        Err(e) => {
            warn!("打包收据失败: {}", e);
            None
        }
    }
}

fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    fn names_in(zip_path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(zip_path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_preserves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let receipts = dir.path().join("receipts");
        fs::create_dir_all(receipts.join("nested")).unwrap();
        fs::write(receipts.join("order_1_results.pdf"), b"one").unwrap();
        fs::write(receipts.join("nested").join("order_2_results.pdf"), b"two").unwrap();
        let zip_path = dir.path().join("receipts.zip");

        let report = create_zip(&receipts, &zip_path).unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(
            names_in(&zip_path),
            vec!["nested/order_2_results.pdf", "order_1_results.pdf"]
        );
    }

    #[test]
    fn test_rerun_rewrites_same_entries() {
        let dir = tempfile::tempdir().unwrap();
        let receipts = dir.path().join("receipts");
        fs::create_dir_all(&receipts).unwrap();
        fs::write(receipts.join("order_1_results.pdf"), b"one").unwrap();
        fs::write(receipts.join("order_2_results.pdf"), b"two").unwrap();
        let zip_path = dir.path().join("receipts.zip");

        create_zip(&receipts, &zip_path).unwrap();
        let first = names_in(&zip_path);
        create_zip(&receipts, &zip_path).unwrap();
        let second = names_in(&zip_path);

        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_missing_directory_gives_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("receipts.zip");

        let report = archive_receipts(&dir.path().join("missing"), &zip_path).unwrap();

        assert!(report.entries.is_empty());
        assert!(names_in(&zip_path).is_empty());
    }
}
