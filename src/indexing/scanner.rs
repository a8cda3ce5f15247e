use crate::core::error::{Error, Result};
use crate::items::codec::decode;
use crate::items::model::{Item, ItemKind, StoredItem};
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A recognised file that did not make it into the project
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of scanning a project folder
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub items: Vec<StoredItem>,
    pub skipped: Vec<SkippedFile>,
}

/// Load every item in `root`, newest first
pub fn scan(root: &Path) -> Result<Vec<StoredItem>> {
    Ok(scan_with_report(root)?.items)
}

/// Load every item in `root` and report the files that failed to load.
///
/// Only the top level of the folder is read. Files whose name does not end
/// in one of the item extensions are ignored without being reported.
pub fn scan_with_report(root: &Path) -> Result<ScanReport> {
    if !root.exists() {
        return Err(Error::Config(format!(
            "Directory does not exist: {}",
            root.display()
        )));
    }

    if !root.is_dir() {
        return Err(Error::Config(format!(
            "Path is not a directory: {}",
            root.display()
        )));
    }

    let mut report = ScanReport::default();

    // Plain directory listing: no ignore files, hidden files included
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Failed to access project entry: {}", err);
                continue;
            }
        };

        let path = entry.path();
        if entry.depth() == 0 || path.is_dir() {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(kind) = ItemKind::from_file_name(file_name) else {
            continue;
        };

        match load_item(path, kind) {
            Ok(item) => report.items.push(StoredItem {
                file_name: file_name.to_string(),
                item,
            }),
            Err(reason) => {
                warn!(file = %path.display(), %reason, "Skipping unreadable item file");
                report.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        }
    }

    sort_newest_first(&mut report.items);
    debug!(
        root = %root.display(),
        items = report.items.len(),
        skipped = report.skipped.len(),
        "scanned project"
    );

    Ok(report)
}

fn load_item(path: &Path, kind: ItemKind) -> std::result::Result<Item, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    decode(&content, kind).map_err(|e| e.to_string())
}

/// Dated items newest first, then undated items in listing order
pub fn sort_newest_first(items: &mut [StoredItem]) {
    items.sort_by(|a, b| match (a.item.sort_date(), b.item.sort_date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
