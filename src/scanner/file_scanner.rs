//! Directory scanning for gallery input.
//!
//! - Recursive directory scanning using walkdir
//! - Media type detection by file extension
//! - mtime/size capture for ratio cache keys
//!
//! Dimensions are not read here; the image resolver probes them lazily.

use std::path::Path;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use tokio::task;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::MediaItem;

/// Configuration for the file scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to scan directories recursively.
    pub recursive: bool,
    /// Maximum directory depth (0 = unlimited).
    pub max_depth: usize,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: 0, // unlimited
            follow_symlinks: false,
        }
    }
}

/// Scans `dir` on the blocking pool and returns image items sorted by path.
pub async fn scan_images(dir: &Path, config: &ScanConfig) -> Result<Vec<MediaItem>> {
    let dir = dir.to_path_buf();
    let config = config.clone();
    task::spawn_blocking(move || discover_images(&dir, &config))
        .await
        .context("Scan task panicked")?
}

/// Discovers all image files in a directory.
pub fn discover_images(dir: &Path, config: &ScanConfig) -> Result<Vec<MediaItem>> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }
    info!("Starting scan of {:?}", dir);

    let mut walker = WalkDir::new(dir).follow_links(config.follow_symlinks);
    if !config.recursive {
        walker = walker.max_depth(1);
    } else if config.max_depth > 0 {
        walker = walker.max_depth(config.max_depth);
    }

    let mut items = Vec::new();

    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !MediaItem::is_image_extension(ext) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("Failed to read metadata for {:?}: {}", path, e);
                continue;
            }
        };

        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        items.push(MediaItem::unprobed(
            path.to_path_buf(),
            mtime,
            metadata.len() as i64,
        ));
    }

    // Sort by path for consistent ordering
    items.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("Discovered {} images", items.len());

    Ok(items)
}
