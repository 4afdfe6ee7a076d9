use crate::utils::Result;
use image::ImageReader;
use std::fs;
use std::path::{Path, PathBuf};

/// What to include while scanning
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Descend into sub-directories
    pub recursive: bool,
    /// Include entries whose names start with '.'
    pub show_hidden: bool,
}

/// An item found in a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Image { name: String, path: PathBuf },
    Directory { name: String, entries: Vec<Entry> },
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Image { name, .. } | Entry::Directory { name, .. } => name,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Entry::Image { .. })
    }

    /// Number of images in this entry and below
    pub fn image_count(&self) -> usize {
        match self {
            Entry::Image { .. } => 1,
            Entry::Directory { entries, .. } => entries.iter().map(Entry::image_count).sum(),
        }
    }
}

/// List the readable images in `dir`, and its sub-directories if recursive.
///
/// Images come first, then directories, each ordered case-insensitively.
/// Directories without any image are left out.
pub fn scan_dir(dir: &Path, options: ScanOptions) -> Result<Vec<Entry>> {
    let mut images = Vec::new();
    let mut dirs = Vec::new();

    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') && !options.show_hidden {
            continue;
        }

        // Follows symlinks; broken links fail here and are skipped
        let path = dir_entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if metadata.is_file() {
            if is_readable_image(&path) {
                images.push(Entry::Image { name, path });
            }
        } else if metadata.is_dir() && options.recursive {
            match scan_dir(&path, options) {
                Ok(entries) if !entries.is_empty() => dirs.push(Entry::Directory { name, entries }),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping directory {}: {}", path.display(), e),
            }
        }
    }

    images.sort_by_key(|e| e.name().to_lowercase());
    dirs.sort_by_key(|e| e.name().to_lowercase());
    images.extend(dirs);

    log::debug!("Found {} entries in {}", images.len(), dir.display());
    Ok(images)
}

/// Whether the file's header identifies a decodable image
fn is_readable_image(path: &Path) -> bool {
    let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("{} could not be read: {}", path.display(), e);
            return false;
        }
    };

    if reader.format().is_none() {
        // Non-image files are expected in most directories
        return false;
    }

    match reader.into_dimensions() {
        Ok(_) => true,
        Err(e) => {
            log::warn!("{} could not be read: {}", path.display(), e);
            false
        }
    }
}
