//! Collection root scanning.
//!
//! Every collection uses the same on-disk layout: one folder per item, each
//! holding a single hand-written `index.html`.
//!
//! ```text
//! posts/                           # Collection root
//! ├── index.html                   # Ignored (not a folder)
//! ├── late-night-beans/
//! │   └── index.html               # One item, slug "late-night-beans"
//! ├── drafts-notes/                # Ignored (no index.html)
//! │   └── notes.txt
//! └── first-post/
//!     └── index.html
//! ```
//!
//! [`scan_items`] visits item folders in file-name order, extracts each
//! page's [`Metadata`], and hands it to a builder closure together with the
//! slug. A missing root is not an error: the collection is simply empty. An
//! item that cannot be read is logged and skipped so one bad page never
//! blocks the rest of the build.

use crate::extract::{self, Metadata};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error listing {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// One item folder under a collection root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDir {
    pub slug: String,
    /// Path to the item's `index.html`
    pub index_path: PathBuf,
}

/// List item folders that contain an `index.html`, sorted by folder name.
///
/// Returns an empty list when `root` doesn't exist.
pub fn item_dirs(root: &Path) -> Result<Vec<ItemDir>, ScanError> {
    if !root.is_dir() {
        tracing::info!(root = %root.display(), "collection root not found, skipping");
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let slug = entry.file_name().to_string_lossy().to_string();
        if slug.starts_with('.') {
            continue;
        }
        let index_path = entry.path().join("index.html");
        if !index_path.is_file() {
            tracing::debug!(%slug, "no index.html, skipping");
            continue;
        }
        items.push(ItemDir { slug, index_path });
    }
    Ok(items)
}

/// Extract every item under `root` and build one record per item.
///
/// Items whose page can't be read are logged with their slug and skipped.
pub fn scan_items<T>(
    root: &Path,
    mut build: impl FnMut(&str, &Metadata) -> T,
) -> Result<Vec<T>, ScanError> {
    let mut records = Vec::new();
    for item in item_dirs(root)? {
        match fs::read_to_string(&item.index_path) {
            Ok(markup) => {
                let meta = extract::extract(&markup);
                records.push(build(&item.slug, &meta));
                tracing::info!(slug = %item.slug, "processed");
            }
            Err(err) => {
                tracing::warn!(slug = %item.slug, %err, "error processing item, skipping");
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_item;
    use tempfile::TempDir;

    #[test]
    fn missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let items = item_dirs(&tmp.path().join("nope")).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn root_that_is_a_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("posts");
        fs::write(&file, "not a dir").unwrap();
        assert!(item_dirs(&file).unwrap().is_empty());
    }

    #[test]
    fn item_dirs_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        for slug in ["charlie", "alpha", "bravo"] {
            write_item(tmp.path(), slug, "<h1>x</h1>");
        }
        let slugs: Vec<String> = item_dirs(tmp.path())
            .unwrap()
            .into_iter()
            .map(|i| i.slug)
            .collect();
        assert_eq!(slugs, vec!["alpha", "bravo", "charlie"]);
    }

    #[test]
    fn folders_without_index_and_loose_files_skipped() {
        let tmp = TempDir::new().unwrap();
        write_item(tmp.path(), "real", "<h1>Real</h1>");
        fs::create_dir_all(tmp.path().join("empty")).unwrap();
        fs::write(tmp.path().join("index.html"), "<h1>Listing</h1>").unwrap();
        fs::write(tmp.path().join("stray.html"), "<h1>Flat</h1>").unwrap();

        let items = item_dirs(tmp.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].slug, "real");
        assert_eq!(items[0].index_path, tmp.path().join("real/index.html"));
    }

    #[test]
    fn hidden_folders_skipped() {
        let tmp = TempDir::new().unwrap();
        write_item(tmp.path(), ".cache", "<h1>Hidden</h1>");
        write_item(tmp.path(), "shown", "<h1>Shown</h1>");
        let items = item_dirs(tmp.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].slug, "shown");
    }

    #[test]
    fn scan_items_passes_slug_and_metadata() {
        let tmp = TempDir::new().unwrap();
        write_item(tmp.path(), "first", "<h1>First Title</h1>");
        write_item(tmp.path(), "second", "<p>no heading</p>");

        let records = scan_items(tmp.path(), |slug, meta| {
            (slug.to_string(), meta.title.clone())
        })
        .unwrap();

        assert_eq!(
            records,
            vec![
                ("first".to_string(), Some("First Title".to_string())),
                ("second".to_string(), None),
            ]
        );
    }

    #[test]
    fn unreadable_item_skipped() {
        let tmp = TempDir::new().unwrap();
        write_item(tmp.path(), "good", "<h1>Good</h1>");
        let bad = tmp.path().join("bad");
        fs::create_dir_all(&bad).unwrap();
        // Invalid UTF-8 fails read_to_string
        fs::write(bad.join("index.html"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let records = scan_items(tmp.path(), |slug, _| slug.to_string()).unwrap();
        assert_eq!(records, vec!["good"]);
    }
}
