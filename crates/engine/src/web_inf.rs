// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Locates the `WEB-INF` directory inside an extracted Java application's
//! source tree, so the Java front-end can be pointed at its parent (the
//! exploded war root) rather than at the archive root itself.

use std::path::{Path, PathBuf};

const MARKER: &str = "WEB-INF";
const MAX_DEPTH: usize = 6;

/// Breadth-first search for the shallowest directory named `WEB-INF` under
/// `app_dir`. Runs on a blocking thread since it walks the filesystem.
pub async fn find(app_dir: &Path) -> Option<PathBuf> {
    let app_dir = app_dir.to_path_buf();
    tokio::task::spawn_blocking(move || find_sync(&app_dir)).await.ok().flatten()
}

fn find_sync(app_dir: &Path) -> Option<PathBuf> {
    let mut frontier = vec![app_dir.to_path_buf()];
    for _ in 0..MAX_DEPTH {
        let mut next = Vec::new();
        for dir in frontier {
            let Ok(entries) = std::fs::read_dir(&dir) else { continue };
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_dir() {
                    continue;
                }
                if path.file_name().and_then(|n| n.to_str()) == Some(MARKER) {
                    return Some(path);
                }
                next.push(path);
            }
        }
        if next.is_empty() {
            return None;
        }
        frontier = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_web_inf_nested_under_app_root() {
        let dir = tempfile::tempdir().unwrap();
        let web_inf = dir.path().join("war").join("WEB-INF");
        std::fs::create_dir_all(&web_inf).unwrap();

        let found = find(dir.path()).await.unwrap();
        assert_eq!(found, web_inf);
    }

    #[tokio::test]
    async fn returns_none_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find(dir.path()).await.is_none());
    }
}
