// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Filesystem-backed source store: downloads a zip archive and extracts it
//! under `{unpack_root}/{revision_key}/`.

use std::collections::HashSet;
use std::path::PathBuf;

use aim_core::{AimError, RevisionKey, Runtime};
use async_trait::async_trait;
use reqwest::Client;

use super::SourceStore;

pub struct FsSourceStore {
    client: Client,
    unpack_root: PathBuf,
}

impl FsSourceStore {
    pub fn new(unpack_root: impl Into<PathBuf>) -> Self {
        Self { client: Client::new(), unpack_root: unpack_root.into() }
    }

    fn revision_root(&self, revision_key: &RevisionKey) -> PathBuf {
        self.unpack_root.join(revision_key.to_string())
    }
}

#[async_trait]
impl SourceStore for FsSourceStore {
    async fn ensure(&self, revision_key: &RevisionKey, source_url: &str, runtime: Runtime) -> Result<(), AimError> {
        let app_dir = self.app_directory(revision_key);
        if app_dir.is_dir() {
            return Ok(());
        }

        let bytes = self
            .client
            .get(source_url)
            .send()
            .await
            .map_err(|err| AimError::SourceStore(format!("fetching {source_url}: {err}")))?
            .bytes()
            .await
            .map_err(|err| AimError::SourceStore(format!("reading {source_url}: {err}")))?;

        tokio::fs::create_dir_all(&app_dir)
            .await
            .map_err(|err| AimError::SourceStore(format!("creating {}: {err}", app_dir.display())))?;

        let app_dir_clone = app_dir.clone();
        tokio::task::spawn_blocking(move || extract_zip(&bytes, &app_dir_clone))
            .await
            .map_err(|err| AimError::SourceStore(format!("extraction task panicked: {err}")))??;

        if matches!(runtime, Runtime::Go) {
            let gopath = self.gopath_directory(revision_key);
            tokio::fs::create_dir_all(&gopath)
                .await
                .map_err(|err| AimError::SourceStore(format!("creating {}: {err}", gopath.display())))?;
        }

        Ok(())
    }

    fn app_directory(&self, revision_key: &RevisionKey) -> PathBuf {
        self.revision_root(revision_key).join("app")
    }

    fn gopath_directory(&self, revision_key: &RevisionKey) -> PathBuf {
        self.revision_root(revision_key).join("gopath")
    }

    async fn clean_old_revisions(&self, active_revisions: &HashSet<String>) -> Result<(), AimError> {
        let mut read_dir = match tokio::fs::read_dir(&self.unpack_root).await {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(AimError::SourceStore(format!("reading unpack root: {err}"))),
        };

        while let Some(entry) =
            read_dir.next_entry().await.map_err(|err| AimError::SourceStore(format!("scanning unpack root: {err}")))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if active_revisions.contains(&name) {
                continue;
            }
            tokio::fs::remove_dir_all(entry.path())
                .await
                .map_err(|err| AimError::SourceStore(format!("removing {name}: {err}")))?;
        }
        Ok(())
    }
}

fn extract_zip(bytes: &[u8], dest: &std::path::Path) -> Result<(), AimError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|err| AimError::SourceStore(format!("opening archive: {err}")))?;
    archive.extract(dest).map_err(|err| AimError::SourceStore(format!("extracting archive: {err}")))?;
    Ok(())
}
