//! Download operations.

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use reqwest::Method;
use tracing::debug;

use super::utils::{base_name, ensure_trailing_slash, extension, join};
use crate::error::Result;
use crate::fs::node::EntryKind;
use crate::fs::report::DownloadReport;
use crate::session::Session;

impl Session {
    /// Download a remote file or folder.
    ///
    /// Without `local_path` the object's bytes are returned untouched. With
    /// one, a file is written either exactly at `local_path` (when both
    /// sides share the same extension) or inside it under its remote name.
    /// Folders are mirrored below `local_path`.
    ///
    /// # Arguments
    /// * `remote_path` - Remote file or folder
    /// * `local_path` - Local destination, or `None` to get the bytes back
    /// * `known` - Kind of `remote_path` if already known; skips the `HEAD` probe
    ///
    /// # Example
    /// ```no_run
    /// # use std::path::Path;
    /// # use upyunlib::{ClientConfig, Credential, DownloadReport, Session};
    /// # async fn example() -> upyunlib::Result<()> {
    /// # let session = Session::new(Credential::new("b", "u", "p"), ClientConfig::default());
    /// if let DownloadReport::Bytes { data, .. } = session.download("/a.bin", None, None).await? {
    ///     println!("{} bytes", data.len());
    /// }
    /// session
    ///     .download("/photos", Some(Path::new("backup/photos")), None)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download(
        &self,
        remote_path: &str,
        local_path: Option<&Path>,
        known: Option<EntryKind>,
    ) -> Result<DownloadReport> {
        let target = match local_path {
            Some(path) => Target::Resolve(path.to_path_buf()),
            None => Target::Memory,
        };
        self.download_path(remote_path.to_string(), target, known)
            .await
    }

    fn download_path(
        &self,
        remote: String,
        target: Target,
        known: Option<EntryKind>,
    ) -> BoxFuture<'_, Result<DownloadReport>> {
        async move {
            let kind = match known {
                Some(kind) => kind,
                None => self.get_info(&remote).await?.kind,
            };

            if kind.is_folder() {
                let folder = ensure_trailing_slash(&remote);
                let entries = self.list(&folder, false).await?;
                debug!(remote = %folder, children = entries.len(), "downloading folder");

                let dir = target.path();
                let children: Vec<_> = stream::iter(entries)
                    .map(|entry| {
                        let child = join(&folder, &entry.name);
                        let local = dir.map(|dir| dir.join(&entry.name));
                        match entry.kind {
                            EntryKind::Folder => self.download_path(
                                ensure_trailing_slash(&child),
                                local.map_or(Target::Memory, Target::Resolve),
                                Some(EntryKind::Folder),
                            ),
                            EntryKind::File => self.download_path(
                                child,
                                local.map_or(Target::Memory, Target::Exact),
                                Some(EntryKind::File),
                            ),
                        }
                    })
                    .buffered(self.fan_out())
                    .collect()
                    .await;

                return Ok(DownloadReport::Folder {
                    remote_path: folder,
                    children,
                });
            }

            let response = self.api().probe(&remote, Method::GET).await?;
            let data = response.body;

            let target = match target {
                Target::Memory => {
                    return Ok(DownloadReport::Bytes {
                        remote_path: remote,
                        data,
                    })
                }
                Target::Resolve(local) => destination(&remote, &local),
                Target::Exact(path) => path,
            };

            if let Some(parent) = target.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            tokio::fs::write(&target, &data).await?;
            debug!(remote = %remote, local = %target.display(), bytes = data.len(), "downloaded file");

            Ok(DownloadReport::Saved {
                remote_path: remote,
                local_path: target,
                size: data.len() as u64,
            })
        }
        .boxed()
    }
}

/// Local side of a download.
enum Target {
    /// Hand the bytes back to the caller.
    Memory,
    /// Caller supplied path, placed with [`destination`].
    Resolve(PathBuf),
    /// Exact file path of a folder child.
    Exact(PathBuf),
}

impl Target {
    fn path(&self) -> Option<&Path> {
        match self {
            Target::Memory => None,
            Target::Resolve(path) | Target::Exact(path) => Some(path),
        }
    }
}

/// Where a remote file lands locally.
///
/// Same extension on both sides means `local` names the file itself;
/// otherwise `local` is a directory and the remote base name is used.
fn destination(remote: &str, local: &Path) -> PathBuf {
    let source_ext = extension(remote);
    let dest_ext = local.extension().and_then(|ext| ext.to_str());
    if source_ext.is_some() && source_ext == dest_ext {
        local.to_path_buf()
    } else {
        local.join(base_name(remote))
    }
}
