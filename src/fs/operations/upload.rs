//! Upload operations.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tracing::debug;

use super::utils::{ensure_trailing_slash, has_extension, join};
use crate::api::client::{header_name, header_value};
use crate::error::{Result, UpyunError};
use crate::fs::node::MediaMetadata;
use crate::fs::report::UploadReport;
use crate::session::Session;

/// Header telling the server to create missing parent folders.
pub const HEADER_MKDIR: &str = "mkdir";
/// Header marking the target of a `PUT` as a folder.
pub const HEADER_FOLDER: &str = "folder";
/// Opaque secret passed through to the server.
pub const HEADER_CONTENT_SECRET: &str = "content-secret";

/// Build a header map from name/value pairs.
///
/// # Example
/// ```
/// use upyunlib::fs::headers_from_pairs;
///
/// let headers = headers_from_pairs(&[("Content-Type", "text/plain")]).unwrap();
/// assert_eq!(headers["content-type"], "text/plain");
/// ```
pub fn headers_from_pairs(pairs: &[(&str, &str)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        headers.insert(header_name(name)?, header_value(value)?);
    }
    Ok(headers)
}

/// Headers carrying only a `Content-Secret`.
pub fn content_secret_header(secret: &str) -> Result<HeaderMap> {
    headers_from_pairs(&[(HEADER_CONTENT_SECRET, secret)])
}

/// `mkdir: true` overlaid with the caller's headers.
fn upload_headers(extra: Option<HeaderMap>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(HEADER_MKDIR),
        HeaderValue::from_static("true"),
    );
    if let Some(extra) = extra {
        for (name, value) in extra.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }
    headers
}

impl Session {
    /// Upload a local file or directory.
    ///
    /// A file is read and written with a single `PUT` through the dispatcher.
    /// If `remote_path` has no extension-like suffix it is treated as a
    /// folder and the local file name is appended. A directory is walked and
    /// every child uploaded below `remote_path`; folders are created
    /// implicitly by the `mkdir` header, never by a separate call.
    ///
    /// # Arguments
    /// * `local_path` - Local file or directory
    /// * `remote_path` - Remote file path, or folder to upload into
    /// * `headers` - Extra request headers; they override the default `mkdir: true`
    ///
    /// # Example
    /// ```no_run
    /// # use upyunlib::{ClientConfig, Credential, Session, UploadReport};
    /// # async fn example() -> upyunlib::Result<()> {
    /// # let session = Session::new(Credential::new("b", "u", "p"), ClientConfig::default());
    /// // Written to /backup/notes.txt
    /// let report = session.upload("notes.txt", "/backup", None).await?;
    /// if let UploadReport::File { outcome, .. } = report {
    ///     assert!(outcome.is_success());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn upload<P: AsRef<Path>>(
        &self,
        local_path: P,
        remote_path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<UploadReport> {
        let headers = upload_headers(headers);
        self.upload_path(
            local_path.as_ref().to_path_buf(),
            remote_path.to_string(),
            &headers,
            true,
        )
        .await
    }

    /// Upload in-memory content to `remote_path`.
    ///
    /// This is a direct request: it is neither queued nor retried, and a
    /// failure is returned to the caller.
    pub async fn upload_bytes(
        &self,
        data: impl Into<Bytes>,
        remote_path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<MediaMetadata> {
        let response = self
            .api()
            .execute(remote_path, Method::PUT, data.into(), upload_headers(headers))
            .await?;
        Ok(MediaMetadata::from_response(&response))
    }

    fn upload_path<'a>(
        &'a self,
        local: PathBuf,
        remote: String,
        headers: &'a HeaderMap,
        derive_name: bool,
    ) -> BoxFuture<'a, Result<UploadReport>> {
        async move {
            let metadata = tokio::fs::metadata(&local).await?;

            if metadata.is_file() {
                return self.upload_file(&local, &remote, headers, derive_name).await;
            }
            if !metadata.is_dir() {
                return Err(UpyunError::Custom(format!(
                    "Not a file or directory: {}",
                    local.display()
                )));
            }

            let remote_folder = ensure_trailing_slash(&remote);
            let names = uploadable_children(&local).await?;
            debug!(local = %local.display(), remote = %remote_folder, children = names.len(), "uploading directory");

            let children: Vec<_> = stream::iter(names)
                .map(|name| {
                    let child_remote = join(&remote_folder, &name);
                    self.upload_path(local.join(&name), child_remote, headers, false)
                })
                .buffered(self.fan_out())
                .collect()
                .await;

            Ok(UploadReport::Folder {
                remote_path: remote_folder,
                children,
            })
        }
        .boxed()
    }

    async fn upload_file(
        &self,
        local: &Path,
        remote: &str,
        headers: &HeaderMap,
        derive_name: bool,
    ) -> Result<UploadReport> {
        let (remote_path, filename) = if derive_name && !has_extension(remote) {
            let name = local
                .file_name()
                .ok_or_else(|| UpyunError::Custom("Invalid file path".to_string()))?
                .to_string_lossy()
                .to_string();
            (join(remote, &name), Some(name))
        } else {
            (remote.to_string(), None)
        };

        debug!(local = %local.display(), remote = %remote_path, "uploading file");
        // Contents are read only once a dispatcher slot is held.
        let outcome = self
            .dispatcher()
            .submit(|| {
                let remote_path = remote_path.as_str();
                async move {
                    let data = Bytes::from(tokio::fs::read(local).await?);
                    self.api()
                        .execute(remote_path, Method::PUT, data, headers.clone())
                        .await
                }
            })
            .await;

        Ok(UploadReport::File {
            remote_path,
            filename,
            outcome: outcome.map(|response| MediaMetadata::from_response(&response)),
        })
    }
}

/// Names of the regular files and directories directly inside `dir`, sorted.
async fn uploadable_children(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        // Follows symlinks; dangling links and special files are skipped.
        match tokio::fs::metadata(entry.path()).await {
            Ok(meta) if meta.is_file() || meta.is_dir() => {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
            _ => debug!(path = %entry.path().display(), "skipping entry"),
        }
    }
    names.sort();
    Ok(names)
}
