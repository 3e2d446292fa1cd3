//! Filesystem browsing helpers.

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Method;
use tracing::debug;

use super::utils::{ensure_trailing_slash, join};
use crate::error::Result;
use crate::fs::node::{Entry, ObjectInfo};
use crate::session::Session;

impl Session {
    /// Get information about a file or folder.
    ///
    /// Issues a `HEAD` probe; failures are returned, never retried.
    ///
    /// # Arguments
    /// * `path` - Remote path (e.g., "/", "/photos/a.jpg")
    pub async fn get_info(&self, path: &str) -> Result<ObjectInfo> {
        let response = self.api().probe(path, Method::HEAD).await?;
        ObjectInfo::from_response(&response)
    }

    /// List the entries of a folder.
    ///
    /// # Arguments
    /// * `path` - The folder to list (e.g., "/", "/Documents")
    /// * `recursive` - If true, every sub-folder is listed too and attached
    ///   as `children` of its entry
    ///
    /// # Returns
    /// Entries in the order the server returned them
    ///
    /// # Example
    /// ```no_run
    /// # use upyunlib::{ClientConfig, Credential, Session};
    /// # async fn example() -> upyunlib::Result<()> {
    /// # let session = Session::new(Credential::new("b", "u", "p"), ClientConfig::default());
    /// for entry in session.list("/photos", true).await? {
    ///     let nested = entry.children.as_ref().map_or(0, |c| c.len());
    ///     println!("{} ({} children)", entry.name, nested);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, path: &str, recursive: bool) -> Result<Vec<Entry>> {
        self.list_level(ensure_trailing_slash(path), recursive, 0)
            .await
    }

    /// List one folder, descending depth-first before moving to the next record.
    fn list_level(
        &self,
        folder: String,
        recursive: bool,
        depth: usize,
    ) -> BoxFuture<'_, Result<Vec<Entry>>> {
        async move {
            let response = self.api().probe(&folder, Method::GET).await?;
            let body = String::from_utf8_lossy(&response.body);
            let mut entries = parse_listing(&body)?;

            let descend = recursive
                && self
                    .config()
                    .max_list_depth
                    .map_or(true, |max| depth < max);

            if descend {
                for entry in entries.iter_mut().filter(|e| e.is_folder()) {
                    let child = ensure_trailing_slash(&join(&folder, &entry.name));
                    debug!(folder = %child, depth = depth + 1, "listing sub-folder");
                    entry.children = Some(self.list_level(child, true, depth + 1).await?);
                }
            }

            Ok(entries)
        }
        .boxed()
    }
}

/// Parse a directory listing body.
///
/// Records are separated by `\n` and fields by `\t`. Blank lines are skipped.
pub fn parse_listing(body: &str) -> Result<Vec<Entry>> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(Entry::parse_record)
        .collect()
}
