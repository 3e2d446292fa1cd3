//! Directory and node mutation operations.

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tracing::{debug, warn};

use super::upload::{HEADER_FOLDER, HEADER_MKDIR};
use super::utils::{ensure_trailing_slash, join};
use crate::dispatch::DispatchOutcome;
use crate::error::Result;
use crate::fs::node::EntryKind;
use crate::fs::report::RemoveReport;
use crate::session::Session;

impl Session {
    /// Create a folder, including any missing parents.
    pub async fn mkdir(&self, path: &str) -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(HEADER_MKDIR),
            HeaderValue::from_static("true"),
        );
        headers.insert(
            HeaderName::from_static(HEADER_FOLDER),
            HeaderValue::from_static("true"),
        );

        self.api()
            .execute(&ensure_trailing_slash(path), Method::PUT, Bytes::new(), headers)
            .await?;
        Ok(())
    }

    /// Remove a file or a whole folder tree.
    ///
    /// Folders are emptied first: every child is removed, and only once all
    /// of them are done is the folder itself deleted. Deletes go through the
    /// dispatcher, so a delete that fails twice shows up as a dropped
    /// outcome in the report rather than as an error.
    ///
    /// # Example
    /// ```no_run
    /// # use upyunlib::{ClientConfig, Credential, Session, Summary};
    /// # async fn example() -> upyunlib::Result<()> {
    /// # let session = Session::new(Credential::new("b", "u", "p"), ClientConfig::default());
    /// let report = session.remove("/old-backups").await?;
    /// if !report.is_complete() {
    ///     eprintln!("{} deletes did not go through", report.failed());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn remove(&self, path: &str) -> Result<RemoveReport> {
        let info = self.get_info(path).await?;
        self.remove_path(path.to_string(), info.kind).await
    }

    fn remove_path(&self, path: String, kind: EntryKind) -> BoxFuture<'_, Result<RemoveReport>> {
        async move {
            if !kind.is_folder() {
                let outcome = self.delete(&path).await;
                return Ok(RemoveReport {
                    path,
                    outcome: Some(outcome),
                    children: Vec::new(),
                });
            }

            let folder = ensure_trailing_slash(&path);
            let entries = self.list(&folder, false).await?;
            debug!(folder = %folder, children = entries.len(), "removing folder contents");

            let children: Vec<_> = stream::iter(entries)
                .map(|entry| self.remove_path(join(&folder, &entry.name), entry.kind))
                .buffered(self.fan_out())
                .collect()
                .await;

            // The folder is only deleted once it is known to be empty.
            if children.iter().any(|child| child.is_err()) {
                warn!(folder = %folder, "not deleting folder, some children could not be removed");
                return Ok(RemoveReport {
                    path: folder,
                    outcome: None,
                    children,
                });
            }

            let outcome = self.delete(&folder).await;
            Ok(RemoveReport {
                path: folder,
                outcome: Some(outcome),
                children,
            })
        }
        .boxed()
    }

    async fn delete(&self, path: &str) -> DispatchOutcome<()> {
        self.dispatcher()
            .submit(|| async move {
                self.api().probe(path, Method::DELETE).await?;
                Ok(())
            })
            .await
    }
}
