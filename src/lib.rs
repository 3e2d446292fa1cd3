//! # upyunlib
//!
//! Rust client library for UpYun object storage.
//!
//! ## Features
//!
//! - **Signed requests**: every call carries the `UpYun` authorization header,
//!   computed from the operator credentials and the request date.
//! - **Filesystem Operations**:
//!   - Inspect files and folders (`get_info`) and bucket usage (`usage`).
//!   - List folders, optionally recursively.
//!   - Create folders (`mkdir`) and delete whole trees (`remove`).
//! - **File Transfers**:
//!   - Upload single files, raw bytes, or whole local directory trees.
//!   - Download files to memory or disk, and mirror remote folders locally.
//! - **Bounded dispatch**: uploads and deletes run through a [`Dispatcher`]
//!   that keeps at most two requests in flight and retries each one once.
//!   Operations that fail twice are reported in the result, not raised.
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use upyunlib::{ClientConfig, Credential, Session, Summary};
//!
//! # async fn example() -> upyunlib::Result<()> {
//! let session = Session::new(
//!     Credential::new("my-bucket", "operator", "password"),
//!     ClientConfig::default(),
//! );
//!
//! // List the bucket root
//! for entry in session.list("/", false).await? {
//!     println!("{} ({} bytes)", entry.name, entry.size);
//! }
//!
//! // Upload a local directory tree
//! let report = session.upload("./site", "/www/", None).await?;
//! println!("{} uploaded, {} failed", report.succeeded(), report.failed());
//!
//! // Fetch a file into memory
//! let report = session.download("/www/index.html", None, None).await?;
//! # let _ = report;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fs;
pub mod http;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use auth::Credential;
pub use config::ClientConfig;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{Result, UpyunError};
pub use fs::{
    DownloadReport, Entry, EntryKind, MediaMetadata, ObjectInfo, RemoveReport, Summary,
    UploadReport,
};
pub use http::{HttpClient, RawResponse, RequestDescriptor, Transport};
pub use session::Session;
