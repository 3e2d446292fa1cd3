//! Filesystem operations module.

pub mod node;
mod operations;
pub mod report;

pub use node::{Entry, EntryKind, MediaMetadata, ObjectInfo};
pub use operations::{
    content_secret_header, ensure_trailing_slash, headers_from_pairs, parse_listing,
    HEADER_CONTENT_SECRET, HEADER_FOLDER, HEADER_MKDIR,
};
pub use report::{DownloadReport, RemoveReport, Summary, UploadReport};
