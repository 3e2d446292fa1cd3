//! Per-subtree results of recursive transfers.
//!
//! Every folder level keeps one `Result` per child so callers can see which
//! parts of a tree went through and which did not.

use std::path::PathBuf;

use bytes::Bytes;

use crate::dispatch::DispatchOutcome;
use crate::error::Result;
use crate::fs::node::MediaMetadata;

/// Outcome of [`Session::upload`](crate::Session::upload).
#[derive(Debug)]
pub enum UploadReport {
    /// A single file was written.
    File {
        /// Remote path the file was written to
        remote_path: String,
        /// Base name appended to the destination, if one was derived
        filename: Option<String>,
        /// Dispatcher outcome carrying the response's image attributes
        outcome: DispatchOutcome<MediaMetadata>,
    },
    /// A local directory was walked.
    Folder {
        /// Remote folder path (trailing `/`)
        remote_path: String,
        /// One entry per local child, in name order
        children: Vec<Result<UploadReport>>,
    },
}

/// Outcome of [`Session::download`](crate::Session::download).
#[derive(Debug)]
pub enum DownloadReport {
    /// No local destination was given; the raw bytes are returned.
    Bytes {
        /// Remote path that was read
        remote_path: String,
        /// Unmodified object content
        data: Bytes,
    },
    /// The object was written to disk.
    Saved {
        /// Remote path that was read
        remote_path: String,
        /// Local file that was written
        local_path: PathBuf,
        /// Bytes written
        size: u64,
    },
    /// A remote folder was walked.
    Folder {
        /// Remote folder path (trailing `/`)
        remote_path: String,
        /// One entry per remote child, in listing order
        children: Vec<Result<DownloadReport>>,
    },
}

/// Outcome of [`Session::remove`](crate::Session::remove).
#[derive(Debug)]
pub struct RemoveReport {
    /// Remote path that was removed
    pub path: String,
    /// Outcome of the DELETE for this path; `None` when it was skipped
    /// because a child could not be processed
    pub outcome: Option<DispatchOutcome<()>>,
    /// Child reports, empty for files
    pub children: Vec<Result<RemoveReport>>,
}

/// Counters shared by the report types.
pub trait Summary {
    /// Number of leaf operations that succeeded.
    fn succeeded(&self) -> usize;
    /// Number of leaf operations that failed, were dropped, or were skipped.
    fn failed(&self) -> usize;

    /// `true` when nothing failed anywhere in the subtree.
    fn is_complete(&self) -> bool {
        self.failed() == 0
    }
}

fn sum_children<T: Summary>(children: &[Result<T>], f: fn(&T) -> usize, errors: usize) -> usize {
    children
        .iter()
        .map(|child| match child {
            Ok(report) => f(report),
            Err(_) => errors,
        })
        .sum()
}

impl Summary for UploadReport {
    fn succeeded(&self) -> usize {
        match self {
            UploadReport::File { outcome, .. } => usize::from(outcome.is_success()),
            UploadReport::Folder { children, .. } => sum_children(children, Self::succeeded, 0),
        }
    }

    fn failed(&self) -> usize {
        match self {
            UploadReport::File { outcome, .. } => usize::from(outcome.is_dropped()),
            UploadReport::Folder { children, .. } => sum_children(children, Self::failed, 1),
        }
    }
}

impl Summary for DownloadReport {
    fn succeeded(&self) -> usize {
        match self {
            DownloadReport::Bytes { .. } | DownloadReport::Saved { .. } => 1,
            DownloadReport::Folder { children, .. } => sum_children(children, Self::succeeded, 0),
        }
    }

    fn failed(&self) -> usize {
        match self {
            DownloadReport::Bytes { .. } | DownloadReport::Saved { .. } => 0,
            DownloadReport::Folder { children, .. } => sum_children(children, Self::failed, 1),
        }
    }
}

impl Summary for RemoveReport {
    fn succeeded(&self) -> usize {
        let own = usize::from(matches!(&self.outcome, Some(o) if o.is_success()));
        own + sum_children(&self.children, Self::succeeded, 0)
    }

    fn failed(&self) -> usize {
        let own = usize::from(!matches!(&self.outcome, Some(o) if o.is_success()));
        own + sum_children(&self.children, Self::failed, 1)
    }
}
