//! Filesystem operations split into focused modules.

mod browse;
mod dir_ops;
mod download;
mod quota;
mod upload;
mod utils;

pub use browse::parse_listing;
pub use upload::{
    content_secret_header, headers_from_pairs, HEADER_CONTENT_SECRET, HEADER_FOLDER, HEADER_MKDIR,
};
pub use utils::ensure_trailing_slash;
