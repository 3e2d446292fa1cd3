//! Remote namespace entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, UpyunError};
use crate::http::RawResponse;

/// Response header carrying the object type (`file`, `folder`, or an image type).
pub const HEADER_FILE_TYPE: &str = "x-upyun-file-type";
/// Response header carrying the object size.
pub const HEADER_FILE_SIZE: &str = "x-upyun-file-size";
/// Response header carrying the modification time (unix seconds).
pub const HEADER_FILE_DATE: &str = "x-upyun-file-date";
/// Image width header.
pub const HEADER_WIDTH: &str = "x-upyun-width";
/// Image height header.
pub const HEADER_HEIGHT: &str = "x-upyun-height";
/// Image frame count header.
pub const HEADER_FRAMES: &str = "x-upyun-frames";

/// Entry kind. Only ever taken from the protocol's own marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Folder/directory
    Folder,
}

impl EntryKind {
    /// Parse the single-character listing marker (`F` folder, `N` file).
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "F" => Some(EntryKind::Folder),
            "N" => Some(EntryKind::File),
            _ => None,
        }
    }

    /// Parse the `x-upyun-file-type` value of a metadata probe.
    pub fn from_type_header(value: &str) -> Option<Self> {
        match value {
            "folder" => Some(EntryKind::Folder),
            "file" => Some(EntryKind::File),
            _ => None,
        }
    }

    /// Check if this kind is a folder.
    pub fn is_folder(&self) -> bool {
        *self == EntryKind::Folder
    }
}

/// One node of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Entry name (no path)
    pub name: String,
    /// File or folder
    pub kind: EntryKind,
    /// Size in bytes (0 for folders)
    pub size: u64,
    /// Modification time (Unix epoch seconds)
    pub modified_at: i64,
    /// Sub-entries, only filled by recursive listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Entry>>,
}

impl Entry {
    /// Parse one `name\tmarker\tsize\tmodified` listing record.
    pub fn parse_record(record: &str) -> Result<Self> {
        let fields: Vec<&str> = record.split('\t').collect();
        if fields.len() < 4 {
            return Err(UpyunError::Parse(format!(
                "listing record has {} fields: {:?}",
                fields.len(),
                record
            )));
        }

        let kind = EntryKind::from_marker(fields[1]).ok_or_else(|| {
            UpyunError::Parse(format!("unknown entry marker {:?} in {:?}", fields[1], record))
        })?;

        Ok(Entry {
            name: fields[0].to_string(),
            kind,
            size: parse_number(fields[2], "size")?,
            modified_at: parse_number(fields[3], "modification time")?,
            children: None,
        })
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Check if this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    /// Modification time as a UTC timestamp.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.modified_at, 0)
    }
}

/// Result of a metadata probe on a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// File or folder
    pub kind: EntryKind,
    /// Size in bytes
    pub size: u64,
    /// Modification time (Unix epoch seconds)
    pub modified_at: i64,
}

impl ObjectInfo {
    /// Read the metadata headers of a probe response.
    ///
    /// The type header is mandatory; size and date default to 0 when absent.
    pub fn from_response(response: &RawResponse) -> Result<Self> {
        let raw_kind = response
            .header(HEADER_FILE_TYPE)
            .ok_or_else(|| UpyunError::Parse(format!("missing {} header", HEADER_FILE_TYPE)))?;
        let kind = EntryKind::from_type_header(raw_kind)
            .ok_or_else(|| UpyunError::Parse(format!("unknown file type {:?}", raw_kind)))?;

        Ok(ObjectInfo {
            kind,
            size: optional_number(response, HEADER_FILE_SIZE)?.unwrap_or(0),
            modified_at: optional_number(response, HEADER_FILE_DATE)?.unwrap_or(0),
        })
    }

    /// Modification time as a UTC timestamp.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.modified_at, 0)
    }
}

/// Image attributes reported on upload responses.
///
/// All fields are `None` for non-image objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Width in pixels
    pub width: Option<u32>,
    /// Height in pixels
    pub height: Option<u32>,
    /// Frame count (1 for still images)
    pub frames: Option<u32>,
    /// Raw `x-upyun-file-type` value, e.g. `JPEG`
    pub kind: Option<String>,
}

impl MediaMetadata {
    /// Collect image headers from a response. Malformed numbers are ignored.
    pub fn from_response(response: &RawResponse) -> Self {
        let number = |name: &str| response.header(name).and_then(|v| v.trim().parse().ok());
        MediaMetadata {
            width: number(HEADER_WIDTH),
            height: number(HEADER_HEIGHT),
            frames: number(HEADER_FRAMES),
            kind: response.header(HEADER_FILE_TYPE).map(str::to_string),
        }
    }

    /// Check if the server recognised the object as an image.
    pub fn is_image(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| UpyunError::Parse(format!("invalid {} {:?}", what, raw)))
}

fn optional_number<T: std::str::FromStr>(response: &RawResponse, name: &str) -> Result<Option<T>> {
    response
        .header(name)
        .map(|raw| parse_number(raw, name))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    #[test]
    fn test_marker_conversion() {
        assert_eq!(EntryKind::from_marker("F"), Some(EntryKind::Folder));
        assert_eq!(EntryKind::from_marker("N"), Some(EntryKind::File));
        assert_eq!(EntryKind::from_marker("f"), None);
        assert_eq!(EntryKind::from_marker(""), None);
        assert_eq!(EntryKind::from_type_header("folder"), Some(EntryKind::Folder));
        assert_eq!(EntryKind::from_type_header("file"), Some(EntryKind::File));
        assert_eq!(EntryKind::from_type_header("JPEG"), None);
    }

    #[test]
    fn test_parse_record() {
        let entry = Entry::parse_record("photo.jpg\tN\t2048\t1700000000").unwrap();
        assert_eq!(entry.name, "photo.jpg");
        assert!(entry.is_file());
        assert_eq!(entry.size, 2048);
        assert_eq!(entry.modified_at, 1_700_000_000);
        assert!(entry.children.is_none());
        assert_eq!(entry.modified().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_record_errors() {
        assert!(matches!(
            Entry::parse_record("only\tN\t1"),
            Err(UpyunError::Parse(_))
        ));
        assert!(matches!(
            Entry::parse_record("x\tQ\t1\t2"),
            Err(UpyunError::Parse(_))
        ));
        assert!(matches!(
            Entry::parse_record("x\tN\tbig\t2"),
            Err(UpyunError::Parse(_))
        ));
    }

    #[test]
    fn test_object_info_from_headers() {
        let response = MockTransport::reply(
            200,
            &[
                ("x-upyun-file-type", "file"),
                ("x-upyun-file-size", "512"),
                ("x-upyun-file-date", "1400000000"),
            ],
            "",
        )
        .unwrap();

        let info = ObjectInfo::from_response(&response).unwrap();
        assert_eq!(
            info,
            ObjectInfo {
                kind: EntryKind::File,
                size: 512,
                modified_at: 1_400_000_000
            }
        );
    }

    #[test]
    fn test_object_info_requires_type() {
        let response = MockTransport::reply(200, &[("x-upyun-file-size", "1")], "").unwrap();
        assert!(matches!(
            ObjectInfo::from_response(&response),
            Err(UpyunError::Parse(_))
        ));

        let folder = MockTransport::reply(200, &[("x-upyun-file-type", "folder")], "").unwrap();
        let info = ObjectInfo::from_response(&folder).unwrap();
        assert!(info.kind.is_folder());
        assert_eq!(info.size, 0);
    }

    #[test]
    fn test_media_metadata() {
        let response = MockTransport::reply(
            200,
            &[
                ("x-upyun-width", "640"),
                ("x-upyun-height", "480"),
                ("x-upyun-frames", "1"),
                ("x-upyun-file-type", "JPEG"),
            ],
            "",
        )
        .unwrap();

        let media = MediaMetadata::from_response(&response);
        assert!(media.is_image());
        assert_eq!(media.width, Some(640));
        assert_eq!(media.height, Some(480));
        assert_eq!(media.frames, Some(1));
        assert_eq!(media.kind.as_deref(), Some("JPEG"));

        let plain = MockTransport::reply(200, &[], "").unwrap();
        assert_eq!(MediaMetadata::from_response(&plain), MediaMetadata::default());
    }
}
