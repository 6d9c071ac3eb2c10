use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::io::fgb::MAGIC_BYTES;
use crate::io::Error;

/// bytes inspected when the extension does not reveal the format
const SNIFF_LEN: usize = 512;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum FileFormat {
    Csv,
    GeoJson,
    FlatGeobuf,
}

impl FileFormat {
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.trim().to_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "geojson" | "json" => Some(Self::GeoJson),
            "fgb" => Some(Self::FlatGeobuf),
            _ => None,
        }
    }

    /// Identify the format of a file by its extension, falling back to
    /// inspecting its first bytes.
    pub fn detect(path: &Path) -> Result<Self, Error> {
        if let Some(format) = Self::from_extension(path) {
            return Ok(format);
        }
        let read_error = |source| Error::Read {
            path: path.to_path_buf(),
            source,
        };
        let mut head = Vec::with_capacity(SNIFF_LEN);
        File::open(path)
            .map_err(read_error)?
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut head)
            .map_err(read_error)?;
        Self::from_content(&head).ok_or_else(|| Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: "unrecognized file format".to_string(),
        })
    }

    fn from_content(head: &[u8]) -> Option<Self> {
        if head.starts_with(MAGIC_BYTES) {
            return Some(Self::FlatGeobuf);
        }
        let head = head.strip_prefix(b"\xef\xbb\xbf").unwrap_or(head);
        match head.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => Some(Self::GeoJson),
            _ => None,
        }
    }
}
