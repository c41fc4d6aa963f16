//! The on-disk form of one resource.
//!
//! Content and properties go into a single file so that a rename swaps
//! both at once:
//!
//! ```text
//! STOWAGE1
//! {"content_length":5,"properties":{"content-type":"text/plain"}}
//! hello
//! ```
//!
//! The header is one line of JSON, which never contains a raw newline,
//! followed by exactly `content_length` bytes of content. There is no
//! trailing newline; content is opaque bytes.

use crate::error::{Error, Result};
use crate::properties::Properties;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const MAGIC: &[u8] = b"STOWAGE1\n";

#[derive(Serialize, Deserialize)]
struct Header {
    content_length: u64,
    #[serde(default)]
    properties: Properties,
}

/// Content and properties as they were read from, or will be written to, disk.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Payload {
    pub content: Vec<u8>,
    pub properties: Properties,
}

impl Payload {
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        let header = Header {
            content_length: self.content.len() as u64,
            properties: self.properties.clone(),
        };
        let header = serde_json::to_vec(&header)?;
        let mut out = Vec::with_capacity(MAGIC.len() + header.len() + 1 + self.content.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&header);
        out.push(b'\n');
        out.extend_from_slice(&self.content);
        Ok(out)
    }

    /// Parse bytes read from `path`. The path is only used for errors.
    pub fn decode(bytes: &[u8], path: &Path) -> Result<Self> {
        let rest = bytes
            .strip_prefix(MAGIC)
            .ok_or_else(|| Error::corrupt(path, "missing format marker"))?;
        let newline = rest
            .iter()
            .position(|b| *b == b'\n')
            .ok_or_else(|| Error::corrupt(path, "unterminated header"))?;
        let header: Header = serde_json::from_slice(&rest[..newline])
            .map_err(|e| Error::corrupt(path, format!("bad header: {}", e)))?;
        let content = &rest[newline + 1..];
        if content.len() as u64 != header.content_length {
            return Err(Error::corrupt(
                path,
                format!(
                    "expected {} content bytes, found {}",
                    header.content_length,
                    content.len()
                ),
            ));
        }
        Ok(Self {
            content: content.to_vec(),
            properties: header.properties,
        })
    }

    /// Atomically replace whatever is at `dest` with this payload.
    ///
    /// Readers see either the old file or the complete new one.
    pub fn write(&self, dest: &Path, durable: bool) -> Result<()> {
        let dir = dest
            .parent()
            .ok_or_else(|| Error::corrupt(dest, "payload path has no parent"))?;
        let bytes = self
            .encode()
            .map_err(|e| Error::corrupt(dest, format!("unserializable header: {}", e)))?;
        write_atomic(dir, dest, &bytes, durable)
    }
}

/// Write `bytes` to a temp file in `dir`, then rename it over `dest`.
pub(crate) fn write_atomic(dir: &Path, dest: &Path, bytes: &[u8], durable: bool) -> Result<()> {
    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    file.write_all(bytes).map_err(|e| Error::io(file.path(), e))?;
    if durable {
        file.as_file().sync_all().map_err(|e| Error::io(file.path(), e))?;
    }
    match file.persist(dest) {
        Ok(_) => Ok(()),
        Err(pe) => Err(Error::io(dest, pe.error)),
    }
}
