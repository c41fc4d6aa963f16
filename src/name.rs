//! Names of child storages and the file names resources are saved under.
//!
//! A namespace must be usable as exactly one directory name below its
//! parent, so it's validated strictly. Resource ids are arbitrary caller
//! text, so instead of validating them they get turned into a file name
//! that can't contain a separator or traversal component.
//!
//! ```
//! use stowage::name::Namespace;
//!
//! assert!(Namespace::new("gems").is_ok());
//! assert!(Namespace::new("../etc").is_err());
//! ```

use crate::digest::Digest;
use crate::error::{Error, Result};
use std::path::Path;

/// File kept in every storage folder describing its format version.
pub const METADATA_FILE: &str = "metadata.json";

/// Longest readable id prefix kept in a resource's file name.
const MAX_PREFIX: usize = 64;

/// A validated child storage name, like "gems" or "specs".
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        let reason = if name.is_empty() {
            Some("must not be empty")
        } else if name == "." || name == ".." {
            Some("must not be a relative directory")
        } else if name.contains(['/', '\\', '\0']) {
            Some("must not contain separators or NUL")
        } else if name == METADATA_FILE {
            Some("reserved for storage metadata")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(Error::InvalidNamespace {
                name: name.into(),
                reason,
            }),
            None => Ok(Self(name.into())),
        }
    }

    pub fn as_path(&self) -> &Path {
        self.0.as_ref()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

/// The file name a resource id is persisted under.
///
/// A readable, sanitized prefix of the id, then the hex digest of the
/// whole id. The digest keeps distinct ids distinct even when their
/// prefixes sanitize to the same text.
pub fn file_name(id: &str, digest: &Digest) -> String {
    let mut prefix: String = id
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    prefix.truncate(MAX_PREFIX);
    format!("{}-{}", prefix, digest.to_hex())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new() {
        assert!(Namespace::new("gems").is_ok());
        assert!(Namespace::new("specs.v2").is_ok());
        assert!(matches!(
            Namespace::new(""),
            Err(Error::InvalidNamespace { .. })
        ));
        assert!(Namespace::new("..").is_err());
        assert!(Namespace::new(".").is_err());
        assert!(Namespace::new("a/b").is_err());
        assert!(Namespace::new("a\\b").is_err());
        assert!(Namespace::new(METADATA_FILE).is_err());
    }

    #[test]
    fn asref_path() {
        let ns = Namespace::new("gems").unwrap();
        let p = Path::new("/some/dir").join(ns.as_path());
        assert_eq!(p.to_string_lossy(), "/some/dir/gems");
    }

    #[test]
    fn file_name_plain_id() {
        let d = Digest::from("rack-2.0.1");
        assert_eq!(file_name("rack-2.0.1", &d), format!("rack-2.0.1-{}", d.to_hex()));
    }

    #[test]
    fn file_name_escapes_traversal() {
        let id = "../../etc/passwd";
        let name = file_name(id, &Digest::from(id));
        assert!(name.starts_with(".._.._etc_passwd-"));
        assert!(!name.contains('/'));
        assert_eq!(Path::new(&name).components().count(), 1);
    }

    #[test]
    fn file_name_truncates_long_ids() {
        let id = "x".repeat(500);
        let name = file_name(&id, &Digest::from(&id));
        assert_eq!(name.len(), MAX_PREFIX + 1 + 64);
    }

    #[test]
    fn file_name_distinguishes_collapsed_prefixes() {
        assert_ne!(
            file_name("a/b", &Digest::from("a/b")),
            file_name("a:b", &Digest::from("a:b"))
        );
    }
}
