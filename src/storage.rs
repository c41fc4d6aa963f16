//! Folder-backed storage.
//!
//! A Storage is just a directory and some settings. It's cheap to create
//! and holds no state beyond its path, so it can be recreated from the same
//! path at any time. On disk it looks like:
//!
//! ```text
//! cache/
//!  - metadata.json         (format version of this folder)
//!  - 3a/                   (sharded resources, see Layout)
//!    - 7f/
//!      - an_id-3a7f...     (content + properties of one resource)
//!      - tmp.82789         (tempfile that will be atomically renamed)
//!  - gems/                 (namespace, itself a complete Storage)
//!    - metadata.json
//!    - ...
//! ```
//!
//! ```
//! use stowage::{props, Storage};
//!
//! let dir = tempfile::tempdir()?;
//! let gems = Storage::new(dir.path())?.namespace("gems")?;
//!
//! let mut rsc = gems.resource("rack-2.0.1");
//! assert!(!rsc.exists());
//! rsc.save("gem bytes", props! { "content-type" => "octet/stream" })?;
//!
//! let mut fresh = gems.resource("rack-2.0.1");
//! assert_eq!(fresh.content()?, b"gem bytes");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{Error, Result};
use crate::name::{Namespace, METADATA_FILE};
use crate::payload;
use crate::resource::Resource;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind::NotFound;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Newest folder format this crate reads and the one it writes.
pub const STORAGE_VERSION: u32 = 1;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Metadata {
    storage_version: u32,
}

/// A directory that resources are saved into.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    settings: Settings,
}

impl Storage {
    /// Open the storage at `path`, creating it and any missing parents.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_settings(path, Settings::default())
    }

    pub fn with_settings(path: impl AsRef<Path>, settings: Settings) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            debug!(path = %path.display(), "creating storage folder");
        }
        fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
        let root = fs::canonicalize(path).map_err(|e| Error::io(path, e))?;

        let storage = Self { root, settings };
        storage.check_version()?;
        Ok(storage)
    }

    /// A child storage in the subfolder `name`, with the same settings.
    #[doc(alias = "for")]
    pub fn namespace(&self, name: impl AsRef<str>) -> Result<Self> {
        let ns = Namespace::new(name)?;
        Self::with_settings(self.root.join(ns.as_path()), self.settings)
    }

    /// A handle for `id`. Nothing is read or written until it's used.
    pub fn resource(&self, id: impl Into<String>) -> Resource {
        let id = id.into();
        let path = self.settings.layout.locate(&self.root, &id);
        Resource::new(id, path, self.settings.durable)
    }

    /// Absolute path of the storage folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Make sure this folder is in a format we understand, stamping it if
    /// it's new.
    fn check_version(&self) -> Result<()> {
        let path = self.root.join(METADATA_FILE);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == NotFound => return self.write_metadata(&path),
            Err(e) => return Err(Error::io(&path, e)),
        };
        let meta: Metadata =
            serde_json::from_slice(&bytes).map_err(|e| Error::corrupt(&path, e))?;
        if meta.storage_version > STORAGE_VERSION {
            return Err(Error::IncompatibleVersion {
                path,
                found: meta.storage_version,
                supported: STORAGE_VERSION,
            });
        }
        Ok(())
    }

    fn write_metadata(&self, path: &Path) -> Result<()> {
        let meta = Metadata {
            storage_version: STORAGE_VERSION,
        };
        let bytes = serde_json::to_vec(&meta).map_err(|e| Error::corrupt(path, e))?;
        payload::write_atomic(&self.root, path, &bytes, self.settings.durable)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::settings::Layout;
    use tempfile::tempdir;

    #[test]
    fn builds_with_valid_folder() -> Result<()> {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path())?;
        assert_eq!(storage.root(), fs::canonicalize(dir.path()).unwrap());
        Ok(())
    }

    #[test]
    fn builds_missing_path() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other-path").join("deeper");
        assert!(!path.exists());

        Storage::new(&path)?;
        assert!(path.is_dir());

        // Again, on an existing folder
        Storage::new(&path)?;
        assert!(path.is_dir());
        Ok(())
    }

    #[test]
    fn root_is_absolute() -> Result<()> {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("b"))?;
        assert!(storage.root().is_absolute());
        assert_eq!(storage.root(), fs::canonicalize(dir.path().join("b")).unwrap());
        Ok(())
    }

    #[test]
    fn fails_on_file_in_the_way() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a-file");
        fs::write(&path, b"not a folder").unwrap();

        let err = Storage::new(&path).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn writes_metadata() -> Result<()> {
        let dir = tempdir().unwrap();
        Storage::new(dir.path())?;
        let meta: Metadata =
            serde_json::from_slice(&fs::read(dir.path().join(METADATA_FILE)).unwrap()).unwrap();
        assert_eq!(
            meta,
            Metadata {
                storage_version: STORAGE_VERSION
            }
        );
        Ok(())
    }

    #[test]
    fn rejects_newer_version() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(METADATA_FILE),
            br#"{"storage_version":99}"#,
        )
        .unwrap();

        match Storage::new(dir.path()) {
            Err(Error::IncompatibleVersion {
                found, supported, ..
            }) => {
                assert_eq!(found, 99);
                assert_eq!(supported, STORAGE_VERSION);
            }
            other => panic!("expected version error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_corrupt_metadata() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILE), b"{{{").unwrap();
        assert!(Storage::new(dir.path()).unwrap_err().is_corrupt());
    }

    #[test]
    fn namespace_creates_subfolder() -> Result<()> {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path())?;

        let gems = storage.namespace("gems")?;
        assert!(dir.path().join("gems").is_dir());
        assert_eq!(gems.root(), storage.root().join("gems"));

        // Idempotent
        storage.namespace("gems")?;
        assert!(dir.path().join("gems").is_dir());
        Ok(())
    }

    #[test]
    fn namespace_rejects_traversal() -> Result<()> {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("root"))?;
        assert!(matches!(
            storage.namespace(".."),
            Err(Error::InvalidNamespace { .. })
        ));
        assert!(storage.namespace("a/b").is_err());
        Ok(())
    }

    #[test]
    fn namespace_inherits_settings() -> Result<()> {
        let dir = tempdir().unwrap();
        let settings = Settings {
            layout: Layout::Flat,
            durable: false,
        };
        let storage = Storage::with_settings(dir.path(), settings)?;
        assert_eq!(storage.namespace("specs")?.settings(), &settings);
        Ok(())
    }

    #[test]
    fn namespaces_are_separate() -> Result<()> {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path())?;
        storage.namespace("gems")?.resource("x").save_content("gem")?;

        assert!(!storage.namespace("specs")?.resource("x").exists());
        assert!(!storage.resource("x").exists());
        assert!(storage.namespace("gems")?.resource("x").exists());
        Ok(())
    }

    #[test]
    fn resource_does_no_io() -> Result<()> {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path())?;
        let rsc = storage.resource("an_id");
        assert_eq!(rsc.id(), "an_id");
        assert!(rsc.path().starts_with(storage.root()));
        assert!(!rsc.path().exists());
        assert!(!rsc.path().parent().unwrap().exists());
        Ok(())
    }

    #[test]
    fn recreated_storage_sees_resources() -> Result<()> {
        let dir = tempdir().unwrap();
        Storage::new(dir.path())?
            .resource("kept")
            .save_content("still here")?;

        let mut rsc = Storage::new(dir.path())?.resource("kept");
        assert_eq!(rsc.content()?, b"still here");
        Ok(())
    }
}
