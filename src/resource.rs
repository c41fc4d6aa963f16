//! One stored item: some content bytes plus their properties.
//!
//! A Resource starts out unloaded. Checking `exists()` only looks at the
//! filesystem; the payload isn't read until `load()` is called or one of
//! the accessors (`content()`, `properties()`, `property()`) needs it.
//! Once loaded or saved, the instance keeps serving from memory.

use crate::error::{Error, Result};
use crate::payload::Payload;
use crate::properties::Properties;
use std::fs;
use std::io::ErrorKind::NotFound;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Handle to the content and properties saved under one id.
///
/// Created by [`Storage::resource`](crate::Storage::resource).
#[derive(Debug)]
pub struct Resource {
    id: String,
    path: PathBuf,
    durable: bool,
    /// `None` until read from disk or saved through this instance.
    loaded: Option<Payload>,
}

impl Resource {
    pub(crate) fn new(id: String, path: PathBuf, durable: bool) -> Self {
        Self {
            id,
            path,
            durable,
            loaded: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Where the payload lives (or would live) on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Whether something readable is saved under this id.
    pub fn exists(&self) -> bool {
        if self.loaded.is_some() {
            return true;
        }
        let found = fs::File::open(&self.path)
            .and_then(|f| f.metadata())
            .map(|m| m.is_file())
            .unwrap_or(false);
        trace!(id = %self.id, found, "checked existence");
        found
    }

    /// Write `content` and `properties`, replacing anything saved before.
    pub fn save(&mut self, content: impl Into<Vec<u8>>, properties: Properties) -> Result<()> {
        self.persist(Payload {
            content: content.into(),
            properties,
        })
    }

    /// Shorthand for saving with no properties.
    pub fn save_content(&mut self, content: impl Into<Vec<u8>>) -> Result<()> {
        self.save(content, Properties::new())
    }

    /// Read the payload from disk, discarding anything held in memory.
    pub fn load(&mut self) -> Result<&Payload> {
        self.loaded = None;
        let payload = self.read()?;
        let payload: &Payload = self.loaded.insert(payload);
        Ok(payload)
    }

    /// Content bytes, loading them first if needed.
    pub fn content(&mut self) -> Result<&[u8]> {
        Ok(&self.load_if_needed()?.content)
    }

    /// Properties, loading them first if needed.
    pub fn properties(&mut self) -> Result<&Properties> {
        Ok(&self.load_if_needed()?.properties)
    }

    /// A single property, loading first if needed.
    pub fn property(&mut self, key: &str) -> Result<Option<&str>> {
        Ok(self.load_if_needed()?.properties.get(key))
    }

    /// Merge `properties` into the saved ones, keeping the content as is.
    pub fn update_properties(&mut self, properties: Properties) -> Result<()> {
        let mut payload = match self.loaded.take() {
            Some(payload) => payload,
            None => self.read()?,
        };
        payload.properties.merge(properties);
        self.persist(payload)
    }

    /// Remove the saved payload. Returns whether there was one.
    pub fn delete(&mut self) -> Result<bool> {
        self.loaded = None;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(id = %self.id, "deleted resource");
                Ok(true)
            }
            Err(e) if e.kind() == NotFound => Ok(false),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    fn load_if_needed(&mut self) -> Result<&Payload> {
        let payload = match self.loaded.take() {
            Some(payload) => payload,
            None => self.read()?,
        };
        let payload: &Payload = self.loaded.insert(payload);
        Ok(payload)
    }

    /// Read and parse whatever is on disk, without touching `self.loaded`.
    fn read(&self) -> Result<Payload> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == NotFound => {
                return Err(Error::NotFound {
                    id: self.id.clone(),
                })
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        let payload = Payload::decode(&bytes, &self.path).map_err(|e| {
            warn!(id = %self.id, error = %e, "corrupt resource");
            e
        })?;
        debug!(id = %self.id, bytes = payload.content.len(), "loaded resource");
        Ok(payload)
    }

    /// Write `payload` to disk, and only then adopt it as the loaded state.
    fn persist(&mut self, payload: Payload) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        payload.write(&self.path, self.durable)?;
        debug!(
            id = %self.id,
            path = %self.path.display(),
            bytes = payload.content.len(),
            "saved resource"
        );
        self.loaded = Some(payload);
        Ok(())
    }
}
