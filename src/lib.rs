//! Folder-backed key/value storage for cached artifacts.
//!
//! A [`Storage`] is a directory. It hands out [`Resource`]s by id, and each
//! resource is some content bytes plus a [`Properties`] map, saved together
//! in one file. Fetching layers use it like so:
//!
//! ```
//! use stowage::{props, Storage};
//!
//! let dir = tempfile::tempdir()?;
//! let specs = Storage::new(dir.path())?.namespace("specs")?;
//!
//! let mut rsc = specs.resource("rack-2.0.1");
//! if !rsc.exists() {
//!     let fetched = b"...bytes from upstream...".to_vec();
//!     rsc.save(fetched, props! { "content-type" => "application/octet-stream" })?;
//! }
//! assert_eq!(rsc.property("content-type")?, Some("application/octet-stream"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Saves go through a temp file and a rename, so a reader sees either the
//! previous payload or the new one, never a partial write. There's no
//! locking; callers that need a single writer per id must arrange it.

pub mod digest;
pub mod error;
pub mod name;
pub mod payload;
pub mod properties;
pub mod resource;
pub mod settings;
pub mod storage;

pub use error::{Error, Result};
pub use properties::Properties;
pub use resource::Resource;
pub use settings::{Layout, Settings};
pub use storage::Storage;
