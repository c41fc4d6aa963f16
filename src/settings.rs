use crate::digest::Digest;
use crate::name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How resource files are arranged inside a storage folder.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `root/ab/cd/<name>`, spreading files over 65536 directories.
    #[default]
    Sharded,
    /// `root/<name>`.
    Flat,
}

impl Layout {
    /// Where the resource `id` lives below `root`.
    pub fn locate(&self, root: &Path, id: &str) -> PathBuf {
        let digest = Digest::from(id);
        let file = name::file_name(id, &digest);
        match self {
            Self::Sharded => {
                let [a, b] = digest.shards();
                root.join(a).join(b).join(file)
            }
            Self::Flat => root.join(file),
        }
    }
}

/// Knobs for a [`Storage`](crate::Storage), inherited by its namespaces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: Layout,

    /// Flush payloads to disk before they're renamed into place.
    pub durable: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: Layout::Sharded,
            durable: true,
        }
    }
}
