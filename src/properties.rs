//! String properties stored alongside a resource's content.
//!
//! These are whatever the caller wants to remember about a blob, for
//! example the `content-type` an upstream server reported for it. The
//! store itself never interprets them; it only guarantees that the exact
//! same keys and values come back out after a save and load.
//!
//! ```
//! use stowage::{props, Properties};
//!
//! let props = Properties::new()
//!     .set("content-type", "octet/stream")
//!     .set("etag", "abc123");
//!
//! assert_eq!(props.get("etag"), Some("abc123"));
//! assert_eq!(props, props!{ "etag" => "abc123", "content-type" => "octet/stream" });
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key/value strings attached to a resource.
///
/// Keys are kept sorted so that equal mappings always serialize to the
/// same bytes.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set a value, replacing any previous value under the same key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Copy every entry of `other` over this mapping.
    pub fn merge(&mut self, other: Properties) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(items: [(K, V); N]) -> Self {
        items.into_iter().collect()
    }
}

#[macro_export]
macro_rules! props {
    ( $( $k:expr => $v:expr ),* $(,)? ) => {
        {
            $crate::Properties::new() $( .set($k, $v) )*
        }
    };
}
