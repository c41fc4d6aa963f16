use sha2::{Digest as UpstreamDigest, Sha256};
const DIGEST_LENGTH: usize = 256 / 8;

/// SHA-256 of a resource id, used to name and shard its file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    bytes: [u8; DIGEST_LENGTH],
}

impl Digest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// The two directory levels a sharded layout files this digest under.
    pub fn shards(&self) -> [String; 2] {
        [hex::encode(&self.bytes[0..1]), hex::encode(&self.bytes[1..2])]
    }
}

impl<T> From<T> for Digest
where
    T: AsRef<[u8]>,
{
    fn from(item: T) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(item);
        let mut bytes = [0; DIGEST_LENGTH];
        bytes.copy_from_slice(&hasher.finalize());
        Self { bytes }
    }
}
