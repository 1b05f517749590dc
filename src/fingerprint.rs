//! Cache keys deciding whether a rendered page is still valid.

use std::collections::BTreeMap;

use serde_json::Value;

/// Key-value material a page depends on.
///
/// A `BTreeMap` keeps the serialized form independent of insertion order.
pub type Fingerprint = BTreeMap<String, Value>;

/// A 32-byte BLAKE3 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct Hash32([u8; 32]);

impl<T> From<T> for Hash32
where
    T: Into<[u8; 32]>,
{
    fn from(value: T) -> Self {
        Hash32(value.into())
    }
}

impl Hash32 {
    pub(crate) fn hash(buffer: impl AsRef<[u8]>) -> Self {
        blake3::Hasher::new()
            .update(buffer.as_ref())
            .finalize()
            .into()
    }

    pub(crate) fn to_hex(self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut acc = String::with_capacity(64);

        for byte in self.0 {
            acc.push(HEX[(byte >> 4) as usize] as char);
            acc.push(HEX[(byte & 0xF) as usize] as char);
        }

        acc
    }
}

impl std::fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

/// Up-to-date check which fails whenever the fingerprinted values change.
///
/// The orchestrator stores [`key`](Self::key) after a successful run and
/// passes it back to [`check`](Self::check) on the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChanged {
    namespace: &'static str,
    values: Fingerprint,
    hash: Hash32,
}

impl ConfigChanged {
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// The fingerprinted values.
    pub fn values(&self) -> &Fingerprint {
        &self.values
    }

    /// Hex digest of the namespace and the values.
    pub fn key(&self) -> String {
        self.hash.to_hex()
    }

    /// Whether a page built under `previous` is still valid.
    pub fn check(&self, previous: Option<&str>) -> bool {
        previous.is_some_and(|previous| previous == self.key())
    }
}

/// Builds the cache key for `values` within `namespace`.
pub fn config_changed(values: Fingerprint, namespace: &'static str) -> ConfigChanged {
    let mut buffer = namespace.as_bytes().to_vec();
    buffer.push(0);
    // Serializing a map of JSON values can't fail.
    if let Ok(bytes) = serde_json::to_vec(&values) {
        buffer.extend(bytes);
    }

    ConfigChanged {
        namespace,
        values,
        hash: Hash32::hash(buffer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Fingerprint {
        let mut map = Fingerprint::new();
        map.insert("http_error_code".into(), json!(404));
        map.insert("lang".into(), json!("en"));
        map
    }

    #[test]
    fn test_same_values_same_key() {
        let a = config_changed(sample(), "test");
        let b = config_changed(sample(), "test");

        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().len(), 64);
    }

    #[test]
    fn test_key_depends_on_values_and_namespace() {
        let base = config_changed(sample(), "test");

        let mut changed = sample();
        changed.insert("lang".into(), json!("pl"));

        assert_ne!(base.key(), config_changed(changed, "test").key());
        assert_ne!(base.key(), config_changed(sample(), "other").key());
    }

    #[test]
    fn test_check() {
        let uptodate = config_changed(sample(), "test");
        let key = uptodate.key();

        assert!(uptodate.check(Some(&key)));
        assert!(!uptodate.check(Some("stale")));
        assert!(!uptodate.check(None));
    }

    #[test]
    fn test_key_is_hash_of_namespace_and_values() {
        let uptodate = config_changed(sample(), "test");

        let mut buffer = b"test\0".to_vec();
        buffer.extend(br#"{"http_error_code":404,"lang":"en"}"#);

        assert_eq!(uptodate.key(), Hash32::hash(buffer).to_hex());
    }

    #[test]
    fn test_hash_hex() {
        let hash = Hash32::hash(b"");
        assert_eq!(
            hash.to_hex(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }
}
