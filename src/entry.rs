//! Key/value entry record shared by the map engines.

/// A single key/value pair as stored inside map nodes.
///
/// Values are opaque to the engines; only keys are hashed or compared.
#[derive(Clone, Debug)]
pub(crate) struct MapEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> MapEntry<K, V> {
    #[inline]
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}
