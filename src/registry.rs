use std::{collections::HashMap, fmt, sync::Arc};

use crate::{Compressor, Error, NoCompression, Result, Tag, is_custom_id};

/// Builds a custom tag from its name and raw value bytes.
pub type TagFactory = Arc<dyn Fn(String, &[u8]) -> Result<Tag> + Send + Sync>;

/// Codec configuration shared by every operation on a document.
///
/// Holds the compressors available to compressed objects (by name), the
/// factories for custom tag ids, and the permissive flag that decides what
/// happens to unknown type ids. Build one at startup, wrap it in an `Arc`
/// and hand it to each [`Document`](crate::Document).
///
/// # Example
///
/// ```
/// use ods::{Registry, Tag};
///
/// let mut registry = Registry::default();
/// registry
///     .register_tag(20, |name, bytes| {
///         Ok(Tag::string(name, String::from_utf8_lossy(bytes)))
///     })
///     .unwrap();
/// assert!(registry.custom_tag(20).is_some());
/// assert!(registry.register_tag(3, |name, _| Ok(Tag::new(name, 0))).is_err());
/// ```
#[derive(Clone)]
pub struct Registry {
    compressors: HashMap<String, Arc<dyn Compressor>>,
    tags: HashMap<u8, TagFactory>,
    permissive: bool,
}

impl Default for Registry {
    /// A registry with every compressor enabled by crate features.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_compressor(NoCompression);
        #[cfg(feature = "gzip")]
        {
            registry.register_compressor(crate::GzipCompression);
            registry.register_compressor(crate::ZlibCompression);
        }
        #[cfg(feature = "zstd")]
        registry.register_compressor(crate::ZstdCompression);
        registry
    }
}

impl Registry {
    /// A registry with no compressors and no custom tags.
    pub fn empty() -> Self {
        Self {
            compressors: HashMap::new(),
            tags: HashMap::new(),
            permissive: false,
        }
    }

    /// Registers a compressor under its own name, returning any compressor
    /// it replaced.
    pub fn register_compressor(
        &mut self,
        compressor: impl Compressor + 'static,
    ) -> Option<Arc<dyn Compressor>> {
        let compressor: Arc<dyn Compressor> = Arc::new(compressor);
        self.compressors
            .insert(compressor.name().to_owned(), compressor)
    }

    pub fn compressor(&self, name: &str) -> Result<&Arc<dyn Compressor>> {
        self.compressors
            .get(name)
            .ok_or_else(|| Error::UnknownCompressor(name.to_owned()))
    }

    /// Registers a factory for a custom type id.
    ///
    /// # Errors
    ///
    /// Ids 0-15 are reserved and fail with [`Error::ReservedTagId`].
    pub fn register_tag<F>(&mut self, type_id: u8, factory: F) -> Result<()>
    where
        F: Fn(String, &[u8]) -> Result<Tag> + Send + Sync + 'static,
    {
        if !is_custom_id(type_id) {
            return Err(Error::ReservedTagId(type_id));
        }
        self.tags.insert(type_id, Arc::new(factory));
        Ok(())
    }

    pub fn custom_tag(&self, type_id: u8) -> Option<&TagFactory> {
        self.tags.get(&type_id)
    }

    /// When permissive, unknown type ids decode into
    /// [`InvalidValue`](crate::InvalidValue) placeholders instead of failing.
    pub fn set_permissive(&mut self, permissive: bool) -> &mut Self {
        self.permissive = permissive;
        self
    }

    pub fn with_permissive(mut self, permissive: bool) -> Self {
        self.permissive = permissive;
        self
    }

    pub fn is_permissive(&self) -> bool {
        self.permissive
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut compressors: Vec<_> = self.compressors.keys().collect();
        compressors.sort();
        let mut tags: Vec<_> = self.tags.keys().collect();
        tags.sort();
        f.debug_struct("Registry")
            .field("compressors", &compressors)
            .field("tags", &tags)
            .field("permissive", &self.permissive)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_builtin_compressors() {
        let registry = Registry::default();
        assert!(registry.compressor("NONE").is_ok());
        #[cfg(feature = "gzip")]
        {
            assert!(registry.compressor("GZIP").is_ok());
            assert!(registry.compressor("ZLIB").is_ok());
        }
        assert!(matches!(
            registry.compressor("LZ4"),
            Err(Error::UnknownCompressor(name)) if name == "LZ4"
        ));
    }

    #[test]
    fn reserved_ids_rejected() {
        let mut registry = Registry::empty();
        for id in 0..16u8 {
            assert!(matches!(
                registry.register_tag(id, |name, _| Ok(Tag::new(name, 0))),
                Err(Error::ReservedTagId(i)) if i == id
            ));
        }
        registry
            .register_tag(16, |name, _| Ok(Tag::new(name, 0)))
            .unwrap();
        assert!(registry.custom_tag(16).is_some());
        assert!(registry.custom_tag(17).is_none());
    }

    #[test]
    fn debug_lists_names() {
        let registry = Registry::empty().with_permissive(true);
        let debug = format!("{registry:?}");
        assert!(debug.contains("permissive: true"));
    }
}
