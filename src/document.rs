use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::{
    Compressor, Key, Registry, Result, Tag, find, get, get_all, scout, to_vec_all, write_tags,
};

/// An in-memory ODS document: the decompressed buffer plus the registry used
/// to decode and encode it.
///
/// Lookups scan the buffer directly and mutations splice it in place, so the
/// document is never fully decoded unless [`get_all`](Self::get_all) is called.
/// A failed mutation leaves the buffer unchanged.
///
/// # Example
///
/// ```
/// use ods::{Document, Tag};
///
/// let mut doc = Document::new();
/// doc.save(&[Tag::object(
///     "Car",
///     vec![
///         Tag::string("type", "Jeep"),
///         Tag::object("Owner", vec![Tag::string("firstName", "Jeff")]),
///     ],
/// )])
/// .unwrap();
///
/// doc.set("Car.Owner.firstName", &Tag::string("firstName", "Example")).unwrap();
/// assert_eq!(
///     doc.get("Car.Owner.firstName").unwrap(),
///     Some(Tag::string("firstName", "Example"))
/// );
/// assert!(doc.find("Car.type").unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct Document {
    data: Vec<u8>,
    registry: Arc<Registry>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document using the default registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(Registry::default()))
    }

    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            data: Vec::new(),
            registry,
        }
    }

    /// Wraps an already decompressed buffer. Nothing is validated until the
    /// buffer is read.
    pub fn from_bytes(data: impl Into<Vec<u8>>, registry: Arc<Registry>) -> Self {
        Self {
            data: data.into(),
            registry,
        }
    }

    /// Decompresses an exported document.
    pub fn import(
        data: &[u8],
        compressor: &dyn Compressor,
        registry: Arc<Registry>,
    ) -> Result<Self> {
        let data = compressor.decompress(data)?;
        debug!(
            compressor = compressor.name(),
            len = data.len(),
            "imported document"
        );
        Ok(Self::from_bytes(data, registry))
    }

    /// Compresses the whole buffer with `compressor`.
    pub fn export(&self, compressor: &dyn Compressor) -> Result<Vec<u8>> {
        compressor.compress(&self.data)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Freezes the buffer into shared, cheaply cloneable bytes.
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.data)
    }

    /// Decodes the tag at `key`. `Ok(None)` if it does not exist.
    pub fn get(&self, key: impl Key) -> Result<Option<Tag>> {
        get(&self.data, key, &self.registry)
    }

    /// Checks whether `key` exists without decoding it.
    pub fn find(&self, key: impl Key) -> Result<bool> {
        find(&self.data, key)
    }

    /// Decodes every top-level tag.
    pub fn get_all(&self) -> Result<Vec<Tag>> {
        get_all(&self.data, &self.registry)
    }

    /// Replaces the whole document with `tags`.
    pub fn save(&mut self, tags: &[Tag]) -> Result<()> {
        self.data = to_vec_all(tags, &self.registry)?;
        Ok(())
    }

    /// Appends one top-level tag.
    pub fn append(&mut self, tag: &Tag) -> Result<()> {
        write_tags([tag], &self.registry, &mut self.data)
    }

    /// Appends several top-level tags; either all or none are written.
    pub fn append_all(&mut self, tags: &[Tag]) -> Result<()> {
        write_tags(tags, &self.registry, &mut self.data)
    }

    /// Deletes the tag at `key`. `Ok(false)` if it does not exist.
    pub fn delete(&mut self, key: impl Key) -> Result<bool> {
        crate::delete(&mut self.data, key)
    }

    /// Replaces the tag at `key` with `tag`. `Ok(false)` if it does not exist.
    pub fn replace(&mut self, key: impl Key, tag: &Tag) -> Result<bool> {
        crate::replace(&mut self.data, key, tag, &self.registry)
    }

    /// Replaces or creates the tag at `key`, creating missing parent objects.
    pub fn set(&mut self, key: impl Key, tag: &Tag) -> Result<()> {
        crate::set(&mut self.data, key, tag, &self.registry)
    }

    /// Deletes the tag at `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound) if it does not exist.
    pub fn unset(&mut self, key: impl Key) -> Result<()> {
        scout(&self.data, key)?.delete(&mut self.data)
    }
}
