//! Splice-and-patch mutations.
//!
//! A [`Scout`] records, for every record matched along a key path, where its
//! 4-byte length field sits in the root buffer and what it declared. A
//! mutation removes or inserts a byte range and then rewrites the length
//! field of every recorded ancestor by the size delta. Nothing outside the
//! ancestors' headers and the spliced range is touched.

use std::ops::Range;

use tracing::debug;

use crate::{
    Error,
    Key,
    NAME_LENGTH_SIZE,
    RECORD_LENGTH_SIZE,
    RECORD_PREFIX_SIZE,
    Reader,
    Registry,
    Result,
    TYPE_ID_SIZE,
    Tag,
    TagID,
    checked_record_length,
    cold_path,
    key::join,
    patch_u32,
    resolve::{Located, Trace, find_child, locate},
    to_vec,
};

/// A record matched along a key path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoutEntry {
    pub name: String,
    /// Raw type id of the record.
    pub type_id: u8,
    /// `record_length` as currently stored.
    pub length: u32,
    /// Absolute offset of the record's length field in the root buffer.
    pub offset: usize,
}

impl ScoutEntry {
    fn new(name: &str, located: &Located) -> Self {
        Self {
            name: name.to_owned(),
            type_id: located.type_id,
            length: located.record_length,
            offset: located.length_offset,
        }
    }

    /// Full byte range of the record, type id through last value byte.
    pub fn record_range(&self) -> Range<usize> {
        self.offset - TYPE_ID_SIZE..self.end_offset()
    }

    /// Offset one past the record's last byte.
    pub fn end_offset(&self) -> usize {
        self.offset + RECORD_LENGTH_SIZE + self.length as usize
    }

    /// Total bytes the record occupies, header included.
    pub fn footprint(&self) -> usize {
        self.length as usize + RECORD_PREFIX_SIZE
    }

    /// Byte range of the record's value, which for a container is the
    /// run of its child records.
    pub fn value_range(&self) -> Range<usize> {
        self.offset + RECORD_LENGTH_SIZE + NAME_LENGTH_SIZE + self.name.len()..self.end_offset()
    }
}

/// Name of a complete pre-encoded record.
fn record_name(record: &[u8]) -> Result<&str> {
    let mut reader = Reader::new(record);
    reader.skip(RECORD_PREFIX_SIZE)?;
    let len = reader.read_u16()? as usize;
    Ok(std::str::from_utf8(reader.take(len)?)?)
}

/// Traversal trace of a key path over one buffer.
///
/// A scout is only meaningful for the exact buffer it was taken from; every
/// mutation consumes that relationship, so take a fresh scout after each one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scout {
    segments: Vec<String>,
    ancestors: Vec<ScoutEntry>,
    end: Option<ScoutEntry>,
    blocked: Option<ScoutEntry>,
}

/// Traces `key` through `data`.
///
/// Never fails for a missing path; the returned scout just has fewer
/// ancestors and no end record.
///
/// # Example
///
/// ```
/// use ods::{Registry, Tag, scout, to_vec};
///
/// let registry = Registry::default();
/// let doc = Tag::object("A", vec![Tag::object("B", vec![Tag::new("c", 1)])]);
/// let data = to_vec(&doc, &registry).unwrap();
///
/// let found = scout(&data, "A.B.c").unwrap();
/// assert_eq!(found.ancestors().len(), 2);
/// assert_eq!(found.end().unwrap().offset, 1 + 4 + 2 + 1 + 1 + 4 + 2 + 1 + 1);
///
/// let partial = scout(&data, "A.X.c").unwrap();
/// assert_eq!(partial.ancestors().len(), 1);
/// assert!(partial.end().is_none());
/// ```
pub fn scout(data: &[u8], key: impl Key) -> Result<Scout> {
    key.with_segments(|segments| Ok(Scout::from_trace(locate(data, segments)?, segments)))
}

impl Scout {
    fn from_trace(trace: Trace, segments: &[&str]) -> Self {
        let depth = trace.ancestors.len();
        let ancestors = trace
            .ancestors
            .iter()
            .zip(segments)
            .map(|(located, name)| ScoutEntry::new(name, located))
            .collect();
        let at_depth = |located: Option<Located>| {
            located.map(|located| ScoutEntry::new(segments[depth], &located))
        };
        Self {
            segments: segments.iter().map(|s| (*s).to_owned()).collect(),
            ancestors,
            end: at_depth(trace.end),
            blocked: at_depth(trace.blocked),
        }
    }

    /// The key this scout traced, dot-joined.
    pub fn key(&self) -> String {
        self.segments.join(".")
    }

    pub fn ancestors(&self) -> &[ScoutEntry] {
        &self.ancestors
    }

    pub fn end(&self) -> Option<&ScoutEntry> {
        self.end.as_ref()
    }

    /// A leaf matched along the path that blocked further descent.
    pub fn blocked(&self) -> Option<&ScoutEntry> {
        self.blocked.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.end.is_some()
    }

    /// Segments below the deepest matched ancestor that did not resolve.
    pub fn unresolved(&self) -> &[String] {
        if self.end.is_some() {
            return &[];
        }
        &self.segments[self.ancestors.len()..]
    }

    fn require_end(&self) -> Result<&ScoutEntry> {
        self.end.as_ref().ok_or_else(|| {
            cold_path();
            Error::KeyNotFound(self.key())
        })
    }

    /// New value of every ancestor length field after a size change of
    /// `delta` bytes, validated before anything is written.
    fn patches(&self, delta: i64) -> Result<Vec<(usize, u32)>> {
        self.ancestors
            .iter()
            .map(|ancestor| {
                let length = ancestor.length as i64 + delta;
                if length < 0 {
                    cold_path();
                    return Err(Error::InvalidLength(ancestor.length));
                }
                Ok((ancestor.offset, checked_record_length(length as u64)?))
            })
            .collect()
    }

    fn check_range(data: &[u8], range: &Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > data.len() {
            cold_path();
            return Err(Error::TruncatedData);
        }
        Ok(())
    }

    /// Checks that a record named `name` may become a child of the deepest
    /// ancestor. `replacing` is the child it takes the place of, if any.
    ///
    /// List children are nameless, so nothing named can be added to a list.
    /// Dictionary keys must stay unique.
    fn check_child(&self, data: &[u8], name: &str, replacing: Option<&ScoutEntry>) -> Result<()> {
        let Some(parent) = self.ancestors.last() else {
            return Ok(());
        };
        match TagID::from_u8(parent.type_id) {
            Some(TagID::List) if replacing.is_none() => {
                cold_path();
                let depth = self.ancestors.len();
                Err(Error::NotAContainer(self.segments[..depth].join(".")))
            }
            Some(TagID::Dictionary) => {
                if replacing.is_some_and(|end| end.name == name) {
                    return Ok(());
                }
                if find_child(data, parent.value_range(), name)?.is_some() {
                    cold_path();
                    return Err(Error::DuplicateKey(name.to_owned()));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn apply(data: &mut [u8], patches: &[(usize, u32)]) -> Result<()> {
        for &(offset, length) in patches {
            patch_u32(data, offset, length)?;
        }
        Ok(())
    }

    /// Removes the end record and shrinks every ancestor by its footprint.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the path did not resolve. The buffer is left
    /// untouched on any error.
    pub fn delete(&self, data: &mut Vec<u8>) -> Result<()> {
        let end = self.require_end()?;
        let range = end.record_range();
        Self::check_range(data, &range)?;
        let patches = self.patches(-(end.footprint() as i64))?;

        data.drain(range);
        Self::apply(data, &patches)?;
        debug!(
            key = %self.key(),
            removed = end.footprint(),
            ancestors = patches.len(),
            "deleted record"
        );
        Ok(())
    }

    /// Replaces the end record with `record`, a complete pre-encoded record.
    ///
    /// Ancestors grow or shrink by the footprint difference.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] if the parent is a dictionary that already has
    /// another entry named like `record`.
    pub fn replace(&self, data: &mut Vec<u8>, record: &[u8]) -> Result<()> {
        let end = self.require_end()?;
        let range = end.record_range();
        Self::check_range(data, &range)?;
        self.check_child(data, record_name(record)?, Some(end))?;
        let patches = self.patches(record.len() as i64 - end.footprint() as i64)?;

        data.splice(range, record.iter().copied());
        Self::apply(data, &patches)?;
        debug!(
            key = %self.key(),
            removed = end.footprint(),
            inserted = record.len(),
            ancestors = patches.len(),
            "replaced record"
        );
        Ok(())
    }

    /// Inserts `record` as the last child of the deepest matched ancestor, or
    /// at the end of the buffer if nothing matched.
    ///
    /// # Errors
    ///
    /// [`Error::NotAContainer`] if that ancestor is a list, and
    /// [`Error::DuplicateKey`] if it is a dictionary that already has an
    /// entry named like `record`.
    pub fn insert(&self, data: &mut Vec<u8>, record: &[u8]) -> Result<()> {
        let at = self
            .ancestors
            .last()
            .map_or(data.len(), ScoutEntry::end_offset);
        Self::check_range(data, &(at..at))?;
        self.check_child(data, record_name(record)?, None)?;
        let patches = self.patches(record.len() as i64)?;

        data.splice(at..at, record.iter().copied());
        Self::apply(data, &patches)?;
        debug!(
            key = %self.key(),
            at,
            inserted = record.len(),
            ancestors = patches.len(),
            "inserted record"
        );
        Ok(())
    }
}

/// Deletes the record at `key`.
///
/// Returns `Ok(false)` if the key does not exist.
pub fn delete(data: &mut Vec<u8>, key: impl Key) -> Result<bool> {
    let scout = scout(data, key)?;
    if !scout.is_resolved() {
        return Ok(false);
    }
    scout.delete(data)?;
    Ok(true)
}

/// Replaces the record at `key` with `tag`.
///
/// The new record carries `tag`'s own name. Returns `Ok(false)` if the key
/// does not exist.
pub fn replace(data: &mut Vec<u8>, key: impl Key, tag: &Tag, registry: &Registry) -> Result<bool> {
    let scout = scout(data, key)?;
    if !scout.is_resolved() {
        return Ok(false);
    }
    scout.replace(data, &to_vec(tag, registry)?)?;
    Ok(true)
}

/// Replaces the record at `key`, or creates it together with any missing
/// parent objects.
///
/// Missing segments between the deepest existing ancestor and the last
/// segment become fresh objects; `tag` goes innermost under its own name.
/// With no existing ancestor the whole chain is appended at top level.
///
/// # Errors
///
/// [`Error::NotAContainer`] if the path runs through an existing leaf value
/// or would add a named child to a list. [`Error::DuplicateKey`] if the new
/// record would repeat a key of the dictionary it lands in.
///
/// # Example
///
/// ```
/// use ods::{Registry, Tag, get, set, to_vec};
///
/// let registry = Registry::default();
/// let mut data = to_vec(&Tag::object("X", vec![]), &registry).unwrap();
///
/// set(&mut data, "X.Y.Z", &Tag::new("Z", 5), &registry).unwrap();
/// assert_eq!(get(&data, "X.Y.Z", &registry).unwrap(), Some(Tag::new("Z", 5)));
/// ```
pub fn set(data: &mut Vec<u8>, key: impl Key, tag: &Tag, registry: &Registry) -> Result<()> {
    key.with_segments(|segments| {
        let scout = Scout::from_trace(locate(data, segments)?, segments);

        if scout.is_resolved() {
            return scout.replace(data, &to_vec(tag, registry)?);
        }
        if scout.blocked.is_some() {
            cold_path();
            let depth = scout.ancestors.len();
            return Err(Error::NotAContainer(join(&segments[..=depth])));
        }

        let missing = scout.unresolved();
        let parents = &missing[..missing.len() - 1];
        let chain = parents
            .iter()
            .rev()
            .fold(tag.clone(), |inner, name| Tag::object(name.as_str(), vec![inner]));
        scout.insert(data, &to_vec(&chain, registry)?)
    })
}
