//! Key-path resolution directly over an encoded buffer.
//!
//! Records are scanned level by level. A sibling whose name does not match is
//! skipped by seeking over its declared length, so only the records along the
//! requested path are ever looked at, and only the final one is decoded.

use std::ops::Range;

use tracing::trace;

use crate::{
    Error,
    Key,
    NAME_LENGTH_SIZE,
    Reader,
    Registry,
    Result,
    Tag,
    TagID,
    cold_path,
    key::join,
    read::{decode_record, read_tags},
};

/// A record located by name during a scan, with absolute offsets into the
/// root buffer.
#[derive(Clone, Debug)]
pub(crate) struct Located {
    pub type_id: u8,
    pub record_length: u32,
    /// Offset of the record's 4-byte length field.
    pub length_offset: usize,
    /// Absolute range of the value region.
    pub value: Range<usize>,
}

/// Everything a scan learned about a key path.
#[derive(Debug, Default)]
pub(crate) struct Trace {
    /// Composite records matched along the path, outermost first.
    pub ancestors: Vec<Located>,
    /// The record the full path resolved to.
    pub end: Option<Located>,
    /// A matched leaf that the path needed to descend through.
    pub blocked: Option<Located>,
}

/// Finds the first record named `name` among the records in `region`.
pub(crate) fn find_child(data: &[u8], region: Range<usize>, name: &str) -> Result<Option<Located>> {
    let base = region.start;
    let mut reader = Reader::new(data.get(region).ok_or(Error::TruncatedData)?);

    while !reader.is_empty() {
        let type_id = reader.read_u8()?;
        let length_offset = base + reader.position();
        let record_length = reader.read_u32()?;
        let name_len = reader.read_u16()? as usize;
        let body_len = (record_length as usize)
            .checked_sub(NAME_LENGTH_SIZE)
            .ok_or(Error::InvalidLength(record_length))?;

        if name_len != name.len() {
            reader.skip(body_len)?;
            continue;
        }

        let candidate = reader.take(name_len)?;
        let value_len = body_len
            .checked_sub(name_len)
            .ok_or(Error::InvalidLength(record_length))?;
        if candidate != name.as_bytes() {
            reader.skip(value_len)?;
            continue;
        }

        let value_start = base + reader.position();
        reader.skip(value_len)?;
        return Ok(Some(Located {
            type_id,
            record_length,
            length_offset,
            value: value_start..value_start + value_len,
        }));
    }

    Ok(None)
}

/// Walks `segments` from the top level of `data`.
///
/// Absence at any level is not an error; it simply ends the trace early.
/// Descending through a compressed object is.
pub(crate) fn locate(data: &[u8], segments: &[&str]) -> Result<Trace> {
    let mut trace = Trace::default();
    let mut region = 0..data.len();

    for (depth, segment) in segments.iter().enumerate() {
        let Some(found) = find_child(data, region, segment)? else {
            trace!(segment, depth, "key segment not found");
            break;
        };

        if depth + 1 == segments.len() {
            trace.end = Some(found);
            break;
        }

        match TagID::from_u8(found.type_id) {
            Some(id) if id.is_composite() => {
                trace!(segment, depth, offset = found.length_offset, "descending");
                region = found.value.clone();
                trace.ancestors.push(found);
            }
            Some(TagID::CompressedObject) => {
                cold_path();
                return Err(Error::CompressedObjectTraversal(join(&segments[..=depth])));
            }
            _ => {
                trace.blocked = Some(found);
                break;
            }
        }
    }

    Ok(trace)
}

/// Looks up the tag at `key` and decodes only that record.
///
/// Returns `Ok(None)` when the path does not exist, including when it runs
/// into a leaf value before its last segment.
///
/// # Errors
///
/// Fails on malformed input, on a path that would descend through a
/// compressed object, and on any decode error in the matched record.
///
/// # Example
///
/// ```
/// use ods::{Registry, Tag, get, to_vec};
///
/// let registry = Registry::default();
/// let car = Tag::object(
///     "Car",
///     vec![Tag::object("Owner", vec![Tag::string("firstName", "Jeff")])],
/// );
/// let data = to_vec(&car, &registry).unwrap();
///
/// let name = get(&data, "Car.Owner.firstName", &registry).unwrap();
/// assert_eq!(name, Some(Tag::string("firstName", "Jeff")));
/// assert_eq!(get(&data, "Car.Owner.lastName", &registry).unwrap(), None);
/// ```
pub fn get(data: &[u8], key: impl Key, registry: &Registry) -> Result<Option<Tag>> {
    key.with_segments(|segments| {
        let Some(end) = locate(data, segments)?.end else {
            return Ok(None);
        };
        let name = segments[segments.len() - 1];
        let value = data.get(end.value).ok_or(Error::TruncatedData)?;
        decode_record(end.type_id, name, value, registry).map(Some)
    })
}

/// Checks whether `key` exists without decoding the matched value.
pub fn find(data: &[u8], key: impl Key) -> Result<bool> {
    key.with_segments(|segments| Ok(locate(data, segments)?.end.is_some()))
}

/// Decodes every top-level record.
pub fn get_all(data: &[u8], registry: &Registry) -> Result<Vec<Tag>> {
    read_tags(data, registry)
}
