//! Record decoder.

use std::collections::{BTreeMap, btree_map::Entry};

use bytes::Bytes;
use tracing::warn;

use crate::{
    CompressedObject, Error, InvalidValue, Reader, Registry, Result, Tag, TagID, Value, cold_path,
};

/// Decodes exactly one record at the cursor, leaving the cursor at the start
/// of the next record.
pub fn read_tag(reader: &mut Reader<'_>, registry: &Registry) -> Result<Tag> {
    let type_id = reader.read_u8()?;
    let record_length = reader.read_u32()?;
    let mut body = Reader::new(reader.take(record_length as usize)?);
    let name = read_name(&mut body, record_length)?;
    decode_record(type_id, name, body.rest(), registry)
}

/// Decodes every record in `data` until the end of the slice.
///
/// # Example
///
/// ```
/// use ods::{Registry, Tag, read_tags, to_vec_all};
///
/// let registry = Registry::default();
/// let tags = vec![Tag::string("a", "x"), Tag::new("b", 2)];
/// let data = to_vec_all(&tags, &registry).unwrap();
/// assert_eq!(read_tags(&data, &registry).unwrap(), tags);
/// ```
pub fn read_tags(data: &[u8], registry: &Registry) -> Result<Vec<Tag>> {
    let mut reader = Reader::new(data);
    let mut tags = Vec::new();
    while !reader.is_empty() {
        tags.push(read_tag(&mut reader, registry)?);
    }
    Ok(tags)
}

/// Decodes a buffer holding exactly one record.
///
/// # Errors
///
/// Returns [`Error::TrailingData`] if bytes remain after the record.
pub fn from_slice(data: &[u8], registry: &Registry) -> Result<Tag> {
    let mut reader = Reader::new(data);
    let tag = read_tag(&mut reader, registry)?;
    if !reader.is_empty() {
        cold_path();
        return Err(Error::TrailingData(reader.remaining()));
    }
    Ok(tag)
}

/// Reads the `[name_length][name]` prefix of a record body.
pub(crate) fn read_name<'a>(body: &mut Reader<'a>, record_length: u32) -> Result<&'a str> {
    let name_len = body
        .read_u16()
        .map_err(|_| Error::InvalidLength(record_length))? as usize;
    let name = body
        .take(name_len)
        .map_err(|_| Error::InvalidLength(record_length))?;
    Ok(std::str::from_utf8(name)?)
}

/// Builds a tag from a record's type id, name and value region.
pub(crate) fn decode_record(
    type_id: u8,
    name: &str,
    bytes: &[u8],
    registry: &Registry,
) -> Result<Tag> {
    let value = match TagID::from_u8(type_id) {
        Some(TagID::Invalid) | None => return decode_unknown(type_id, name, bytes, registry),
        Some(id) => decode_value(id, bytes, registry)?,
    };
    Ok(Tag {
        name: name.to_owned(),
        value,
    })
}

fn decode_unknown(type_id: u8, name: &str, bytes: &[u8], registry: &Registry) -> Result<Tag> {
    if let Some(factory) = registry.custom_tag(type_id) {
        return factory(name.to_owned(), bytes);
    }
    if registry.is_permissive() {
        warn!(
            type_id,
            name,
            len = bytes.len(),
            "unknown tag type, keeping placeholder"
        );
        return Ok(Tag {
            name: name.to_owned(),
            value: Value::Invalid(InvalidValue {
                type_id,
                raw: Bytes::copy_from_slice(bytes),
            }),
        });
    }
    cold_path();
    Err(Error::UnknownTagType(type_id))
}

/// Runs `read` over `bytes` and requires it to consume all of them.
fn exact<'a, T>(bytes: &'a [u8], read: impl FnOnce(&mut Reader<'a>) -> Result<T>) -> Result<T> {
    let mut reader = Reader::new(bytes);
    let value = read(&mut reader)?;
    if !reader.is_empty() {
        cold_path();
        return Err(Error::TrailingData(reader.remaining()));
    }
    Ok(value)
}

fn decode_value(id: TagID, bytes: &[u8], registry: &Registry) -> Result<Value> {
    Ok(match id {
        TagID::String => Value::String(std::str::from_utf8(bytes)?.to_owned()),
        TagID::Int => Value::Int(exact(bytes, Reader::read_i32)?),
        TagID::Float => Value::Float(exact(bytes, Reader::read_f32)?),
        TagID::Double => Value::Double(exact(bytes, Reader::read_f64)?),
        TagID::Short => Value::Short(exact(bytes, Reader::read_i16)?),
        TagID::Long => Value::Long(exact(bytes, Reader::read_i64)?),
        TagID::Char => Value::Char(exact(bytes, Reader::read_u16)?),
        TagID::Byte => Value::Byte(exact(bytes, Reader::read_u8)?),
        TagID::List => Value::List(
            read_tags(bytes, registry)?
                .into_iter()
                .map(|tag| tag.value)
                .collect(),
        ),
        TagID::Dictionary => {
            let mut entries = BTreeMap::new();
            for tag in read_tags(bytes, registry)? {
                match entries.entry(tag.name) {
                    Entry::Vacant(entry) => {
                        entry.insert(tag.value);
                    }
                    Entry::Occupied(entry) => {
                        cold_path();
                        return Err(Error::DuplicateKey(entry.key().clone()));
                    }
                }
            }
            Value::Dictionary(entries)
        }
        TagID::Object => Value::Object(read_tags(bytes, registry)?),
        TagID::CompressedObject => {
            let mut reader = Reader::new(bytes);
            let name_len = reader.read_u16()? as usize;
            let compressor_name = std::str::from_utf8(reader.take(name_len)?)?;
            let compressor = registry.compressor(compressor_name)?;
            let children = compressor.decompress(reader.rest())?;
            Value::CompressedObject(CompressedObject {
                compressor: compressor_name.to_owned(),
                tags: read_tags(&children, registry)?,
            })
        }
        TagID::Invalid => {
            cold_path();
            return Err(Error::UnknownTagType(0));
        }
    })
}
