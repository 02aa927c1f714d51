//! Record encoder.
//!
//! Each record is written as `[type_id][record_length][name_length][name][value]`.
//! The length field is reserved first and backpatched once the name and value
//! (including every descendant record) have been appended.

use tracing::trace;

use crate::{
    Error, MAX_NAME_LENGTH, RECORD_LENGTH_SIZE, Registry, Result, Tag, Value, checked_record_length,
    cold_path, patch_u32, put_f32, put_f64, put_i16, put_i32, put_i64, put_u16,
};

/// Appends one full record for `tag` to `out`.
///
/// On error nothing is appended: `out` is truncated back to its original
/// length.
///
/// # Example
///
/// ```
/// use ods::{Registry, Tag, write_tag};
///
/// let mut out = Vec::new();
/// write_tag(&Tag::new("n", 7i16), &Registry::default(), &mut out).unwrap();
/// assert_eq!(out, [5, 0, 0, 0, 5, 0, 1, b'n', 0, 7]);
/// ```
pub fn write_tag(tag: &Tag, registry: &Registry, out: &mut Vec<u8>) -> Result<()> {
    let start = out.len();
    let result = write_record(&tag.name, &tag.value, registry, out);
    if result.is_err() {
        cold_path();
        out.truncate(start);
    }
    result
}

/// Appends the records of `tags` back to back. All or nothing, like
/// [`write_tag`].
pub fn write_tags<'a>(
    tags: impl IntoIterator<Item = &'a Tag>,
    registry: &Registry,
    out: &mut Vec<u8>,
) -> Result<()> {
    let start = out.len();
    for tag in tags {
        if let Err(e) = write_record(&tag.name, &tag.value, registry, out) {
            cold_path();
            out.truncate(start);
            return Err(e);
        }
    }
    Ok(())
}

/// Encodes a single tag into a fresh buffer.
pub fn to_vec(tag: &Tag, registry: &Registry) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(64);
    write_record(&tag.name, &tag.value, registry, &mut out)?;
    Ok(out)
}

/// Encodes a sequence of top-level tags into a fresh buffer.
pub fn to_vec_all(tags: &[Tag], registry: &Registry) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(64 * tags.len());
    write_tags(tags, registry, &mut out)?;
    Ok(out)
}

pub(crate) fn write_name(name: &str, out: &mut Vec<u8>) -> Result<()> {
    if name.len() > MAX_NAME_LENGTH {
        cold_path();
        return Err(Error::NameTooLong(name.len()));
    }
    put_u16(out, name.len() as u16);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

fn write_record(name: &str, value: &Value, registry: &Registry, out: &mut Vec<u8>) -> Result<()> {
    if let Value::Invalid(invalid) = value {
        cold_path();
        return Err(Error::UnwritableTag {
            type_id: invalid.type_id,
            name: name.to_owned(),
        });
    }

    out.push(value.type_id());
    let length_at = out.len();
    out.extend_from_slice(&[0; RECORD_LENGTH_SIZE]);
    write_name(name, out)?;
    write_value(name, value, registry, out)?;

    let len = checked_record_length((out.len() - length_at - RECORD_LENGTH_SIZE) as u64)?;
    patch_u32(out, length_at, len)
}

fn write_value(name: &str, value: &Value, registry: &Registry, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::String(s) => out.extend_from_slice(s.as_bytes()),
        Value::Int(v) => put_i32(out, *v),
        Value::Float(v) => put_f32(out, *v),
        Value::Double(v) => put_f64(out, *v),
        Value::Short(v) => put_i16(out, *v),
        Value::Long(v) => put_i64(out, *v),
        Value::Char(unit) => put_u16(out, *unit),
        Value::Byte(v) => out.push(*v),
        Value::List(values) => {
            for value in values {
                write_record("", value, registry, out)?;
            }
        }
        Value::Dictionary(entries) => {
            for (key, value) in entries {
                write_record(key, value, registry, out)?;
            }
        }
        Value::Object(tags) => {
            for tag in tags {
                write_record(&tag.name, &tag.value, registry, out)?;
            }
        }
        Value::CompressedObject(object) => {
            let compressor = registry.compressor(&object.compressor)?;
            write_name(&object.compressor, out)?;
            let mut children = Vec::with_capacity(64 * object.tags.len());
            for tag in &object.tags {
                write_record(&tag.name, &tag.value, registry, &mut children)?;
            }
            let packed = compressor.compress(&children)?;
            trace!(
                name,
                compressor = %object.compressor,
                raw = children.len(),
                packed = packed.len(),
                "compressed object payload"
            );
            out.extend_from_slice(&packed);
        }
        Value::Custom(custom) => custom.write_value(out)?,
        Value::Invalid(invalid) => {
            return Err(Error::UnwritableTag {
                type_id: invalid.type_id,
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}
