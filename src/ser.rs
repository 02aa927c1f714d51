//! `serde::Serialize` view of decoded tags.
//!
//! A [`Tag`] serializes as a one-entry map from its name to its value, so a
//! document dumps naturally to self-describing formats such as JSON. There is
//! no way back: the binary codec is the only round-trip path.
//!
//! | Variant            | Serialized as                          |
//! |--------------------|----------------------------------------|
//! | primitives         | the matching serde primitive           |
//! | `Char`             | `char`, or `u16` for a lone surrogate  |
//! | `List`             | sequence                               |
//! | `Dictionary`       | map                                    |
//! | `Object`           | map of child name to value, in order   |
//! | `CompressedObject` | struct `{ compressor, tags }`          |
//! | custom / invalid   | raw value bytes                        |

use serde::ser::{Error as _, Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::{Tag, Value};

/// Children of an object, serialized as an ordered map.
struct Children<'a>(&'a [Tag]);

impl Serialize for Children<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for tag in self.0 {
            map.serialize_entry(&tag.name, &tag.value)?;
        }
        map.end()
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::Short(v) => serializer.serialize_i16(*v),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::Char(unit) => match char::from_u32(*unit as u32) {
                Some(c) => serializer.serialize_char(c),
                None => serializer.serialize_u16(*unit),
            },
            Value::Byte(v) => serializer.serialize_u8(*v),
            Value::List(values) => serializer.collect_seq(values),
            Value::Dictionary(entries) => serializer.collect_map(entries),
            Value::Object(tags) => Children(tags).serialize(serializer),
            Value::CompressedObject(object) => {
                let mut state = serializer.serialize_struct("CompressedObject", 2)?;
                state.serialize_field("compressor", &object.compressor)?;
                state.serialize_field("tags", &Children(&object.tags))?;
                state.end()
            }
            Value::Custom(custom) => {
                let mut raw = Vec::new();
                custom.write_value(&mut raw).map_err(S::Error::custom)?;
                serializer.serialize_bytes(&raw)
            }
            Value::Invalid(invalid) => serializer.serialize_bytes(&invalid.raw),
        }
    }
}
