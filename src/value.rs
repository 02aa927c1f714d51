//! In-memory tag model.
//!
//! A [`Tag`] is a name plus a [`Value`]. Composite values own their decoded
//! children. Lists and dictionaries store bare values: list elements are
//! nameless on the wire and dictionary children carry their key as name.

use std::{any::Any, collections::BTreeMap, fmt};

use bytes::Bytes;

use crate::{Result, TagID};

/// A named, typed value node.
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub name: String,
    pub value: Value,
}

/// The payload of a [`Tag`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Int(i32),
    Float(f32),
    Double(f64),
    Short(i16),
    Long(i64),
    /// A single UTF-16 code unit.
    Char(u16),
    Byte(u8),
    List(Vec<Value>),
    /// Keys are kept sorted, as on decode.
    Dictionary(BTreeMap<String, Value>),
    Object(Vec<Tag>),
    CompressedObject(CompressedObject),
    Custom(Box<dyn CustomValue>),
    Invalid(InvalidValue),
}

/// An object whose children are stored through a named compressor.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressedObject {
    /// Registry name of the compressor applied to the child records.
    pub compressor: String,
    pub tags: Vec<Tag>,
}

/// Placeholder for a record whose type id was not recognized while decoding
/// in permissive mode. It keeps the raw value bytes but can never be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidValue {
    pub type_id: u8,
    pub raw: Bytes,
}

/// A user-defined value type, identified by a type id of 16 or above.
///
/// Implementations encode only the value region of the record; the header is
/// written by the codec. Decoding goes through the factory registered for
/// the same id in a [`Registry`](crate::Registry).
pub trait CustomValue: fmt::Debug + Send + Sync + 'static {
    /// Type id written in the record header.
    fn tag_id(&self) -> u8;

    /// Appends the value bytes to `out`.
    fn write_value(&self, out: &mut Vec<u8>) -> Result<()>;

    fn clone_boxed(&self) -> Box<dyn CustomValue>;

    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn CustomValue> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl PartialEq for Box<dyn CustomValue> {
    /// Two custom values are equal when they share an id and encode to the
    /// same bytes.
    fn eq(&self, other: &Self) -> bool {
        if self.tag_id() != other.tag_id() {
            return false;
        }
        let (mut a, mut b) = (Vec::new(), Vec::new());
        match (self.write_value(&mut a), other.write_value(&mut b)) {
            (Ok(()), Ok(())) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Raw type id written in the record header.
    pub fn type_id(&self) -> u8 {
        match self {
            Value::String(_) => TagID::String as u8,
            Value::Int(_) => TagID::Int as u8,
            Value::Float(_) => TagID::Float as u8,
            Value::Double(_) => TagID::Double as u8,
            Value::Short(_) => TagID::Short as u8,
            Value::Long(_) => TagID::Long as u8,
            Value::Char(_) => TagID::Char as u8,
            Value::Byte(_) => TagID::Byte as u8,
            Value::List(_) => TagID::List as u8,
            Value::Dictionary(_) => TagID::Dictionary as u8,
            Value::Object(_) => TagID::Object as u8,
            Value::CompressedObject(_) => TagID::CompressedObject as u8,
            Value::Custom(custom) => custom.tag_id(),
            Value::Invalid(invalid) => invalid.type_id,
        }
    }

    /// Built-in id of this value, `None` for custom and invalid values.
    pub fn tag_id(&self) -> Option<TagID> {
        match self {
            Value::Custom(_) | Value::Invalid(_) => None,
            _ => TagID::from_u8(self.type_id()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Decodes a `Char` code unit, `None` for lone surrogates and other types.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(unit) => char::from_u32(*unit as u32),
            _ => None,
        }
    }

    /// Children of an object (plain or compressed).
    pub fn as_object(&self) -> Option<&[Tag]> {
        match self {
            Value::Object(tags) => Some(tags),
            Value::CompressedObject(object) => Some(&object.tags),
            _ => None,
        }
    }

    /// Downcasts a custom value to its concrete type.
    pub fn as_custom<T: CustomValue>(&self) -> Option<&T> {
        match self {
            Value::Custom(custom) => custom.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl Tag {
    /// Creates a tag from anything convertible into a [`Value`].
    ///
    /// # Example
    ///
    /// ```
    /// use ods::{Tag, Value};
    ///
    /// let tag = Tag::new("gas", 30);
    /// assert_eq!(tag.value, Value::Int(30));
    /// ```
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Value::String(value.into()))
    }

    /// Creates a `Char` tag.
    ///
    /// Returns `None` when `value` is outside the Basic Multilingual Plane and
    /// therefore does not fit one UTF-16 code unit.
    pub fn char(name: impl Into<String>, value: char) -> Option<Self> {
        let mut units = [0u16; 2];
        match value.encode_utf16(&mut units) {
            [unit] => Some(Self::new(name, Value::Char(*unit))),
            _ => None,
        }
    }

    pub fn object(name: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self::new(name, Value::Object(tags))
    }

    pub fn list(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(name, Value::List(values))
    }

    pub fn dictionary(name: impl Into<String>, entries: BTreeMap<String, Value>) -> Self {
        Self::new(name, Value::Dictionary(entries))
    }

    pub fn compressed_object(
        name: impl Into<String>,
        compressor: impl Into<String>,
        tags: Vec<Tag>,
    ) -> Self {
        Self::new(
            name,
            Value::CompressedObject(CompressedObject {
                compressor: compressor.into(),
                tags,
            }),
        )
    }

    pub fn custom(name: impl Into<String>, value: impl CustomValue) -> Self {
        Self::new(name, Value::Custom(Box::new(value)))
    }

    pub fn type_id(&self) -> u8 {
        self.value.type_id()
    }

    /// Looks up a direct child of an object by name. The first match wins.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.value
            .as_object()?
            .iter()
            .find(|child| child.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Appends a child to an object.
    ///
    /// Returns the tag back as `Err` if this is not an object.
    pub fn push(&mut self, tag: Tag) -> std::result::Result<(), Tag> {
        match &mut self.value {
            Value::Object(tags) => tags.push(tag),
            Value::CompressedObject(object) => object.tags.push(tag),
            _ => return Err(tag),
        }
        Ok(())
    }

    /// Removes and returns the first child with the given name.
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let tags = match &mut self.value {
            Value::Object(tags) => tags,
            Value::CompressedObject(object) => &mut object.tags,
            _ => return None,
        };
        let index = tags.iter().position(|child| child.name == name)?;
        Some(tags.remove(index))
    }
}

impl From<CompressedObject> for Value {
    fn from(value: CompressedObject) -> Self {
        Value::CompressedObject(value)
    }
}
