//! Explicit conversions between Rust values and tags.
//!
//! Primitives convert into [`Value`] through `From`. Getting them back out
//! goes through [`FromValue`], which checks the variant. Types that know how
//! to store themselves as a whole tag implement [`ToTag`] and [`FromTag`].
//!
//! # Example
//!
//! ```
//! use ods::{Error, FromTag, Result, Tag, ToTag};
//!
//! struct Owner {
//!     first_name: String,
//!     age: i32,
//! }
//!
//! impl ToTag for Owner {
//!     fn to_tag(&self, name: &str) -> Tag {
//!         Tag::object(
//!             name,
//!             vec![
//!                 self.first_name.to_tag("firstName"),
//!                 self.age.to_tag("age"),
//!             ],
//!         )
//!     }
//! }
//!
//! impl FromTag for Owner {
//!     fn from_tag(tag: &Tag) -> Result<Self> {
//!         Ok(Owner {
//!             first_name: tag.get_as("firstName")?,
//!             age: tag.get_as("age")?,
//!         })
//!     }
//! }
//!
//! let tag = Owner { first_name: "Jeff".into(), age: 30 }.to_tag("Owner");
//! let owner = Owner::from_tag(&tag).unwrap();
//! assert_eq!(owner.first_name, "Jeff");
//! assert!(matches!(tag.get_as::<i64>("age"), Err(Error::TagMismatch { .. })));
//! ```

use crate::{Error, Result, Tag, TagID, Value, cold_path};

macro_rules! primitive {
    ($($ty:ty => $variant:ident;)*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl FromValue for $ty {
                #[inline]
                fn from_value(value: &Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v.clone()),
                        other => Err(mismatch(TagID::$variant, other)),
                    }
                }
            }
        )*
    };
}

#[inline]
fn mismatch(expected: TagID, found: &Value) -> Error {
    cold_path();
    Error::TagMismatch {
        expected,
        found: found.tag_id(),
    }
}

/// Extracts a Rust value from a [`Value`] of the matching variant.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

/// Types that can store themselves as a tag under a given name.
///
/// Every type convertible into a [`Value`] gets this for free.
pub trait ToTag {
    fn to_tag(&self, name: &str) -> Tag;
}

/// Types that can rebuild themselves from a tag.
///
/// Every [`FromValue`] type gets this for free; the tag's name is ignored.
pub trait FromTag: Sized {
    fn from_tag(tag: &Tag) -> Result<Self>;
}

primitive! {
    String => String;
    i32 => Int;
    f32 => Float;
    f64 => Double;
    i16 => Short;
    i64 => Long;
    u8 => Byte;
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

impl From<Vec<Tag>> for Value {
    fn from(tags: Vec<Tag>) -> Self {
        Value::Object(tags)
    }
}

/// Fails with [`Error::TagMismatch`] for a lone surrogate as well.
impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_char().ok_or_else(|| mismatch(TagID::Char, value))
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::List(values) => values.iter().map(T::from_value).collect(),
            other => Err(mismatch(TagID::List, other)),
        }
    }
}

impl<T> ToTag for T
where
    T: Into<Value> + Clone,
{
    fn to_tag(&self, name: &str) -> Tag {
        Tag::new(name, self.clone())
    }
}

impl<T: FromValue> FromTag for T {
    fn from_tag(tag: &Tag) -> Result<Self> {
        T::from_value(&tag.value)
    }
}

impl Tag {
    /// Reads the direct child `name` of an object as `T`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if there is no such child, or whatever
    /// [`FromTag`] reports for the child.
    pub fn get_as<T: FromTag>(&self, name: &str) -> Result<T> {
        match self.get(name) {
            Some(child) => T::from_tag(child),
            None => {
                cold_path();
                Err(Error::KeyNotFound(name.to_owned()))
            }
        }
    }

    /// Converts the whole tag's value.
    pub fn value_as<T: FromValue>(&self) -> Result<T> {
        T::from_value(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_check_variant() {
        assert_eq!(i32::from_value(&Value::Int(3)).unwrap(), 3);
        assert_eq!(u8::from_value(&Value::Byte(200)).unwrap(), 200);
        assert!(matches!(
            i16::from_value(&Value::Int(3)),
            Err(Error::TagMismatch {
                expected: TagID::Short,
                found: Some(TagID::Int)
            })
        ));
    }

    #[test]
    fn char_rejects_lone_surrogate() {
        assert_eq!(char::from_value(&Value::Char(0x41)).unwrap(), 'A');
        assert!(char::from_value(&Value::Char(0xD800)).is_err());
    }

    #[test]
    fn list_into_vec() {
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(Vec::<i32>::from_value(&list).unwrap(), [1, 2]);

        let mixed = Value::List(vec![Value::Int(1), Value::from("x")]);
        assert!(Vec::<i32>::from_value(&mixed).is_err());
    }

    #[test]
    fn get_as_missing_child() {
        let tag = Tag::object("o", vec![Tag::new("a", 1)]);
        assert_eq!(tag.get_as::<i32>("a").unwrap(), 1);
        assert!(matches!(tag.get_as::<i32>("b"), Err(Error::KeyNotFound(_))));
    }
}
