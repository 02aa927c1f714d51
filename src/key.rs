use std::fmt;

use crate::{Error, Result};

/// Separator between key path segments.
pub const KEY_SEPARATOR: char = '.';

/// A validated, dot-separated key path such as `Car.Owner.firstName`.
///
/// Every segment is non-empty. Parsing once and reusing the path avoids
/// re-splitting the key on every lookup.
///
/// # Example
///
/// ```
/// use ods::KeyPath;
///
/// let path = KeyPath::parse("Car.Owner.firstName").unwrap();
/// assert_eq!(path.segments(), ["Car", "Owner", "firstName"]);
/// assert!(KeyPath::parse("Car..Owner").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyPath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> KeyPath<'a> {
    /// Splits `key` on `.` and validates every segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] for an empty key or an empty segment.
    pub fn parse(key: &'a str) -> Result<Self> {
        Self::from_segments(key.split(KEY_SEPARATOR))
    }

    /// Builds a path from already separated segments.
    ///
    /// Segments must be non-empty and must not contain `.`.
    pub fn from_segments(segments: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let segments: Vec<&'a str> = segments.into_iter().collect();
        if segments.is_empty()
            || segments
                .iter()
                .any(|segment| segment.is_empty() || segment.contains(KEY_SEPARATOR))
        {
            return Err(Error::InvalidKey(segments.join(".")));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for KeyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.segments))
    }
}

pub(crate) fn join(segments: &[&str]) -> String {
    segments.join(".")
}

mod private {
    pub trait Sealed {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl Sealed for super::KeyPath<'_> {}
    impl<T> Sealed for &T where T: ?Sized + Sealed {}
}

/// Anything usable as a key path: `&str`, `String` or a parsed [`KeyPath`].
pub trait Key: private::Sealed {
    #[doc(hidden)]
    fn with_segments<R>(&self, f: impl FnOnce(&[&str]) -> Result<R>) -> Result<R>;
}

impl Key for str {
    #[inline]
    fn with_segments<R>(&self, f: impl FnOnce(&[&str]) -> Result<R>) -> Result<R> {
        f(KeyPath::parse(self)?.segments())
    }
}

impl Key for String {
    #[inline]
    fn with_segments<R>(&self, f: impl FnOnce(&[&str]) -> Result<R>) -> Result<R> {
        self.as_str().with_segments(f)
    }
}

impl Key for KeyPath<'_> {
    #[inline]
    fn with_segments<R>(&self, f: impl FnOnce(&[&str]) -> Result<R>) -> Result<R> {
        f(self.segments())
    }
}

impl<T> Key for &T
where
    T: ?Sized + Key,
{
    #[inline]
    fn with_segments<R>(&self, f: impl FnOnce(&[&str]) -> Result<R>) -> Result<R> {
        (**self).with_segments(f)
    }
}
