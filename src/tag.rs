/// Type ids of the built-in ODS variants.
///
/// The id is the first byte of every record. Ids 13-15 are reserved for future
/// built-ins and ids 16-255 belong to custom tags registered in a
/// [`Registry`](crate::Registry).
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum TagID {
    Invalid = 0,
    String = 1,
    Int = 2,
    Float = 3,
    Double = 4,
    Short = 5,
    Long = 6,
    Char = 7,
    Byte = 8,
    List = 9,
    Dictionary = 10,
    Object = 11,
    CompressedObject = 12,
}

/// First id available to custom tags.
pub const FIRST_CUSTOM_ID: u8 = 16;

impl TagID {
    /// Maps a raw type byte to a built-in id.
    ///
    /// Returns `None` for reserved and custom ids.
    ///
    /// # Example
    ///
    /// ```
    /// use ods::TagID;
    ///
    /// assert_eq!(TagID::from_u8(11), Some(TagID::Object));
    /// assert_eq!(TagID::from_u8(20), None);
    /// ```
    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Invalid,
            1 => Self::String,
            2 => Self::Int,
            3 => Self::Float,
            4 => Self::Double,
            5 => Self::Short,
            6 => Self::Long,
            7 => Self::Char,
            8 => Self::Byte,
            9 => Self::List,
            10 => Self::Dictionary,
            11 => Self::Object,
            12 => Self::CompressedObject,
            _ => return None,
        })
    }

    /// Returns `true` if this is a fixed-width numeric tag type.
    ///
    /// # Example
    ///
    /// ```
    /// use ods::TagID;
    ///
    /// assert!(TagID::Int.is_primitive());
    /// assert!(TagID::Char.is_primitive());
    /// assert!(!TagID::String.is_primitive());
    /// ```
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Float
                | Self::Double
                | Self::Short
                | Self::Long
                | Self::Char
                | Self::Byte
        )
    }

    /// Returns `true` if the value region of this type is a sequence of child
    /// records that a key path can descend into.
    ///
    /// Compressed objects hold child records too, but behind a compressor, so
    /// they are not composite for key-path purposes.
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::List | Self::Dictionary | Self::Object)
    }

    /// Byte width of a fixed-width value, if this is a primitive type.
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Byte => Some(1),
            Self::Short | Self::Char => Some(2),
            Self::Int | Self::Float => Some(4),
            Self::Long | Self::Double => Some(8),
            _ => None,
        }
    }
}

/// Returns `true` if `id` lies in the custom tag range.
#[inline]
pub const fn is_custom_id(id: u8) -> bool {
    id >= FIRST_CUSTOM_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_covers_builtins() {
        for id in 0u8..=12 {
            assert_eq!(TagID::from_u8(id).map(|t| t as u8), Some(id));
        }
        for id in 13u8..=255 {
            assert_eq!(TagID::from_u8(id), None);
        }
    }

    #[test]
    fn fixed_sizes() {
        assert_eq!(TagID::Byte.fixed_size(), Some(1));
        assert_eq!(TagID::Char.fixed_size(), Some(2));
        assert_eq!(TagID::Double.fixed_size(), Some(8));
        assert_eq!(TagID::Object.fixed_size(), None);
        assert!(!TagID::CompressedObject.is_composite());
        assert!(is_custom_id(16));
        assert!(!is_custom_id(15));
    }
}
