//! Fixed byte-order primitives shared by every record header and value.
//!
//! All multi-byte integers and floats are big-endian regardless of host
//! architecture. Reading goes through a bounds-checked [`Reader`]; writing
//! appends to a `Vec<u8>` with the `put_*` helpers.

use zerocopy::byteorder::{self, BigEndian};

use crate::{Error, Result};

#[inline(always)]
#[cold]
pub(crate) fn cold_path() {}

/// Byte order of every multi-byte field in the format.
pub type Endian = BigEndian;

/// Width of the type id byte.
pub const TYPE_ID_SIZE: usize = 1;
/// Width of the `record_length` field.
pub const RECORD_LENGTH_SIZE: usize = 4;
/// Width of the `name_length` field.
pub const NAME_LENGTH_SIZE: usize = 2;
/// Bytes of a record that are not counted by its own `record_length`.
pub const RECORD_PREFIX_SIZE: usize = TYPE_ID_SIZE + RECORD_LENGTH_SIZE;

/// Largest `record_length` a record may declare.
///
/// Lengths are kept within the signed 32-bit range so documents stay
/// readable by implementations that treat the field as signed.
pub const MAX_RECORD_LENGTH: u32 = i32::MAX as u32;

/// Largest name, in UTF-8 bytes.
pub const MAX_NAME_LENGTH: usize = i16::MAX as usize;

macro_rules! read_fixed {
    ($($fn_name:ident => $ty:ty, $wrapper:ident, $size:literal;)*) => {
        $(
            #[doc = concat!("Reads a big-endian `", stringify!($ty), "`.")]
            #[inline]
            pub fn $fn_name(&mut self) -> Result<$ty> {
                let bytes = self.array::<$size>()?;
                Ok(byteorder::$wrapper::<Endian>::from_bytes(bytes).get())
            }
        )*
    };
}

macro_rules! put_fixed {
    ($($fn_name:ident => $ty:ty, $wrapper:ident;)*) => {
        $(
            #[doc = concat!("Appends `value` as a big-endian `", stringify!($ty), "`.")]
            #[inline]
            pub fn $fn_name(out: &mut Vec<u8>, value: $ty) {
                out.extend_from_slice(&byteorder::$wrapper::<Endian>::new(value).to_bytes());
            }
        )*
    };
}

/// A bounds-checked cursor over a byte slice.
///
/// Every read either consumes exactly the requested bytes or fails with
/// [`Error::TruncatedData`] without moving the cursor.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the cursor from the start of the slice.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Consumes `len` bytes and returns them.
    #[inline]
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = match self.pos.checked_add(len) {
            Some(end) if end <= self.data.len() => end,
            _ => {
                cold_path();
                return Err(Error::TruncatedData);
            }
        };
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Moves the cursor forward by `len` bytes without looking at them.
    #[inline]
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    /// Consumes everything up to the end of the slice.
    #[inline]
    pub fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.pos..];
        self.pos = self.data.len();
        bytes
    }

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    read_fixed! {
        read_u16 => u16, U16, 2;
        read_u32 => u32, U32, 4;
        read_i16 => i16, I16, 2;
        read_i32 => i32, I32, 4;
        read_i64 => i64, I64, 8;
        read_f32 => f32, F32, 4;
        read_f64 => f64, F64, 8;
    }
}

put_fixed! {
    put_u16 => u16, U16;
    put_u32 => u32, U32;
    put_i16 => i16, I16;
    put_i32 => i32, I32;
    put_i64 => i64, I64;
    put_f32 => f32, F32;
    put_f64 => f64, F64;
}

/// Overwrites the 4-byte length field at `offset` in place.
pub(crate) fn patch_u32(buf: &mut [u8], offset: usize, value: u32) -> Result<()> {
    let field = offset
        .checked_add(RECORD_LENGTH_SIZE)
        .and_then(|end| buf.get_mut(offset..end))
        .ok_or(Error::TruncatedData)?;
    field.copy_from_slice(&byteorder::U32::<Endian>::new(value).to_bytes());
    Ok(())
}

/// Checks a computed record length against the field range.
#[inline]
pub(crate) fn checked_record_length(len: u64) -> Result<u32> {
    if len > MAX_RECORD_LENGTH as u64 {
        cold_path();
        return Err(Error::RecordTooLarge(len));
    }
    Ok(len as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_big_endian() {
        let data = [0x12, 0x34, 0x00, 0x00, 0x01, 0x00, 0xFF];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u32().unwrap(), 0x100);
        assert_eq!(reader.read_u8().unwrap(), 0xFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn truncated_read_does_not_advance() {
        let data = [0x00, 0x01, 0x02];
        let mut reader = Reader::new(&data);
        assert!(matches!(reader.read_u32(), Err(Error::TruncatedData)));
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u16().unwrap(), 1);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn put_and_read_floats() {
        let mut out = Vec::new();
        put_f32(&mut out, 1.5);
        put_f64(&mut out, -2.25);
        put_i64(&mut out, i64::MIN);
        assert_eq!(&out[..4], &[0x3F, 0xC0, 0x00, 0x00]);
        let mut reader = Reader::new(&out);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.read_f64().unwrap(), -2.25);
        assert_eq!(reader.read_i64().unwrap(), i64::MIN);
    }

    #[test]
    fn patch_out_of_range() {
        let mut buf = [0u8; 6];
        patch_u32(&mut buf, 1, 0xAABBCCDD).unwrap();
        assert_eq!(buf, [0, 0xAA, 0xBB, 0xCC, 0xDD, 0]);
        assert!(matches!(patch_u32(&mut buf, 3, 1), Err(Error::TruncatedData)));
    }

    #[test]
    fn record_length_limit() {
        assert_eq!(checked_record_length(12).unwrap(), 12);
        assert!(matches!(
            checked_record_length(MAX_RECORD_LENGTH as u64 + 1),
            Err(Error::RecordTooLarge(_))
        ));
    }
}
