//! Whole-buffer compressors.
//!
//! A compressor is a named byte transform. It is used for the payload of
//! compressed objects and for whole-document persistence. Compressors are
//! looked up by [`Compressor::name`] in a [`Registry`](crate::Registry), so
//! the name is part of the wire format and must stay stable.

use crate::Result;

/// A named, reversible byte transform.
pub trait Compressor: Send + Sync {
    /// Stable registry name written into compressed object records.
    fn name(&self) -> &str;

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Identity transform.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCompression;

impl NoCompression {
    pub const NAME: &'static str = "NONE";
}

impl Compressor for NoCompression {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

#[cfg(feature = "gzip")]
mod flate {
    use std::io::{Read, Write};

    use flate2::{
        Compression,
        read::{GzDecoder, ZlibDecoder},
        write::{GzEncoder, ZlibEncoder},
    };

    use super::Compressor;
    use crate::Result;

    /// GZIP framing via `flate2`, default level.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct GzipCompression;

    impl GzipCompression {
        pub const NAME: &'static str = "GZIP";
    }

    impl Compressor for GzipCompression {
        fn name(&self) -> &str {
            Self::NAME
        }

        fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
            let mut encoder =
                GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
            encoder.write_all(data)?;
            Ok(encoder.finish()?)
        }

        fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
            let mut out = Vec::with_capacity(data.len() * 2);
            GzDecoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
    }

    /// ZLIB framing via `flate2`, default level.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct ZlibCompression;

    impl ZlibCompression {
        pub const NAME: &'static str = "ZLIB";
    }

    impl Compressor for ZlibCompression {
        fn name(&self) -> &str {
            Self::NAME
        }

        fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
            let mut encoder =
                ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
            encoder.write_all(data)?;
            Ok(encoder.finish()?)
        }

        fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
            let mut out = Vec::with_capacity(data.len() * 2);
            ZlibDecoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
    }
}

#[cfg(feature = "gzip")]
pub use flate::{GzipCompression, ZlibCompression};

/// ZSTD at level 3.
#[cfg(feature = "zstd")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ZstdCompression;

#[cfg(feature = "zstd")]
impl ZstdCompression {
    pub const NAME: &'static str = "ZSTD";
    const LEVEL: i32 = 3;
}

#[cfg(feature = "zstd")]
impl Compressor for ZstdCompression {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(zstd::stream::encode_all(data, Self::LEVEL)?)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(zstd::stream::decode_all(data)?)
    }
}
