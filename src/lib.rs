pub use zerocopy::BigEndian;

mod compression;
mod convert;
mod document;
mod error;
mod file;
mod key;
mod read;
mod registry;
mod resolve;
mod scout;
#[cfg(feature = "serde")]
mod ser;
mod tag;
mod util;
mod value;
mod write;

pub use compression::*;
pub use convert::*;
pub use document::*;
pub use error::*;
pub use file::*;
pub use key::*;
pub use read::*;
pub use registry::*;
pub use resolve::*;
pub use scout::*;
pub use tag::*;
pub use util::*;
pub use value::*;
pub use write::*;
