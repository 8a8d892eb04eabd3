//! HAR 1.2 data model with a lossless JSON codec.
//!
//! [`har::decode`] and [`har::encode`] are pure functions over byte buffers;
//! [`har::HarReader`] and [`har::HarWriter`] add file I/O around them.

pub mod check;
pub mod error;
pub mod har;

pub use error::{Error, ErrorKind, Result};
