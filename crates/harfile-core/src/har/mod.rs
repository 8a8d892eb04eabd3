mod body;
mod decode;
mod encode;
mod index;
mod reader;
mod types;
mod values;
mod writer;

pub use decode::{decode, decode_str, decode_value};
pub use encode::{EncodeOptions, encodability_problems, encode, encode_pretty, encode_with};
pub use index::PageIndex;
pub use reader::HarReader;
pub use types::*;
pub use values::{Size, Timestamp, Timing};
pub use writer::HarWriter;
