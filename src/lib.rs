//! # huf
//!
//! Lossless file compression with a Huffman code derived from the input's own
//! byte frequencies. The frequency table is stored at the front of the
//! compressed file so the identical code can be rebuilt when decompressing.
//!
//! ```no_run
//! // notes.txt -> notes.txt.huf
//! let bits = huf::compress("notes.txt")?;
//! println!("payload is {} bits", bits.len());
//!
//! // notes.txt.huf -> notes_unc.txt
//! let original = huf::decompress("notes.txt.huf")?;
//! # Ok::<(), huf::Error>(())
//! ```

pub mod codec;
pub mod compress;
pub mod encoding;
pub mod error;
pub mod frequency;
pub mod header;
pub mod tree;

pub use compress::{
    compress, compress_bytes, compress_file, compressed_path, decompress, decompress_bytes,
    decompress_file, decompressed_path, read_table,
};
pub use encoding::EncodingMap;
pub use error::{Error, Result};
pub use frequency::{END_OF_STREAM, FrequencyTable, INTERNAL_MARKER, Source, Symbol};
pub use tree::{HuffmanTree, Node};
