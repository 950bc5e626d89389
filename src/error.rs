use std::{io, path::PathBuf};

use crate::frequency::Symbol;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed frequency header: {0}")]
    Header(#[from] bincode::Error),
    #[error("frequency header claims {0} bytes, refusing to read it")]
    HeaderTooLarge(u32),
    #[error("invalid frequency table: {0}")]
    InvalidTable(String),
    #[error("cannot build a Huffman tree from an empty frequency table")]
    EmptyTable,
    #[error("symbol {0} has no code in the encoding map")]
    UnknownSymbol(Symbol),
    #[error("compressed stream ended before the end-of-stream code ({decoded} bytes decoded)")]
    Truncated { decoded: usize },
    #[error("tree has no reachable end-of-stream leaf")]
    MissingEndOfStream,
    #[error("{} is not a .huf file", .0.display())]
    NotCompressed(PathBuf),
}
