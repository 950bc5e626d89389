//! Turning bytes into code bits and back.

use std::io::{self, BufReader, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitWrite, BitWriter};

use crate::encoding::EncodingMap;
use crate::error::{Error, Result};
use crate::frequency::{END_OF_STREAM, Symbol};
use crate::tree::{HuffmanTree, Node};

/// The concatenated codes of an input, end-of-stream code included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    /// One '0' / '1' character per emitted bit.
    pub bits: String,
    /// Number of bits emitted.
    pub size: usize,
}

impl Encoded {
    fn append<W: BitWrite>(
        &mut self,
        symbol: Symbol,
        map: &EncodingMap,
        sink: Option<&mut W>,
    ) -> Result<()> {
        let code = map.get(symbol).ok_or(Error::UnknownSymbol(symbol))?;
        if let Some(sink) = sink {
            for bit in code.bytes() {
                sink.write_bit(bit != b'0')?;
            }
        }
        self.bits.push_str(code);
        self.size += code.len();
        Ok(())
    }
}

/// Encode every byte of `input` followed by the end-of-stream code.
///
/// With `Some(sink)` each bit is also written to the sink as it is produced.
/// The caller is responsible for byte-aligning and flushing the sink.
pub fn encode<R, W>(input: R, map: &EncodingMap, mut sink: Option<&mut W>) -> Result<Encoded>
where
    R: Read,
    W: BitWrite,
{
    let mut encoded = Encoded::default();
    for byte in BufReader::new(input).bytes() {
        encoded.append(Symbol::from(byte?), map, sink.as_deref_mut())?;
    }
    encoded.append(END_OF_STREAM, map, sink.as_deref_mut())?;
    Ok(encoded)
}

/// `encode` without writing any bits anywhere.
pub fn encode_to_string<R: Read>(input: R, map: &EncodingMap) -> Result<Encoded> {
    encode::<R, BitWriter<io::Sink, BigEndian>>(input, map, None)
}

/// Walk `tree` one bit at a time, emitting a byte at every data leaf, until the
/// end-of-stream leaf is reached.
///
/// Running out of bits first is reported as [`Error::Truncated`]; any bits
/// after the end-of-stream code are left unread.
pub fn decode<R, W>(input: &mut R, tree: &HuffmanTree, output: &mut W) -> Result<Vec<u8>>
where
    R: BitRead,
    W: Write,
{
    let root = tree.root();
    // A data leaf at the root would be emitted forever without consuming bits.
    if root.is_leaf() && root.symbol() != END_OF_STREAM {
        return Err(Error::MissingEndOfStream);
    }

    let mut decoded = Vec::new();
    let mut node = root;
    loop {
        match node {
            Node::Leaf { symbol: END_OF_STREAM, .. } => return Ok(decoded),
            Node::Leaf { symbol, .. } => {
                let byte = u8::try_from(*symbol).map_err(|_| {
                    Error::InvalidTable(format!("leaf symbol {symbol} is not a byte"))
                })?;
                output.write_all(&[byte])?;
                decoded.push(byte);
                node = root;
            }
            Node::Internal { zero, one, .. } => {
                let bit = input.read_bit().map_err(|e| match e.kind() {
                    io::ErrorKind::UnexpectedEof => Error::Truncated {
                        decoded: decoded.len(),
                    },
                    _ => Error::Io(e),
                })?;
                node = if bit { one.as_ref() } else { zero.as_ref() };
            }
        }
    }
}
