//! The frequency table at the front of every compressed stream:
//! a little-endian `u32` length followed by the bincode-encoded table.

use std::io::{Read, Write};

use bincode::Options;

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// Far above the ~2.6 KiB a full 257-symbol table needs.
pub const MAX_HEADER_LEN: u32 = 1 << 16;

// Same layout as `bincode::serialize`, but the table must fill the declared length.
fn header_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

pub fn write_header<W: Write>(writer: &mut W, table: &FrequencyTable) -> Result<()> {
    let header = header_options().serialize(table)?;
    writer.write_all(&(header.len() as u32).to_le_bytes())?;
    writer.write_all(&header)?;
    Ok(())
}

/// Read and validate a header, leaving `reader` at the first code bit.
pub fn read_header<R: Read>(reader: &mut R) -> Result<FrequencyTable> {
    let mut header_len_buf = [0u8; 4];
    reader.read_exact(&mut header_len_buf)?;
    let header_len = u32::from_le_bytes(header_len_buf);
    if header_len > MAX_HEADER_LEN {
        return Err(Error::HeaderTooLarge(header_len));
    }

    let mut header_buf = vec![0u8; header_len as usize];
    reader.read_exact(&mut header_buf)?;
    Ok(header_options().deserialize(&header_buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{END_OF_STREAM, Source, Symbol};
    use std::collections::BTreeMap;
    use std::io::Cursor;

    #[test]
    fn test_header_roundtrip_leaves_payload_in_place() {
        let table = FrequencyTable::build(Source::Bytes(b"header then payload")).unwrap();
        let mut bytes = Vec::new();
        write_header(&mut bytes, &table).unwrap();
        bytes.extend_from_slice(&[0xde, 0xad]);

        let mut cursor = Cursor::new(bytes);
        let read_back = read_header(&mut cursor).unwrap();
        assert_eq!(read_back, table);

        let mut rest = Vec::new();
        cursor.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, vec![0xde, 0xad]);
    }

    #[test]
    fn test_header_without_eof_entry_is_rejected() {
        let raw: BTreeMap<Symbol, u64> = [(65, 5)].into_iter().collect();
        let body = bincode::serialize(&raw).unwrap();
        let mut bytes = (body.len() as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(&body);

        let err = read_header(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::Header(_)));
    }

    fn framed(body: &[u8]) -> Vec<u8> {
        let mut bytes = (body.len() as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(body);
        bytes
    }

    #[test]
    fn test_layout_matches_plain_bincode() {
        let table = FrequencyTable::build(Source::Bytes(b"fixint layout")).unwrap();
        let mut bytes = Vec::new();
        write_header(&mut bytes, &table).unwrap();
        assert_eq!(bytes, framed(&bincode::serialize(&table).unwrap()));
    }

    #[test]
    fn test_overflowing_counts_are_rejected() {
        let raw: BTreeMap<Symbol, u64> =
            [(65, u64::MAX), (66, u64::MAX), (END_OF_STREAM, 1)].into_iter().collect();
        let mut bytes = framed(&bincode::serialize(&raw).unwrap());
        bytes.push(0xff);

        let err = read_header(&mut Cursor::new(bytes.clone())).unwrap_err();
        assert!(matches!(err, Error::Header(_)));
        assert!(matches!(
            crate::compress::decompress_bytes(&bytes),
            Err(Error::Header(_))
        ));
    }

    #[test]
    fn test_padding_inside_declared_length_is_rejected() {
        let table = FrequencyTable::build(Source::Bytes(b"padded")).unwrap();
        let mut body = bincode::serialize(&table).unwrap();
        body.extend_from_slice(&[0, 0, 0]);

        let err = read_header(&mut Cursor::new(framed(&body))).unwrap_err();
        assert!(matches!(err, Error::Header(_)));
    }

    #[test]
    fn test_oversized_header_length_is_rejected() {
        let bytes = (MAX_HEADER_LEN + 1).to_le_bytes();
        let err = read_header(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::HeaderTooLarge(len) if len == MAX_HEADER_LEN + 1));
    }

    #[test]
    fn test_short_header_is_io_error() {
        let table = FrequencyTable::build(Source::Bytes(b"xyz")).unwrap();
        let mut bytes = Vec::new();
        write_header(&mut bytes, &table).unwrap();
        bytes.truncate(bytes.len() - 3);

        let err = read_header(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(table.get(END_OF_STREAM), Some(1));
    }
}
