// compress.rs

use std::{
    ffi::OsStr,
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use bitstream_io::{BigEndian, BitReader, BitWrite, BitWriter};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::codec::{self, Encoded};
use crate::encoding::EncodingMap;
use crate::error::{Error, Result};
use crate::frequency::{FrequencyTable, Source};
use crate::header;
use crate::tree::HuffmanTree;

pub const HUF_EXT: &str = "huf";
const UNC_SUFFIX: &str = "_unc";
const TEMP_SUFFIX: &str = ".tmp"; // For atomic writes

/// `path` with `.huf` appended: `notes.txt` -> `notes.txt.huf`.
pub fn compressed_path(path: &Path) -> PathBuf {
    with_appended_ext(path, HUF_EXT)
}

/// Where `decompress` puts its output: `notes.txt.huf` -> `notes_unc.txt`.
pub fn decompressed_path(path: &Path) -> Result<PathBuf> {
    if path.extension() != Some(OsStr::new(HUF_EXT)) {
        return Err(Error::NotCompressed(path.to_path_buf()));
    }
    let original = path.with_extension("");
    let mut name = original
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(UNC_SUFFIX);
    if let Some(ext) = original.extension() {
        name.push(".");
        name.push(ext);
    }
    Ok(original.with_file_name(name))
}

/// Compress `path` into `path.huf` and return the emitted code bits.
pub fn compress(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    compress_file(path, &compressed_path(path))
}

pub fn compress_file(input: &Path, output: &Path) -> Result<String> {
    let table = FrequencyTable::build(Source::File(input))?;
    let map = derive_code(&table)?;

    let encoded = write_atomically(output, |writer| {
        let source = File::open(input)?;
        write_stream(&table, &map, source, writer)
    })?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = table.total_bytes(),
        bits = encoded.size,
        "compressed"
    );
    Ok(encoded.bits)
}

/// In-memory counterpart of `compress_file`, producing the same container.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let table = FrequencyTable::build(Source::Bytes(data))?;
    let map = derive_code(&table)?;
    let mut out = Vec::new();
    write_stream(&table, &map, data, &mut out)?;
    Ok(out)
}

/// Decompress a `.huf` file next to itself and return the recovered bytes.
pub fn decompress(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let output = decompressed_path(path)?;
    decompress_file(path, &output)
}

pub fn decompress_file(input: &Path, output: &Path) -> Result<Vec<u8>> {
    let reader = BufReader::new(File::open(input)?);
    let decoded = write_atomically(output, |writer| read_stream(reader, writer))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = decoded.len(),
        "decompressed"
    );
    Ok(decoded)
}

pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    read_stream(data, &mut io::sink())
}

/// Read just the frequency header of a compressed file.
pub fn read_table(path: &Path) -> Result<FrequencyTable> {
    let mut reader = BufReader::new(File::open(path)?);
    header::read_header(&mut reader)
}

// The tree only lives long enough to derive the codes.
fn derive_code(table: &FrequencyTable) -> Result<EncodingMap> {
    let tree = HuffmanTree::build(table)?;
    Ok(EncodingMap::build(&tree))
}

fn write_stream<R: Read, W: Write>(
    table: &FrequencyTable,
    map: &EncodingMap,
    input: R,
    writer: &mut W,
) -> Result<Encoded> {
    header::write_header(writer, table)?;

    let encoded = {
        let mut bits = BitWriter::endian(&mut *writer, BigEndian);
        let encoded = codec::encode(input, map, Some(&mut bits))?;
        bits.byte_align()?;
        encoded
    };

    writer.flush()?;
    debug!(codes = map.len(), bits = encoded.size, "wrote code stream");
    Ok(encoded)
}

fn read_stream<R: Read, W: Write>(mut reader: R, output: &mut W) -> Result<Vec<u8>> {
    let table = header::read_header(&mut reader)?;
    let tree = HuffmanTree::build(&table)?;
    debug!(symbols = table.len(), expected = table.total_bytes(), "read header");

    let mut bits = BitReader::endian(reader, BigEndian);
    let decoded = codec::decode(&mut bits, &tree, output)?;
    output.flush()?;
    Ok(decoded)
}

// Write to a fresh temp file beside `path` and persist it over `path`, so a
// failed run never leaves a partial artifact and never touches other files.
fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> Result<T>,
{
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let temp = tempfile::Builder::new()
        .prefix(".huf-")
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;

    let mut writer = BufWriter::new(temp);
    let value = write(&mut writer)?;
    let temp = writer.into_inner().map_err(|e| e.into_error())?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(value)
}

fn with_appended_ext(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
