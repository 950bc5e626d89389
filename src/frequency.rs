//! Symbol alphabet and the per-symbol occurrence counts a code is derived from.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// A byte value `0..=255`, or one of the two reserved values below.
pub type Symbol = u16;

/// Synthetic symbol appended once to every stream to mark its end.
pub const END_OF_STREAM: Symbol = 256;

/// Value reported by merge nodes; never a valid leaf symbol.
pub const INTERNAL_MARKER: Symbol = 257;

/// Where the bytes to count come from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    File(&'a Path),
    Bytes(&'a [u8]),
}

/// Symbol -> count, always holding `END_OF_STREAM` with a count of 1.
///
/// Ordered by symbol so that everything derived from it (tree shape, codes,
/// the serialized header) is a pure function of its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Symbol, u64>",
    into = "BTreeMap<Symbol, u64>"
)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, u64>,
}

impl FrequencyTable {
    /// Count every byte of `source` in order, then add the end-of-stream entry.
    pub fn build(source: Source<'_>) -> Result<Self> {
        let mut counts = BTreeMap::new();
        match source {
            Source::File(path) => {
                let reader = BufReader::new(File::open(path)?);
                for byte in reader.bytes() {
                    *counts.entry(Symbol::from(byte?)).or_insert(0) += 1;
                }
            }
            Source::Bytes(data) => {
                for &byte in data {
                    *counts.entry(Symbol::from(byte)).or_insert(0) += 1;
                }
            }
        }
        counts.insert(END_OF_STREAM, 1);
        debug!(distinct = counts.len(), "built frequency table");
        Ok(Self { counts })
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols, end-of-stream included.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Never true for a validated table.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(symbol, count)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }

    /// Number of data bytes the table describes (end-of-stream excluded).
    pub fn total_bytes(&self) -> u64 {
        self.iter()
            .filter(|&(symbol, _)| symbol != END_OF_STREAM)
            .map(|(_, count)| count)
            .sum()
    }
}

impl TryFrom<BTreeMap<Symbol, u64>> for FrequencyTable {
    type Error = Error;

    fn try_from(counts: BTreeMap<Symbol, u64>) -> Result<Self> {
        if let Some((&symbol, _)) = counts.iter().find(|&(&s, _)| s > END_OF_STREAM) {
            return Err(Error::InvalidTable(format!("symbol {symbol} is out of range")));
        }
        if let Some((&symbol, _)) = counts.iter().find(|&(_, &c)| c == 0) {
            return Err(Error::InvalidTable(format!("symbol {symbol} has a zero count")));
        }
        // Every merge weight and bit total is bounded by this sum.
        if counts.values().try_fold(0u64, |sum, &c| sum.checked_add(c)).is_none() {
            return Err(Error::InvalidTable("counts overflow a u64 total".into()));
        }
        match counts.get(&END_OF_STREAM) {
            Some(1) => Ok(Self { counts }),
            Some(count) => Err(Error::InvalidTable(format!(
                "end-of-stream count is {count}, expected 1"
            ))),
            None => Err(Error::InvalidTable("missing end-of-stream entry".into())),
        }
    }
}

impl From<FrequencyTable> for BTreeMap<Symbol, u64> {
    fn from(table: FrequencyTable) -> Self {
        table.counts
    }
}
