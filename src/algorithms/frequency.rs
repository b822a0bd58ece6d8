use std::collections::BTreeMap;

if_tracing! {
    use tracing::debug;
}

/// A single code unit of the input alphabet.
pub type Symbol = u8;

/// Bytes that count as trailing whitespace: ASCII whitespace, vertical tab, and the file, group,
/// record and unit separators.
pub const TRAILING_WHITESPACE: &[u8] = b" \t\n\x0b\x0c\r\x1c\x1d\x1e\x1f";

/// Strips trailing whitespace. Everything up to the last non-whitespace byte is kept as is.
pub fn normalize(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|b| !TRAILING_WHITESPACE.contains(b))
        .map_or(0, |last| last + 1);
    &data[..end]
}

/// Occurrence count of every symbol seen in an input.
///
/// Iteration is in ascending symbol order, which the tree builder relies on for reproducible
/// tie-breaking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: BTreeMap<Symbol, u64>,
}

impl FrequencyMap {
    pub fn from_symbols(data: &[Symbol]) -> Self {
        let mut counts = BTreeMap::new();
        for &symbol in data {
            *counts.entry(symbol).or_insert(0) += 1;
        }

        if_tracing! {
            debug!(target = "frequency", input_len = data.len(), distinct = counts.len(), "frequency analysis complete");
        }

        Self { counts }
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

#[cfg(test)]
impl FrequencyMap {
    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Sum of all counts, equal to the length of the analyzed input.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}
