use core::fmt;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    algorithms::{
        frequency::Symbol,
        tree::HuffNode,
    },
    compressor::{CodecError, Result},
};

if_tracing! {
    use tracing::debug;
}

/// A root-to-leaf path: `false` for a left edge, `true` for a right edge.
///
/// Serialized as a string of `'0'` and `'1'` characters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(Vec<bool>);

impl Code {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub fn pop(&mut self) -> Option<bool> {
        self.0.pop()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &Code) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl TryFrom<&str> for Code {
    type Error = CodecError;

    fn try_from(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CodecError::InvalidTable(format!("unexpected character {:?} in code {:?}", other, s))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Code)
    }
}

impl TryFrom<String> for Code {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self> {
        Code::try_from(s.as_str())
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}

/// The forward and reverse code tables produced from one Huffman tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBook {
    codes: BTreeMap<Symbol, Code>,
    reverse: HashMap<Code, Symbol>,
    max_len: usize,
}

impl CodeBook {
    /// Assigns every leaf its root-to-leaf path.
    ///
    /// A tree that is a single leaf gets the code `0`, since an empty code could not be decoded.
    pub fn from_tree(root: &HuffNode) -> Self {
        let mut book = CodeBook {
            codes: BTreeMap::new(),
            reverse: HashMap::new(),
            max_len: 0,
        };

        match root {
            HuffNode::Leaf { symbol, .. } => book.insert(*symbol, Code(vec![false])),
            HuffNode::Internal { .. } => {
                let mut path = Code::new();
                book.walk(root, &mut path);
            }
        }

        if_tracing! {
            debug!(target = "code_table", symbols = book.codes.len(), max_len = book.max_len, "code table generated");
        }

        book
    }

    fn walk(&mut self, node: &HuffNode, path: &mut Code) {
        match node {
            HuffNode::Leaf { symbol, .. } => self.insert(*symbol, path.clone()),
            HuffNode::Internal { left, right, .. } => {
                path.push(false);
                self.walk(left, path);
                path.pop();

                path.push(true);
                self.walk(right, path);
                path.pop();
            }
        }
    }

    fn insert(&mut self, symbol: Symbol, code: Code) {
        self.max_len = self.max_len.max(code.len());
        self.reverse.insert(code.clone(), symbol);
        self.codes.insert(symbol, code);
    }

    /// Rebuilds a code book from `(symbol, code)` pairs, e.g. ones read back from a table file.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidTable`] if the pairs are empty, contain an empty code, repeat a
    /// symbol or a code, or are not prefix-free.
    pub fn from_entries(entries: impl IntoIterator<Item = (Symbol, Code)>) -> Result<Self> {
        let mut book = CodeBook {
            codes: BTreeMap::new(),
            reverse: HashMap::new(),
            max_len: 0,
        };

        for (symbol, code) in entries {
            if code.is_empty() {
                return Err(CodecError::InvalidTable(format!("symbol {:#04x} has an empty code", symbol)));
            }
            if book.codes.contains_key(&symbol) {
                return Err(CodecError::InvalidTable(format!("symbol {:#04x} appears twice", symbol)));
            }
            if book.reverse.contains_key(&code) {
                return Err(CodecError::InvalidTable(format!("code {} appears twice", code)));
            }
            book.insert(symbol, code);
        }

        if book.codes.is_empty() {
            return Err(CodecError::InvalidTable("table has no entries".to_string()));
        }
        if !book.is_prefix_free() {
            return Err(CodecError::InvalidTable("table is not prefix-free".to_string()));
        }

        Ok(book)
    }

    pub fn code(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn symbol(&self, code: &Code) -> Option<Symbol> {
        self.reverse.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Length of the longest code. No valid code buffer grows past this while decoding.
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Whether no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // In lexicographic order, any code that has another as prefix directly follows it.
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        sorted.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }
}

#[cfg(test)]
impl CodeBook {
    /// Total bits needed to encode an input with the given frequencies, before padding.
    pub fn encoded_bit_len(&self, freqs: &crate::algorithms::frequency::FrequencyMap) -> u64 {
        freqs
            .iter()
            .map(|(symbol, count)| count * self.code(symbol).map_or(0, |code| code.len() as u64))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{frequency::FrequencyMap, tree::build_tree};
    use proptest::prelude::*;

    fn book_for(data: &[u8]) -> CodeBook {
        let freqs = FrequencyMap::from_symbols(data);
        CodeBook::from_tree(&build_tree(&freqs).unwrap())
    }

    fn code(s: &str) -> Code {
        Code::try_from(s).unwrap()
    }

    /// Cheapest `sum(weight * len)` over every assignment of code lengths that a prefix code can
    /// realize (Kraft: `sum(2^-len) <= 1`). No optimal code needs a length above `n - 1`.
    fn best_prefix_code_cost(weights: &[u64]) -> u64 {
        fn search(weights: &[u64], max_len: u32, used: u64, capacity: u64) -> Option<u64> {
            let Some((&weight, rest)) = weights.split_first() else {
                return Some(0);
            };
            (1..=max_len)
                .filter_map(|len| {
                    let used = used + (1u64 << (max_len - len));
                    if used > capacity {
                        return None;
                    }
                    search(rest, max_len, used, capacity).map(|cost| cost + weight * len as u64)
                })
                .min()
        }

        let max_len = weights.len() as u32 - 1;
        search(weights, max_len, 0, 1u64 << max_len).unwrap_or(u64::MAX)
    }

    #[test]
    fn exhaustive_minimum_matches_known_costs() {
        assert_eq!(best_prefix_code_cost(&[2, 3, 2]), 11);
        assert_eq!(best_prefix_code_cost(&[1, 1]), 2);
        assert_eq!(best_prefix_code_cost(&[1, 1, 1, 1]), 8);
        assert_eq!(best_prefix_code_cost(&[1, 1, 2, 4]), 14);
    }

    #[test]
    fn codes_follow_tree_paths() {
        let book = book_for(b"aabbbcc");
        assert_eq!(book.code(b'b'), Some(&code("0")));
        assert_eq!(book.code(b'a'), Some(&code("10")));
        assert_eq!(book.code(b'c'), Some(&code("11")));
        assert_eq!(book.symbol(&code("10")), Some(b'a'));
        assert_eq!(book.symbol(&code("1")), None);
        assert_eq!(book.max_len(), 2);
    }

    #[test]
    fn weighted_length_is_optimal_for_scenario() {
        let freqs = FrequencyMap::from_symbols(b"aabbbcc");
        let book = book_for(b"aabbbcc");
        // Only other full prefix code shapes for 3 symbols put a length-1 code on a or c: 12 bits.
        assert_eq!(book.encoded_bit_len(&freqs), 11);
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let book = book_for(b"aaaa");
        assert_eq!(book.len(), 1);
        assert_eq!(book.code(b'a'), Some(&code("0")));
    }

    #[test]
    fn code_string_conversion() {
        let c = code("01101");
        assert_eq!(c.len(), 5);
        assert_eq!(c.to_string(), "01101");
        assert!(Code::try_from("012").is_err());
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"01101\"");
        assert_eq!(serde_json::from_str::<Code>("\"01101\"").unwrap(), c);
    }

    #[test]
    fn from_entries_rejects_bad_tables() {
        let cases: Vec<Vec<(Symbol, Code)>> = vec![
            vec![],
            vec![(b'a', code(""))],
            vec![(b'a', code("0")), (b'a', code("1"))],
            vec![(b'a', code("0")), (b'b', code("0"))],
            vec![(b'a', code("0")), (b'b', code("01"))],
            vec![(b'a', code("10")), (b'b', code("0")), (b'c', code("101"))],
        ];
        for entries in cases {
            let shown = format!("{:?}", entries);
            assert!(
                matches!(CodeBook::from_entries(entries), Err(CodecError::InvalidTable(_))),
                "accepted bad table {}",
                shown
            );
        }
    }

    #[test]
    fn from_entries_rebuilds_generated_book() {
        let book = book_for(b"mississippi river");
        let rebuilt = CodeBook::from_entries(book.iter().map(|(s, c)| (s, c.clone()))).unwrap();
        assert_eq!(rebuilt, book);
    }

    proptest! {
        #[test]
        fn generated_codes_are_prefix_free(data in prop::collection::vec(any::<u8>(), 1..512)) {
            let book = book_for(&data);
            prop_assert!(book.is_prefix_free());
            for (a, code_a) in book.iter() {
                prop_assert!(!code_a.is_empty());
                for (b, code_b) in book.iter() {
                    if a != b {
                        prop_assert!(!code_b.starts_with(code_a));
                    }
                }
            }
        }

        #[test]
        fn huffman_codes_are_optimal(weights in prop::collection::vec(1u64..40, 2..=5)) {
            let data: Vec<u8> = weights
                .iter()
                .enumerate()
                .flat_map(|(i, &w)| core::iter::repeat_n(b'a' + i as u8, w as usize))
                .collect();
            let freqs = FrequencyMap::from_symbols(&data);
            let book = book_for(&data);
            prop_assert_eq!(book.encoded_bit_len(&freqs), best_prefix_code_cost(&weights));
        }
    }
}
