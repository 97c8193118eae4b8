//! Alphabet: bidirectional mapping between symbols and dense indices.
//!
//! The k-th distinct symbol of the source string has index k. Every
//! permutation, rotor and machine in this crate works on the index space
//! `0..size` of one shared alphabet.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::EnigmaError;

/// The historical 26-letter alphabet.
pub const UPPER_AZ: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Ordered set of unique symbols, immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Default for Alphabet {
    /// Uppercase `A..Z`.
    fn default() -> Self {
        Self::build(UPPER_AZ)
    }
}

impl Alphabet {
    /// Creates an alphabet from `chars`. Repeated symbols are dropped, the
    /// first occurrence keeps its index.
    ///
    /// # Errors
    /// Returns [`EnigmaError::EmptyAlphabet`] if `chars` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCA").unwrap();
    /// assert_eq!(alpha.size(), 3);
    /// assert_eq!(alpha.to_char(2).unwrap(), 'C');
    /// ```
    pub fn new(chars: &str) -> Result<Self, EnigmaError> {
        if chars.is_empty() {
            return Err(EnigmaError::EmptyAlphabet);
        }
        Ok(Self::build(chars))
    }

    fn build(chars: &str) -> Self {
        let mut symbols = Vec::with_capacity(chars.len());
        let mut index = HashMap::with_capacity(chars.len());
        for ch in chars.chars() {
            if let Entry::Vacant(slot) = index.entry(ch) {
                slot.insert(symbols.len());
                symbols.push(ch);
            }
        }
        Alphabet { symbols, index }
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if `ch` is in this alphabet.
    pub fn contains(&self, ch: char) -> bool {
        self.index.contains_key(&ch)
    }

    /// Returns the symbol at `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] if `index >= size()`.
    pub fn to_char(&self, index: usize) -> Result<char, EnigmaError> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Returns the index of `ch`. Inverse of [`to_char`](Self::to_char).
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `ch` is absent.
    pub fn to_int(&self, ch: char) -> Result<usize, EnigmaError> {
        self.index_of(ch).ok_or(EnigmaError::SymbolNotFound(ch))
    }

    /// Like [`to_int`](Self::to_int) without the error.
    pub fn index_of(&self, ch: char) -> Option<usize> {
        self.index.get(&ch).copied()
    }

    /// Iterates the symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        let alpha = Alphabet::new("ABCD").unwrap();
        assert_eq!(alpha.size(), 4);
    }

    #[test]
    fn test_duplicates_dropped() {
        let alpha = Alphabet::new("ABBAC").unwrap();
        assert_eq!(alpha.size(), 3);
        assert_eq!(alpha.to_int('A').unwrap(), 0);
        assert_eq!(alpha.to_int('B').unwrap(), 1);
        assert_eq!(alpha.to_int('C').unwrap(), 2);
    }

    #[test]
    fn test_contains() {
        let upper = Alphabet::new("ABCD").unwrap();
        let mixed = Alphabet::new("aABCd").unwrap();
        assert!(upper.contains('A'));
        assert!(!upper.contains('a'));
        assert!(mixed.contains('A'));
        assert!(mixed.contains('a'));
        assert!(!upper.contains('.'));
    }

    #[test]
    fn test_to_char_punctuation() {
        let source = ".-o";
        let alpha = Alphabet::new(source).unwrap();
        for (i, ch) in source.chars().enumerate() {
            assert_eq!(alpha.to_char(i).unwrap(), ch);
            assert_eq!(alpha.to_int(ch).unwrap(), i);
        }
    }

    #[test]
    fn test_to_char_out_of_range() {
        let alpha = Alphabet::new("ABC").unwrap();
        assert_eq!(
            alpha.to_char(3),
            Err(EnigmaError::IndexOutOfRange { index: 3, size: 3 })
        );
    }

    #[test]
    fn test_to_int_missing_symbol() {
        let alpha = Alphabet::new("ABC").unwrap();
        assert_eq!(alpha.to_int('Z'), Err(EnigmaError::SymbolNotFound('Z')));
        assert_eq!(alpha.index_of('Z'), None);
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(Alphabet::new(""), Err(EnigmaError::EmptyAlphabet));
    }

    #[test]
    fn test_default_is_upper_az() {
        let alpha = Alphabet::default();
        assert_eq!(alpha.size(), 26);
        assert_eq!(alpha.symbols().collect::<String>(), UPPER_AZ);
    }
}
