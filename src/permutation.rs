//! Permutation: a bijection on alphabet indices written as disjoint cycles.
//!
//! Cycles are kept in the order they were given and compiled into a
//! forward and an inverse lookup table. When a symbol appears in more than
//! one cycle, the earliest cycle decides its image in both directions, which
//! matches a left-to-right scan of the cycle list. Symbols that appear in no
//! cycle are fixed points.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;

/// A permutation of the index range of an [`Alphabet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<Vec<usize>>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Builds a permutation from cycle notation such as `"(AELT) (BK) (S)"`.
    ///
    /// Whitespace between cycles is ignored; `"(AB)(CD)"` and `"(AB) (CD)"`
    /// are equivalent. An empty string gives the identity.
    ///
    /// # Errors
    /// - [`EnigmaError::MalformedCycles`] for unbalanced or nested
    ///   parentheses, symbols outside parentheses, or whitespace inside a cycle.
    /// - [`EnigmaError::SymbolNotFound`] for a symbol not in `alphabet`.
    /// - [`EnigmaError::RepeatedCycleSymbol`] for a symbol listed twice in
    ///   one cycle.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
    /// let perm = Permutation::new("(ABC)", alpha).unwrap();
    /// assert_eq!(perm.permute_char('C'), 'A');
    /// assert_eq!(perm.invert_char('A'), 'C');
    /// assert_eq!(perm.permute_char('D'), 'D');
    /// ```
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self, EnigmaError> {
        let mut perm = Self::identity(alphabet);
        for cycle in parse_cycles(cycles)? {
            let indices = perm.resolve_cycle(&cycle)?;
            perm.cycles.push(indices);
        }
        perm.rebuild_tables();
        Ok(perm)
    }

    /// The identity permutation on `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        let inverse = forward.clone();
        Permutation {
            alphabet,
            cycles: Vec::new(),
            forward,
            inverse,
        }
    }

    /// Appends the cycle `c0 -> c1 -> ... -> cm -> c0`, given either bare
    /// (`"SGH"`) or parenthesized (`"(SGH)"`).
    ///
    /// Disjointness from existing cycles is not checked; earlier cycles keep
    /// priority for any shared symbol.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn add_cycle(&mut self, cycle: &str) -> Result<(), EnigmaError> {
        let notation = if cycle.trim_start().starts_with('(') {
            cycle.to_string()
        } else {
            format!("({})", cycle.trim())
        };
        for parsed in parse_cycles(&notation)? {
            let indices = self.resolve_cycle(&parsed)?;
            self.cycles.push(indices);
        }
        self.rebuild_tables();
        Ok(())
    }

    fn resolve_cycle(&self, cycle: &[char]) -> Result<Vec<usize>, EnigmaError> {
        let mut indices = Vec::with_capacity(cycle.len());
        for &ch in cycle {
            let idx = self.alphabet.to_int(ch)?;
            if indices.contains(&idx) {
                return Err(EnigmaError::RepeatedCycleSymbol(ch));
            }
            indices.push(idx);
        }
        Ok(indices)
    }

    /// Recomputes both lookup tables. Cycles are applied last-to-first so
    /// the earliest cycle containing a symbol wins.
    fn rebuild_tables(&mut self) {
        let size = self.size();
        self.forward = (0..size).collect();
        self.inverse = (0..size).collect();
        for cycle in self.cycles.iter().rev() {
            let len = cycle.len();
            for (k, &sym) in cycle.iter().enumerate() {
                self.forward[sym] = cycle[(k + 1) % len];
                self.inverse[sym] = cycle[(k + len - 1) % len];
            }
        }
    }

    /// Returns the size of the underlying alphabet.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// Returns the alphabet this permutation is defined over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns `p` modulo the alphabet size, always non-negative.
    pub fn wrap(&self, p: isize) -> usize {
        p.rem_euclid(self.size() as isize) as usize
    }

    /// Applies the permutation to index `p` (taken modulo the size).
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Applies the inverse permutation to index `c` (taken modulo the size).
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Applies the permutation to a symbol. Symbols outside the alphabet
    /// are returned unchanged, like any other fixed point.
    pub fn permute_char(&self, p: char) -> char {
        self.map_char(p, &self.forward)
    }

    /// Applies the inverse permutation to a symbol.
    pub fn invert_char(&self, c: char) -> char {
        self.map_char(c, &self.inverse)
    }

    fn map_char(&self, ch: char, table: &[usize]) -> char {
        self.alphabet
            .index_of(ch)
            .and_then(|idx| self.alphabet.to_char(table[idx]).ok())
            .unwrap_or(ch)
    }

    /// Returns true iff every symbol lies in a cycle of length at least 2,
    /// i.e. no symbol maps to itself.
    pub fn derangement(&self) -> bool {
        if self.cycles.iter().any(|cycle| cycle.len() == 1) {
            return false;
        }
        let mut covered = vec![false; self.size()];
        for cycle in &self.cycles {
            for &sym in cycle {
                covered[sym] = true;
            }
        }
        covered.into_iter().all(|c| c)
    }

    /// Returns the cycles as symbol strings, in insertion order.
    pub fn cycles(&self) -> Vec<String> {
        self.cycles
            .iter()
            .map(|cycle| {
                cycle
                    .iter()
                    .filter_map(|&idx| self.alphabet.to_char(idx).ok())
                    .collect()
            })
            .collect()
    }
}

/// Splits cycle notation into symbol groups. Empty groups `()` are skipped.
fn parse_cycles(cycles: &str) -> Result<Vec<Vec<char>>, EnigmaError> {
    let mut parsed = Vec::new();
    let mut current: Option<Vec<char>> = None;

    for ch in cycles.chars() {
        match current.take() {
            None => match ch {
                '(' => current = Some(Vec::new()),
                c if c.is_whitespace() => {}
                c => {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "symbol '{}' outside parentheses in \"{}\"",
                        c, cycles
                    )))
                }
            },
            Some(mut cycle) => match ch {
                ')' => {
                    if !cycle.is_empty() {
                        parsed.push(cycle);
                    }
                }
                '(' => {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "nested '(' in \"{}\"",
                        cycles
                    )))
                }
                c if c.is_whitespace() => {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "whitespace inside a cycle in \"{}\"",
                        cycles
                    )))
                }
                c => {
                    cycle.push(c);
                    current = Some(cycle);
                }
            },
        }
    }

    if current.is_some() {
        return Err(EnigmaError::MalformedCycles(format!(
            "unterminated cycle in \"{}\"",
            cycles
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::UPPER_AZ;

    fn alpha(chars: &str) -> Arc<Alphabet> {
        Arc::new(Alphabet::new(chars).unwrap())
    }

    /// Checks that `perm` maps each symbol of `from` to the same position
    /// of `to`, both by symbol and by index, and that the inverse agrees.
    fn check_perm(perm: &Permutation, from: &str, to: &str) {
        assert_eq!(perm.size(), from.chars().count(), "wrong length");
        let alphabet = perm.alphabet().clone();
        for (c, e) in from.chars().zip(to.chars()) {
            assert_eq!(perm.permute_char(c), e, "wrong translation of '{}'", c);
            assert_eq!(perm.invert_char(e), c, "wrong inverse of '{}'", e);
            let ci = alphabet.to_int(c).unwrap();
            let ei = alphabet.to_int(e).unwrap();
            assert_eq!(perm.permute(ci), ei, "wrong translation of {}", ci);
            assert_eq!(perm.invert(ei), ci, "wrong inverse of {}", ei);
        }
    }

    #[test]
    fn test_identity_transform() {
        let perm = Permutation::new("", alpha(UPPER_AZ)).unwrap();
        check_perm(&perm, UPPER_AZ, UPPER_AZ);
    }

    #[test]
    fn test_rotor_i_wiring() {
        let perm = Permutation::new(
            "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)",
            alpha(UPPER_AZ),
        )
        .unwrap();
        check_perm(&perm, UPPER_AZ, "EKMFLGDQVZNTOWYHXUSPAIBRCJ");
    }

    #[test]
    fn test_permute_and_invert_methods() {
        let perm = Permutation::new("(ABD) (WIU)", alpha("AWIUBD")).unwrap();
        assert_eq!(perm.permute_char('A'), 'B');
        assert_eq!(perm.permute_char('W'), 'I');
        assert_eq!(perm.permute_char('U'), 'W');
        assert_eq!(perm.permute(1), 2);
        assert_eq!(perm.permute(2), 3);

        assert_eq!(perm.invert_char('B'), 'A');
        assert_eq!(perm.invert_char('I'), 'W');
        assert_eq!(perm.invert_char('W'), 'U');
        assert_eq!(perm.invert(2), 1);
        assert_eq!(perm.invert(3), 2);
    }

    #[test]
    fn test_index_wraps_modulo_size() {
        let perm = Permutation::new("(ABD) (WIU)", alpha("AWIUBD")).unwrap();
        assert_eq!(perm.permute(7), perm.permute(1));
        assert_eq!(perm.invert(8), perm.invert(2));
        assert_eq!(perm.wrap(-1), 5);
        assert_eq!(perm.wrap(-13), 5);
        assert_eq!(perm.wrap(6), 0);
    }

    #[test]
    fn test_cycles_without_spaces() {
        let spaced = Permutation::new("(HQ) (EX) (IP)", alpha(UPPER_AZ)).unwrap();
        let packed = Permutation::new("(HQ)(EX)(IP)", alpha(UPPER_AZ)).unwrap();
        assert_eq!(spaced, packed);
        assert_eq!(packed.cycles(), vec!["HQ", "EX", "IP"]);
    }

    #[test]
    fn test_add_cycle() {
        let mut perm = Permutation::new("(ABD) (WIU)", alpha("AWIUBDSGH")).unwrap();
        perm.add_cycle("(SGH)").unwrap();
        assert_eq!(perm.cycles(), vec!["ABD", "WIU", "SGH"]);
        assert_eq!(perm.permute_char('H'), 'S');
        assert_eq!(perm.invert_char('S'), 'H');

        perm.add_cycle("").unwrap();
        assert_eq!(perm.cycles().len(), 3);
    }

    #[test]
    fn test_add_cycle_bare() {
        let mut perm = Permutation::identity(alpha("ABC"));
        perm.add_cycle("CB").unwrap();
        assert_eq!(perm.permute_char('C'), 'B');
        assert_eq!(perm.permute_char('B'), 'C');
        assert_eq!(perm.permute_char('A'), 'A');
    }

    #[test]
    fn test_first_cycle_wins_on_overlap() {
        let perm = Permutation::new("(AB) (BC)", alpha("ABC")).unwrap();
        assert_eq!(perm.permute_char('B'), 'A');
        assert_eq!(perm.invert_char('B'), 'A');
        assert_eq!(perm.permute_char('C'), 'B');
    }

    #[test]
    fn test_symbol_outside_alphabet_is_fixed() {
        let perm = Permutation::new("(AB)", alpha("ABC")).unwrap();
        assert_eq!(perm.permute_char('z'), 'z');
        assert_eq!(perm.invert_char('z'), 'z');
    }

    #[test]
    fn test_derangement() {
        let perm = Permutation::new("(ABD) (WIU)", alpha("AWIUBD")).unwrap();
        assert!(perm.derangement());

        let partial = Permutation::new("(ABD)", alpha("AWIUBD")).unwrap();
        assert!(!partial.derangement());

        let singleton = Permutation::new("(ABDWI) (U)", alpha("AWIUBD")).unwrap();
        assert!(!singleton.derangement());
    }

    #[test]
    fn test_malformed_cycles() {
        let az = alpha(UPPER_AZ);
        for bad in ["AB", "(AB", "(A(B))", "(A B)", "(AB))"] {
            assert!(
                matches!(
                    Permutation::new(bad, az.clone()),
                    Err(EnigmaError::MalformedCycles(_))
                ),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_unknown_and_repeated_symbols() {
        let az = alpha("ABC");
        assert_eq!(
            Permutation::new("(AD)", az.clone()),
            Err(EnigmaError::SymbolNotFound('D'))
        );
        assert_eq!(
            Permutation::new("(ABA)", az),
            Err(EnigmaError::RepeatedCycleSymbol('A'))
        );
    }
}
