//! Rotors: permutations with a rotational offset.
//!
//! A rotor's wiring is a [`Permutation`] seen through its current setting
//! `s`: a signal entering at contact `c` meets the wiring at `c + s` and
//! leaves at `p(c + s) - s`. Three variants share this signal path and
//! differ only in how they step:
//!
//! - reflector: never moves, position 0 only;
//! - fixed: settable, never advances, never at a notch;
//! - moving: advances one position per step and reports a notch.
//!
//! Rotors live in a [`RotorArena`] and are referenced by [`RotorId`], so a
//! machine's slots and its catalog observe the same mutable setting.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::permutation::Permutation;

/// Stepping behavior of a rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Deepest rotor of the signal path; reflects the signal back.
    Reflector,
    /// Settable but never advances.
    Fixed,
    /// Advances on demand and carries notches (alphabet indices).
    Moving { notches: Vec<usize> },
}

/// A rotor with a name, a wiring and a current setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    setting: usize,
    kind: RotorKind,
}

impl Rotor {
    /// Creates a reflector.
    pub fn reflector(name: &str, permutation: Permutation) -> Self {
        Self::with_kind(name, permutation, RotorKind::Reflector)
    }

    /// Creates a fixed (non-moving) rotor.
    pub fn fixed(name: &str, permutation: Permutation) -> Self {
        Self::with_kind(name, permutation, RotorKind::Fixed)
    }

    /// Creates a moving rotor whose notches are the symbols of `notches`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if a notch symbol is not in the
    /// permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::default());
    /// let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", alpha).unwrap();
    /// let mut rotor = Rotor::moving("I", perm, "Q").unwrap();
    /// rotor.set_symbol('P').unwrap();
    /// assert!(!rotor.at_notch());
    /// rotor.advance();
    /// assert!(rotor.at_notch());
    /// ```
    pub fn moving(name: &str, permutation: Permutation, notches: &str) -> Result<Self, EnigmaError> {
        let alphabet = permutation.alphabet().clone();
        let notches = notches
            .chars()
            .map(|ch| alphabet.to_int(ch))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_kind(name, permutation, RotorKind::Moving { notches }))
    }

    fn with_kind(name: &str, permutation: Permutation, kind: RotorKind) -> Self {
        Rotor {
            name: name.to_string(),
            permutation,
            setting: 0,
            kind,
        }
    }

    /// Returns the rotor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wiring at setting 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet of the wiring.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns the alphabet size.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns the stepping variant.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns true iff the rotor can advance.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns true iff the rotor is a reflector.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns the current setting.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Sets the position to `posn`.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] if `posn >= size()`.
    /// - [`EnigmaError::ReflectorPosition`] for a nonzero reflector position.
    pub fn set(&mut self, posn: usize) -> Result<(), EnigmaError> {
        if posn >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: posn,
                size: self.size(),
            });
        }
        if self.reflecting() && posn != 0 {
            return Err(EnigmaError::ReflectorPosition(posn));
        }
        self.setting = posn;
        Ok(())
    }

    /// Sets the position to the index of `ch`.
    ///
    /// # Errors
    /// [`EnigmaError::SymbolNotFound`] if `ch` is not in the alphabet, otherwise
    /// as [`set`](Self::set).
    pub fn set_symbol(&mut self, ch: char) -> Result<(), EnigmaError> {
        let posn = self.alphabet().to_int(ch)?;
        self.set(posn)
    }

    /// Advances one position if the rotor moves; no-op otherwise.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = (self.setting + 1) % self.size();
        }
    }

    /// Returns true iff the current setting is one of the notches.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            _ => false,
        }
    }

    /// Returns the notch symbols, empty unless moving.
    pub fn notches(&self) -> String {
        match &self.kind {
            RotorKind::Moving { notches } => notches
                .iter()
                .filter_map(|&idx| self.alphabet().to_char(idx).ok())
                .collect(),
            _ => String::new(),
        }
    }

    /// Converts contact `p` on the entry side to its exit contact, entering
    /// from the right.
    pub fn convert_forward(&self, p: usize) -> usize {
        let s = self.setting as isize;
        let perm = &self.permutation;
        let wired = perm.permute(perm.wrap(p as isize + s));
        perm.wrap(wired as isize - s)
    }

    /// Converts contact `e` on the exit side back to the entry side,
    /// entering from the left.
    pub fn convert_backward(&self, e: usize) -> usize {
        let s = self.setting as isize;
        let perm = &self.permutation;
        let wired = perm.invert(perm.wrap(e as isize + s));
        perm.wrap(wired as isize - s)
    }
}

/// Identifier of a rotor within a [`RotorArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub usize);

/// Catalog of available rotors.
///
/// Stores every rotor in a contiguous `Vec` and hands out [`RotorId`]s, so
/// a machine can refer to catalog entries without copying them and without
/// `Rc<RefCell<>>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotorArena {
    rotors: Vec<Rotor>,
}

impl RotorArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        RotorArena { rotors: Vec::new() }
    }

    /// Adds `rotor` and returns its id.
    pub fn add(&mut self, rotor: Rotor) -> RotorId {
        let id = RotorId(self.rotors.len());
        self.rotors.push(rotor);
        id
    }

    /// Returns the number of rotors.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true if the arena holds no rotors.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Returns the rotor with `id`, if any.
    pub fn get(&self, id: RotorId) -> Option<&Rotor> {
        self.rotors.get(id.0)
    }

    /// Returns the rotor with `id` mutably, if any.
    pub fn get_mut(&mut self, id: RotorId) -> Option<&mut Rotor> {
        self.rotors.get_mut(id.0)
    }

    /// Returns the ids of every rotor named `name`, in catalog order.
    pub fn find_all(&self, name: &str) -> Vec<RotorId> {
        self.rotors
            .iter()
            .enumerate()
            .filter(|(_, rotor)| rotor.name() == name)
            .map(|(i, _)| RotorId(i))
            .collect()
    }

    /// Returns the id of the first rotor named `name`.
    pub fn find(&self, name: &str) -> Option<RotorId> {
        self.rotors
            .iter()
            .position(|rotor| rotor.name() == name)
            .map(RotorId)
    }

    /// Iterates all rotors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (RotorId, &Rotor)> {
        self.rotors
            .iter()
            .enumerate()
            .map(|(i, rotor)| (RotorId(i), rotor))
    }
}
