//! Machine: rotor slots, plugboard and the per-keypress pipeline.
//!
//! Slot 0 holds the reflector and slot `N - 1` the fastest rotor. The
//! rightmost `P` slots (pawls) rotate. Each keypress first steps the
//! rotors, then runs the signal path:
//!
//! ```text
//! plugboard -> slots N-1..1 (forward) -> reflector -> slots 1..N-1 (backward) -> plugboard
//! ```

use std::sync::Arc;

use log::{debug, log_enabled, trace, Level};

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorArena, RotorId};

/// A complete rotor machine.
///
/// `Clone` deep-copies the catalog, so a clone carries its own rotor
/// settings and can be converted independently.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    catalog: RotorArena,
    slots: Vec<RotorId>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `num_pawls` pawls whose
    /// available rotors are `all_rotors`. The plugboard starts as the
    /// identity and no rotors are inserted.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidGeometry`] unless `1 < num_rotors` and
    ///   `num_pawls < num_rotors`.
    /// - [`EnigmaError::DuplicateRotor`] if two catalog rotors share a name.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        all_rotors: impl IntoIterator<Item = Rotor>,
    ) -> Result<Self, EnigmaError> {
        if num_rotors <= 1 || num_pawls >= num_rotors {
            return Err(EnigmaError::InvalidGeometry {
                rotors: num_rotors,
                pawls: num_pawls,
            });
        }
        let mut catalog = RotorArena::new();
        for rotor in all_rotors {
            if catalog.find(rotor.name()).is_some() {
                return Err(EnigmaError::DuplicateRotor(rotor.name().to_string()));
            }
            catalog.add(rotor);
        }
        let plugboard = Permutation::identity(alphabet.clone());
        Ok(Machine {
            alphabet,
            num_rotors,
            num_pawls,
            catalog,
            slots: Vec::with_capacity(num_rotors),
            plugboard,
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, i.e. of rotating slots.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns the alphabet shared by the plugboard and every rotor.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns every rotor available to this machine.
    pub fn catalog(&self) -> &RotorArena {
        &self.catalog
    }

    /// Returns the rotor in slot `k` (0 is the reflector), if inserted.
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.slots.get(k).and_then(|&id| self.catalog.get(id))
    }

    /// Returns the catalog ids currently in the slots.
    pub fn slots(&self) -> &[RotorId] {
        &self.slots
    }

    /// Returns the current setting of every inserted slot, reflector first.
    pub fn settings(&self) -> Vec<usize> {
        self.inserted().map(Rotor::setting).collect()
    }

    fn inserted(&self) -> impl Iterator<Item = &Rotor> {
        self.slots.iter().filter_map(|&id| self.catalog.get(id))
    }

    /// Fills the slots with the catalog rotors named `rotors`, in order;
    /// `rotors[0]` names the reflector. Settings are left as they are.
    ///
    /// The slot list is replaced only if every name resolves.
    ///
    /// # Errors
    /// - [`EnigmaError::WrongRotorCount`] if `rotors.len() != num_rotors()`.
    /// - [`EnigmaError::DuplicateRotor`] if a name is requested twice.
    /// - [`EnigmaError::RotorsNotFound`] if some names are not in the catalog.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, rotors: &[S]) -> Result<(), EnigmaError> {
        if rotors.len() != self.num_rotors {
            return Err(EnigmaError::WrongRotorCount {
                expected: self.num_rotors,
                actual: rotors.len(),
            });
        }
        let names: Vec<&str> = rotors.iter().map(|s| s.as_ref()).collect();
        let mut resolved = Vec::with_capacity(names.len());
        for &name in &names {
            if names.iter().filter(|&&other| other == name).count() > 1 {
                return Err(EnigmaError::DuplicateRotor(name.to_string()));
            }
            resolved.extend(self.catalog.find_all(name));
        }
        if resolved.len() != names.len() {
            return Err(EnigmaError::RotorsNotFound {
                requested: names.len(),
                found: resolved.len(),
            });
        }
        self.slots = resolved;
        debug!("inserted rotors [{}]", names.join(" "));
        Ok(())
    }

    /// Sets the non-reflector rotors from `setting`, one symbol per slot,
    /// leftmost first.
    ///
    /// # Errors
    /// - [`EnigmaError::NoRotorsInserted`] before [`insert_rotors`](Self::insert_rotors).
    /// - [`EnigmaError::SettingLength`] if `setting` does not have one symbol
    ///   per non-reflector slot.
    /// - [`EnigmaError::SymbolNotFound`] for a symbol outside the alphabet.
    pub fn set_rotors(&mut self, setting: &str) -> Result<(), EnigmaError> {
        if self.slots.is_empty() {
            return Err(EnigmaError::NoRotorsInserted);
        }
        let expected = self.slots.len() - 1;
        let actual = setting.chars().count();
        if actual != expected {
            return Err(EnigmaError::SettingLength { expected, actual });
        }
        let positions = setting
            .chars()
            .map(|ch| self.alphabet.to_int(ch))
            .collect::<Result<Vec<_>, _>>()?;

        for (&id, &posn) in self.slots[1..].iter().zip(&positions) {
            if posn != 0 && self.catalog.get(id).is_some_and(Rotor::reflecting) {
                return Err(EnigmaError::ReflectorPosition(posn));
            }
        }
        for (&id, posn) in self.slots[1..].iter().zip(positions) {
            if let Some(rotor) = self.catalog.get_mut(id) {
                rotor.set(posn)?;
            }
        }
        debug!("rotor settings {}", setting);
        Ok(())
    }

    /// Returns the current plugboard permutation.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Replaces the plugboard.
    pub fn set_plugboard(&mut self, plugboard: Permutation) {
        debug!("plugboard {:?}", plugboard.cycles());
        self.plugboard = plugboard;
    }

    /// Steps the rotors once, as a keypress does.
    ///
    /// With `B = num_rotors - num_pawls`, slot `B` advances when slot `B + 1`
    /// is at a notch. Each slot between `B` and the fastest also advances
    /// when it is itself at a notch, which gives the double step. The
    /// fastest slot always advances. Every notch read happens before the
    /// rotor it reads is moved.
    pub fn advance_rotors(&mut self) {
        if self.slots.is_empty() {
            return;
        }
        let last = self.slots.len() - 1;
        let boundary = self.num_rotors - self.num_pawls;
        for i in boundary..last {
            let carry = self.slot_at_notch(i + 1);
            let step = if i > boundary {
                self.slot_at_notch(i) || carry
            } else {
                carry
            };
            if step {
                self.advance_slot(i);
            }
        }
        self.advance_slot(last);
    }

    fn slot_at_notch(&self, k: usize) -> bool {
        self.rotor(k).is_some_and(Rotor::at_notch)
    }

    fn advance_slot(&mut self, k: usize) {
        if let Some(rotor) = self.slots.get(k).and_then(|&id| self.catalog.get_mut(id)) {
            rotor.advance();
        }
    }

    /// Converts index `c` after first stepping the machine.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] if `c` is not an alphabet index.
    /// - [`EnigmaError::NoRotorsInserted`] before rotors are inserted.
    ///
    /// Nothing is mutated when an error is returned.
    pub fn convert(&mut self, c: usize) -> Result<usize, EnigmaError> {
        if c >= self.alphabet.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }
        if self.slots.is_empty() {
            return Err(EnigmaError::NoRotorsInserted);
        }

        self.advance_rotors();
        let plugged = self.plugboard.permute(c);
        let rotated = self.apply_rotors(plugged);
        let result = self.plugboard.permute(rotated);

        if log_enabled!(Level::Trace) {
            let positions: String = self
                .inserted()
                .skip(1)
                .filter_map(|rotor| self.alphabet.to_char(rotor.setting()).ok())
                .collect();
            let sym = |i: usize| self.alphabet.to_char(i).unwrap_or('?');
            trace!(
                "[{}] {} -> {} -> {} -> {}",
                positions,
                sym(c),
                sym(plugged),
                sym(rotated),
                sym(result)
            );
        }
        Ok(result)
    }

    /// Runs `c` through the rotor stack and back, without the plugboard.
    /// Slot 0 reflects through its bare permutation; its setting is ignored.
    fn apply_rotors(&self, c: usize) -> usize {
        let Some((reflector, stack)) = self.slots.split_first() else {
            return c;
        };
        let rotor = |id: &RotorId| self.catalog.get(*id);
        let inward = stack
            .iter()
            .rev()
            .filter_map(rotor)
            .fold(c, |acc, r| r.convert_forward(acc));
        let reflected = rotor(reflector).map_or(inward, |r| r.permutation().permute(inward));
        stack
            .iter()
            .filter_map(rotor)
            .fold(reflected, |acc, r| r.convert_backward(acc))
    }

    /// Converts `msg` with all whitespace removed, updating the rotors as it
    /// goes.
    ///
    /// # Errors
    /// - [`EnigmaError::SymbolNotFound`] for a symbol outside the alphabet;
    ///   checked for the whole message before any rotor moves.
    /// - [`EnigmaError::NoRotorsInserted`] before rotors are inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Machine, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABC").unwrap());
    /// let rotors = vec![
    ///     Rotor::reflector("R", Permutation::new("(AB)", alpha.clone()).unwrap()),
    ///     Rotor::moving("M", Permutation::new("(ABC)", alpha.clone()).unwrap(), "C").unwrap(),
    /// ];
    /// let mut machine = Machine::new(alpha, 2, 1, rotors).unwrap();
    /// machine.insert_rotors(&["R", "M"]).unwrap();
    /// machine.set_rotors("A").unwrap();
    /// let cipher = machine.convert_message("AB C").unwrap();
    /// assert_eq!(cipher.len(), 3);
    /// ```
    pub fn convert_message(&mut self, msg: &str) -> Result<String, EnigmaError> {
        let indices = msg
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| self.alphabet.to_int(ch))
            .collect::<Result<Vec<_>, _>>()?;
        if self.slots.is_empty() {
            return Err(EnigmaError::NoRotorsInserted);
        }

        let mut result = String::with_capacity(indices.len());
        for idx in indices {
            let out = self.convert(idx)?;
            result.push(self.alphabet.to_char(out)?);
        }
        Ok(result)
    }
}
