//! Per-field update instruction
//!
//! `Patch::Keep` leaves the stored value alone, `Patch::Set` replaces it.
//! For nullable columns use `Patch<Option<T>>`: `Set(None)` clears the value.
//!
//! On the wire a missing key deserializes to `Keep` (the field needs
//! `#[serde(default)]`), any present value, including `null`, to `Set`.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> Patch<T> {
    /// Apply the patch onto `target`. Returns true if a value was written.
    pub fn apply_to(self, target: &mut T) -> bool {
        match self {
            Patch::Keep => false,
            Patch::Set(value) => {
                *target = value;
                true
            }
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Patch::Set)
    }
}
