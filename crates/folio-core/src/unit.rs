// Course unit numbers.
//
// The module runs over a fixed set of twelve units; every artefact belongs to
// exactly one of them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FolioError, Result};

/// Number of course units.
pub const UNIT_COUNT: u8 = 12;

/// A course unit number in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Unit(u8);

impl Unit {
    /// Validates a raw unit number.
    pub fn new(number: i64) -> Result<Self> {
        if (1..=i64::from(UNIT_COUNT)).contains(&number) {
            Ok(Self(number as u8))
        } else {
            Err(FolioError::InvalidUnit(number))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based position, for indexing per-unit tables.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All units in ascending order.
    pub fn all() -> impl Iterator<Item = Unit> {
        (1..=UNIT_COUNT).map(Unit)
    }
}

impl TryFrom<i64> for Unit {
    type Error = FolioError;

    fn try_from(number: i64) -> Result<Self> {
        Self::new(number)
    }
}

impl From<Unit> for u8 {
    fn from(unit: Unit) -> Self {
        unit.0
    }
}

impl From<Unit> for i32 {
    fn from(unit: Unit) -> Self {
        i32::from(unit.0)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
