//! Per-unit view of a collection.

use serde::Serialize;

use crate::artefact::Artefact;
use crate::unit::{Unit, UNIT_COUNT};

/// Number of artefacts shown in the "recent" digest.
pub const RECENT_LIMIT: usize = 5;

/// Artefacts of one unit, in collection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitBucket {
    pub unit: Unit,
    pub artefacts: Vec<Artefact>,
}

impl UnitBucket {
    pub fn total(&self) -> usize {
        self.artefacts.len()
    }

    pub fn reviewed_count(&self) -> usize {
        self.artefacts.iter().filter(|a| a.is_reviewed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.artefacts.is_empty()
    }
}

/// Partition of a collection into the twelve units. Every unit has a bucket,
/// empty or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnitGrouping {
    buckets: Vec<UnitBucket>,
}

impl UnitGrouping {
    pub fn from_artefacts(artefacts: &[Artefact]) -> Self {
        let mut buckets: Vec<UnitBucket> = Unit::all()
            .map(|unit| UnitBucket {
                unit,
                artefacts: Vec::new(),
            })
            .collect();
        debug_assert_eq!(buckets.len(), usize::from(UNIT_COUNT));

        for artefact in artefacts {
            buckets[artefact.unit().index()]
                .artefacts
                .push(artefact.clone());
        }
        Self { buckets }
    }

    pub fn get(&self, unit: Unit) -> &UnitBucket {
        &self.buckets[unit.index()]
    }

    /// Buckets in unit order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitBucket> {
        self.buckets.iter()
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(UnitBucket::total).sum()
    }

    pub fn reviewed_count(&self) -> usize {
        self.buckets.iter().map(UnitBucket::reviewed_count).sum()
    }

    /// Units that have no evidence yet.
    pub fn empty_units(&self) -> impl Iterator<Item = Unit> + '_ {
        self.buckets.iter().filter(|b| b.is_empty()).map(|b| b.unit)
    }
}

/// The first `limit` artefacts of a newest-first collection.
pub fn recent(artefacts: &[Artefact], limit: usize) -> &[Artefact] {
    &artefacts[..limit.min(artefacts.len())]
}
