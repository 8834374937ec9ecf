use std::collections::HashMap;

use serde_json::Value;

use crate::model::{DuplicateReference, MatchedEntry, Side, TransactionRecord};

/// Key → record lookup for one side, scoped to a single reconcile call.
///
/// Iteration follows the first time each key was seen; the record stored for
/// a key is the last one seen. Earlier records for a repeated key are kept
/// only so they can be reported.
pub(crate) struct KeyedIndex<'a> {
    positions: HashMap<&'a str, usize>,
    slots: Vec<Slot<'a>>,
}

struct Slot<'a> {
    key: &'a str,
    winner: &'a TransactionRecord,
    dropped: Vec<&'a TransactionRecord>,
}

impl<'a> KeyedIndex<'a> {
    pub(crate) fn build(records: &'a [TransactionRecord]) -> Self {
        let mut positions: HashMap<&'a str, usize> = HashMap::with_capacity(records.len());
        let mut slots: Vec<Slot<'a>> = Vec::with_capacity(records.len());

        for record in records {
            let key = record.reference();
            match positions.get(key).copied() {
                Some(pos) => {
                    let slot = &mut slots[pos];
                    slot.dropped.push(slot.winner);
                    slot.winner = record;
                }
                None => {
                    positions.insert(key, slots.len());
                    slots.push(Slot {
                        key,
                        winner: record,
                        dropped: Vec::new(),
                    });
                }
            }
        }

        Self { positions, slots }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a TransactionRecord> {
        self.positions.get(key).map(|&pos| self.slots[pos].winner)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// `(key, winning record)` in first-seen key order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&'a str, &'a TransactionRecord)> + '_ {
        self.slots.iter().map(|s| (s.key, s.winner))
    }

    pub(crate) fn duplicates(&self, side: Side) -> Vec<DuplicateReference> {
        self.slots
            .iter()
            .filter(|s| !s.dropped.is_empty())
            .map(|s| DuplicateReference {
                side,
                reference: s.key.to_string(),
                occurrences: s.dropped.len() + 1,
                dropped: s.dropped.iter().map(|r| (*r).clone()).collect(),
            })
            .collect()
    }
}

/// Exact equality on optional field values: both absent compares equal,
/// one absent does not, otherwise JSON value equality with no trimming,
/// case folding, or numeric coercion.
pub fn fields_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    a == b
}

/// Extend the internal record with the provider's amount/status and the
/// two agreement flags.
pub fn build_matched_entry(
    internal: &TransactionRecord,
    provider: &TransactionRecord,
) -> MatchedEntry {
    MatchedEntry {
        internal: internal.clone(),
        provider_amount: provider.amount().cloned(),
        provider_status: provider.status().cloned(),
        is_amount_match: fields_equal(internal.amount(), provider.amount()),
        is_status_match: fields_equal(internal.status(), provider.status()),
    }
}
