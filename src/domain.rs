//! Per-slot candidate sets, mutable during propagation and search.

use crate::grid::{GridTopology, SlotId};
use crate::word_list::{WordId, WordList};

/// Per-slot candidate word sets. Domains only shrink while a propagation or
/// search pass is running; the only way one grows back is by restoring an
/// explicit snapshot taken before the shrink, never by recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStore {
    domains: Vec<Vec<WordId>>,
}

impl DomainStore {
    /// Seed one domain per slot, keeping only words whose length matches the
    /// slot exactly. Length mismatches would be rejected by every later
    /// consistency check anyway; filtering here just keeps the domains small.
    pub fn seed(topology: &GridTopology, word_list: &WordList) -> DomainStore {
        let domains = topology
            .slots()
            .iter()
            .map(|slot| {
                (0..word_list.len())
                    .filter(|&id| word_list.word(id).len() == slot.length)
                    .collect()
            })
            .collect();
        DomainStore { domains }
    }

    /// The candidate words currently legal for a slot, in seeding order.
    pub fn words(&self, slot_id: SlotId) -> &[WordId] {
        &self.domains[slot_id]
    }

    pub fn size(&self, slot_id: SlotId) -> usize {
        self.domains[slot_id].len()
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.domains[slot_id].is_empty()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.domains.iter().map(Vec::len).collect()
    }

    /// Remove a word from a slot's domain, preserving the order of the rest.
    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) {
        self.domains[slot_id].retain(|&id| id != word_id);
    }

    /// Capture a slot's domain before shrinking it during search.
    pub fn snapshot(&self, slot_id: SlotId) -> Vec<WordId> {
        self.domains[slot_id].clone()
    }

    /// Put back exactly the pre-shrink contents captured by `snapshot`.
    pub fn restore(&mut self, slot_id: SlotId, snapshot: Vec<WordId>) {
        self.domains[slot_id] = snapshot;
    }
}
