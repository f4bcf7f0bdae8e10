//! An AC-3 pass over the binary constraints between crossing slots. A word is
//! justified in a slot's domain only while some *different* word in each
//! crossing slot's domain carries a matching letter at the shared cell;
//! unjustified words are removed, and a removal re-queues every arc pointing
//! at the shrunken slot. The pass is optional before search (it only shrinks
//! the tree, never changes satisfiability) and idempotent.

use bit_set::BitSet;
use std::collections::VecDeque;

use crate::domain::DomainStore;
use crate::grid::{GridTopology, SlotId};
use crate::word_list::{WordId, WordList};

/// Returned when propagation empties a slot's domain: the puzzle is
/// unsatisfiable and search must not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationFailure {
    pub slot_id: SlotId,
}

/// Prune `domains` until every arc between crossing slots is consistent, or
/// report the first slot whose domain empties. The initial arc queue is
/// seeded in ascending slot-id order so a fixed input always prunes the same
/// way.
pub fn enforce_arc_consistency(
    topology: &GridTopology,
    word_list: &WordList,
    domains: &mut DomainStore,
) -> Result<(), PropagationFailure> {
    let slot_count = topology.slot_count();

    // A slot can start out with no candidates at all, e.g. when the
    // dictionary has no word of its length.
    for slot_id in 0..slot_count {
        if domains.is_empty(slot_id) {
            return Err(PropagationFailure { slot_id });
        }
    }

    let mut queue: VecDeque<(SlotId, SlotId)> = VecDeque::new();
    // Tracks which arcs are already queued so re-queuing stays O(1) and the
    // queue never holds duplicates.
    let mut queued = BitSet::with_capacity(slot_count * slot_count);

    for x in 0..slot_count {
        for crossing in topology.crossings(x) {
            let y = crossing.other_slot_id;
            if queued.insert(x * slot_count + y) {
                queue.push_back((x, y));
            }
        }
    }

    let mut eliminated = 0usize;

    while let Some((x, y)) = queue.pop_front() {
        queued.remove(x * slot_count + y);

        let removed = revise(topology, word_list, domains, x, y);
        if removed == 0 {
            continue;
        }
        eliminated += removed;

        if domains.is_empty(x) {
            tracing::debug!(slot = x, "domain wiped out during propagation");
            return Err(PropagationFailure { slot_id: x });
        }

        for crossing in topology.crossings(x) {
            let z = crossing.other_slot_id;
            if z != y && queued.insert(z * slot_count + x) {
                queue.push_back((z, x));
            }
        }
    }

    tracing::debug!(eliminated, "arc consistency established");
    Ok(())
}

/// Remove every word in `x`'s domain with no support in `y`'s domain,
/// returning how many were removed.
fn revise(
    topology: &GridTopology,
    word_list: &WordList,
    domains: &mut DomainStore,
    x: SlotId,
    y: SlotId,
) -> usize {
    let Some((own_cell, other_cell)) = topology.overlap(x, y) else {
        return 0;
    };

    let removals: Vec<WordId> = domains
        .words(x)
        .iter()
        .copied()
        .filter(|&word_id| {
            let supported = match word_list.word(word_id).glyph(own_cell) {
                Some(glyph) => domains.words(y).iter().any(|&other_id| {
                    other_id != word_id && word_list.word(other_id).glyph(other_cell) == Some(glyph)
                }),
                // Too short to reach the crossing, so no word in `y` can ever
                // agree with it.
                None => false,
            };
            !supported
        })
        .collect();

    for &word_id in &removals {
        domains.remove(x, word_id);
    }
    removals.len()
}
