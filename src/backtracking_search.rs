//! Depth-first backtracking search over slot assignments, guided by
//! minimum-remaining-values variable selection (degree tie-break) and
//! least-constraining-value ordering.
//!
//! Domains are forward-pruned as assignments are made: choosing a word
//! removes it and every letter-incompatible word from the domains of
//! unassigned crossing slots, and backtracking restores those domains from
//! snapshots taken before the shrink. This is a pure performance policy; the
//! consistency check alone is what guarantees a returned assignment is valid.

use bit_set::BitSet;
use instant::{Duration, Instant};
use thiserror::Error;

use crate::arc_consistency::enforce_arc_consistency;
use crate::domain::DomainStore;
use crate::grid::{GridTopology, SlotId};
use crate::word_list::{WordId, WordList};

/// A slot assignment made during the filling process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// Counters describing a solve run, threaded through the search state and
/// returned with the result rather than kept in globals.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub slot_count: usize,
    /// Search steps taken (one per recursive call).
    pub states: u64,
    /// Assignments undone after their subtree failed.
    pub backtracks: u64,
    /// Domain sizes after seeding and any propagation, before search started.
    pub initial_domain_sizes: Vec<usize>,
    pub duration: Duration,
}

/// A complete, consistent assignment: one choice per slot, in slot-id order.
#[derive(Debug, Clone)]
pub struct Solution {
    pub choices: Vec<Choice>,
    pub statistics: Statistics,
}

/// The normal, reportable ways a run can end without a complete assignment.
/// Structurally invalid inputs never get this far; they are rejected by
/// `GridTopology` construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveFailure {
    #[error("no candidate words remain for slot {0} after propagation")]
    EmptyDomain(SlotId),
    #[error("search space exhausted without a complete assignment")]
    Exhausted,
    #[error("deadline exceeded during search")]
    DeadlineExceeded,
}

/// Knobs for a single solve run.
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Skip the pre-search arc-consistency pass. Never needed for
    /// correctness; the search tree is just larger without it.
    pub skip_propagation: bool,
    /// Abort the search once this instant passes. Checked once per search
    /// step, so the overshoot is bounded by a single step.
    pub deadline: Option<Instant>,
}

/// Fill every slot of `topology` with a distinct word from `word_list`, or
/// report why that's impossible. The first complete, consistent assignment
/// found is returned; no alternatives are explored.
pub fn solve(
    topology: &GridTopology,
    word_list: &WordList,
    options: &SolveOptions,
) -> Result<Solution, SolveFailure> {
    let start = Instant::now();
    tracing::debug!(
        slots = topology.slot_count(),
        words = word_list.len(),
        "starting fill"
    );

    let mut domains = DomainStore::seed(topology, word_list);
    if !options.skip_propagation {
        enforce_arc_consistency(topology, word_list, &mut domains)
            .map_err(|failure| SolveFailure::EmptyDomain(failure.slot_id))?;
    }
    let initial_domain_sizes = domains.sizes();

    let mut search = Search {
        topology,
        word_list,
        domains,
        assignment: vec![None; topology.slot_count()],
        used: BitSet::with_capacity(word_list.len()),
        assigned_count: 0,
        states: 0,
        backtracks: 0,
        deadline: options.deadline,
    };

    if !search.step()? {
        return Err(SolveFailure::Exhausted);
    }

    let statistics = Statistics {
        slot_count: topology.slot_count(),
        states: search.states,
        backtracks: search.backtracks,
        initial_domain_sizes,
        duration: start.elapsed(),
    };
    tracing::debug!(
        states = statistics.states,
        backtracks = statistics.backtracks,
        "fill complete"
    );

    let choices = search
        .assignment
        .iter()
        .enumerate()
        .map(|(slot_id, word)| Choice {
            slot_id,
            word_id: word.expect("complete assignment is missing a slot"),
        })
        .collect();

    Ok(Solution {
        choices,
        statistics,
    })
}

/// Snapshots of the neighbor domains one assignment shrank, so backtracking
/// can put back exactly the pre-branch contents.
type UndoRecord = Vec<(SlotId, Vec<WordId>)>;

struct Search<'a> {
    topology: &'a GridTopology,
    word_list: &'a WordList,
    domains: DomainStore,
    assignment: Vec<Option<WordId>>,
    /// Word ids currently assigned somewhere, for the distinctness check.
    used: BitSet,
    assigned_count: usize,
    states: u64,
    backtracks: u64,
    deadline: Option<Instant>,
}

impl Search<'_> {
    /// One search step: pick the most constrained slot, try its candidates in
    /// least-constraining order, recurse. `Ok(true)` means the assignment is
    /// complete; `Ok(false)` exhausts this subtree and triggers backtracking
    /// one level up.
    fn step(&mut self) -> Result<bool, SolveFailure> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(SolveFailure::DeadlineExceeded);
            }
        }
        self.states += 1;

        if self.assigned_count == self.topology.slot_count() {
            return Ok(true);
        }

        let slot_id = self.select_slot();
        for word_id in self.ordered_candidates(slot_id) {
            if !self.is_consistent(slot_id, word_id) {
                continue;
            }
            let undo = self.assign(slot_id, word_id);
            if self.step()? {
                return Ok(true);
            }
            self.unassign(slot_id, word_id, undo);
        }

        Ok(false)
    }

    /// Minimum-remaining-values with a degree tie-break; remaining ties go to
    /// the smallest slot id so variable order is reproducible.
    fn select_slot(&self) -> SlotId {
        let mut best: Option<SlotId> = None;
        for slot_id in 0..self.topology.slot_count() {
            if self.assignment[slot_id].is_some() {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => {
                    let size = self.domains.size(slot_id);
                    let current_size = self.domains.size(current);
                    size < current_size
                        || (size == current_size
                            && self.topology.degree(slot_id) > self.topology.degree(current))
                }
            };
            if better {
                best = Some(slot_id);
            }
        }
        best.expect("select_slot called with every slot assigned")
    }

    /// Least-constraining-value ordering: candidates that rule out fewer
    /// words in unassigned crossing slots come first. Ties keep seeding
    /// order; the sort is stable.
    fn ordered_candidates(&self, slot_id: SlotId) -> Vec<WordId> {
        let mut scored: Vec<(usize, WordId)> = self
            .domains
            .words(slot_id)
            .iter()
            .map(|&word_id| (self.conflict_count(slot_id, word_id), word_id))
            .collect();
        scored.sort_by_key(|&(conflicts, _)| conflicts);
        scored.into_iter().map(|(_, word_id)| word_id).collect()
    }

    /// How many candidate words this choice would eliminate across the
    /// domains of unassigned crossing slots. A neighbor's word only conflicts
    /// if both words actually reach the shared cell and disagree there.
    fn conflict_count(&self, slot_id: SlotId, word_id: WordId) -> usize {
        let word = self.word_list.word(word_id);
        self.topology
            .crossings(slot_id)
            .iter()
            .filter(|crossing| self.assignment[crossing.other_slot_id].is_none())
            .map(|crossing| match word.glyph(crossing.own_cell) {
                Some(glyph) => self
                    .domains
                    .words(crossing.other_slot_id)
                    .iter()
                    .filter(|&&other_id| {
                        self.word_list
                            .word(other_id)
                            .glyph(crossing.other_cell)
                            .is_some_and(|other_glyph| other_glyph != glyph)
                    })
                    .count(),
                None => 0,
            })
            .sum()
    }

    /// A candidate is consistent with the current partial assignment iff it
    /// isn't already in use, its length matches the slot, and it agrees with
    /// every assigned crossing slot at the shared cell.
    fn is_consistent(&self, slot_id: SlotId, word_id: WordId) -> bool {
        if self.used.contains(word_id) {
            return false;
        }
        let word = self.word_list.word(word_id);
        if word.len() != self.topology.slots()[slot_id].length {
            return false;
        }
        self.topology
            .crossings(slot_id)
            .iter()
            .all(|crossing| match self.assignment[crossing.other_slot_id] {
                Some(assigned) => {
                    word.glyph(crossing.own_cell)
                        == self.word_list.word(assigned).glyph(crossing.other_cell)
                }
                None => true,
            })
    }

    /// Record the choice and forward-prune unassigned neighbors: the chosen
    /// word itself and anything disagreeing at the shared cell leave their
    /// domains, each behind a snapshot for the undo.
    fn assign(&mut self, slot_id: SlotId, word_id: WordId) -> UndoRecord {
        self.assignment[slot_id] = Some(word_id);
        self.used.insert(word_id);
        self.assigned_count += 1;

        let word = self.word_list.word(word_id);
        let mut undo: UndoRecord = Vec::new();
        for crossing in self.topology.crossings(slot_id) {
            let other = crossing.other_slot_id;
            if self.assignment[other].is_some() {
                continue;
            }
            let conflicts: Vec<WordId> = self
                .domains
                .words(other)
                .iter()
                .copied()
                .filter(|&other_id| {
                    other_id == word_id
                        || self.word_list.word(other_id).glyph(crossing.other_cell)
                            != word.glyph(crossing.own_cell)
                })
                .collect();
            if conflicts.is_empty() {
                continue;
            }
            undo.push((other, self.domains.snapshot(other)));
            for conflict in conflicts {
                self.domains.remove(other, conflict);
            }
        }
        undo
    }

    fn unassign(&mut self, slot_id: SlotId, word_id: WordId, undo: UndoRecord) {
        for (other, snapshot) in undo {
            self.domains.restore(other, snapshot);
        }
        self.assignment[slot_id] = None;
        self.used.remove(word_id);
        self.assigned_count -= 1;
        self.backtracks += 1;
        tracing::trace!(slot = slot_id, word = word_id, "backtracked");
    }
}
