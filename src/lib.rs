//! Fill a crossword-style grid by treating it as a constraint-satisfaction
//! problem: every slot (a maximal run of fillable cells in one direction)
//! must receive a distinct dictionary word of matching length, and crossing
//! slots must agree on the letter in their shared cell.
//!
//! The pipeline is: derive the slots and their crossings from the grid
//! ([`grid`]), seed per-slot candidate sets ([`domain`]), optionally prune
//! them with an AC-3 pass ([`arc_consistency`]), and then run a heuristic
//! backtracking search ([`backtracking_search`]). [`render`] turns a finished
//! assignment back into printable rows.

pub mod arc_consistency;
pub mod backtracking_search;
pub mod domain;
pub mod grid;
pub mod render;
pub mod word_list;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

pub use backtracking_search::{solve, Choice, Solution, SolveFailure, SolveOptions, Statistics};
pub use grid::{Crossing, Direction, Grid, GridError, GridTopology, Slot, SlotId};
pub use render::render_grid;
pub use word_list::{Word, WordId, WordList};
