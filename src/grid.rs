//! Grid topology: deriving slots and their crossings from a boolean
//! occupancy grid, or validating an explicitly supplied slot list.

use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::MAX_SLOT_LENGTH;

/// An identifier for a given slot, based on its index in the topology's
/// `slots` field.
pub type SlotId = usize;

/// Zero-indexed (row, column) coordinates for a cell, where row 0 is the top
/// row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Across,
    Down,
}

/// Structurally invalid puzzle definitions. These are fatal and abort before
/// any propagation or search starts, unlike unsatisfiable-but-well-formed
/// inputs which are reported as ordinary solve outcomes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid rows must all have the same width")]
    RaggedRows,
    #[error("slot at ({row}, {col}) has zero length")]
    EmptySlot { row: usize, col: usize },
    #[error("duplicate slot at ({row}, {col})")]
    DuplicateSlot { row: usize, col: usize },
    #[error("more than two slots meet at cell ({row}, {col})")]
    OverconstrainedCell { row: usize, col: usize },
    #[error("slots {a} and {b} share more than one cell")]
    DoubledOverlap { a: SlotId, b: SlotId },
}

/// A rectangular occupancy grid; `true` marks a fillable cell. Immutable
/// input to slot derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<bool>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(rows: Vec<Vec<bool>>) -> Result<Grid, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(GridError::RaggedRows);
        }
        Ok(Grid {
            cells: rows.into_iter().flatten().collect(),
            width,
            height,
        })
    }

    /// Parse a template string with `#` representing blocked cells and any
    /// other character representing a fillable cell. Blank lines and leading
    /// or trailing whitespace are ignored.
    pub fn from_template(template: &str) -> Result<Grid, GridError> {
        let rows = template
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() {
                    None
                } else {
                    Some(line.chars().map(|c| c != '#').collect())
                }
            })
            .collect();
        Grid::new(rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_fillable(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.width + col]
    }
}

/// The identity of a slot: start cell, direction, and length. Immutable once
/// derived; everything mutable during solving is keyed by `SlotId` elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    /// The coordinates of the cell at the given offset within this slot.
    pub fn cell(&self, idx: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.row, self.col + idx),
            Direction::Down => (self.row + idx, self.col),
        }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(|idx| self.cell(idx))
    }
}

/// A crossing between one slot and another, referencing the cell offset
/// within each slot where they share a grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub own_cell: usize,
    pub other_cell: usize,
}

/// The static shape of a puzzle: the slot arena plus per-slot crossing lists.
/// Adjacency is looked up by `SlotId`, so there are no back-references
/// between slots.
#[derive(Debug)]
pub struct GridTopology {
    slots: Vec<Slot>,
    crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>>,
}

impl GridTopology {
    /// Derive the complete, deduplicated slot set from an occupancy grid. A
    /// slot starts at a fillable cell whose predecessor (in its direction) is
    /// a blocked cell or the grid edge, and runs while cells stay fillable.
    /// Runs of length 1 are not slots.
    pub fn from_grid(grid: &Grid) -> Result<GridTopology, GridError> {
        let mut slots = Vec::new();

        for row in 0..grid.height() {
            let mut col = 0;
            while col < grid.width() {
                if grid.is_fillable(row, col) && (col == 0 || !grid.is_fillable(row, col - 1)) {
                    let mut length = 1;
                    while col + length < grid.width() && grid.is_fillable(row, col + length) {
                        length += 1;
                    }
                    if length > 1 {
                        slots.push(Slot {
                            row,
                            col,
                            direction: Direction::Across,
                            length,
                        });
                    }
                    col += length;
                } else {
                    col += 1;
                }
            }
        }

        for col in 0..grid.width() {
            let mut row = 0;
            while row < grid.height() {
                if grid.is_fillable(row, col) && (row == 0 || !grid.is_fillable(row - 1, col)) {
                    let mut length = 1;
                    while row + length < grid.height() && grid.is_fillable(row + length, col) {
                        length += 1;
                    }
                    if length > 1 {
                        slots.push(Slot {
                            row,
                            col,
                            direction: Direction::Down,
                            length,
                        });
                    }
                    row += length;
                } else {
                    row += 1;
                }
            }
        }

        GridTopology::from_slots(slots)
    }

    /// Build a topology from an explicit slot list, computing crossings by
    /// geometric cell-set intersection. A pair of slots sharing more than one
    /// cell, or a cell claimed by more than two slots, is a malformed input
    /// and fails here rather than being silently resolved.
    pub fn from_slots(slots: Vec<Slot>) -> Result<GridTopology, GridError> {
        let mut seen: HashSet<Slot> = HashSet::new();
        for slot in &slots {
            if slot.length == 0 {
                return Err(GridError::EmptySlot {
                    row: slot.row,
                    col: slot.col,
                });
            }
            if !seen.insert(*slot) {
                return Err(GridError::DuplicateSlot {
                    row: slot.row,
                    col: slot.col,
                });
            }
        }

        let mut claims_by_cell: HashMap<GridCoord, usize> = HashMap::new();
        for slot in &slots {
            for (row, col) in slot.cells() {
                let claims = claims_by_cell.entry((row, col)).or_insert(0);
                *claims += 1;
                if *claims > 2 {
                    return Err(GridError::OverconstrainedCell { row, col });
                }
            }
        }

        let mut crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>> =
            slots.iter().map(|_| SmallVec::new()).collect();

        for a in 0..slots.len() {
            for b in a + 1..slots.len() {
                let shared: Vec<(usize, usize)> = slots[a]
                    .cells()
                    .enumerate()
                    .flat_map(|(own_cell, coord)| {
                        slots[b]
                            .cells()
                            .enumerate()
                            .filter(move |&(_, other_coord)| other_coord == coord)
                            .map(move |(other_cell, _)| (own_cell, other_cell))
                    })
                    .collect();

                match shared.as_slice() {
                    [] => {}
                    &[(own_cell, other_cell)] => {
                        crossings[a].push(Crossing {
                            other_slot_id: b,
                            own_cell,
                            other_cell,
                        });
                        crossings[b].push(Crossing {
                            other_slot_id: a,
                            own_cell: other_cell,
                            other_cell: own_cell,
                        });
                    }
                    _ => return Err(GridError::DoubledOverlap { a, b }),
                }
            }
        }

        for slot_crossings in &mut crossings {
            slot_crossings.sort_by_key(|crossing| (crossing.own_cell, crossing.other_slot_id));
        }

        Ok(GridTopology { slots, crossings })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The crossings for a slot, ordered by cell offset.
    pub fn crossings(&self, slot_id: SlotId) -> &[Crossing] {
        &self.crossings[slot_id]
    }

    /// How many other slots this slot shares a cell with.
    pub fn degree(&self, slot_id: SlotId) -> usize {
        self.crossings[slot_id].len()
    }

    /// The shared-cell offsets for a pair of slots, or `None` if they don't
    /// touch. Symmetric: `overlap(a, b)` is the swap of `overlap(b, a)`.
    pub fn overlap(&self, a: SlotId, b: SlotId) -> Option<(usize, usize)> {
        self.crossings[a]
            .iter()
            .find(|crossing| crossing.other_slot_id == b)
            .map(|crossing| (crossing.own_cell, crossing.other_cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_yields_one_across_slot() {
        let grid = Grid::new(vec![vec![true, true, true]]).unwrap();
        let topology = GridTopology::from_grid(&grid).unwrap();

        assert_eq!(
            topology.slots(),
            &[Slot {
                row: 0,
                col: 0,
                direction: Direction::Across,
                length: 3
            }]
        );
        assert_eq!(topology.degree(0), 0);
    }

    #[test]
    fn length_one_runs_are_not_slots() {
        // Middle column is fillable in every row but each across run is a
        // single cell, so only the down slot survives alongside the top row.
        let grid = Grid::from_template(
            "
            ...
            #.#
            #.#
            ",
        )
        .unwrap();
        let topology = GridTopology::from_grid(&grid).unwrap();

        assert_eq!(
            topology.slots(),
            &[
                Slot {
                    row: 0,
                    col: 0,
                    direction: Direction::Across,
                    length: 3
                },
                Slot {
                    row: 0,
                    col: 1,
                    direction: Direction::Down,
                    length: 3
                },
            ]
        );
        assert_eq!(topology.overlap(0, 1), Some((1, 0)));
        assert_eq!(topology.overlap(1, 0), Some((0, 1)));
    }

    #[test]
    fn derived_slots_cover_exactly_the_fillable_runs() {
        let grid = Grid::from_template(
            "
            #...###
            #....##
            .......
            .......
            .......
            ##....#
            ###...#
            ",
        )
        .unwrap();
        let topology = GridTopology::from_grid(&grid).unwrap();

        let mut seen = HashSet::new();
        for slot in topology.slots() {
            assert!(seen.insert(*slot), "duplicate slot {slot:?}");
            assert!(slot.length > 1);
            for (row, col) in slot.cells() {
                assert!(grid.is_fillable(row, col));
            }
            // Maximality: the cells just before and after the run are blocked
            // or off the grid.
            let (prev, next) = match slot.direction {
                Direction::Across => (
                    slot.col.checked_sub(1).map(|col| (slot.row, col)),
                    (slot.col + slot.length < grid.width())
                        .then(|| (slot.row, slot.col + slot.length)),
                ),
                Direction::Down => (
                    slot.row.checked_sub(1).map(|row| (row, slot.col)),
                    (slot.row + slot.length < grid.height())
                        .then(|| (slot.row + slot.length, slot.col)),
                ),
            };
            for (row, col) in prev.into_iter().chain(next) {
                assert!(!grid.is_fillable(row, col));
            }
        }
    }

    #[test]
    fn overlaps_are_symmetric_and_refer_to_the_same_cell() {
        let grid = Grid::from_template(
            "
            #...###
            #....##
            .......
            .......
            .......
            ##....#
            ###...#
            ",
        )
        .unwrap();
        let topology = GridTopology::from_grid(&grid).unwrap();

        for a in 0..topology.slot_count() {
            assert_eq!(topology.overlap(a, a), None);
            for b in 0..topology.slot_count() {
                if a == b {
                    continue;
                }
                match topology.overlap(a, b) {
                    None => assert_eq!(topology.overlap(b, a), None),
                    Some((i, j)) => {
                        assert_eq!(topology.overlap(b, a), Some((j, i)));
                        assert_eq!(topology.slots()[a].cell(i), topology.slots()[b].cell(j));
                    }
                }
            }
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert_eq!(
            Grid::new(vec![vec![true, true], vec![true]]),
            Err(GridError::RaggedRows)
        );
    }

    #[test]
    fn zero_length_slot_is_rejected() {
        let result = GridTopology::from_slots(vec![Slot {
            row: 1,
            col: 1,
            direction: Direction::Across,
            length: 0,
        }]);
        assert!(matches!(result, Err(GridError::EmptySlot { row: 1, col: 1 })));
    }

    #[test]
    fn duplicate_slots_are_rejected() {
        let slot = Slot {
            row: 0,
            col: 0,
            direction: Direction::Down,
            length: 3,
        };
        let result = GridTopology::from_slots(vec![slot, slot]);
        assert!(matches!(
            result,
            Err(GridError::DuplicateSlot { row: 0, col: 0 })
        ));
    }

    #[test]
    fn slots_sharing_two_cells_are_rejected() {
        let result = GridTopology::from_slots(vec![
            Slot {
                row: 0,
                col: 0,
                direction: Direction::Across,
                length: 4,
            },
            Slot {
                row: 0,
                col: 2,
                direction: Direction::Across,
                length: 3,
            },
        ]);
        assert!(matches!(result, Err(GridError::DoubledOverlap { a: 0, b: 1 })));
    }

    #[test]
    fn three_slots_in_one_cell_are_rejected() {
        let result = GridTopology::from_slots(vec![
            Slot {
                row: 0,
                col: 0,
                direction: Direction::Across,
                length: 3,
            },
            Slot {
                row: 0,
                col: 2,
                direction: Direction::Across,
                length: 2,
            },
            Slot {
                row: 0,
                col: 2,
                direction: Direction::Down,
                length: 2,
            },
        ]);
        assert!(matches!(
            result,
            Err(GridError::OverconstrainedCell { row: 0, col: 2 })
        ));
    }

    #[test]
    fn grid_error_messages_name_the_problem() {
        let err = GridError::DoubledOverlap { a: 0, b: 1 };
        assert_eq!(err.to_string(), "slots 0 and 1 share more than one cell");
    }
}
