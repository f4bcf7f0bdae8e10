//! Rendering a completed assignment back onto the grid shape. This is the
//! output boundary; the solver itself never deals in printed characters.

use crate::backtracking_search::Solution;
use crate::grid::{Grid, GridTopology};
use crate::word_list::WordList;

/// Turn a grid and a set of fill choices into printable rows. Blocked cells
/// render as `#`; fillable cells not covered by any slot render as `.`.
pub fn render_grid(
    grid: &Grid,
    topology: &GridTopology,
    word_list: &WordList,
    solution: &Solution,
) -> String {
    let mut rows: Vec<Vec<char>> = (0..grid.height())
        .map(|row| {
            (0..grid.width())
                .map(|col| if grid.is_fillable(row, col) { '.' } else { '#' })
                .collect()
        })
        .collect();

    for choice in &solution.choices {
        let slot = topology.slots()[choice.slot_id];
        let word = word_list.word(choice.word_id);
        for (cell_idx, (row, col)) in slot.cells().enumerate() {
            rows[row][col] = word.glyphs[cell_idx];
        }
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
