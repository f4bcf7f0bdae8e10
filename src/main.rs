use std::fs;
use std::process;

use crossfill::{render_grid, solve, Grid, GridTopology, SolveOptions, WordList};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(grid_path), Some(words_path)) = (args.next(), args.next()) else {
        eprintln!("usage: crossfill <grid-file> <word-file> [--skip-propagation]");
        process::exit(2);
    };
    let skip_propagation = args.next().as_deref() == Some("--skip-propagation");

    let template = fs::read_to_string(&grid_path).expect("Something went wrong reading the grid file");
    let words = fs::read_to_string(&words_path).expect("Something went wrong reading the word file");

    let grid = match Grid::from_template(&template) {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("invalid puzzle definition: {err}");
            process::exit(1);
        }
    };
    let topology = match GridTopology::from_grid(&grid) {
        Ok(topology) => topology,
        Err(err) => {
            eprintln!("invalid puzzle definition: {err}");
            process::exit(1);
        }
    };
    let word_list = WordList::new(words.lines().map(str::trim).filter(|word| !word.is_empty()));

    let options = SolveOptions {
        skip_propagation,
        ..SolveOptions::default()
    };
    match solve(&topology, &word_list, &options) {
        Ok(solution) => {
            println!("{:?}", solution.statistics);
            println!("{}", render_grid(&grid, &topology, &word_list, &solution));
        }
        Err(err) => {
            println!("No solution found: {err}");
            process::exit(1);
        }
    }
}
