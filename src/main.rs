#[macro_use]
extern crate error_chain;

use docopt::Docopt;
use itertools::Itertools;
use log::{debug, info};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use square_mazes::{
    pathing::PathDisplay,
    SquareMaze,
};
use std::{
    fs::File,
    io::prelude::*,
    path::Path,
};

const USAGE: &str = "Square Mazes

Usage:
    maze_driver -h | --help
    maze_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--sampled] [--show-path] [--text-out=<path>]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 20].
    --grid-height=<h>      The grid height in a w*h grid [default: 20].
    --seed=<s>             Seed for the maze generator. A random seed is used if not given.
    --sampled              Knock down walls by rejection sampling instead of scanning a shuffled wall list.
    --show-path            Mark the solution path on the text rendering: S(tart), E(nd) and dots.
    --text-out=<path>      Output file path for the text rendering of the maze instead of stdout.

Set MAZES_LOG=debug to see generation and solving statistics.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_sampled: bool,
    flag_show_path: bool,
    flag_text_out: String,
}

// Result is a typedef of std `Result` with the error type our own `Error`.
// Library errors convert with `?` through the `links` section.
mod errors {
    error_chain! {
        links {
            Maze(::square_mazes::errors::Error, ::square_mazes::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

quick_main!(run);

fn run() -> Result<()> {

    let log_env = env_logger::Env::new()
        .filter("MAZES_LOG")
        .write_style("MAZES_LOG_STYLE");
    env_logger::init_from_env(log_env);

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());
    debug!("driver arguments: {:?}", args);

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };

    let mut rng = match args.flag_seed {
        Some(seed) => XorShiftRng::seed_from_u64(seed),
        None => XorShiftRng::from_entropy(),
    };

    let mut maze = SquareMaze::new();
    let generated = if args.flag_sampled {
        maze.make_maze_sampled(width, height, &mut rng)
    } else {
        maze.make_maze(width, height, &mut rng)
    };
    generated.chain_err(|| format!("Failed to generate a {}x{} maze", width, height))?;

    let solution = maze.solve();
    info!("{}x{} maze solved in {} steps", width, height, solution.len());

    let text = if args.flag_show_path {
        let display = PathDisplay::new(&solution, maze.width(), maze.grid().size());
        maze.grid().render_text(Some(&display))
    } else {
        format!("{}", maze)
    };
    let solution_codes = solution.iter().map(|dir| dir.code()).join(" ");
    let output = format!("{}solution ({} steps): {}\n", text, solution.len(), solution_codes);

    if args.flag_text_out.is_empty() {
        print!("{}", output);
    } else {
        write_text_to_file(&output, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> Result<()> {
    let path = Path::new(file_name);
    let mut file = File::create(&path)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}
