use std::path::PathBuf;
use std::process::ExitCode;

use anstream::eprintln;
use anstream::print;
use anstream::println;
use clap::Parser;
use hrsw::Stopwatch;
use human_duration::human_duration;
use owo_colors::OwoColorize;
use thiserror::Error;
use thousands::Separable;

use maze_search::algorithms::graph_search::SearchError;
use maze_search::algorithms::graph_search::Strategy;
use maze_search::problems::maze_2d::Maze2DProblem;
use maze_search::problems::maze_2d::Maze2DProblemParseError;
use maze_search::render::DEFAULT_CELL_SIZE;
use maze_search::render::MAX_CELL_SIZE;
use maze_search::render::RenderError;
use maze_search::render::RenderOptions;
use maze_search::render::SolutionDisplay;
use maze_search::render::render_image;
use maze_search::render::save_image;

#[cfg(feature = "mem_profile")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;
#[cfg(all(not(feature = "mem_profile"), not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = maze_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Text maze. 'A' marks the start, 'B' the goal, ' ' is floor and
    /// anything else a wall.
    #[arg()]
    pub maze: PathBuf,

    /// depth-first (stack) or breadth-first (queue).
    #[arg(short, long, env = "MAZE_STRATEGY", default_value_t = Strategy::DepthFirst)]
    pub strategy: Strategy,

    #[arg(short, long, env = "MAZE_OUTPUT", default_value = "maze_solution.png")]
    pub output: PathBuf,

    /// Side of each maze cell in the image, in pixels.
    #[arg(
        long,
        default_value_t = DEFAULT_CELL_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_CELL_SIZE))
    )]
    pub cell_size: u32,

    #[arg(long)]
    pub hide_solution: bool,
    #[arg(long)]
    pub hide_explored: bool,

    /// Also print the solved maze.
    #[arg(long)]
    pub print: bool,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Parse(#[from] Maze2DProblemParseError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

fn run(args: &Args) -> Result<(), CliError> {
    let problem = Maze2DProblem::try_from(args.maze.as_path())?;
    log::info!("Loaded {problem:?} from {:?}", args.maze);

    let mut stopwatch = Stopwatch::new_started();
    let result = args.strategy.search(&problem);
    stopwatch.stop();

    match &result.outcome {
        Ok(path) => {
            println!("{}", "Solution found!".green());
            println!(
                "States explored are: {}",
                result.num_explored.separate_with_commas()
            );
            println!("{path}");
        }
        Err(SearchError::NoSolution { num_explored }) => {
            println!("{}", "No solution found.".yellow());
            println!(
                "States explored are: {}",
                num_explored.separate_with_commas()
            );
        }
        Err(e) => return Err(e.clone().into()),
    }
    println!(
        "{} search took {}",
        args.strategy,
        human_duration(&stopwatch.elapsed())
    );

    if args.print {
        println!();
        print!("{}", SolutionDisplay::new(&problem, result.solution()));
    }

    let options = RenderOptions {
        cell_size: args.cell_size,
        show_solution: !args.hide_solution,
        show_explored: !args.hide_explored,
    };
    let img = render_image(&problem, &result, &options)?;
    save_image(&args.output, &img)?;
    println!("Image written to {:?}", args.output.yellow());

    Ok(())
}


fn main() -> ExitCode {
    #[cfg(feature = "mem_profile")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();
    let args = Args::parse();
    args.color.write_global();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red());
            ExitCode::FAILURE
        }
    }
}
