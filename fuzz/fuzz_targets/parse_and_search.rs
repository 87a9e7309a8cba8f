#![no_main]

use libfuzzer_sys::fuzz_target;

use maze_search::algorithms::graph_search::Strategy;
use maze_search::problem::Problem;
use maze_search::problems::maze_2d::Maze2DProblem;
use maze_search::space::Space;

fuzz_target!(|data: &str| {
    let Ok(problem) = Maze2DProblem::try_from(data) else {
        return;
    };
    // Keep instances small enough for the quadratic worst cases.
    let (rows, cols) = problem.space().dimensions();
    if rows * cols > 10_000 {
        return;
    }

    let breadth = Strategy::BreadthFirst.search(&problem);
    let depth = Strategy::DepthFirst.search(&problem);
    assert_eq!(breadth.is_solved(), depth.is_solved());

    if let (Some(shortest), Some(deep)) = (breadth.solution(), depth.solution()) {
        assert!(problem.space().valid_path(shortest));
        assert!(problem.space().valid_path(deep));
        assert!(shortest.len() <= deep.len());
    } else {
        assert_eq!(breadth.num_explored, depth.num_explored);
    }
});
