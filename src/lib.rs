//! Uninformed graph search over 2D text mazes.
//!
//! A [`problems::maze_2d::Maze2DProblem`] is parsed from text, searched with
//! a frontier-driven [`algorithms::graph_search::GraphSearch`] (depth-first
//! with a stack frontier, breadth-first with a queue frontier) and drawn by
//! [`render`].

use shadow_rs::shadow;

shadow!(build);

// Search space and problems
// -------------------------
pub mod problem;
pub mod space;

// Search internals
// ----------------
pub mod frontier;
pub mod search;

// Problems
// --------
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;

// Output
// ------
pub mod render;
