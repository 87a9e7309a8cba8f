//! Drawing of solved mazes.
//!
//! Cells are coloured by priority: walls, then start and goal, then the
//! solution path, then explored cells.

use std::path::Path as FsPath;

use image::Rgb;
use image::RgbImage;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::algorithms::graph_search::SearchResult;
use crate::problem::Problem;
use crate::problems::maze_2d::Maze2DAction;
use crate::problems::maze_2d::Maze2DProblem;
use crate::problems::maze_2d::Maze2DState;
use crate::space::Path;

pub const DEFAULT_CELL_SIZE: u32 = 50;
/// Largest cell side accepted, in pixels.
pub const MAX_CELL_SIZE: u32 = 1_000;
/// Largest raster `render_image` allocates, in bytes.
pub const MAX_IMAGE_BYTES: u64 = 1 << 30;

const BYTES_PER_PIXEL: u64 = 3;

pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
pub const WALL: Rgb<u8> = Rgb([128, 128, 128]);
pub const START: Rgb<u8> = Rgb([0, 128, 0]);
pub const GOAL: Rgb<u8> = Rgb([255, 0, 0]);
pub const SOLUTION: Rgb<u8> = Rgb([255, 215, 0]);
pub const EXPLORED: Rgb<u8> = Rgb([255, 255, 0]);

const SOLUTION_GLYPH: char = '*';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Side of each cell, in pixels.
    pub cell_size: u32,
    pub show_solution: bool,
    pub show_explored: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            show_solution: true,
            show_explored: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cell size must be at least 1px")]
    EmptyCells,
    #[error("A {rows}x{cols} maze with {cell_size}px cells does not fit in an image")]
    TooLarge {
        rows: usize,
        cols: usize,
        cell_size: u32,
    },
    #[error("Image error when saving '{p}': {e}")]
    ImageError {
        p: std::path::PathBuf,
        e: image::ImageError,
    },
}

/// Draws a maze and what a search found on it.
pub fn render_image(
    problem: &Maze2DProblem,
    result: &SearchResult<Maze2DState, Maze2DAction>,
    options: &RenderOptions,
) -> Result<RgbImage, RenderError> {
    let space = problem.space();
    let (rows, cols) = space.dimensions();
    let cell_size = options.cell_size;
    if cell_size == 0 {
        return Err(RenderError::EmptyCells);
    }
    let too_large = || RenderError::TooLarge {
        rows,
        cols,
        cell_size,
    };
    let width = u32::try_from(cols)
        .ok()
        .and_then(|c| c.checked_mul(cell_size))
        .ok_or_else(too_large)?;
    let height = u32::try_from(rows)
        .ok()
        .and_then(|r| r.checked_mul(cell_size))
        .ok_or_else(too_large)?;
    if u64::from(width) * u64::from(height) * BYTES_PER_PIXEL > MAX_IMAGE_BYTES {
        return Err(too_large());
    }

    let solution: FxHashSet<Maze2DState> = match result.solution() {
        Some(path) if options.show_solution => path.cells.iter().copied().collect(),
        _ => FxHashSet::default(),
    };

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    for row in 0..rows {
        for col in 0..cols {
            let s = Maze2DState::new(row, col);
            let colour = if space.is_wall(&s) {
                WALL
            } else if s == problem.start() {
                START
            } else if s == problem.goal() {
                GOAL
            } else if solution.contains(&s) {
                SOLUTION
            } else if options.show_explored && result.explored.contains(&s) {
                EXPLORED
            } else {
                continue;
            };
            // Both fit in u32 since `width` and `height` did.
            fill_cell(&mut img, row as u32, col as u32, cell_size, colour);
        }
    }

    Ok(img)
}

fn fill_cell(img: &mut RgbImage, row: u32, col: u32, cell_size: u32, colour: Rgb<u8>) {
    for y in row * cell_size..(row + 1) * cell_size {
        for x in col * cell_size..(col + 1) * cell_size {
            img.put_pixel(x, y, colour);
        }
    }
}

pub fn save_image(p: &FsPath, img: &RgbImage) -> Result<(), RenderError> {
    img.save(p).map_err(|e| RenderError::ImageError {
        p: p.to_path_buf(),
        e,
    })
}

/// Text view of a maze with its solution marked by `*`.
pub struct SolutionDisplay<'a> {
    problem: &'a Maze2DProblem,
    solution: Option<&'a Path<Maze2DState, Maze2DAction>>,
}

impl<'a> SolutionDisplay<'a> {
    pub fn new(
        problem: &'a Maze2DProblem,
        solution: Option<&'a Path<Maze2DState, Maze2DAction>>,
    ) -> Self {
        Self { problem, solution }
    }
}

impl std::fmt::Display for SolutionDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let text = self.problem.to_string();
        let cells: FxHashSet<Maze2DState> = self
            .solution
            .map(|p| p.cells.iter().copied().collect())
            .unwrap_or_default();

        for (row, line) in text.lines().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let s = Maze2DState::new(row, col);
                if ch == ' ' && cells.contains(&s) {
                    write!(f, "{SOLUTION_GLYPH}")?;
                } else {
                    write!(f, "{ch}")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::algorithms::graph_search::Strategy;

    const MAZE: &str = "A  \n ^ \n  B";

    fn solve(strategy: Strategy) -> (Maze2DProblem, SearchResult<Maze2DState, Maze2DAction>) {
        let p = Maze2DProblem::try_from(MAZE).unwrap();
        let result = strategy.search(&p);
        (p, result)
    }

    fn cell_colour(img: &RgbImage, row: u32, col: u32, cell_size: u32) -> Rgb<u8> {
        // Sample the middle, as edges are shared with neighbours.
        *img.get_pixel(col * cell_size + cell_size / 2, row * cell_size + cell_size / 2)
    }

    #[test]
    fn colours_cells_by_priority() {
        let (p, result) = solve(Strategy::BreadthFirst);
        let options = RenderOptions {
            cell_size: 4,
            show_solution: true,
            show_explored: true,
        };
        let img = render_image(&p, &result, &options).unwrap();

        assert_eq!(img.dimensions(), (12, 12));
        assert_eq!(cell_colour(&img, 0, 0, 4), START);
        assert_eq!(cell_colour(&img, 2, 2, 4), GOAL);
        assert_eq!(cell_colour(&img, 1, 1, 4), WALL);
        // down, down, right, right
        assert_eq!(cell_colour(&img, 1, 0, 4), SOLUTION);
        assert_eq!(cell_colour(&img, 2, 0, 4), SOLUTION);
        assert_eq!(cell_colour(&img, 2, 1, 4), SOLUTION);
        assert_eq!(cell_colour(&img, 0, 1, 4), EXPLORED);
        assert_eq!(cell_colour(&img, 1, 2, 4), EXPLORED);
    }

    #[test]
    fn overlays_can_be_hidden() {
        let (p, result) = solve(Strategy::BreadthFirst);
        let options = RenderOptions {
            cell_size: 2,
            show_solution: false,
            show_explored: false,
        };
        let img = render_image(&p, &result, &options).unwrap();

        assert_eq!(cell_colour(&img, 1, 0, 2), BACKGROUND);
        assert_eq!(cell_colour(&img, 0, 1, 2), BACKGROUND);
        assert_eq!(cell_colour(&img, 0, 0, 2), START);
    }

    #[test]
    fn unsolved_mazes_still_show_explored_cells() {
        let p = Maze2DProblem::try_from("A #B").unwrap();
        let result = Strategy::DepthFirst.search(&p);
        assert!(!result.is_solved());

        let options = RenderOptions {
            cell_size: 1,
            show_solution: true,
            show_explored: true,
        };
        let img = render_image(&p, &result, &options).unwrap();
        assert_eq!(*img.get_pixel(1, 0), EXPLORED);
        assert_eq!(*img.get_pixel(2, 0), WALL);
        assert_eq!(*img.get_pixel(3, 0), GOAL);
    }

    #[test]
    fn oversized_images_are_refused() {
        let (p, result) = solve(Strategy::DepthFirst);
        let options = RenderOptions {
            cell_size: u32::MAX,
            ..RenderOptions::default()
        };
        assert!(matches!(
            render_image(&p, &result, &options),
            Err(RenderError::TooLarge { rows: 3, cols: 3, .. })
        ));
    }

    #[test]
    fn images_over_the_byte_budget_are_refused() {
        let (p, result) = solve(Strategy::DepthFirst);
        // 60000px per side fits in u32, but not in memory.
        let options = RenderOptions {
            cell_size: 20_000,
            ..RenderOptions::default()
        };
        assert!(matches!(
            render_image(&p, &result, &options),
            Err(RenderError::TooLarge {
                rows: 3,
                cols: 3,
                cell_size: 20_000
            })
        ));

        let options = RenderOptions {
            cell_size: MAX_CELL_SIZE,
            ..RenderOptions::default()
        };
        let img = render_image(&p, &result, &options).unwrap();
        assert_eq!(img.dimensions(), (3 * MAX_CELL_SIZE, 3 * MAX_CELL_SIZE));
    }

    #[test]
    fn zero_sized_cells_are_refused() {
        let (p, result) = solve(Strategy::BreadthFirst);
        let options = RenderOptions {
            cell_size: 0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            render_image(&p, &result, &options),
            Err(RenderError::EmptyCells)
        ));
    }

    #[test]
    fn text_view_marks_the_solution() {
        let (p, result) = solve(Strategy::DepthFirst);
        let text = SolutionDisplay::new(&p, result.solution()).to_string();
        assert_eq!(
            text,
            indoc! {"
                A**
                 #*
                  B
            "}
        );

        let text = SolutionDisplay::new(&p, None).to_string();
        assert_eq!(text, p.to_string());
    }
}
