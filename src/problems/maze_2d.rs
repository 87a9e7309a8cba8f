use derive_more::Display;
use thiserror::Error;

use crate::problem::Problem;
use crate::space::Action;
use crate::space::Neighbours;
use crate::space::Space;
use crate::space::State;

const RANDOM_STATE_MAX_TRIES: usize = 10_000;

/// Marks the start cell in text mazes.
pub const START: char = 'A';
/// Marks the goal cell in text mazes.
pub const GOAL: char = 'B';

pub type Coord = usize;

/// A cell, addressed as (row, column) from the top-left corner.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({row},{col})")]
pub struct Maze2DState {
    pub row: Coord,
    pub col: Coord,
}

impl Maze2DState {
    #[inline(always)]
    pub const fn new(row: Coord, col: Coord) -> Maze2DState {
        Maze2DState { row, col }
    }

    /// Whether both states share an edge.
    pub fn is_adjacent(&self, other: &Maze2DState) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}
impl State for Maze2DState {}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Maze2DAction {
    #[display("up")]
    Up, // row--
    #[display("down")]
    Down, // row++
    #[display("left")]
    Left, // col--
    #[display("right")]
    Right, // col++
}
impl Action for Maze2DAction {}

impl Maze2DAction {
    /// Expansion order.
    ///
    /// Ties between equally good successors are broken by this order, which
    /// decides the path depth-first search finds.
    pub const ALL: [Maze2DAction; 4] = [
        Maze2DAction::Up,
        Maze2DAction::Down,
        Maze2DAction::Left,
        Maze2DAction::Right,
    ];
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Maze2DCell {
    #[display(" ")]
    Empty,
    #[display("#")]
    Wall,
}

impl std::convert::From<char> for Maze2DCell {
    /// Everything that isn't floor is a wall.
    fn from(ch: char) -> Self {
        match ch {
            ' ' | START | GOAL => Maze2DCell::Empty,
            _ => Maze2DCell::Wall,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Maze2DSpace {
    pub(crate) map: Vec<Vec<Maze2DCell>>,
}

impl Maze2DSpace {
    /// Builds a Space from rows of cells.
    ///
    /// Short rows are padded with floor so the map is rectangular.
    pub fn new_from_map(mut map: Vec<Vec<Maze2DCell>>) -> Self {
        let cols = map.iter().map(Vec::len).max().unwrap_or(0);
        for row in map.iter_mut() {
            row.resize(cols, Maze2DCell::Empty);
        }
        Self { map }
    }
    pub(crate) fn new_empty_with_dimensions(rows: usize, cols: usize) -> Self {
        Self {
            map: vec![vec![Maze2DCell::Empty; cols]; rows],
        }
    }

    /// Builds a random Space where each cell is a wall with probability
    /// `wall_ratio`.
    pub fn new_random<R: rand::Rng>(r: &mut R, rows: usize, cols: usize, wall_ratio: f64) -> Self {
        let wall_ratio = wall_ratio.clamp(0.0, 1.0);
        let map = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| {
                        if r.random_bool(wall_ratio) {
                            Maze2DCell::Wall
                        } else {
                            Maze2DCell::Empty
                        }
                    })
                    .collect()
            })
            .collect();
        Self { map }
    }

    /// (rows, columns)
    pub fn dimensions(&self) -> (usize, usize) {
        if self.map.is_empty() {
            return (0, 0);
        }
        (self.map.len(), self.map[0].len())
    }

    #[inline(always)]
    fn at(&self, state: &Maze2DState) -> Maze2DCell {
        debug_assert!(self.valid(state));
        self.map[state.row][state.col]
    }

    /// Whether a state is impassable.
    ///
    /// States outside the map are walls.
    #[inline(always)]
    pub fn is_wall(&self, state: &Maze2DState) -> bool {
        !self.valid(state) || self.at(state) == Maze2DCell::Wall
    }

    pub(crate) fn set(&mut self, state: &Maze2DState, cell: Maze2DCell) {
        debug_assert!(self.valid(state));
        self.map[state.row][state.col] = cell;
    }

    /// The wall matrix, `true` meaning impassable.
    pub fn walls(&self) -> Vec<Vec<bool>> {
        self.map
            .iter()
            .map(|line| line.iter().map(|c| *c == Maze2DCell::Wall).collect())
            .collect()
    }

    /// Number of cells that are not walls.
    pub fn num_open_cells(&self) -> usize {
        self.map
            .iter()
            .flatten()
            .filter(|c| **c == Maze2DCell::Empty)
            .count()
    }

    pub fn random_state<R: rand::Rng>(&self, r: &mut R) -> Option<Maze2DState> {
        let (rows, cols) = self.dimensions();
        if rows == 0 || cols == 0 {
            return None;
        }

        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let s = Maze2DState::new(r.random_range(0..rows), r.random_range(0..cols));
            if self.at(&s) == Maze2DCell::Empty {
                return Some(s);
            }
        }

        None
    }
}

impl Space<Maze2DState, Maze2DAction> for Maze2DSpace {
    #[inline(always)]
    fn apply(&self, state: &Maze2DState, action: &Maze2DAction) -> Option<Maze2DState> {
        let Maze2DState { row, col } = *state;

        // Going off the top or left edge wraps to Coord::MAX, which fails
        // the bounds check.
        #[rustfmt::skip]
        let s = match action {
            Maze2DAction::Up    => Maze2DState::new(row.wrapping_sub(1), col),
            Maze2DAction::Down  => Maze2DState::new(row.wrapping_add(1), col),
            Maze2DAction::Left  => Maze2DState::new(row, col.wrapping_sub(1)),
            Maze2DAction::Right => Maze2DState::new(row, col.wrapping_add(1)),
        };

        self.valid(&s).then_some(s)
    }

    #[inline(always)]
    fn valid(&self, state: &Maze2DState) -> bool {
        let (rows, cols) = self.dimensions();
        state.row < rows && state.col < cols
    }

    /// Gets the passable neighbours of a given position.
    ///
    /// NOTE: These states can only be used with the current Maze
    fn neighbours(&self, state: &Maze2DState) -> Neighbours<Maze2DState, Maze2DAction> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("StateExpansion");

        let mut v = Neighbours::<Maze2DState, Maze2DAction>::new();
        for action in Maze2DAction::ALL {
            if let Some(s) = self.apply(state, &action) {
                if self.at(&s) != Maze2DCell::Wall {
                    v.push((s, action));
                }
            }
        }
        v
    }

    fn size(&self) -> Option<usize> {
        let (rows, cols) = self.dimensions();
        Some(rows * cols)
    }
}

impl std::fmt::Display for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for line in &self.map {
            for cell in line {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Maze2D{:?}", self.dimensions())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Maze2DProblem {
    space: Maze2DSpace,
    start: Maze2DState,
    goal: Maze2DState,
}

impl Maze2DProblem {
    /// Builds a Problem, clearing the start and goal cells.
    ///
    /// Returns `None` if either state is off the map.
    pub fn new(mut space: Maze2DSpace, start: Maze2DState, goal: Maze2DState) -> Option<Self> {
        if !space.valid(&start) || !space.valid(&goal) {
            return None;
        }
        space.set(&start, Maze2DCell::Empty);
        space.set(&goal, Maze2DCell::Empty);

        Some(Maze2DProblem { space, start, goal })
    }

    /// Builds a random Problem with distinct start and goal cells.
    ///
    /// The start and goal may not be connected.
    pub fn new_random<R: rand::Rng>(
        r: &mut R,
        rows: usize,
        cols: usize,
        wall_ratio: f64,
    ) -> Option<Maze2DProblem> {
        let space = Maze2DSpace::new_random(r, rows, cols, wall_ratio);
        let start = space.random_state(r)?;

        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let goal = space.random_state(r)?;
            if goal != start {
                return Maze2DProblem::new(space, start, goal);
            }
        }

        None
    }
}

impl Problem<Maze2DSpace, Maze2DState, Maze2DAction> for Maze2DProblem {
    fn space(&self) -> &Maze2DSpace {
        &self.space
    }
    fn start(&self) -> Maze2DState {
        self.start
    }
    fn goal(&self) -> Maze2DState {
        self.goal
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq)]
pub enum Maze2DProblemCell {
    Cell(Maze2DCell),
    #[display("A")]
    Start,
    #[display("B")]
    Goal,
}

impl std::convert::From<char> for Maze2DProblemCell {
    fn from(ch: char) -> Self {
        match ch {
            START => Maze2DProblemCell::Start,
            GOAL => Maze2DProblemCell::Goal,
            ch => Maze2DProblemCell::Cell(Maze2DCell::from(ch)),
        }
    }
}

/// The start or goal markers don't appear exactly once.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum MalformedMaze {
    #[error("Maze must have exactly one starting point 'A' (found {found})")]
    Start { found: usize },
    #[error("Maze must have exactly one ending point 'B' (found {found})")]
    Goal { found: usize },
}

#[derive(Debug, Error)]
pub enum Maze2DProblemParseError {
    #[error("Malformed maze: {0}")]
    MalformedMaze(#[from] MalformedMaze),
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
}

impl std::convert::TryFrom<&str> for Maze2DProblem {
    type Error = Maze2DProblemParseError;

    /// Parses a text maze.
    ///
    /// Rows may have different lengths, missing cells are floor.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let found = s.chars().filter(|ch| *ch == START).count();
        if found != 1 {
            return Err(MalformedMaze::Start { found }.into());
        }
        let found = s.chars().filter(|ch| *ch == GOAL).count();
        if found != 1 {
            return Err(MalformedMaze::Goal { found }.into());
        }

        let lines: Vec<&str> = s.lines().collect();
        let max_row = lines.len();
        let max_col = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut space = Maze2DSpace::new_empty_with_dimensions(max_row, max_col);
        let mut start = None;
        let mut goal = None;

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let s = Maze2DState::new(row, col);
                let cell = match Maze2DProblemCell::from(ch) {
                    Maze2DProblemCell::Start => {
                        start = Some(s);
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Goal => {
                        goal = Some(s);
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Cell(c) => c,
                };
                space.set(&s, cell);
            }
        }

        let start = start.ok_or(MalformedMaze::Start { found: 0 })?;
        let goal = goal.ok_or(MalformedMaze::Goal { found: 0 })?;
        Ok(Maze2DProblem { space, start, goal })
    }
}

impl std::convert::TryFrom<&std::path::Path> for Maze2DProblem {
    type Error = Maze2DProblemParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        let content =
            std::fs::read_to_string(p).map_err(|e| Maze2DProblemParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?;

        Maze2DProblem::try_from(content.as_str())
    }
}

impl std::fmt::Display for Maze2DProblem {
    /// Writes the maze back in its text format.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (row, line) in self.space.map.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                let s = Maze2DState::new(row, col);
                if s == self.start {
                    write!(f, "{}", Maze2DProblemCell::Start)?;
                } else if s == self.goal {
                    write!(f, "{}", Maze2DProblemCell::Goal)?;
                } else {
                    write!(f, "{cell}")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Maze2DProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Maze2DProblem({:?}, s:{}, g:{})",
            self.space, self.start, self.goal
        )
    }
}
