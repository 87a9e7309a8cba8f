use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}

/// Neighbours that fit inline before spilling to the heap.
///
/// Orthogonal grids never produce more than 4.
pub const INLINE_NEIGHBOURS: usize = 4;

/// Successors of a state, in expansion order.
pub type Neighbours<St, A> = SmallVec<[(St, A); INLINE_NEIGHBOURS]>;

const MAX_ACTIONS_DISPLAYED: usize = 20;

/// A solution from a start state.
///
/// `actions[i]` leads into `cells[i]`, so the start is excluded from `cells`
/// and the last cell is where the path ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<S, A>
where
    S: State,
    A: Action,
{
    pub start: S,
    pub actions: Vec<A>,
    pub cells: Vec<S>,
}

impl<S, A> Path<S, A>
where
    S: State,
    A: Action,
{
    #[inline(always)]
    pub fn new_from_start(start: S) -> Self {
        Self {
            start,
            actions: vec![],
            cells: vec![],
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of actions (and cells) in the path.
    #[inline(always)]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.actions.len(), self.cells.len());
        self.actions.len()
    }

    /// The state reached after following every action.
    pub fn end(&self) -> S {
        self.cells.last().copied().unwrap_or(self.start)
    }

    #[inline(always)]
    pub fn append(&mut self, a: A, s: S) {
        self.actions.push(a);
        self.cells.push(s);
    }

    /// Iterates over `(action, cell)` pairs from start to end.
    pub fn steps(&self) -> impl Iterator<Item = (A, S)> + '_ {
        self.actions.iter().copied().zip(self.cells.iter().copied())
    }
}

impl<S, A> std::fmt::Display for Path<S, A>
where
    S: State,
    A: Action,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Path({}, {:?}:{:?}:{:?})",
            self.len(),
            self.start,
            self.actions
                .iter()
                .take(MAX_ACTIONS_DISPLAYED)
                .collect::<Vec<_>>(),
            self.end()
        )
    }
}

pub trait Space<St, A>: Clone + std::fmt::Debug
where
    St: State,
    A: Action,
{
    /// Applies an action, if it leads to a valid state.
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    /// Expands a State into its reachable successors.
    fn neighbours(&self, s: &St) -> Neighbours<St, A>;

    /// Whether a State is valid.
    fn valid(&self, s: &St) -> bool;

    /// Expands a State, dropping successors that were already explored.
    ///
    /// Keeps the order given by `neighbours`.
    fn unexplored_neighbours(&self, s: &St, explored: &FxHashSet<St>) -> Neighbours<St, A> {
        let mut v = self.neighbours(s);
        v.retain(|(n, _a)| !explored.contains(n));
        v
    }

    /// Replays a Path checking every step is a legal move.
    fn valid_path(&self, p: &Path<St, A>) -> bool {
        if !self.valid(&p.start) || p.actions.len() != p.cells.len() {
            return false;
        }

        let mut state: St = p.start;
        for (a, cell) in p.steps() {
            let Some(next) = self.apply(&state, &a) else {
                return false;
            };
            if next != cell || !self.neighbours(&state).contains(&(next, a)) {
                return false;
            }
            state = next;
        }
        state == p.end()
    }

    fn size(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Step(i8);
    impl Action for Step {}

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Pos(i8);
    impl State for Pos {}

    #[test]
    fn empty_path_ends_at_start() {
        let p = Path::<Pos, Step>::new_from_start(Pos(3));
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);
        assert_eq!(p.end(), Pos(3));
    }

    #[test]
    fn steps_pair_actions_with_cells() {
        let mut p = Path::<Pos, Step>::new_from_start(Pos(0));
        p.append(Step(1), Pos(1));
        p.append(Step(1), Pos(2));
        p.append(Step(-1), Pos(1));

        assert_eq!(p.len(), 3);
        assert_eq!(p.end(), Pos(1));
        assert_eq!(
            p.steps().collect::<Vec<_>>(),
            vec![(Step(1), Pos(1)), (Step(1), Pos(2)), (Step(-1), Pos(1))]
        );
        assert_eq!(
            p.to_string(),
            "Path(3, Pos(0):[Step(1), Step(1), Step(-1)]:Pos(1))"
        );
    }
}
