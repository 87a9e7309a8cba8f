//! Frontiers of discovered, not yet expanded, search Nodes.
//!
//! A single `Frontier` type holds the nodes, and an injected
//! [`RemovalOrder`] decides which end they are taken from:
//!
//! - [`Lifo`] takes the newest node (a stack, depth-first search).
//! - [`Fifo`] takes the oldest node (a queue, breadth-first search).

use std::collections::VecDeque;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::search::Node;
use crate::space::Action;
use crate::space::State;

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("frontier is empty")]
pub struct EmptyFrontierError;

/// Which end of the Frontier nodes are removed from.
pub trait RemovalOrder: std::fmt::Debug {
    const NAME: &'static str;

    fn take<T>(nodes: &mut VecDeque<T>) -> Option<T>;
}

/// Last-in-first-out.
#[derive(Copy, Clone, Debug, Default)]
pub struct Lifo;

impl RemovalOrder for Lifo {
    const NAME: &'static str = "LIFO";

    #[inline(always)]
    fn take<T>(nodes: &mut VecDeque<T>) -> Option<T> {
        nodes.pop_back()
    }
}

/// First-in-first-out.
#[derive(Copy, Clone, Debug, Default)]
pub struct Fifo;

impl RemovalOrder for Fifo {
    const NAME: &'static str = "FIFO";

    #[inline(always)]
    fn take<T>(nodes: &mut VecDeque<T>) -> Option<T> {
        nodes.pop_front()
    }
}

pub struct Frontier<St, A, O>
where
    St: State,
    A: Action,
    O: RemovalOrder,
{
    /// Nodes in insertion order.
    nodes: VecDeque<Node<St, A>>,
    /// How many stored nodes hold each state.
    ///
    /// Answers `contains_state` without scanning `nodes`.
    states: FxHashMap<St, usize>,

    _order: PhantomData<O>,
}

pub type StackFrontier<St, A> = Frontier<St, A, Lifo>;
pub type QueueFrontier<St, A> = Frontier<St, A, Fifo>;

impl<St, A, O> Frontier<St, A, O>
where
    St: State,
    A: Action,
    O: RemovalOrder,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: VecDeque::new(),
            states: FxHashMap::default(),
            _order: PhantomData,
        }
    }

    pub fn add(&mut self, node: Node<St, A>) {
        *self.states.entry(node.state).or_default() += 1;
        self.nodes.push_back(node);
        self.verify();
    }

    #[inline(always)]
    #[must_use]
    pub fn contains_state(&self, s: &St) -> bool {
        self.states.contains_key(s)
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Removes the next node according to `O`.
    pub fn remove(&mut self) -> Result<Node<St, A>, EmptyFrontierError> {
        let node = O::take(&mut self.nodes).ok_or(EmptyFrontierError)?;

        debug_assert!(self.states.contains_key(&node.state));
        if let Some(count) = self.states.get_mut(&node.state) {
            *count -= 1;
            if *count == 0 {
                self.states.remove(&node.state);
            }
        }

        self.verify();
        Ok(node)
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify(&self) {
        let mut counts = FxHashMap::<St, usize>::default();
        for n in &self.nodes {
            *counts.entry(n.state).or_default() += 1;
        }
        assert_eq!(counts, self.states, "Frontier state index is out of sync");
    }
}

impl<St, A, O> Default for Frontier<St, A, O>
where
    St: State,
    A: Action,
    O: RemovalOrder,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A, O> std::fmt::Debug for Frontier<St, A, O>
where
    St: State,
    A: Action,
    O: RemovalOrder,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Frontier<{}>{{({} nodes)}}", O::NAME, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchTree;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Cell(u8);
    impl State for Cell {}

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Hop;
    impl Action for Hop {}

    fn fill<O: RemovalOrder>(frontier: &mut Frontier<Cell, Hop, O>) {
        let mut tree = SearchTree::<Cell, Hop>::new();
        let root = tree.push(Node::new_root(Cell(0)));
        for i in 1..=3 {
            frontier.add(Node::new_child(Cell(i), root, Hop));
        }
    }

    #[test]
    fn stack_removes_newest() {
        let mut frontier = StackFrontier::<Cell, Hop>::new();
        fill(&mut frontier);

        assert_eq!(frontier.remove().unwrap().state, Cell(3));
        assert_eq!(frontier.remove().unwrap().state, Cell(2));
        assert_eq!(frontier.remove().unwrap().state, Cell(1));
        assert!(frontier.is_empty());
    }

    #[test]
    fn queue_removes_oldest() {
        let mut frontier = QueueFrontier::<Cell, Hop>::new();
        fill(&mut frontier);

        assert_eq!(frontier.remove().unwrap().state, Cell(1));
        assert_eq!(frontier.remove().unwrap().state, Cell(2));
        assert_eq!(frontier.remove().unwrap().state, Cell(3));
        assert!(frontier.is_empty());
    }

    #[test]
    fn empty_frontier_fails_removal() {
        let mut stack = StackFrontier::<Cell, Hop>::new();
        let mut queue = QueueFrontier::<Cell, Hop>::new();
        assert!(stack.is_empty());
        assert_eq!(stack.remove(), Err(EmptyFrontierError));
        assert_eq!(queue.remove(), Err(EmptyFrontierError));
    }

    #[test]
    fn contains_state_tracks_removals() {
        let mut frontier = QueueFrontier::<Cell, Hop>::new();
        fill(&mut frontier);
        assert_eq!(frontier.len(), 3);
        assert!(frontier.contains_state(&Cell(1)));
        assert!(!frontier.contains_state(&Cell(0)));

        frontier.remove().unwrap();
        assert!(!frontier.contains_state(&Cell(1)));
        assert!(frontier.contains_state(&Cell(2)));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn duplicated_states_stay_visible_until_all_are_removed() {
        let mut frontier = StackFrontier::<Cell, Hop>::new();
        frontier.add(Node::new_root(Cell(5)));
        frontier.add(Node::new_root(Cell(5)));

        frontier.remove().unwrap();
        assert!(frontier.contains_state(&Cell(5)));
        frontier.remove().unwrap();
        assert!(!frontier.contains_state(&Cell(5)));
    }

    #[test]
    fn debug_names_the_order() {
        let frontier = QueueFrontier::<Cell, Hop>::default();
        assert_eq!(format!("{frontier:?}"), "Frontier<FIFO>{(0 nodes)}");
    }
}
