//! Uninformed graph search.
//!
//! Expands nodes in the order a [`Frontier`] hands them out. With a
//! [`Lifo`] frontier this is depth-first search, with a [`Fifo`] frontier
//! it's breadth-first search.
//!
//! Each run owns its explored set, node arena and outcome, so the Problem is
//! only borrowed and can be searched again.

use std::marker::PhantomData;

use derive_more::Display;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::frontier::EmptyFrontierError;
use crate::frontier::Fifo;
use crate::frontier::Frontier;
use crate::frontier::Lifo;
use crate::frontier::RemovalOrder;
use crate::problem::Problem;
use crate::search::Node;
use crate::search::SearchTree;
use crate::space::Action;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The frontier ran out before reaching the goal.
    #[error("no solution available ({num_explored} states explored)")]
    NoSolution { num_explored: usize },
    /// The engine removed from an empty frontier. This is a bug.
    #[error("search engine bug: {0}")]
    EmptyFrontier(#[from] EmptyFrontierError),
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum SearchStatus {
    #[display("init")]
    Init,
    #[display("running")]
    Running,
    #[display("solved")]
    Solved,
    #[display("failed")]
    Failed,
}

impl SearchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchStatus::Solved | SearchStatus::Failed)
    }
}

/// Everything a finished search leaves behind.
#[derive(Clone, Debug)]
pub struct SearchResult<St, A>
where
    St: State,
    A: Action,
{
    /// States that were expanded.
    pub explored: FxHashSet<St>,
    /// Nodes removed from the frontier, the goal node included.
    pub num_explored: usize,
    pub outcome: Result<Path<St, A>, SearchError>,
}

impl<St, A> SearchResult<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    pub fn solution(&self) -> Option<&Path<St, A>> {
        self.outcome.as_ref().ok()
    }

    #[inline(always)]
    pub fn is_solved(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub struct GraphSearch<'p, O, P, Sp, St, A>
where
    O: RemovalOrder,
    P: Problem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    problem: &'p P,

    /// Discovered nodes waiting for expansion.
    frontier: Frontier<St, A, O>,
    /// Expanded nodes. Frontier nodes reference their parents here.
    search_tree: SearchTree<St, A>,
    /// States that were expanded. Never re-added to the frontier.
    explored: FxHashSet<St>,
    num_explored: usize,

    status: SearchStatus,
    outcome: Option<Result<Path<St, A>, SearchError>>,

    _phantom_space: PhantomData<Sp>,
}

impl<'p, O, P, Sp, St, A> GraphSearch<'p, O, P, Sp, St, A>
where
    O: RemovalOrder,
    P: Problem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    /// Initialises the Search with the start state in the frontier.
    #[must_use]
    pub fn new(problem: &'p P) -> Self {
        log::debug!("Searching {problem:?} with a {} frontier", O::NAME);

        let mut frontier = Frontier::<St, A, O>::new();
        frontier.add(Node::new_root(problem.start()));

        Self {
            problem,
            frontier,
            search_tree: SearchTree::new(),
            explored: FxHashSet::default(),
            num_explored: 0,
            status: SearchStatus::Init,
            outcome: None,
            _phantom_space: PhantomData,
        }
    }

    /// Runs the search until it's solved or the frontier is exhausted.
    ///
    /// Once finished, calling this again returns the same outcome.
    pub fn run(&mut self) -> Result<Path<St, A>, SearchError> {
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    /// Expands a single node.
    ///
    /// Returns the outcome once the search reaches a terminal status, and
    /// `None` while it's still running.
    pub fn step(&mut self) -> Option<Result<Path<St, A>, SearchError>> {
        if let Some(outcome) = &self.outcome {
            return Some(outcome.clone());
        }
        self.status = SearchStatus::Running;

        if self.frontier.is_empty() {
            return Some(self.finish(Err(SearchError::NoSolution {
                num_explored: self.num_explored,
            })));
        }

        #[cfg(feature = "coz_profile")]
        coz::scope!("NodeExpansion");

        let node = match self.frontier.remove() {
            Ok(node) => node,
            Err(e) => return Some(self.finish(Err(e.into()))),
        };
        self.num_explored += 1;
        let state = *node.state();
        let node_index = self.search_tree.push(node);

        if self.problem.is_goal(&state) {
            #[cfg(feature = "coz_profile")]
            coz::progress!("GoalFound");
            let path = self.search_tree.path(node_index);
            return Some(self.finish(Ok(path)));
        }

        self.explored.insert(state);
        let neighbours = self
            .problem
            .space()
            .unexplored_neighbours(&state, &self.explored);
        log::trace!(
            "Expanding {state:?} (#{}), {} neighbours",
            self.num_explored,
            neighbours.len()
        );
        for (s, a) in neighbours {
            debug_assert!(!self.explored.contains(&s));
            if !self.frontier.contains_state(&s) {
                self.frontier.add(Node::new_child(s, node_index, a));
            }
        }

        None
    }

    fn finish(
        &mut self,
        outcome: Result<Path<St, A>, SearchError>,
    ) -> Result<Path<St, A>, SearchError> {
        match &outcome {
            Ok(path) => {
                self.status = SearchStatus::Solved;
                log::debug!(
                    "Solved after exploring {} states: {path}",
                    self.num_explored
                );
            }
            Err(e) => {
                self.status = SearchStatus::Failed;
                log::debug!("Search failed: {e}");
            }
        }
        self.outcome = Some(outcome.clone());
        outcome
    }

    #[inline(always)]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    #[inline(always)]
    pub fn explored(&self) -> &FxHashSet<St> {
        &self.explored
    }

    #[inline(always)]
    pub fn num_explored(&self) -> usize {
        self.num_explored
    }

    #[inline(always)]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Finishes the search, if needed, and hands over its results.
    pub fn into_result(mut self) -> SearchResult<St, A> {
        let outcome = self.run();
        SearchResult {
            explored: self.explored,
            num_explored: self.num_explored,
            outcome,
        }
    }
}

impl<O, P, Sp, St, A> std::fmt::Debug for GraphSearch<'_, O, P, Sp, St, A>
where
    O: RemovalOrder,
    P: Problem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("GraphSearch")
            .field("status", &self.status)
            .field("frontier", &self.frontier)
            .field("search_tree", &self.search_tree)
            .field("num_explored", &self.num_explored)
            .finish()
    }
}

/// Searches a Problem to completion with the `O` removal order.
pub fn search<O, P, Sp, St, A>(problem: &P) -> SearchResult<St, A>
where
    O: RemovalOrder,
    P: Problem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    GraphSearch::<O, P, Sp, St, A>::new(problem).into_result()
}

/// Frontier choice made at runtime.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
pub enum Strategy {
    /// Stack frontier. Finds some path, not necessarily a short one.
    #[default]
    #[display("depth-first")]
    DepthFirst,
    /// Queue frontier. Finds a shortest path.
    #[display("breadth-first")]
    BreadthFirst,
}

impl Strategy {
    pub fn search<P, Sp, St, A>(self, problem: &P) -> SearchResult<St, A>
    where
        P: Problem<Sp, St, A>,
        Sp: Space<St, A>,
        St: State,
        A: Action,
    {
        match self {
            Strategy::DepthFirst => search::<Lifo, P, Sp, St, A>(problem),
            Strategy::BreadthFirst => search::<Fifo, P, Sp, St, A>(problem),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown strategy '{0}' (expected 'depth-first' or 'breadth-first')")]
pub struct StrategyParseError(String);

impl std::str::FromStr for Strategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "depth-first" | "dfs" | "stack" => Ok(Strategy::DepthFirst),
            "breadth-first" | "bfs" | "queue" => Ok(Strategy::BreadthFirst),
            _ => Err(StrategyParseError(s.to_string())),
        }
    }
}
