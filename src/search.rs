use nonmax::NonMaxUsize;

use crate::space::Action;
use crate::space::Path;
use crate::space::State;

/// A reference to a `Node<St, A>` stored in a `SearchTree<St, A>`.
///
/// Parents are referenced by index rather than by pointer, so nodes stay
/// reachable after the frontier drops them. Being `NonMax` keeps
/// `Option<(SearchTreeIndex, A)>` as small as the index itself for small
/// actions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SearchTreeIndex {
    index: NonMaxUsize,
}

impl SearchTreeIndex {
    #[inline(always)]
    fn new(index: usize) -> Self {
        debug_assert!(index != usize::MAX);
        // SAFETY: Vec lengths are bounded by isize::MAX, so no arena slot can
        // be usize::MAX.
        let index = unsafe { NonMaxUsize::new_unchecked(index) };
        Self { index }
    }

    #[inline(always)]
    pub fn get(&self) -> usize {
        self.index.get()
    }
}

/// A search state, how it was reached, and from where.
///
/// Only the root has no parent, and it's also the only node without an
/// action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Node<St, A>
where
    St: State,
    A: Action,
{
    pub(crate) state: St,
    pub(crate) parent: Option<(SearchTreeIndex, A)>,
}

impl<St, A> Node<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    pub fn new_root(state: St) -> Self {
        Self {
            state,
            parent: None,
        }
    }

    #[inline(always)]
    pub fn new_child(state: St, parent: SearchTreeIndex, action: A) -> Self {
        Self {
            state,
            parent: Some((parent, action)),
        }
    }

    #[inline(always)]
    pub fn state(&self) -> &St {
        &self.state
    }

    #[inline(always)]
    pub fn action(&self) -> Option<A> {
        self.parent.map(|(_, a)| a)
    }

    #[inline(always)]
    pub fn parent(&self) -> Option<SearchTreeIndex> {
        self.parent.map(|(p, _)| p)
    }

    #[inline(always)]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena of expanded Nodes.
///
/// Grows monotonically during a search; nodes are never removed, so every
/// `SearchTreeIndex` it hands out stays valid.
pub struct SearchTree<St, A>
where
    St: State,
    A: Action,
{
    nodes: Vec<Node<St, A>>,
}

impl<St, A> SearchTree<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![] }
    }

    #[inline(always)]
    pub fn push(&mut self, node: Node<St, A>) -> SearchTreeIndex {
        debug_assert!(
            node.parent().is_none_or(|p| p.get() < self.nodes.len()),
            "Parents must be stored before their children"
        );
        let index = SearchTreeIndex::new(self.nodes.len());
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reconstructs the Path from the root to a Node by walking its parents.
    #[must_use]
    pub fn path(&self, mut node_index: SearchTreeIndex) -> Path<St, A> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("PathReconstruction");

        let mut steps = Vec::<(A, St)>::new();
        while let Some((parent_index, a)) = self[node_index].parent {
            debug_assert!(parent_index.get() < node_index.get());
            steps.push((a, self[node_index].state));
            node_index = parent_index;
        }
        debug_assert!(self[node_index].is_root());

        let mut path = Path::<St, A>::new_from_start(self[node_index].state);
        for (a, s) in steps.into_iter().rev() {
            path.append(a, s);
        }
        path
    }
}

impl<St, A> Default for SearchTree<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A> std::ops::Index<SearchTreeIndex> for SearchTree<St, A>
where
    St: State,
    A: Action,
{
    type Output = Node<St, A>;

    #[inline(always)]
    fn index(&self, index: SearchTreeIndex) -> &Self::Output {
        &self.nodes[index.get()]
    }
}

impl<St, A> std::fmt::Debug for SearchTree<St, A>
where
    St: State,
    A: Action,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
