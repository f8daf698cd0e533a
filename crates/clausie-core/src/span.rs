//! Spans into a token graph
//!
//! A span is a contiguous `[start, end)` token range plus a designated
//! root token inside that range. Spans borrow the graph they point into,
//! so no span can outlive its `TokenGraph`.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::graph::{Token, TokenGraph};
use crate::{ClausieError, Result};

/// Contiguous token range with a designated root
///
/// Equality, ordering and hashing look at `(start, end, root)` only; spans
/// are meant to be compared within a single graph.
#[derive(Clone, Copy)]
pub struct Span<'g> {
    graph: &'g TokenGraph,
    start: usize,
    end: usize,
    root: usize,
}

impl<'g> Span<'g> {
    /// Create a span with an explicit root. Fails when the range is
    /// inverted or out of the graph, or the root lies outside it.
    pub fn new(graph: &'g TokenGraph, start: usize, end: usize, root: usize) -> Result<Self> {
        if start > end {
            return Err(ClausieError::structural(format!(
                "span start {start} is past its end {end}"
            )));
        }
        if end > graph.len() {
            return Err(ClausieError::structural(format!(
                "span [{start}, {end}) exceeds the graph of {} tokens",
                graph.len()
            )));
        }
        if root < start || root >= end {
            return Err(ClausieError::structural(format!(
                "span root {root} lies outside [{start}, {end})"
            )));
        }
        Ok(Self {
            graph,
            start,
            end,
            root,
        })
    }

    /// Create a span whose root is computed from the tree
    pub fn from_range(graph: &'g TokenGraph, start: usize, end: usize) -> Result<Self> {
        let root = graph.span_root(start, end).ok_or_else(|| {
            ClausieError::structural(format!(
                "span [{start}, {end}) is empty or exceeds the graph of {} tokens",
                graph.len()
            ))
        })?;
        Self::new(graph, start, end, root)
    }

    /// Single-token span
    pub fn single(graph: &'g TokenGraph, index: usize) -> Result<Self> {
        Self::new(graph, index, index + 1, index)
    }

    /// Span over the token's entire subtree, rooted at the token
    pub fn subtree(graph: &'g TokenGraph, index: usize) -> Result<Self> {
        graph.get(index)?;
        let (start, end) = graph.subtree_bounds(index);
        Self::new(graph, start, end, index)
    }

    pub fn graph(&self) -> &'g TokenGraph {
        self.graph
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn root_index(&self) -> usize {
        self.root
    }

    pub fn root(&self) -> &'g Token {
        &self.graph.tokens()[self.root]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    pub fn tokens(&self) -> &'g [Token] {
        &self.graph.tokens()[self.start..self.end]
    }

    /// Token texts joined by single spaces
    pub fn text(&self) -> String {
        self.tokens()
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn key(&self) -> (usize, usize, usize) {
        (self.start, self.end, self.root)
    }
}

impl PartialEq for Span<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Span<'_> {}

impl PartialOrd for Span<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Span<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for Span<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl std::fmt::Debug for Span<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Span[{}..{}]({:?})", self.start, self.end, self.text())
    }
}

impl std::fmt::Display for Span<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}
