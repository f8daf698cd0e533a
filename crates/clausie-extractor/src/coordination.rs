//! Coordination expansion
//!
//! A constituent head with "conj" children stands for several parallel
//! alternatives ("Alice, Bob and Carol"). Expansion fans these out into
//! one span per conjunct, in document order.

use clausie_core::{ClausieError, CoordinationStyle, Dep, Pos, Result, Span, Token, TokenGraph};

/// Children kept next to a nominal or adjectival head
const MODIFIER_DEPS: [Dep; 5] = [Dep::Advmod, Dep::Amod, Dep::Det, Dep::Poss, Dep::Compound];

/// Children dropped from the no-fanout entity span
const COORDINATION_DEPS: [Dep; 3] = [Dep::Cc, Dep::Conj, Dep::Prep];

/// Expand a head token into its coordinated spans.
///
/// Nouns, proper nouns and adjectives keep their determiners and modifiers:
/// the span is the bounding range of the head plus those children, so any
/// token lying between them is included too. Other heads expand to the
/// single token. Each "conj" child is then expanded the same way and
/// appended. A child outside the head's sentence is a structural error.
pub fn expand(graph: &TokenGraph, index: usize) -> Result<Vec<Span<'_>>> {
    let bounds = sentence_bounds(graph, index)?;
    expand_within(graph, index, bounds)
}

fn expand_within(graph: &TokenGraph, index: usize, bounds: (usize, usize)) -> Result<Vec<Span<'_>>> {
    let token = graph.get(index)?;
    let children = children_within(graph, token, bounds)?;

    let head_span = if matches!(token.pos, Pos::Noun | Pos::Propn | Pos::Adj) {
        let mut start = token.index;
        let mut end = token.index + 1;
        for child in &children {
            if MODIFIER_DEPS.contains(&child.dep) {
                start = start.min(child.index);
                end = end.max(child.index + 1);
            }
        }
        Span::new(graph, start, end, token.index)?
    } else {
        Span::single(graph, token.index)?
    };

    let mut spans = vec![head_span];
    for child in children {
        if child.dep == Dep::Conj {
            spans.extend(expand_within(graph, child.index, bounds)?);
        }
    }
    Ok(spans)
}

/// Span over the token's whole subtree
pub fn expand_full_subtree(graph: &TokenGraph, index: usize) -> Result<Span<'_>> {
    Span::subtree(graph, index)
}

/// Bounding span of the token and its children, minus coordinators,
/// conjuncts and prepositional modifiers
pub fn span_without_coordination(graph: &TokenGraph, index: usize) -> Result<Span<'_>> {
    let token = graph.get(index)?;
    let bounds = sentence_bounds(graph, index)?;

    let mut start = token.index;
    let mut end = token.index + 1;
    for child in children_within(graph, token, bounds)? {
        if !COORDINATION_DEPS.contains(&child.dep) {
            start = start.min(child.index);
            end = end.max(child.index + 1);
        }
    }
    Span::new(graph, start, end, token.index)
}

fn sentence_bounds(graph: &TokenGraph, index: usize) -> Result<(usize, usize)> {
    graph
        .sentence_of(index)
        .ok_or_else(|| ClausieError::structural(format!("token {index} belongs to no sentence")))
}

/// Children of `token`, all of which must lie inside `[start, end)`
fn children_within<'g>(
    graph: &'g TokenGraph,
    token: &Token,
    (start, end): (usize, usize),
) -> Result<Vec<&'g Token>> {
    token
        .children
        .iter()
        .map(|&c| {
            if !(start..end).contains(&c) {
                return Err(ClausieError::structural(format!(
                    "child {c} of token {} lies outside the sentence [{start}, {end})",
                    token.index
                )));
            }
            graph.get(c)
        })
        .collect()
}

/// Expansion front-end that honours the configured style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinationExpander {
    style: CoordinationStyle,
}

impl CoordinationExpander {
    pub fn new(style: CoordinationStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> CoordinationStyle {
        self.style
    }

    /// Alternatives for the constituent rooted at `span`
    pub fn expand<'g>(&self, span: Span<'g>) -> Result<Vec<Span<'g>>> {
        let graph = span.graph();
        match self.style {
            CoordinationStyle::FanOut => expand(graph, span.root_index()),
            CoordinationStyle::Collapsed => {
                Ok(vec![span_without_coordination(graph, span.root_index())?])
            }
        }
    }

    /// Same as [`expand`](Self::expand), empty for an absent constituent
    pub fn expand_optional<'g>(&self, span: Option<Span<'g>>) -> Result<Vec<Span<'g>>> {
        match span {
            Some(span) => self.expand(span),
            None => Ok(Vec::new()),
        }
    }
}
