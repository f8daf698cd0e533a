//! Proposition generation
//!
//! Each clause type has its own expansion rule. Subject, objects and
//! complement are fanned out over coordination first; adverbials are used
//! as extracted. The result is a deduplicated set in canonical order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use clausie_core::{CoordinationStyle, Result, Span};

use crate::clause::{Clause, ClauseType};
use crate::coordination::CoordinationExpander;

/// Role of a constituent inside a proposition. The declaration order is the
/// rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Subject,
    Verb,
    IndirectObject,
    DirectObject,
    Complement,
    Adverbial,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Verb => "verb",
            Self::IndirectObject => "indirect_object",
            Self::DirectObject => "direct_object",
            Self::Complement => "complement",
            Self::Adverbial => "adverbial",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A role filler: a span of the graph, or the implicit copula of an
/// appositive ("Bell, a company" reads as "Bell is a company")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constituent<'g> {
    Span(Span<'g>),
    Copula,
}

impl<'g> Constituent<'g> {
    pub const COPULA_TEXT: &'static str = "is";

    pub fn span(&self) -> Option<Span<'g>> {
        match self {
            Self::Span(span) => Some(*span),
            Self::Copula => None,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::Span(span) => span.text(),
            Self::Copula => Self::COPULA_TEXT.to_string(),
        }
    }
}

/// Ordered tuple of role-tagged constituents
///
/// Equality and ordering are structural over the tuple, so two
/// propositions built from the same spans in the same roles are the same
/// proposition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Proposition<'g> {
    parts: Vec<(Role, Constituent<'g>)>,
}

impl<'g> Proposition<'g> {
    fn new(subject: Span<'g>, verb: Constituent<'g>) -> Self {
        Self {
            parts: vec![(Role::Subject, Constituent::Span(subject)), (Role::Verb, verb)],
        }
    }

    fn with(mut self, role: Role, span: Span<'g>) -> Self {
        self.parts.push((role, Constituent::Span(span)));
        self
    }

    fn with_all(mut self, role: Role, spans: &[Span<'g>]) -> Self {
        self.parts
            .extend(spans.iter().map(|&s| (role, Constituent::Span(s))));
        self
    }

    pub fn parts(&self) -> &[(Role, Constituent<'g>)] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Constituents filling `role`, in tuple order
    pub fn get(&self, role: Role) -> impl Iterator<Item = &Constituent<'g>> + '_ {
        self.parts
            .iter()
            .filter(move |(r, _)| *r == role)
            .map(|(_, c)| c)
    }

    pub fn subject(&self) -> Option<Span<'g>> {
        self.get(Role::Subject).find_map(Constituent::span)
    }

    pub fn verb(&self) -> Option<&Constituent<'g>> {
        self.get(Role::Verb).next()
    }
}

impl std::fmt::Display for Proposition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.parts.iter().map(|(_, c)| c.text()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// Expands classified clauses into propositions
#[derive(Debug, Clone, Copy, Default)]
pub struct PropositionGenerator {
    expander: CoordinationExpander,
}

impl PropositionGenerator {
    pub fn new(style: CoordinationStyle) -> Self {
        Self {
            expander: CoordinationExpander::new(style),
        }
    }

    /// Distinct propositions for the clause, sorted by role-tuple content
    pub fn generate<'g>(&self, clause: &Clause<'g>) -> Result<Vec<Proposition<'g>>> {
        let subjects = self.expander.expand(clause.subject())?;
        let indirect = self.expander.expand_optional(clause.indirect_object())?;
        let direct = self.expander.expand_optional(clause.direct_object())?;
        let complements = self.expander.expand_optional(clause.complement())?;
        let adverbials = clause.adverbials();
        let verb = clause
            .verb()
            .map_or(Constituent::Copula, Constituent::Span);

        let mut out = BTreeSet::new();

        for &s in &subjects {
            let base = || Proposition::new(s, verb);

            match clause.clause_type() {
                ClauseType::Sv | ClauseType::Sva => {
                    if adverbials.is_empty() {
                        out.insert(base());
                    } else {
                        for &a in adverbials {
                            out.insert(base().with(Role::Adverbial, a));
                        }
                        out.insert(base().with_all(Role::Adverbial, adverbials));
                    }
                }
                ClauseType::Svo => {
                    let objects = direct
                        .iter()
                        .map(|&o| (Role::DirectObject, o))
                        .chain(indirect.iter().map(|&o| (Role::IndirectObject, o)));
                    for (role, o) in objects {
                        out.insert(base().with(role, o));
                        for &a in adverbials {
                            out.insert(base().with(role, o).with(Role::Adverbial, a));
                        }
                    }
                }
                ClauseType::Svoo => {
                    for &io in &indirect {
                        for &d in &direct {
                            out.insert(
                                base()
                                    .with(Role::IndirectObject, io)
                                    .with(Role::DirectObject, d),
                            );
                        }
                    }
                }
                ClauseType::Svoa => {
                    if adverbials.is_empty() {
                        continue;
                    }
                    for &o in &direct {
                        let with_object = || base().with(Role::DirectObject, o);
                        for &a in adverbials {
                            out.insert(with_object().with(Role::Adverbial, a));
                        }
                        out.insert(with_object().with_all(Role::Adverbial, adverbials));
                    }
                }
                ClauseType::Svoc => {
                    if complements.is_empty() {
                        continue;
                    }
                    let objects = indirect
                        .iter()
                        .map(|&o| (Role::IndirectObject, o))
                        .chain(direct.iter().map(|&o| (Role::DirectObject, o)));
                    for (role, o) in objects {
                        let with_object = || base().with(role, o);
                        for &c in &complements {
                            out.insert(with_object().with(Role::Complement, c));
                        }
                        out.insert(with_object().with_all(Role::Complement, &complements));
                    }
                }
                ClauseType::Svc => {
                    if complements.is_empty() {
                        continue;
                    }
                    for &c in &complements {
                        out.insert(base().with(Role::Complement, c));
                    }
                    out.insert(base().with_all(Role::Complement, &complements));
                }
            }
        }

        debug!(
            clause_type = %clause.clause_type(),
            subjects = subjects.len(),
            propositions = out.len(),
            "Generated propositions"
        );

        Ok(out.into_iter().collect())
    }
}
