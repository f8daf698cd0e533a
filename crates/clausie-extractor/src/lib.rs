//! ClausIE Extractor - Clause-based open information extraction
//!
//! Turns a dependency-annotated sentence into clauses and propositions:
//! - constituent extraction (verb, subject, objects, complement, adverbials)
//! - clause-type classification (SV, SVA, SVC, SVO, SVOA, SVOC, SVOO)
//! - proposition generation with coordination fan-out
//! - optional surface rendering through an inflection collaborator
//!
//! Parsing and inflection are external; they plug in through the
//! [`DependencyParser`] and [`Inflector`] traits.
//!
//! Author: hephaex@gmail.com

use clausie_core::{Result, Token, TokenGraph};

/// Dependency parser collaborator: text in, annotated graph out
pub trait DependencyParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<TokenGraph>;
}

/// Inflection collaborator: produce a verb form for a target tag (e.g. "VBD").
/// `None` means the form is unknown and the literal text is kept.
pub trait Inflector: Send + Sync {
    fn inflect(&self, token: &Token, form: &str) -> Option<String>;
}

impl<F> Inflector for F
where
    F: Fn(&Token, &str) -> Option<String> + Send + Sync,
{
    fn inflect(&self, token: &Token, form: &str) -> Option<String> {
        self(token, form)
    }
}

pub mod clause;
pub mod coordination;
pub mod extract;
pub mod pipeline;
pub mod proposition;
pub mod render;

pub use clause::{
    classify, Clause, ClauseBuilder, ClauseFeatures, ClauseRecord, ClauseType, UnknownClauseType,
};
pub use coordination::CoordinationExpander;
pub use extract::ConstituentExtractor;
pub use pipeline::{ClausePipeline, DocumentAnalysis, SentenceAnalysis, SentenceFailure};
pub use proposition::{Constituent, Proposition, PropositionGenerator, Role};
pub use render::{TableInflector, TextRenderer};
