//! Text-to-propositions pipeline
//!
//! Wires the parser and inflection collaborators around the extractor:
//! parse, optionally re-parse a verbless sentence as an existential, extract
//! clauses sentence by sentence, and render owned records.
//!
//! Author: hephaex@gmail.com

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use clausie_core::{ClausieConfig, Lexicon, Result, TokenGraph};

use crate::clause::ClauseRecord;
use crate::extract::ConstituentExtractor;
use crate::proposition::PropositionGenerator;
use crate::render::TextRenderer;
use crate::{DependencyParser, Inflector};

/// Prefix used to re-parse a sentence whose root is not verbal
pub const EXISTENTIAL_PREFIX: &str = "There is ";

/// Clauses of one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceAnalysis {
    pub index: usize,
    pub text: String,
    pub clauses: Vec<ClauseRecord>,
}

/// A sentence that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceFailure {
    pub index: usize,
    pub error: String,
}

/// Result of running the pipeline over one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub sentences: Vec<SentenceAnalysis>,
    pub failures: Vec<SentenceFailure>,
    /// The text was re-parsed with the existential prefix
    pub reparsed: bool,
}

impl DocumentAnalysis {
    /// All rendered propositions, in sentence and clause order
    pub fn propositions(&self) -> impl Iterator<Item = &str> + '_ {
        self.sentences
            .iter()
            .flat_map(|s| s.clauses.iter())
            .flat_map(|c| c.propositions.iter().map(String::as_str))
    }

    pub fn clause_count(&self) -> usize {
        self.sentences.iter().map(|s| s.clauses.len()).sum()
    }
}

/// Clause extraction pipeline over a dependency parser
pub struct ClausePipeline<P: DependencyParser> {
    parser: P,
    lexicon: Lexicon,
    config: ClausieConfig,
    inflector: Option<Box<dyn Inflector>>,
}

impl<P: DependencyParser> ClausePipeline<P> {
    pub fn new(parser: P, lexicon: Lexicon, config: ClausieConfig) -> Self {
        Self {
            parser,
            lexicon,
            config,
            inflector: None,
        }
    }

    /// Build from configuration, loading the configured lexicon
    pub fn from_config(parser: P, config: ClausieConfig) -> Result<Self> {
        let lexicon = config.load_lexicon()?;
        info!(
            conservative = config.extraction.conservative,
            coordination = ?config.extraction.coordination,
            "Clause pipeline ready"
        );
        Ok(Self::new(parser, lexicon, config))
    }

    pub fn with_inflector(mut self, inflector: Box<dyn Inflector>) -> Self {
        self.inflector = Some(inflector);
        self
    }

    pub fn config(&self) -> &ClausieConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Parse the text. When the first sentence's root is not verbal and the
    /// fallback is enabled, the text is parsed once more as "There is <text>".
    /// The flag tells whether that happened.
    pub fn parse(&self, text: &str) -> Result<(TokenGraph, bool)> {
        let graph = self.parser.parse(text)?;
        if has_verbal_root(&graph)? {
            return Ok((graph, false));
        }

        if !self.config.extraction.existential_fallback {
            warn!(text, "Sentence root is not verbal");
            return Ok((graph, false));
        }

        debug!(text, "Re-parsing with existential prefix");
        let graph = self.parser.parse(&format!("{EXISTENTIAL_PREFIX}{text}"))?;
        if !has_verbal_root(&graph)? {
            warn!(text, "Sentence root is not verbal after existential re-parse");
        }
        Ok((graph, true))
    }

    /// Run the whole pipeline. Parser failures abort the call; a malformed
    /// sentence is reported in `failures` and the rest are still processed.
    pub fn analyze(&self, text: &str) -> Result<DocumentAnalysis> {
        let (graph, reparsed) = self.parse(text)?;

        let extractor = ConstituentExtractor::new(&self.lexicon, &self.config.extraction);
        let generator = PropositionGenerator::new(self.config.extraction.coordination);
        let renderer = TextRenderer::from_config(&self.config.rendering);
        let renderer = match &self.inflector {
            Some(inflector) => renderer.with_inflector(inflector.as_ref()),
            None => renderer,
        };

        let mut analysis = DocumentAnalysis {
            reparsed,
            ..Default::default()
        };

        let outcomes = extractor.extract_document(&graph);
        for (index, (outcome, &(start, end))) in outcomes
            .into_iter()
            .zip(graph.sentence_bounds())
            .enumerate()
        {
            let records = outcome.and_then(|clauses| {
                clauses
                    .iter()
                    .map(|c| c.to_record(&generator, &renderer))
                    .collect::<Result<Vec<_>>>()
            });

            match records {
                Ok(clauses) => analysis.sentences.push(SentenceAnalysis {
                    index,
                    text: sentence_text(&graph, start, end),
                    clauses,
                }),
                Err(e) => analysis.failures.push(SentenceFailure {
                    index,
                    error: e.to_string(),
                }),
            }
        }

        debug!(
            sentences = analysis.sentences.len(),
            failures = analysis.failures.len(),
            clauses = analysis.clause_count(),
            "Analyzed text"
        );
        Ok(analysis)
    }
}

/// True when the first sentence is rooted at a VERB or AUX token. An empty
/// graph has nothing to re-parse and counts as verbal.
fn has_verbal_root(graph: &TokenGraph) -> Result<bool> {
    match graph.sentences().next() {
        Some(sentence) => Ok(sentence?.root().pos.is_verbal()),
        None => Ok(true),
    }
}

fn sentence_text(graph: &TokenGraph, start: usize, end: usize) -> String {
    graph.tokens()[start..end]
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
