//! Clauses and clause-type classification
//!
//! A clause is assembled once through [`ClauseBuilder`], classified on
//! `build`, and immutable afterwards.

use serde::{Deserialize, Serialize};

use clausie_core::{Lexicon, Result, Span};

use crate::proposition::{Proposition, PropositionGenerator};
use crate::render::TextRenderer;

// ============================================================================
// Clause Types
// ============================================================================

/// Syntactic pattern of a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClauseType {
    Sv,
    Sva,
    Svc,
    Svo,
    Svoa,
    Svoc,
    Svoo,
}

impl ClauseType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sv => "SV",
            Self::Sva => "SVA",
            Self::Svc => "SVC",
            Self::Svo => "SVO",
            Self::Svoa => "SVOA",
            Self::Svoc => "SVOC",
            Self::Svoo => "SVOO",
        }
    }
}

/// A clause type name that is none of the seven patterns
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown clause type: {0}")]
pub struct UnknownClauseType(pub String);

impl std::str::FromStr for ClauseType {
    type Err = UnknownClauseType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SV" => Ok(Self::Sv),
            "SVA" => Ok(Self::Sva),
            "SVC" => Ok(Self::Svc),
            "SVO" => Ok(Self::Svo),
            "SVOA" => Ok(Self::Svoa),
            "SVOC" => Ok(Self::Svoc),
            "SVOO" => Ok(Self::Svoo),
            _ => Err(UnknownClauseType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ClauseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Everything the classifier looks at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ClauseFeatures {
    pub has_verb: bool,
    pub has_complement: bool,
    pub has_adverbial: bool,
    pub has_direct_object: bool,
    pub has_indirect_object: bool,
    pub ext_copular: bool,
    pub non_ext_copular: bool,
    pub complex_transitive: bool,
    pub conservative: bool,
}

/// Decide the clause type. Total: every feature combination maps to
/// exactly one type, and a clause without a verb is always SVC.
pub fn classify(f: &ClauseFeatures) -> ClauseType {
    if !f.has_verb {
        return ClauseType::Svc;
    }

    if f.has_direct_object || f.has_indirect_object {
        if f.has_direct_object && f.has_indirect_object {
            ClauseType::Svoo
        } else if f.has_complement {
            ClauseType::Svoc
        } else if !f.has_adverbial || !f.has_direct_object {
            ClauseType::Svo
        } else if f.complex_transitive || f.conservative {
            ClauseType::Svoa
        } else {
            ClauseType::Svo
        }
    } else if f.has_complement {
        ClauseType::Svc
    } else if !f.has_adverbial || f.non_ext_copular {
        ClauseType::Sv
    } else if f.ext_copular || f.conservative {
        ClauseType::Sva
    } else {
        ClauseType::Sv
    }
}

// ============================================================================
// Clause
// ============================================================================

/// One detected predication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause<'g> {
    subject: Span<'g>,
    verb: Option<Span<'g>>,
    indirect_object: Option<Span<'g>>,
    direct_object: Option<Span<'g>>,
    complement: Option<Span<'g>>,
    adverbials: Vec<Span<'g>>,
    clause_type: ClauseType,
}

impl<'g> Clause<'g> {
    pub fn subject(&self) -> Span<'g> {
        self.subject
    }

    /// `None` only for an appositive pseudo-clause
    pub fn verb(&self) -> Option<Span<'g>> {
        self.verb
    }

    pub fn indirect_object(&self) -> Option<Span<'g>> {
        self.indirect_object
    }

    pub fn direct_object(&self) -> Option<Span<'g>> {
        self.direct_object
    }

    pub fn complement(&self) -> Option<Span<'g>> {
        self.complement
    }

    pub fn adverbials(&self) -> &[Span<'g>] {
        &self.adverbials
    }

    pub fn clause_type(&self) -> ClauseType {
        self.clause_type
    }

    /// Propositions with fan-out coordination, in canonical order
    pub fn propositions(&self) -> Result<Vec<Proposition<'g>>> {
        PropositionGenerator::default().generate(self)
    }

    /// Propositions rendered as text
    pub fn to_texts(&self, renderer: &TextRenderer<'_>) -> Result<Vec<String>> {
        Ok(self
            .propositions()?
            .iter()
            .map(|p| renderer.render(p))
            .collect())
    }

    /// Owned summary of the clause and its rendered propositions
    pub fn to_record(
        &self,
        generator: &PropositionGenerator,
        renderer: &TextRenderer<'_>,
    ) -> Result<ClauseRecord> {
        let propositions = generator
            .generate(self)?
            .iter()
            .map(|p| renderer.render(p))
            .collect();

        Ok(ClauseRecord {
            clause_type: self.clause_type,
            subject: self.subject.text(),
            verb: self.verb.map(|s| s.text()),
            indirect_object: self.indirect_object.map(|s| s.text()),
            direct_object: self.direct_object.map(|s| s.text()),
            complement: self.complement.map(|s| s.text()),
            adverbials: self.adverbials.iter().map(|s| s.text()).collect(),
            propositions,
        })
    }
}

impl std::fmt::Display for Clause<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let opt = |s: Option<Span<'_>>| s.map(|s| s.text()).unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "<{}, {}, {}, {}, {}, {}, [{}]>",
            self.clause_type,
            self.subject,
            opt(self.verb),
            opt(self.indirect_object),
            opt(self.direct_object),
            opt(self.complement),
            self.adverbials
                .iter()
                .map(|a| a.text())
                .collect::<Vec<_>>()
                .join("; ")
        )
    }
}

/// Collects constituents, then classifies once on `build`
#[derive(Debug, Clone)]
pub struct ClauseBuilder<'g> {
    subject: Span<'g>,
    verb: Option<Span<'g>>,
    indirect_object: Option<Span<'g>>,
    direct_object: Option<Span<'g>>,
    complement: Option<Span<'g>>,
    adverbials: Vec<Span<'g>>,
}

impl<'g> ClauseBuilder<'g> {
    pub fn new(subject: Span<'g>) -> Self {
        Self {
            subject,
            verb: None,
            indirect_object: None,
            direct_object: None,
            complement: None,
            adverbials: Vec::new(),
        }
    }

    pub fn verb(mut self, verb: Span<'g>) -> Self {
        self.verb = Some(verb);
        self
    }

    pub fn indirect_object(mut self, span: Option<Span<'g>>) -> Self {
        self.indirect_object = span;
        self
    }

    pub fn direct_object(mut self, span: Option<Span<'g>>) -> Self {
        self.direct_object = span;
        self
    }

    pub fn complement(mut self, span: Option<Span<'g>>) -> Self {
        self.complement = span;
        self
    }

    pub fn adverbials(mut self, adverbials: Vec<Span<'g>>) -> Self {
        self.adverbials = adverbials;
        self
    }

    /// Presence flags plus the verb root's lexical categories
    pub fn features(&self, lexicon: &Lexicon, conservative: bool) -> ClauseFeatures {
        let lemma = self.verb.map(|v| v.root().lemma.as_str());
        let in_category = |check: fn(&Lexicon, &str) -> bool| lemma.is_some_and(|l| check(lexicon, l));

        ClauseFeatures {
            has_verb: self.verb.is_some(),
            has_complement: self.complement.is_some(),
            has_adverbial: !self.adverbials.is_empty(),
            has_direct_object: self.direct_object.is_some(),
            has_indirect_object: self.indirect_object.is_some(),
            ext_copular: in_category(Lexicon::is_ext_copular),
            non_ext_copular: in_category(Lexicon::is_non_ext_copular),
            complex_transitive: in_category(Lexicon::is_complex_transitive),
            conservative,
        }
    }

    pub fn build(self, lexicon: &Lexicon, conservative: bool) -> Clause<'g> {
        let clause_type = classify(&self.features(lexicon, conservative));
        Clause {
            subject: self.subject,
            verb: self.verb,
            indirect_object: self.indirect_object,
            direct_object: self.direct_object,
            complement: self.complement,
            adverbials: self.adverbials,
            clause_type,
        }
    }
}

/// Serializable clause summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseRecord {
    pub clause_type: ClauseType,
    pub subject: String,
    pub verb: Option<String>,
    pub indirect_object: Option<String>,
    pub direct_object: Option<String>,
    pub complement: Option<String>,
    pub adverbials: Vec<String>,
    pub propositions: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
