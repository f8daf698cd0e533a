//! Verb lexicon
//!
//! Lemma sets that drive clause-type classification. Loaded once and
//! never mutated afterwards.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;

use crate::config::ConfigError;

const EXT_COPULAR: &[&str] = &[
    "act", "appear", "be", "become", "come", "come out", "end up", "get", "go", "grow", "fall",
    "feel", "keep", "leave", "look", "prove", "remain", "seem", "smell", "sound", "stay", "taste",
    "turn", "turn up", "wind up", "live", "stand", "lie", "love", "do", "try",
];

const NON_EXT_COPULAR: &[&str] = &["die", "walk"];

const COMPLEX_TRANSITIVE: &[&str] = &[
    "bring", "catch", "drive", "get", "keep", "lay", "lead", "place", "put", "set", "sit", "show",
    "stand", "slip", "take",
];

const ADVERB_IGNORE_LIST: &[&str] = &["so", "then", "thus", "why", "as", "even"];

/// Lexical category of a verb lemma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerbCategory {
    ExtCopular,
    NonExtCopular,
    ComplexTransitive,
}

/// On-disk layout; every category is required
#[derive(Debug, Deserialize)]
struct LexiconFile {
    ext_copular: Option<Vec<String>>,
    non_ext_copular: Option<Vec<String>>,
    complex_transitive: Option<Vec<String>>,
    adverb_ignore_list: Option<Vec<String>>,
}

/// Immutable lemma sets for clause classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    ext_copular: HashSet<String>,
    non_ext_copular: HashSet<String>,
    complex_transitive: HashSet<String>,
    adverb_ignore_list: HashSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            ext_copular: to_set(EXT_COPULAR.iter().copied()),
            non_ext_copular: to_set(NON_EXT_COPULAR.iter().copied()),
            complex_transitive: to_set(COMPLEX_TRANSITIVE.iter().copied()),
            adverb_ignore_list: to_set(ADVERB_IGNORE_LIST.iter().copied()),
        }
    }
}

/// Lemmas are single tokens, so a phrasal entry such as "end up"
/// contributes each of its words.
fn to_set<'a>(words: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    words
        .into_iter()
        .flat_map(str::split_whitespace)
        .map(str::to_lowercase)
        .collect()
}

fn required(name: &str, words: Option<Vec<String>>) -> Result<HashSet<String>, ConfigError> {
    let words = words.ok_or_else(|| ConfigError::MissingRequired(format!("lexicon.{name}")))?;
    let set = to_set(words.iter().map(String::as_str));
    if set.is_empty() {
        return Err(ConfigError::EmptyCategory(name.to_string()));
    }
    Ok(set)
}

impl Lexicon {
    /// Build a lexicon from explicit word lists; every list must be non-empty
    pub fn new(
        ext_copular: Vec<String>,
        non_ext_copular: Vec<String>,
        complex_transitive: Vec<String>,
        adverb_ignore_list: Vec<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            ext_copular: required("ext_copular", Some(ext_copular))?,
            non_ext_copular: required("non_ext_copular", Some(non_ext_copular))?,
            complex_transitive: required("complex_transitive", Some(complex_transitive))?,
            adverb_ignore_list: required("adverb_ignore_list", Some(adverb_ignore_list))?,
        })
    }

    /// Parse a TOML document holding the four category arrays
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: LexiconFile = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<lexicon>"),
            message: e.to_string(),
        })?;
        Self::from_lexicon_file(file)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let file: LexiconFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let lexicon = Self::from_lexicon_file(file)?;
        tracing::debug!("Loaded lexicon from {}", path.display());
        Ok(lexicon)
    }

    fn from_lexicon_file(file: LexiconFile) -> Result<Self, ConfigError> {
        Ok(Self {
            ext_copular: required("ext_copular", file.ext_copular)?,
            non_ext_copular: required("non_ext_copular", file.non_ext_copular)?,
            complex_transitive: required("complex_transitive", file.complex_transitive)?,
            adverb_ignore_list: required("adverb_ignore_list", file.adverb_ignore_list)?,
        })
    }

    /// Check whether a lemma belongs to a verb category (case-insensitive)
    pub fn is(&self, category: VerbCategory, lemma: &str) -> bool {
        let lemma = lemma.to_lowercase();
        match category {
            VerbCategory::ExtCopular => self.ext_copular.contains(&lemma),
            VerbCategory::NonExtCopular => self.non_ext_copular.contains(&lemma),
            VerbCategory::ComplexTransitive => self.complex_transitive.contains(&lemma),
        }
    }

    pub fn is_ext_copular(&self, lemma: &str) -> bool {
        self.is(VerbCategory::ExtCopular, lemma)
    }

    pub fn is_non_ext_copular(&self, lemma: &str) -> bool {
        self.is(VerbCategory::NonExtCopular, lemma)
    }

    pub fn is_complex_transitive(&self, lemma: &str) -> bool {
        self.is(VerbCategory::ComplexTransitive, lemma)
    }

    /// Adverbs that carry no adverbial meaning of their own ("so", "then", ...)
    pub fn is_ignored_adverb(&self, lemma: &str) -> bool {
        self.adverb_ignore_list.contains(&lemma.to_lowercase())
    }
}
