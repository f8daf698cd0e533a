//! Annotated token graph
//!
//! The dependency parser collaborator hands over one `TokenGraph` per
//! document: tokens in document order, each carrying its lemma, coarse
//! part-of-speech, dependency label and head. Children are derived from
//! the head relation and kept in document order.
//!
//! The graph is validated once at construction and is immutable
//! afterwards; every span, clause and proposition borrows from it.

use serde::{Deserialize, Serialize};

use crate::span::Span;
use crate::{ClausieError, Result};

// ============================================================================
// Part-of-speech tags
// ============================================================================

/// Coarse (Universal) part-of-speech tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    Space,
    X,
}

impl Pos {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adj => "ADJ",
            Self::Adp => "ADP",
            Self::Adv => "ADV",
            Self::Aux => "AUX",
            Self::Cconj => "CCONJ",
            Self::Det => "DET",
            Self::Intj => "INTJ",
            Self::Noun => "NOUN",
            Self::Num => "NUM",
            Self::Part => "PART",
            Self::Pron => "PRON",
            Self::Propn => "PROPN",
            Self::Punct => "PUNCT",
            Self::Sconj => "SCONJ",
            Self::Sym => "SYM",
            Self::Verb => "VERB",
            Self::Space => "SPACE",
            Self::X => "X",
        }
    }

    /// Parse a tag; unknown tags fall back to `X`
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ADJ" => Self::Adj,
            "ADP" => Self::Adp,
            "ADV" => Self::Adv,
            "AUX" => Self::Aux,
            "CCONJ" | "CONJ" => Self::Cconj,
            "DET" => Self::Det,
            "INTJ" => Self::Intj,
            "NOUN" => Self::Noun,
            "NUM" => Self::Num,
            "PART" => Self::Part,
            "PRON" => Self::Pron,
            "PROPN" => Self::Propn,
            "PUNCT" => Self::Punct,
            "SCONJ" => Self::Sconj,
            "SYM" => Self::Sym,
            "VERB" => Self::Verb,
            "SPACE" => Self::Space,
            _ => Self::X,
        }
    }

    /// Verbal tags (main verb or auxiliary)
    pub fn is_verbal(&self) -> bool {
        matches!(self, Self::Verb | Self::Aux)
    }
}

impl From<String> for Pos {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Pos> for String {
    fn from(pos: Pos) -> Self {
        pos.as_str().to_string()
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Dependency labels
// ============================================================================

/// Dependency relation of a token to its head (ClearNLP label set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Dep {
    Acl,
    Acomp,
    Advcl,
    Advmod,
    Agent,
    Amod,
    Appos,
    Attr,
    Aux,
    Auxpass,
    Cc,
    Ccomp,
    Compound,
    Conj,
    Csubj,
    Dative,
    Det,
    Dobj,
    Expl,
    Neg,
    Npadvmod,
    Nsubj,
    Nsubjpass,
    Nummod,
    Oprd,
    Pcomp,
    Pobj,
    Poss,
    Prep,
    Prt,
    Punct,
    Relcl,
    Root,
    Xcomp,
    /// Any label no rule cares about
    Other,
}

impl Dep {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acl => "acl",
            Self::Acomp => "acomp",
            Self::Advcl => "advcl",
            Self::Advmod => "advmod",
            Self::Agent => "agent",
            Self::Amod => "amod",
            Self::Appos => "appos",
            Self::Attr => "attr",
            Self::Aux => "aux",
            Self::Auxpass => "auxpass",
            Self::Cc => "cc",
            Self::Ccomp => "ccomp",
            Self::Compound => "compound",
            Self::Conj => "conj",
            Self::Csubj => "csubj",
            Self::Dative => "dative",
            Self::Det => "det",
            Self::Dobj => "dobj",
            Self::Expl => "expl",
            Self::Neg => "neg",
            Self::Npadvmod => "npadvmod",
            Self::Nsubj => "nsubj",
            Self::Nsubjpass => "nsubjpass",
            Self::Nummod => "nummod",
            Self::Oprd => "oprd",
            Self::Pcomp => "pcomp",
            Self::Pobj => "pobj",
            Self::Poss => "poss",
            Self::Prep => "prep",
            Self::Prt => "prt",
            Self::Punct => "punct",
            Self::Relcl => "relcl",
            Self::Root => "ROOT",
            Self::Xcomp => "xcomp",
            Self::Other => "dep",
        }
    }

    /// Parse a label. Universal Dependencies aliases map onto the
    /// ClearNLP label with the same role; anything unknown is `Other`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "acl" => Self::Acl,
            "acomp" => Self::Acomp,
            "advcl" => Self::Advcl,
            "advmod" => Self::Advmod,
            "agent" => Self::Agent,
            "amod" => Self::Amod,
            "appos" => Self::Appos,
            "attr" => Self::Attr,
            "aux" => Self::Aux,
            "auxpass" | "aux:pass" => Self::Auxpass,
            "cc" => Self::Cc,
            "ccomp" => Self::Ccomp,
            "compound" => Self::Compound,
            "conj" => Self::Conj,
            "csubj" => Self::Csubj,
            "dative" | "iobj" => Self::Dative,
            "det" => Self::Det,
            "dobj" | "obj" => Self::Dobj,
            "expl" => Self::Expl,
            "neg" => Self::Neg,
            "npadvmod" => Self::Npadvmod,
            "nsubj" => Self::Nsubj,
            "nsubjpass" | "nsubj:pass" => Self::Nsubjpass,
            "nummod" => Self::Nummod,
            "oprd" => Self::Oprd,
            "pcomp" => Self::Pcomp,
            "pobj" => Self::Pobj,
            "poss" | "nmod:poss" => Self::Poss,
            "prep" => Self::Prep,
            "prt" | "compound:prt" => Self::Prt,
            "punct" => Self::Punct,
            "relcl" | "acl:relcl" => Self::Relcl,
            "root" => Self::Root,
            "xcomp" => Self::Xcomp,
            _ => Self::Other,
        }
    }

    /// Active or passive nominal subject
    pub fn is_subject(&self) -> bool {
        matches!(self, Self::Nsubj | Self::Nsubjpass)
    }

    /// Adverbial or adnominal clause head
    pub fn is_subordinate_clause(&self) -> bool {
        matches!(self, Self::Advcl | Self::Acl)
    }
}

impl From<String> for Dep {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Dep> for String {
    fn from(dep: Dep) -> Self {
        dep.as_str().to_string()
    }
}

impl std::fmt::Display for Dep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// A token as produced by the parser, before the graph is assembled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToken {
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    pub dep: Dep,
    /// Index of the head token; `None` (or the token's own index) marks a root
    pub head: Option<usize>,
}

impl RawToken {
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: Pos,
        dep: Dep,
        head: Option<usize>,
    ) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos,
            dep,
            head,
        }
    }
}

/// A token inside a validated graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Position in the document (total order)
    pub index: usize,
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    pub dep: Dep,
    pub head: Option<usize>,
    /// Children in document order
    pub children: Vec<usize>,
}

impl Token {
    pub fn is_root(&self) -> bool {
        self.head.is_none()
    }
}

// ============================================================================
// Token graph
// ============================================================================

#[derive(Debug, Deserialize)]
struct GraphDocument {
    tokens: Vec<RawToken>,
    #[serde(default)]
    sentences: Vec<(usize, usize)>,
}

/// Read-only dependency graph over a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenGraph {
    tokens: Vec<Token>,
    sentences: Vec<(usize, usize)>,
}

impl TokenGraph {
    /// Build a graph holding a single sentence
    pub fn new(tokens: Vec<RawToken>) -> Result<Self> {
        Self::with_sentences(tokens, Vec::new())
    }

    /// Build a graph with explicit sentence boundaries (`[start, end)` pairs).
    /// An empty boundary list means the whole graph is one sentence.
    pub fn with_sentences(raw: Vec<RawToken>, sentences: Vec<(usize, usize)>) -> Result<Self> {
        let len = raw.len();

        let mut tokens: Vec<Token> = Vec::with_capacity(len);
        for (index, token) in raw.into_iter().enumerate() {
            let head = match token.head {
                Some(h) if h == index => None,
                Some(h) if h >= len => {
                    return Err(ClausieError::structural(format!(
                        "token {index} ('{}') has head {h} outside the graph of {len} tokens",
                        token.text
                    )));
                }
                other => other,
            };
            tokens.push(Token {
                index,
                text: token.text,
                lemma: token.lemma,
                pos: token.pos,
                dep: token.dep,
                head,
                children: Vec::new(),
            });
        }

        // Children are pushed in increasing index order, so they stay sorted
        for index in 0..len {
            if let Some(head) = tokens[index].head {
                tokens[head].children.push(index);
            }
        }

        let graph = Self {
            tokens,
            sentences: Self::check_sentences(sentences, len)?,
        };
        graph.check_acyclic()?;
        Ok(graph)
    }

    /// Parse the parser collaborator's JSON output
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: GraphDocument = serde_json::from_str(json)?;
        Self::with_sentences(doc.tokens, doc.sentences)
    }

    fn check_sentences(sentences: Vec<(usize, usize)>, len: usize) -> Result<Vec<(usize, usize)>> {
        if sentences.is_empty() {
            return Ok(if len == 0 { Vec::new() } else { vec![(0, len)] });
        }

        let mut previous_end = 0;
        for &(start, end) in &sentences {
            if start >= end || end > len {
                return Err(ClausieError::structural(format!(
                    "sentence [{start}, {end}) is empty or outside the graph of {len} tokens"
                )));
            }
            if start < previous_end {
                return Err(ClausieError::structural(format!(
                    "sentence [{start}, {end}) overlaps or precedes the previous sentence"
                )));
            }
            previous_end = end;
        }
        Ok(sentences)
    }

    fn check_acyclic(&self) -> Result<()> {
        let len = self.tokens.len();
        for token in &self.tokens {
            let mut current = token.head;
            let mut steps = 0;
            while let Some(head) = current {
                steps += 1;
                if steps > len {
                    return Err(ClausieError::structural(format!(
                        "head chain starting at token {} ('{}') contains a cycle",
                        token.index, token.text
                    )));
                }
                current = self.tokens[head].head;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token at `index`, if any
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Token at `index`, failing with a structural error when out of range
    pub fn get(&self, index: usize) -> Result<&Token> {
        self.tokens.get(index).ok_or_else(|| {
            ClausieError::structural(format!(
                "token index {index} outside the graph of {} tokens",
                self.tokens.len()
            ))
        })
    }

    /// Sentence boundaries as `[start, end)` pairs
    pub fn sentence_bounds(&self) -> &[(usize, usize)] {
        &self.sentences
    }

    /// Bounds of the sentence holding token `index`
    pub fn sentence_of(&self, index: usize) -> Option<(usize, usize)> {
        self.sentences
            .iter()
            .copied()
            .find(|&(start, end)| (start..end).contains(&index))
    }

    /// Sentences as spans, each rooted at its syntactic root
    pub fn sentences(&self) -> impl Iterator<Item = Result<Span<'_>>> + '_ {
        self.sentences
            .iter()
            .map(move |&(start, end)| Span::from_range(self, start, end))
    }

    pub fn head(&self, token: &Token) -> Option<&Token> {
        token.head.and_then(|h| self.tokens.get(h))
    }

    pub fn children<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a Token> + 'a {
        token.children.iter().filter_map(move |&c| self.tokens.get(c))
    }

    /// Children that precede the token
    pub fn lefts<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a Token> + 'a {
        self.children(token).filter(move |c| c.index < token.index)
    }

    /// Distance from the token to the root of its tree
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.tokens.get(index).and_then(|t| t.head);
        while let Some(head) = current {
            depth += 1;
            current = self.tokens[head].head;
        }
        depth
    }

    /// `[min, max + 1)` over the token's whole subtree
    pub fn subtree_bounds(&self, index: usize) -> (usize, usize) {
        let mut min = index;
        let mut max = index;
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            min = min.min(current);
            max = max.max(current);
            if let Some(token) = self.tokens.get(current) {
                stack.extend(token.children.iter().copied());
            }
        }
        (min, max + 1)
    }

    /// Root of the range `[start, end)`: the token closest to the tree root,
    /// earliest on ties. `None` for an empty or out-of-range span.
    pub fn span_root(&self, start: usize, end: usize) -> Option<usize> {
        if start >= end || end > self.tokens.len() {
            return None;
        }
        (start..end).min_by_key(|&i| (self.depth(i), i))
    }
}
