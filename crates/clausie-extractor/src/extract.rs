//! Constituent extraction
//!
//! Finds the verb chunks of a sentence and, for each one, the subject,
//! objects, complement and adverbials hanging off its root. Every head or
//! child reference is checked against the sentence being processed; one
//! that leaves it is a malformed parse and fails the sentence.
//!
//! Author: hephaex@gmail.com

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use clausie_core::{
    ClausieError, Dep, ExtractionConfig, Lexicon, Pos, Result, Span, Token, TokenGraph,
};

use crate::clause::{Clause, ClauseBuilder};

/// Labels the subject search may climb through
const CLIMB_DEPS: [Dep; 6] = [Dep::Conj, Dep::Cc, Dep::Advcl, Dep::Acl, Dep::Ccomp, Dep::Root];

const COMPLEMENT_DEPS: [Dep; 4] = [Dep::Ccomp, Dep::Acomp, Dep::Xcomp, Dep::Attr];

const ADVERBIAL_DEPS: [Dep; 3] = [Dep::Prep, Dep::Advmod, Dep::Agent];

/// Pronouns that stand in for a relative clause's antecedent as subject
const RELATIVE_SUBJECTS: [&str; 2] = ["which", "who"];

const RELATIVE_ADVERBS: [&str; 1] = ["where"];

/// Clause extractor over one lexicon and configuration
#[derive(Debug, Clone, Copy)]
pub struct ConstituentExtractor<'a> {
    lexicon: &'a Lexicon,
    config: &'a ExtractionConfig,
}

impl<'a> ConstituentExtractor<'a> {
    pub fn new(lexicon: &'a Lexicon, config: &'a ExtractionConfig) -> Self {
        Self { lexicon, config }
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    pub fn config(&self) -> &'a ExtractionConfig {
        self.config
    }

    /// Extract clauses from every sentence of the graph. Each sentence gets
    /// its own outcome; a malformed sentence does not stop the others.
    pub fn extract_document<'g>(&self, graph: &'g TokenGraph) -> Vec<Result<Vec<Clause<'g>>>> {
        graph
            .sentences()
            .enumerate()
            .map(|(index, sentence)| {
                let result = sentence.and_then(|s| self.extract_clauses(s));
                if let Err(e) = &result {
                    warn!(sentence = index, error = %e, "Clause extraction failed");
                }
                result
            })
            .collect()
    }

    /// Extract the clauses of one sentence, in verb-chunk order. An
    /// appositive clause precedes the clause of the verb it was found for.
    pub fn extract_clauses<'g>(&self, sentence: Span<'g>) -> Result<Vec<Clause<'g>>> {
        let graph = sentence.graph();
        let chunks = self.verb_chunks(sentence)?;
        debug!(sentence = %sentence, chunks = chunks.len(), "Found verb chunks");

        let mut clauses = Vec::new();
        for chunk in chunks {
            let verb = chunk.root();
            let Some(subject) = self.resolve_subject(sentence, verb)? else {
                trace!(verb = %chunk, "No subject, skipping verb chunk");
                continue;
            };
            let subject = self.resolve_relative_subject(sentence, subject)?;

            for child in children_in(sentence, subject.root())? {
                if child.dep == Dep::Appos {
                    let complement = Span::subtree(graph, child.index)?;
                    clauses.push(
                        ClauseBuilder::new(subject)
                            .complement(Some(complement))
                            .build(self.lexicon, self.config.conservative),
                    );
                }
            }

            let children = children_in(sentence, verb)?;
            let first = |accept: &dyn Fn(Dep) -> bool| -> Result<Option<Span<'g>>> {
                children
                    .iter()
                    .find(|c| accept(c.dep))
                    .map(|c| Span::subtree(graph, c.index))
                    .transpose()
            };

            let indirect_object = first(&|d| d == Dep::Dative)?;
            let direct_object = first(&|d| d == Dep::Dobj)?;
            let complement = first(&|d| COMPLEMENT_DEPS.contains(&d))?;

            let mut adverbials = Vec::new();
            for child in &children {
                if !ADVERBIAL_DEPS.contains(&child.dep) || self.is_ignored_adverb(child) {
                    continue;
                }
                let adverbial = Span::subtree(graph, child.index)?;
                adverbials.push(self.resolve_relative_adverbial(sentence, adverbial)?);
            }

            let clause = ClauseBuilder::new(subject)
                .verb(chunk)
                .indirect_object(indirect_object)
                .direct_object(direct_object)
                .complement(complement)
                .adverbials(adverbials)
                .build(self.lexicon, self.config.conservative);
            trace!(clause = %clause, "Built clause");
            clauses.push(clause);
        }

        debug!(sentence = %sentence, clauses = clauses.len(), "Extracted clauses");
        Ok(clauses)
    }

    /// Verb chunks in document order, one per distinct root. At each
    /// position an AUX VERB pair is tried first, then AUX alone, then VERB
    /// alone; a match whose root is already claimed is dropped.
    pub fn verb_chunks<'g>(&self, sentence: Span<'g>) -> Result<Vec<Span<'g>>> {
        let graph = sentence.graph();
        let tokens = sentence.tokens();

        let mut claimed = HashSet::new();
        let mut chunks = Vec::new();
        for (offset, token) in tokens.iter().enumerate() {
            let next_is_verb = tokens.get(offset + 1).is_some_and(|n| n.pos == Pos::Verb);
            let candidates = [
                (token.pos == Pos::Aux && next_is_verb).then_some(2),
                (token.pos == Pos::Aux).then_some(1),
                (token.pos == Pos::Verb).then_some(1),
            ];

            for width in candidates.into_iter().flatten() {
                let chunk = Span::from_range(graph, token.index, token.index + width)?;
                if claimed.insert(chunk.root_index()) {
                    chunks.push(chunk);
                }
            }
        }
        Ok(chunks)
    }

    /// Subject of the verb chunk rooted at `verb`, as a subtree span
    pub fn resolve_subject<'g>(
        &self,
        sentence: Span<'g>,
        verb: &'g Token,
    ) -> Result<Option<Span<'g>>> {
        let graph = sentence.graph();
        let found = |token: &Token| Span::subtree(graph, token.index).map(Some);

        if let Some(subject) = subject_child(sentence, verb)? {
            return found(subject);
        }

        let mut node = verb;
        let mut visited = HashSet::from([verb.index]);
        while CLIMB_DEPS.contains(&node.dep) {
            trace!(node = node.index, dep = %node.dep, "Climbing for subject");

            if let Some(subject) = subject_child(sentence, node)? {
                return found(subject);
            }
            for child in children_in(sentence, node)? {
                if child.dep.is_subordinate_clause() {
                    if let Some(subject) = self.subject_of_verb(sentence, child)? {
                        return found(subject);
                    }
                }
            }

            let Some(head) = node.head else { break };
            if head == node.index {
                break;
            }
            let head = token_in(sentence, head)?;
            if !visited.insert(head.index) {
                return Err(ClausieError::structural(format!(
                    "subject search revisited token {} ('{}')",
                    head.index, head.text
                )));
            }
            node = head;
        }

        match subject_child(sentence, node)? {
            Some(subject) => found(subject),
            None => Ok(None),
        }
    }

    /// Subject token reachable from `token` through subordinate clause heads
    pub fn subject_of_verb<'g>(
        &self,
        sentence: Span<'g>,
        token: &'g Token,
    ) -> Result<Option<&'g Token>> {
        if token.dep.is_subject() {
            return Ok(Some(token));
        }

        if token.dep.is_subordinate_clause() {
            if let Some(head) = token.head {
                if head != sentence.root_index() {
                    let head = token_in(sentence, head)?;
                    return self.subject_of_verb(sentence, head);
                }
            }
        }

        subject_child(sentence, token)
    }

    /// A "which"/"who" subject of a relative clause becomes the noun the
    /// clause modifies. Off unless `resolve_relative_pronouns` is set.
    pub fn resolve_relative_subject<'g>(
        &self,
        sentence: Span<'g>,
        subject: Span<'g>,
    ) -> Result<Span<'g>> {
        match self.relative_antecedent(sentence, subject.root(), &RELATIVE_SUBJECTS)? {
            Some(antecedent) => {
                debug!(pronoun = %subject, antecedent = %antecedent.text, "Resolved relative subject");
                Span::subtree(sentence.graph(), antecedent.index)
            }
            None => Ok(subject),
        }
    }

    /// A "where" adverbial of a relative clause becomes the prepositional
    /// phrase holding the noun the clause modifies. Kept as is when that
    /// noun is not the object of a preposition.
    pub fn resolve_relative_adverbial<'g>(
        &self,
        sentence: Span<'g>,
        adverbial: Span<'g>,
    ) -> Result<Span<'g>> {
        let Some(antecedent) =
            self.relative_antecedent(sentence, adverbial.root(), &RELATIVE_ADVERBS)?
        else {
            return Ok(adverbial);
        };
        let Some(head) = antecedent.head else {
            return Ok(adverbial);
        };

        let preposition = token_in(sentence, head)?;
        if preposition.dep != Dep::Prep {
            return Ok(adverbial);
        }
        debug!(adverb = %adverbial, antecedent = %antecedent.text, "Resolved relative adverbial");
        Span::subtree(sentence.graph(), preposition.index)
    }

    /// Noun modified by the relative clause that `token` introduces, when
    /// `token` is one of `words` and resolution is enabled
    fn relative_antecedent<'g>(
        &self,
        sentence: Span<'g>,
        token: &'g Token,
        words: &[&str],
    ) -> Result<Option<&'g Token>> {
        if !self.config.resolve_relative_pronouns
            || !words.contains(&token.text.to_lowercase().as_str())
        {
            return Ok(None);
        }
        let Some(clause_head) = token.head else {
            return Ok(None);
        };

        let clause_head = token_in(sentence, clause_head)?;
        if clause_head.dep != Dep::Relcl {
            return Ok(None);
        }
        match clause_head.head {
            Some(antecedent) => token_in(sentence, antecedent).map(Some),
            None => Ok(None),
        }
    }

    fn is_ignored_adverb(&self, token: &Token) -> bool {
        self.config.filter_ignored_adverbs
            && token.dep == Dep::Advmod
            && self.lexicon.is_ignored_adverb(&token.lemma)
    }
}

/// Token at `index`, which must lie inside the sentence
fn token_in<'g>(sentence: Span<'g>, index: usize) -> Result<&'g Token> {
    if !sentence.contains(index) {
        return Err(ClausieError::structural(format!(
            "token {index} lies outside the sentence [{}, {})",
            sentence.start(),
            sentence.end()
        )));
    }
    sentence.graph().get(index)
}

fn children_in<'g>(sentence: Span<'g>, token: &'g Token) -> Result<Vec<&'g Token>> {
    token
        .children
        .iter()
        .map(|&c| token_in(sentence, c))
        .collect()
}

/// First child with a subject label
fn subject_child<'g>(sentence: Span<'g>, token: &'g Token) -> Result<Option<&'g Token>> {
    Ok(children_in(sentence, token)?
        .into_iter()
        .find(|c| c.dep.is_subject()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::ClauseType;
    use clausie_core::RawToken;

    fn tok(text: &str, lemma: &str, pos: Pos, dep: Dep, head: Option<usize>) -> RawToken {
        RawToken::new(text, lemma, pos, dep, head)
    }

    fn sentence(graph: &TokenGraph) -> Span<'_> {
        graph.sentences().next().unwrap().unwrap()
    }

    /// "AE has won the Nobel Prize ."
    fn has_won() -> TokenGraph {
        TokenGraph::new(vec![
            tok("AE", "AE", Pos::Propn, Dep::Nsubj, Some(2)),
            tok("has", "have", Pos::Aux, Dep::Aux, Some(2)),
            tok("won", "win", Pos::Verb, Dep::Root, None),
            tok("the", "the", Pos::Det, Dep::Det, Some(5)),
            tok("Nobel", "Nobel", Pos::Propn, Dep::Compound, Some(5)),
            tok("Prize", "Prize", Pos::Propn, Dep::Dobj, Some(2)),
            tok(".", ".", Pos::Punct, Dep::Punct, Some(2)),
        ])
        .unwrap()
    }

    #[test]
    fn test_verb_chunks_claim_roots() {
        let graph = has_won();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig::default();
        let extractor = ConstituentExtractor::new(&lexicon, &config);

        let chunks = extractor.verb_chunks(sentence(&graph)).unwrap();
        let texts: Vec<String> = chunks.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["has won", "has"]);
        assert_eq!(chunks[0].root_index(), 2);
    }

    #[test]
    fn test_auxiliary_chunk_without_subject_is_dropped() {
        let graph = has_won();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig::default();
        let extractor = ConstituentExtractor::new(&lexicon, &config);

        let clauses = extractor.extract_clauses(sentence(&graph)).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].clause_type(), ClauseType::Svo);
        assert_eq!(clauses[0].direct_object().map(|s| s.text()), Some("the Nobel Prize".into()));
    }

    #[test]
    fn test_subject_through_conjunct() {
        // "Chester is a banker but is dreaming ."
        let graph = TokenGraph::new(vec![
            tok("Chester", "Chester", Pos::Propn, Dep::Nsubj, Some(1)),
            tok("is", "be", Pos::Aux, Dep::Root, None),
            tok("a", "a", Pos::Det, Dep::Det, Some(3)),
            tok("banker", "banker", Pos::Noun, Dep::Attr, Some(1)),
            tok("but", "but", Pos::Cconj, Dep::Cc, Some(1)),
            tok("is", "be", Pos::Aux, Dep::Aux, Some(6)),
            tok("dreaming", "dream", Pos::Verb, Dep::Conj, Some(1)),
            tok(".", ".", Pos::Punct, Dep::Punct, Some(1)),
        ])
        .unwrap();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig::default();
        let extractor = ConstituentExtractor::new(&lexicon, &config);

        let clauses = extractor.extract_clauses(sentence(&graph)).unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].clause_type(), ClauseType::Svc);
        assert_eq!(clauses[1].subject().text(), "Chester");
        assert_eq!(clauses[1].verb().map(|v| v.text()), Some("is dreaming".into()));
    }

    #[test]
    fn test_subject_from_subordinate_clause() {
        // "When Bo left , cried ."
        let graph = TokenGraph::new(vec![
            tok("When", "when", Pos::Sconj, Dep::Advmod, Some(2)),
            tok("Bo", "Bo", Pos::Propn, Dep::Nsubj, Some(2)),
            tok("left", "leave", Pos::Verb, Dep::Advcl, Some(4)),
            tok(",", ",", Pos::Punct, Dep::Punct, Some(4)),
            tok("cried", "cry", Pos::Verb, Dep::Root, None),
            tok(".", ".", Pos::Punct, Dep::Punct, Some(4)),
        ])
        .unwrap();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig::default();
        let extractor = ConstituentExtractor::new(&lexicon, &config);
        let sentence = sentence(&graph);

        let cried = graph.get(4).unwrap();
        let subject = extractor.resolve_subject(sentence, cried).unwrap().unwrap();
        assert_eq!(subject.text(), "Bo");

        let left = graph.get(2).unwrap();
        let helper = extractor.subject_of_verb(sentence, left).unwrap().unwrap();
        assert_eq!(helper.index, 1);

        assert_eq!(extractor.extract_clauses(sentence).unwrap().len(), 2);
    }

    #[test]
    fn test_appositive_clause_comes_first() {
        // "Bell , a company , makes products ."
        let graph = TokenGraph::new(vec![
            tok("Bell", "Bell", Pos::Propn, Dep::Nsubj, Some(5)),
            tok(",", ",", Pos::Punct, Dep::Punct, Some(0)),
            tok("a", "a", Pos::Det, Dep::Det, Some(3)),
            tok("company", "company", Pos::Noun, Dep::Appos, Some(0)),
            tok(",", ",", Pos::Punct, Dep::Punct, Some(0)),
            tok("makes", "make", Pos::Verb, Dep::Root, None),
            tok("products", "product", Pos::Noun, Dep::Dobj, Some(5)),
            tok(".", ".", Pos::Punct, Dep::Punct, Some(5)),
        ])
        .unwrap();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig::default();
        let extractor = ConstituentExtractor::new(&lexicon, &config);

        let clauses = extractor.extract_clauses(sentence(&graph)).unwrap();
        assert_eq!(clauses.len(), 2);
        assert!(clauses[0].verb().is_none());
        assert_eq!(clauses[0].clause_type(), ClauseType::Svc);
        assert_eq!(clauses[0].complement().map(|c| c.text()), Some("a company".into()));
        assert_eq!(clauses[1].clause_type(), ClauseType::Svo);
    }

    #[test]
    fn test_ignored_adverbs_filtered_on_request() {
        // "AE then left"
        let graph = TokenGraph::new(vec![
            tok("AE", "AE", Pos::Propn, Dep::Nsubj, Some(2)),
            tok("then", "then", Pos::Adv, Dep::Advmod, Some(2)),
            tok("left", "leave", Pos::Verb, Dep::Root, None),
        ])
        .unwrap();
        let lexicon = Lexicon::default();

        let config = ExtractionConfig::default();
        let clauses = ConstituentExtractor::new(&lexicon, &config)
            .extract_clauses(sentence(&graph))
            .unwrap();
        assert_eq!(clauses[0].adverbials().len(), 1);
        assert_eq!(clauses[0].clause_type(), ClauseType::Sva);

        let config = ExtractionConfig {
            filter_ignored_adverbs: true,
            ..Default::default()
        };
        let clauses = ConstituentExtractor::new(&lexicon, &config)
            .extract_clauses(sentence(&graph))
            .unwrap();
        assert!(clauses[0].adverbials().is_empty());
        assert_eq!(clauses[0].clause_type(), ClauseType::Sv);
    }

    #[test]
    fn test_cross_sentence_reference_fails_only_that_sentence() {
        // "AE died" "Bo slept ." with the final period attached to "died"
        let graph = TokenGraph::with_sentences(
            vec![
                tok("AE", "AE", Pos::Propn, Dep::Nsubj, Some(1)),
                tok("died", "die", Pos::Verb, Dep::Root, None),
                tok("Bo", "Bo", Pos::Propn, Dep::Nsubj, Some(3)),
                tok("slept", "sleep", Pos::Verb, Dep::Root, None),
                tok(".", ".", Pos::Punct, Dep::Punct, Some(1)),
            ],
            vec![(0, 2), (2, 5)],
        )
        .unwrap();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig::default();
        let extractor = ConstituentExtractor::new(&lexicon, &config);

        let results = extractor.extract_document(&graph);
        assert_eq!(results.len(), 2);
        assert!(results[0].as_ref().unwrap_err().is_structural());
        assert_eq!(results[1].as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_climbing_out_of_sentence_fails() {
        // "AE died ." "and slept" where "slept" is a conjunct of "died"
        let graph = TokenGraph::with_sentences(
            vec![
                tok("AE", "AE", Pos::Propn, Dep::Nsubj, Some(1)),
                tok("died", "die", Pos::Verb, Dep::Root, None),
                tok("and", "and", Pos::Cconj, Dep::Cc, Some(3)),
                tok("slept", "sleep", Pos::Verb, Dep::Conj, Some(1)),
            ],
            vec![(0, 2), (2, 4)],
        )
        .unwrap();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig::default();
        let extractor = ConstituentExtractor::new(&lexicon, &config);

        let second = graph.sentences().nth(1).unwrap().unwrap();
        let err = extractor.extract_clauses(second).unwrap_err();
        assert!(err.is_structural());
    }

    /// "AE , who was born in Ulm , died ."
    fn born_in_ulm() -> TokenGraph {
        TokenGraph::new(vec![
            tok("AE", "AE", Pos::Propn, Dep::Nsubj, Some(8)),
            tok(",", ",", Pos::Punct, Dep::Punct, Some(0)),
            tok("who", "who", Pos::Pron, Dep::Nsubjpass, Some(4)),
            tok("was", "be", Pos::Aux, Dep::Auxpass, Some(4)),
            tok("born", "bear", Pos::Verb, Dep::Relcl, Some(0)),
            tok("in", "in", Pos::Adp, Dep::Prep, Some(4)),
            tok("Ulm", "Ulm", Pos::Propn, Dep::Pobj, Some(5)),
            tok(",", ",", Pos::Punct, Dep::Punct, Some(0)),
            tok("died", "die", Pos::Verb, Dep::Root, None),
            tok(".", ".", Pos::Punct, Dep::Punct, Some(8)),
        ])
        .unwrap()
    }

    #[test]
    fn test_relative_pronoun_kept_by_default() {
        let graph = born_in_ulm();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig::default();

        let clauses = ConstituentExtractor::new(&lexicon, &config)
            .extract_clauses(sentence(&graph))
            .unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].subject().text(), "who");
    }

    #[test]
    fn test_relative_pronoun_resolved_to_antecedent() {
        let graph = born_in_ulm();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig {
            resolve_relative_pronouns: true,
            ..Default::default()
        };

        let clauses = ConstituentExtractor::new(&lexicon, &config)
            .extract_clauses(sentence(&graph))
            .unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].verb().map(|v| v.text()), Some("was born".into()));
        assert_eq!(clauses[0].subject().root_index(), 0);

        let props = clauses[0].propositions().unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].to_string(), "(AE, was born, in Ulm)");
        assert_eq!(clauses[1].subject().root_index(), 0);
    }

    #[test]
    fn test_relative_where_resolved_to_prepositional_phrase() {
        // "AE lived in Bern , where he worked ."
        let graph = TokenGraph::new(vec![
            tok("AE", "AE", Pos::Propn, Dep::Nsubj, Some(1)),
            tok("lived", "live", Pos::Verb, Dep::Root, None),
            tok("in", "in", Pos::Adp, Dep::Prep, Some(1)),
            tok("Bern", "Bern", Pos::Propn, Dep::Pobj, Some(2)),
            tok(",", ",", Pos::Punct, Dep::Punct, Some(3)),
            tok("where", "where", Pos::Adv, Dep::Advmod, Some(7)),
            tok("he", "he", Pos::Pron, Dep::Nsubj, Some(7)),
            tok("worked", "work", Pos::Verb, Dep::Relcl, Some(3)),
            tok(".", ".", Pos::Punct, Dep::Punct, Some(1)),
        ])
        .unwrap();
        let lexicon = Lexicon::default();
        let config = ExtractionConfig {
            resolve_relative_pronouns: true,
            ..Default::default()
        };

        let clauses = ConstituentExtractor::new(&lexicon, &config)
            .extract_clauses(sentence(&graph))
            .unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[1].subject().text(), "he");
        let adverbials: Vec<usize> = clauses[1].adverbials().iter().map(|a| a.root_index()).collect();
        assert_eq!(adverbials, vec![2]);

        let config = ExtractionConfig::default();
        let clauses = ConstituentExtractor::new(&lexicon, &config)
            .extract_clauses(sentence(&graph))
            .unwrap();
        assert_eq!(clauses[1].adverbials()[0].text(), "where");
    }
}
