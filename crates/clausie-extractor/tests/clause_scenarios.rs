//! Clause extraction scenarios
//!
//! Each fixture under `tests/fixtures/` is a hand-built dependency parse in
//! the parser collaborator's JSON format (spaCy ClearNLP labels).
//!
//! Author: hephaex@gmail.com

use clausie_core::{ClausieConfig, ExtractionConfig, Lexicon, Result, TokenGraph};
use clausie_extractor::{
    ClausePipeline, ClauseType, ConstituentExtractor, CoordinationExpander, DependencyParser,
    TextRenderer,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "died" => include_str!("fixtures/died.json"),
        "remained" => include_str!("fixtures/remained.json"),
        "is_smart" => include_str!("fixtures/is_smart.json"),
        "has_won" => include_str!("fixtures/has_won.json"),
        "gave" => include_str!("fixtures/gave.json"),
        "showed" => include_str!("fixtures/showed.json"),
        "died_in" => include_str!("fixtures/died_in.json"),
        "remained_until" => include_str!("fixtures/remained_until.json"),
        "scientist" => include_str!("fixtures/scientist.json"),
        "won_1921" => include_str!("fixtures/won_1921.json"),
        "chester" => include_str!("fixtures/chester.json"),
        "coordinated_subject" => include_str!("fixtures/coordinated_subject.json"),
        "appositive" => include_str!("fixtures/appositive.json"),
        "slept_in" => include_str!("fixtures/slept_in.json"),
        "document" => include_str!("fixtures/document.json"),
        "born_in_ulm" => include_str!("fixtures/born_in_ulm.json"),
        other => panic!("unknown fixture {other}"),
    }
}

fn load(name: &str) -> TokenGraph {
    TokenGraph::from_json(fixture(name)).unwrap()
}

/// Clause types and rendered propositions of the first sentence
fn analyze(graph: &TokenGraph, config: &ExtractionConfig) -> Vec<(ClauseType, Vec<String>)> {
    let lexicon = Lexicon::default();
    let extractor = ConstituentExtractor::new(&lexicon, config);
    let renderer = TextRenderer::default();

    let sentence = graph.sentences().next().unwrap().unwrap();
    extractor
        .extract_clauses(sentence)
        .unwrap()
        .iter()
        .map(|c| (c.clause_type(), c.to_texts(&renderer).unwrap()))
        .collect()
}

fn single(name: &str) -> (ClauseType, Vec<String>) {
    let graph = load(name);
    let mut clauses = analyze(&graph, &ExtractionConfig::default());
    assert_eq!(clauses.len(), 1, "expected one clause for {name}");
    clauses.remove(0)
}

// =============================================================================
// Clause types
// =============================================================================

#[test]
fn test_sv() {
    assert_eq!(single("died"), (ClauseType::Sv, vec!["AE died".to_string()]));
}

#[test]
fn test_sva() {
    assert_eq!(
        single("remained"),
        (ClauseType::Sva, vec!["AE remained in Princeton".to_string()])
    );
}

#[test]
fn test_svc_with_auxiliary_root() {
    assert_eq!(
        single("is_smart"),
        (ClauseType::Svc, vec!["AE is smart".to_string()])
    );
}

#[test]
fn test_svo_with_auxiliary_chunk() {
    assert_eq!(
        single("has_won"),
        (ClauseType::Svo, vec!["AE has won the Nobel Prize".to_string()])
    );
}

#[test]
fn test_svoo() {
    assert_eq!(
        single("gave"),
        (ClauseType::Svoo, vec!["RSAS gave AE the Nobel Prize".to_string()])
    );
}

#[test]
fn test_svoa_complex_transitive() {
    assert_eq!(
        single("showed"),
        (
            ClauseType::Svoa,
            vec!["The doorman showed AE to his office".to_string()]
        )
    );
}

#[test]
fn test_svc_complement_drops_modifier_phrase() {
    assert_eq!(
        single("scientist"),
        (ClauseType::Svc, vec!["AE is a scientist".to_string()])
    );
}

// =============================================================================
// Adverbial expansion
// =============================================================================

#[test]
fn test_sv_with_two_adverbials() {
    let (clause_type, texts) = single("died_in");
    assert_eq!(clause_type, ClauseType::Sv);
    assert_eq!(
        texts,
        vec![
            "AE died in Princeton",
            "AE died in Princeton in 1955",
            "AE died in 1955",
        ]
    );
}

#[test]
fn test_sva_with_two_adverbials() {
    let (clause_type, texts) = single("remained_until");
    assert_eq!(clause_type, ClauseType::Sva);
    assert_eq!(
        texts,
        vec![
            "AE remained in Princeton",
            "AE remained in Princeton until his death",
            "AE remained until his death",
        ]
    );
}

#[test]
fn test_svo_with_adverbial() {
    let (clause_type, texts) = single("won_1921");
    assert_eq!(clause_type, ClauseType::Svo);
    assert_eq!(
        texts,
        vec![
            "AE has won the Nobel Prize",
            "AE has won the Nobel Prize in 1921",
        ]
    );
}

#[test]
fn test_conservative_promotes_unknown_verb() {
    let graph = load("slept_in");

    let liberal = analyze(&graph, &ExtractionConfig::default());
    assert_eq!(liberal[0].0, ClauseType::Sv);

    let conservative = ExtractionConfig {
        conservative: true,
        ..Default::default()
    };
    let strict = analyze(&graph, &conservative);
    assert_eq!(strict[0].0, ClauseType::Sva);
    assert_eq!(strict[0].1, liberal[0].1);
}

// =============================================================================
// Subjects, coordination and appositives
// =============================================================================

#[test]
fn test_conjunct_borrows_subject() {
    let graph = load("chester");
    let clauses = analyze(&graph, &ExtractionConfig::default());
    let texts: Vec<String> = clauses.into_iter().flat_map(|(_, t)| t).collect();
    assert_eq!(
        texts,
        vec![
            "Chester is a banker",
            "Chester is dreaming of becoming a great dancer",
        ]
    );
}

#[test]
fn test_coordinated_subject_fans_out() {
    let graph = load("coordinated_subject");

    let spans = CoordinationExpander::default()
        .expand(clausie_core::Span::subtree(&graph, 0).unwrap())
        .unwrap();
    assert_eq!(spans.len(), 3);

    let clauses = analyze(&graph, &ExtractionConfig::default());
    assert_eq!(clauses.len(), 1);
    assert_eq!(clauses[0].0, ClauseType::Sv);
    assert_eq!(clauses[0].1, vec!["Alice slept", "Bob slept", "Carol slept"]);
}

#[test]
fn test_collapsed_coordination() {
    let graph = load("coordinated_subject");
    let config = ExtractionConfig {
        coordination: clausie_core::CoordinationStyle::Collapsed,
        ..Default::default()
    };
    let lexicon = Lexicon::default();
    let sentence = graph.sentences().next().unwrap().unwrap();
    let clauses = ConstituentExtractor::new(&lexicon, &config)
        .extract_clauses(sentence)
        .unwrap();

    let generator = clausie_extractor::PropositionGenerator::new(config.coordination);
    let record = clauses[0]
        .to_record(&generator, &TextRenderer::default())
        .unwrap();
    assert_eq!(record.propositions, vec!["Alice , slept"]);
}

#[test]
fn test_appositive_yields_extra_clause() {
    let graph = load("appositive");
    let clauses = analyze(&graph, &ExtractionConfig::default());
    assert_eq!(
        clauses,
        vec![
            (
                ClauseType::Svc,
                vec!["Bell is a telecommunication company".to_string()]
            ),
            (ClauseType::Svo, vec!["Bell makes products".to_string()]),
        ]
    );
}

#[test]
fn test_relative_clause_subject() {
    let graph = load("born_in_ulm");

    let literal = analyze(&graph, &ExtractionConfig::default());
    assert_eq!(
        literal,
        vec![
            (ClauseType::Sv, vec!["who was born in Ulm".to_string()]),
            (ClauseType::Sv, vec!["AE died".to_string()]),
        ]
    );

    let resolving = ExtractionConfig {
        resolve_relative_pronouns: true,
        ..Default::default()
    };
    let resolved = analyze(&graph, &resolving);
    assert_eq!(
        resolved,
        vec![
            (ClauseType::Sv, vec!["AE was born in Ulm".to_string()]),
            (ClauseType::Sv, vec!["AE died".to_string()]),
        ]
    );
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_extraction_is_idempotent() {
    for name in ["died_in", "remained_until", "chester", "coordinated_subject", "gave"] {
        let graph = load(name);
        let lexicon = Lexicon::default();
        let config = ExtractionConfig::default();
        let extractor = ConstituentExtractor::new(&lexicon, &config);
        let sentence = graph.sentences().next().unwrap().unwrap();

        let run = || -> Vec<Vec<String>> {
            extractor
                .extract_clauses(sentence)
                .unwrap()
                .iter()
                .map(|c| {
                    c.propositions()
                        .unwrap()
                        .iter()
                        .map(|p| p.to_string())
                        .collect()
                })
                .collect()
        };
        assert_eq!(run(), run(), "non-deterministic output for {name}");
    }
}

// =============================================================================
// Pipeline over a parser collaborator
// =============================================================================

/// Parser stub serving the document fixture
struct FixtureParser;

impl DependencyParser for FixtureParser {
    fn parse(&self, _text: &str) -> Result<TokenGraph> {
        TokenGraph::from_json(fixture("document"))
    }
}

#[test]
fn test_pipeline_document() {
    let mut config = ClausieConfig::default();
    config.rendering.capitalize = true;

    let pipeline = ClausePipeline::from_config(FixtureParser, config).unwrap();
    let analysis = pipeline
        .analyze("AE died. AE remained in Princeton.")
        .unwrap();

    assert!(!analysis.reparsed);
    assert!(analysis.failures.is_empty());
    assert_eq!(analysis.sentences.len(), 2);
    assert_eq!(analysis.sentences[1].text, "AE remained in Princeton .");
    assert_eq!(
        analysis.propositions().collect::<Vec<_>>(),
        vec!["AE died.", "AE remained in Princeton."]
    );

    let record = &analysis.sentences[1].clauses[0];
    assert_eq!(record.clause_type, ClauseType::Sva);
    assert_eq!(record.adverbials, vec!["in Princeton"]);
}
