//! Proposition text rendering

use std::collections::HashMap;

use clausie_core::{Dep, Pos, RenderConfig, Token, TokenGraph};

use crate::proposition::{Constituent, Proposition, Role};
use crate::Inflector;

/// Renders propositions as text, in role order
pub struct TextRenderer<'a> {
    inflector: Option<&'a dyn Inflector>,
    inflect_form: Option<String>,
    capitalize: bool,
}

impl Default for TextRenderer<'_> {
    fn default() -> Self {
        Self::new(None, false)
    }
}

impl std::fmt::Debug for TextRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("inflector", &self.inflector.is_some())
            .field("inflect_form", &self.inflect_form)
            .field("capitalize", &self.capitalize)
            .finish()
    }
}

impl<'a> TextRenderer<'a> {
    pub fn new(inflect_form: Option<String>, capitalize: bool) -> Self {
        Self {
            inflector: None,
            inflect_form,
            capitalize,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.inflect_form.clone(), config.capitalize)
    }

    /// Attach the inflection collaborator. Verbs are only inflected when a
    /// target form is configured as well.
    pub fn with_inflector<'b>(self, inflector: &'b dyn Inflector) -> TextRenderer<'b> {
        TextRenderer {
            inflector: Some(inflector),
            inflect_form: self.inflect_form,
            capitalize: self.capitalize,
        }
    }

    pub fn render(&self, proposition: &Proposition<'_>) -> String {
        let mut parts: Vec<&(Role, Constituent<'_>)> = proposition.parts().iter().collect();
        parts.sort_by_key(|(role, _)| *role);

        let mut words = Vec::new();
        for (role, constituent) in parts {
            match constituent {
                Constituent::Copula => words.push(Constituent::COPULA_TEXT.to_string()),
                Constituent::Span(span) => {
                    for token in span.tokens() {
                        words.push(self.render_token(span.graph(), token, *role));
                    }
                }
            }
        }

        let text = words.join(" ");
        if self.capitalize {
            capitalize(&text)
        } else {
            text
        }
    }

    fn render_token(&self, graph: &TokenGraph, token: &Token, role: Role) -> String {
        let (Some(inflector), Some(form)) = (self.inflector, self.inflect_form.as_deref()) else {
            return token.text.clone();
        };
        if role != Role::Verb || token.pos != Pos::Verb {
            return token.text.clone();
        }

        // Already finite after an auxiliary, or a gerund under a preposition
        let has_aux = graph.lefts(token).any(|left| left.pos == Pos::Aux);
        if has_aux || token.dep == Dep::Pcomp {
            return token.text.clone();
        }

        inflector
            .inflect(token, form)
            .unwrap_or_else(|| token.text.clone())
    }
}

/// Upper-case the first character and close with a period
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Inflector backed by a `(lemma, form) -> text` table
#[derive(Debug, Clone, Default)]
pub struct TableInflector {
    forms: HashMap<(String, String), String>,
}

impl TableInflector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lemma: &str, form: &str, text: impl Into<String>) {
        self.forms
            .insert((lemma.to_lowercase(), form.to_string()), text.into());
    }

    pub fn with_form(mut self, lemma: &str, form: &str, text: impl Into<String>) -> Self {
        self.insert(lemma, form, text);
        self
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Inflector for TableInflector {
    fn inflect(&self, token: &Token, form: &str) -> Option<String> {
        self.forms
            .get(&(token.lemma.to_lowercase(), form.to_string()))
            .cloned()
    }
}
