//! Named rule table
//!
//! Rules refer to each other by name, so a grammar is assembled by defining
//! every rule up front and resolving references when they are first run.
//! Defining the same name twice is an error rather than a silent overwrite.

use crate::driver::Parser;
use crate::error::GrammarError;
use crate::rule::Rule;
use crate::value::is_reserved;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GRAMMAR_ID: AtomicU64 = AtomicU64::new(0);

/// Limits applied while running a grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarConfig {
    /// Deepest allowed nesting of running segments
    pub max_depth: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        GrammarConfig { max_depth: 256 }
    }
}

#[derive(Debug)]
pub struct Grammar {
    id: u64,
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
    config: GrammarConfig,
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        Grammar::with_config(GrammarConfig::default())
    }

    pub fn with_config(config: GrammarConfig) -> Self {
        Grammar {
            id: NEXT_GRAMMAR_ID.fetch_add(1, Ordering::Relaxed),
            rules: Vec::new(),
            index: HashMap::new(),
            config,
        }
    }

    /// Add a rule under its own name
    pub fn define(&mut self, rule: Rule) -> Result<&mut Self, GrammarError> {
        if self.index.contains_key(rule.name()) {
            return Err(GrammarError::DuplicateRule(rule.name().to_string()));
        }
        if let Some(key) = rule
            .segments()
            .iter()
            .filter_map(|segment| segment.options().key.as_deref())
            .find(|key| is_reserved(key))
        {
            return Err(GrammarError::ReservedKey {
                rule: rule.name().to_string(),
                key: key.to_string(),
            });
        }

        self.index.insert(rule.name().to_string(), self.rules.len());
        self.rules.push(rule);
        Ok(self)
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.index_of(name).and_then(|index| self.rules.get(index))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    /// Check that every referenced rule name is defined
    pub fn validate(&self) -> Result<(), GrammarError> {
        for rule in &self.rules {
            for segment in rule.segments() {
                if let Some(reference) = segment
                    .references()
                    .iter()
                    .find(|reference| !self.index.contains_key(reference.as_str()))
                {
                    return Err(GrammarError::UnknownRule {
                        rule: rule.name().to_string(),
                        reference: reference.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn parser(&self, root: impl Into<String>) -> Parser<'_> {
        Parser::new(self, root)
    }

    /// Identifies this grammar in reference caches
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn rule_at(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut grammar = Grammar::new();
        grammar
            .define(Rule::new("number").expect_type("number").key("value"))
            .unwrap()
            .define(Rule::new("atom").then("number"))
            .unwrap();

        assert_eq!(grammar.rules().len(), 2);
        assert_eq!(grammar.rule("atom").map(Rule::name), Some("atom"));
        assert!(grammar.rule("missing").is_none());
    }

    #[test]
    fn test_duplicate_rule() {
        let mut grammar = Grammar::new();
        grammar.define(Rule::new("atom")).unwrap();
        let error = grammar.define(Rule::new("atom")).unwrap_err();
        assert_eq!(error, GrammarError::DuplicateRule("atom".to_string()));
    }

    #[test]
    fn test_reserved_key_at_define() {
        let mut grammar = Grammar::new();
        let error = grammar
            .define(Rule::new("node").expect_type("identifier").key("type"))
            .unwrap_err();
        assert_eq!(
            error,
            GrammarError::ReservedKey {
                rule: "node".to_string(),
                key: "type".to_string(),
            }
        );
    }

    #[test]
    fn test_validate_reports_unknown_reference() {
        let mut grammar = Grammar::new();
        grammar
            .define(Rule::new("list").optional("element").until_eof("item"))
            .unwrap()
            .define(Rule::new("item").expect_type("identifier"))
            .unwrap();

        assert_eq!(
            grammar.validate(),
            Err(GrammarError::UnknownRule {
                rule: "list".to_string(),
                reference: "element".to_string(),
            })
        );

        grammar.define(Rule::new("element")).unwrap();
        assert_eq!(grammar.validate(), Ok(()));
    }

    #[test]
    fn test_grammars_have_distinct_ids() {
        assert_ne!(Grammar::new().id(), Grammar::new().id());
    }

    #[test]
    fn test_default_depth() {
        assert_eq!(Grammar::default().config().max_depth, 256);
    }
}
