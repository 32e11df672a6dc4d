//! Full-text query parsing and matching
//!
//! Supports the subset of Lucene syntax the store relies on: `*`, terms,
//! trailing-wildcard prefixes, quoted phrases, `field:` scoping with optional
//! `( ... )` groups, backslash escapes and the `OR` keyword. Clauses are
//! combined with OR; the score of an entity is the number of clauses it
//! satisfies.

use crate::types::Entity;

/// Entity properties covered by the full-text index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Type,
    Observations,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "type" => Some(Self::Type),
            "observations" => Some(Self::Observations),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Any,
    Only(Field),
    /// A field the index does not cover; never matches
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Term(String),
    Prefix(String),
    Phrase(Vec<String>),
}

impl Pattern {
    fn matches(&self, tokens: &[String]) -> bool {
        match self {
            Pattern::Term(term) => tokens.iter().any(|t| t == term),
            Pattern::Prefix(prefix) => tokens.iter().any(|t| t.starts_with(prefix.as_str())),
            Pattern::Phrase(phrase) => {
                !phrase.is_empty()
                    && tokens.len() >= phrase.len()
                    && tokens.windows(phrase.len()).any(|w| w == phrase.as_slice())
            }
        }
    }
}

/// One OR-ed clause of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    scope: Scope,
    pattern: Pattern,
}

/// A parsed full-text query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullTextQuery {
    MatchAll,
    Clauses(Vec<Clause>),
}

impl FullTextQuery {
    /// Parse a query string. Errors describe the first syntax problem found.
    pub fn parse(input: &str) -> Result<Self, String> {
        if input.trim() == "*" {
            return Ok(Self::MatchAll);
        }
        let mut parser = Parser::new(input);
        let clauses = parser.clauses(Scope::Any, false)?;
        Ok(Self::Clauses(clauses))
    }

    /// Relevance score of an entity, `None` when it does not match
    pub fn score(&self, entity: &Entity) -> Option<f64> {
        match self {
            Self::MatchAll => Some(1.0),
            Self::Clauses(clauses) => {
                let hits = clauses.iter().filter(|c| clause_matches(c, entity)).count();
                (hits > 0).then_some(hits as f64)
            }
        }
    }
}

fn clause_matches(clause: &Clause, entity: &Entity) -> bool {
    let check = |text: &str| clause.pattern.matches(&tokenize(text));
    let field_matches = |field: Field| match field {
        Field::Name => check(&entity.name),
        Field::Type => check(&entity.entity_type),
        Field::Observations => entity.observations.iter().any(|o| check(o.as_str())),
    };

    match clause.scope {
        Scope::Any => [Field::Name, Field::Type, Field::Observations]
            .into_iter()
            .any(field_matches),
        Scope::Only(field) => field_matches(field),
        Scope::Unknown => false,
    }
}

/// Split text into lowercase alphanumeric tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Quote text so it is matched as one literal phrase
pub fn escape_phrase(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Query matching any of the given names exactly as phrases on the `name` field
pub fn names_query(names: &[String]) -> String {
    let phrases: Vec<String> = names.iter().map(|n| escape_phrase(n)).collect();
    format!("name:({})", phrases.join(" "))
}

/// A raw word as read from the input, before tokenization
struct Word {
    text: String,
    wildcard: bool,
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn clauses(&mut self, scope: Scope, in_group: bool) -> Result<Vec<Clause>, String> {
        let mut clauses = Vec::new();
        loop {
            self.skip_whitespace();
            match self.chars.peek().copied() {
                None if in_group => return Err("unterminated group, expected ')'".to_string()),
                None => return Ok(clauses),
                Some(')') if in_group => {
                    self.chars.next();
                    return Ok(clauses);
                }
                Some(')') => return Err("unexpected ')'".to_string()),
                Some('(') => {
                    self.chars.next();
                    clauses.extend(self.clauses(scope, true)?);
                }
                Some('"') => {
                    self.chars.next();
                    let phrase = self.phrase()?;
                    clauses.extend(phrase_clause(scope, &phrase));
                }
                Some(_) => {
                    let word = self.word()?;
                    if self.chars.peek() == Some(&':') {
                        self.chars.next();
                        if scope != Scope::Any {
                            return Err("nested field scope".to_string());
                        }
                        let field_scope = match Field::parse(&word.text) {
                            Some(field) => Scope::Only(field),
                            None => Scope::Unknown,
                        };
                        clauses.extend(self.field_value(field_scope)?);
                    } else if word.text == "OR" && !word.wildcard {
                        continue;
                    } else {
                        clauses.extend(word_clause(scope, word));
                    }
                }
            }
        }
    }

    fn field_value(&mut self, scope: Scope) -> Result<Vec<Clause>, String> {
        match self.chars.peek().copied() {
            Some('(') => {
                self.chars.next();
                self.clauses(scope, true)
            }
            Some('"') => {
                self.chars.next();
                let phrase = self.phrase()?;
                Ok(phrase_clause(scope, &phrase).into_iter().collect())
            }
            Some(c) if !c.is_whitespace() && c != ')' => {
                let word = self.word()?;
                Ok(word_clause(scope, word).into_iter().collect())
            }
            _ => Err("missing value after field".to_string()),
        }
    }

    fn phrase(&mut self) -> Result<String, String> {
        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => return Err("unterminated phrase, expected '\"'".to_string()),
                Some('"') => return Ok(text),
                Some('\\') => match self.chars.next() {
                    Some(c) => text.push(c),
                    None => return Err("dangling escape".to_string()),
                },
                Some(c) => text.push(c),
            }
        }
    }

    fn word(&mut self) -> Result<Word, String> {
        let mut text = String::new();
        let mut wildcard = false;
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ':') {
                break;
            }
            self.chars.next();
            match c {
                '\\' => match self.chars.next() {
                    Some(escaped) => {
                        text.push(escaped);
                        wildcard = false;
                    }
                    None => return Err("dangling escape".to_string()),
                },
                '*' => wildcard = true,
                _ => {
                    if wildcard {
                        // wildcard in the middle of a word degrades to a plain term
                        wildcard = false;
                    }
                    text.push(c);
                }
            }
        }
        Ok(Word { text, wildcard })
    }
}

fn phrase_clause(scope: Scope, phrase: &str) -> Option<Clause> {
    let tokens = tokenize(phrase);
    if tokens.is_empty() {
        return None;
    }
    Some(Clause {
        scope,
        pattern: Pattern::Phrase(tokens),
    })
}

fn word_clause(scope: Scope, word: Word) -> Option<Clause> {
    let mut tokens = tokenize(&word.text);
    let pattern = match (tokens.len(), word.wildcard) {
        (0, true) => Pattern::Prefix(String::new()),
        (0, false) => return None,
        (1, true) => Pattern::Prefix(tokens.remove(0)),
        (1, false) => Pattern::Term(tokens.remove(0)),
        _ => Pattern::Phrase(tokens),
    };
    Some(Clause { scope, pattern })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Entity {
        Entity::with_observations("Alice Smith", "Person", ["Software developer", "likes cats"])
    }

    fn matches(query: &str, entity: &Entity) -> bool {
        FullTextQuery::parse(query).unwrap().score(entity).is_some()
    }

    #[test]
    fn test_match_all() {
        assert_eq!(FullTextQuery::parse(" * ").unwrap(), FullTextQuery::MatchAll);
        assert!(matches("*", &alice()));
    }

    #[test]
    fn test_terms_match_any_field() {
        let entity = alice();
        assert!(matches("alice", &entity));
        assert!(matches("PERSON", &entity));
        assert!(matches("cats", &entity));
        assert!(!matches("dogs", &entity));
        assert!(matches("dogs OR cats", &entity));
    }

    #[test]
    fn test_prefix_and_phrase() {
        let entity = alice();
        assert!(matches("dev*", &entity));
        assert!(!matches("dev", &entity));
        assert!(matches("\"likes cats\"", &entity));
        assert!(!matches("\"cats likes\"", &entity));
    }

    #[test]
    fn test_field_scoping() {
        let entity = alice();
        assert!(matches("name:alice", &entity));
        assert!(!matches("type:alice", &entity));
        assert!(matches("observations:(dogs cats)", &entity));
        assert!(!matches("color:alice", &entity));
    }

    #[test]
    fn test_score_counts_matching_clauses() {
        let query = FullTextQuery::parse("alice person dogs").unwrap();
        assert_eq!(query.score(&alice()), Some(2.0));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(FullTextQuery::parse("name:(alice").is_err());
        assert!(FullTextQuery::parse("\"open phrase").is_err());
        assert!(FullTextQuery::parse("alice)").is_err());
        assert!(FullTextQuery::parse("name:").is_err());
    }

    #[test]
    fn test_names_query_round_trips_through_parser() {
        let names = vec!["Alice Smith".to_string(), "Quote \"Q\" \\ Person".to_string()];
        let query = names_query(&names);
        assert_eq!(
            query,
            "name:(\"Alice Smith\" \"Quote \\\"Q\\\" \\\\ Person\")"
        );

        let parsed = FullTextQuery::parse(&query).unwrap();
        assert!(parsed.score(&alice()).is_some());
        assert!(parsed
            .score(&Entity::new("Quote \"Q\" \\ Person", "Thing"))
            .is_some());
        // scoped to name only
        assert!(parsed.score(&Entity::new("Bob", "Alice Smith")).is_none());
    }

    #[test]
    fn test_tokenize_keeps_short_tokens() {
        assert_eq!(tokenize("A -> b, Cé!"), vec!["a", "b", "cé"]);
    }
}
