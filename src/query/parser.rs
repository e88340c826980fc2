//! Tokenizer and recursive-descent parser for the `SELECT` subset.

use std::collections::BTreeMap;

use super::{PatternTerm, Projection, Query, TriplePattern};
use crate::error::{KernelError, Result};
use crate::types::Term;
use crate::vocab::{rdf, DEFAULT_PREFIXES};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Bare word: keyword, `a`, prefixed name, or integer.
    Word(String),
    Var(String),
    Iri(String),
    Literal(String),
    LBrace,
    RBrace,
    Dot,
    Star,
}

fn bad(msg: impl Into<String>) -> KernelError {
    KernelError::BadQuery(msg.into())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':')
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                // Comment to end of line.
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '{' => {
                chars.next();
                tokens.push(Token::LBrace);
            }
            '}' => {
                chars.next();
                tokens.push(Token::RBrace);
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '<' => {
                chars.next();
                let mut iri = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(c) if c.is_whitespace() || c == '<' => {
                            return Err(bad(format!("invalid character {:?} in IRI", c)))
                        }
                        Some(c) => iri.push(c),
                        None => return Err(bad("unterminated IRI")),
                    }
                }
                tokens.push(Token::Iri(iri));
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some('r') => value.push('\r'),
                            Some(c @ ('"' | '\\')) => value.push(c),
                            Some(c) => return Err(bad(format!("unknown escape \\{}", c))),
                            None => return Err(bad("unterminated string literal")),
                        },
                        Some(c) => value.push(c),
                        None => return Err(bad("unterminated string literal")),
                    }
                }
                if matches!(chars.peek(), Some('@') | Some('^')) {
                    return Err(bad("language tags and datatypes are not supported"));
                }
                tokens.push(Token::Literal(value));
            }
            '?' | '$' => {
                chars.next();
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(bad("empty variable name"));
                }
                tokens.push(Token::Var(name));
            }
            c if is_word_char(c) => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if is_word_char(c) {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Word(word));
            }
            other => return Err(bad(format!("unexpected character {:?}", other))),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    prefixes: BTreeMap<String, String>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        let prefixes = DEFAULT_PREFIXES
            .iter()
            .map(|(p, ns)| (p.to_string(), ns.to_string()))
            .collect();
        Self {
            tokens,
            pos: 0,
            prefixes,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(bad(format!("expected {:?}, found {:?}", expected, token))),
            None => Err(bad(format!("expected {:?}, found end of query", expected))),
        }
    }

    fn parse_query(mut self) -> Result<Query> {
        while self.eat_keyword("PREFIX") {
            self.parse_prefix_decl()?;
        }

        if !self.eat_keyword("SELECT") {
            return Err(bad("only SELECT queries are supported"));
        }
        let distinct = self.eat_keyword("DISTINCT");
        let projection = self.parse_projection()?;

        self.eat_keyword("WHERE");
        self.expect(Token::LBrace)?;
        let patterns = self.parse_patterns()?;
        self.expect(Token::RBrace)?;

        let limit = if self.eat_keyword("LIMIT") {
            match self.next() {
                Some(Token::Word(n)) => Some(
                    n.parse::<usize>()
                        .map_err(|_| bad(format!("invalid LIMIT {:?}", n)))?,
                ),
                _ => return Err(bad("LIMIT requires a number")),
            }
        } else {
            None
        };

        if let Some(token) = self.peek() {
            return Err(bad(format!("unexpected trailing {:?}", token)));
        }

        Ok(Query {
            projection,
            distinct,
            patterns,
            limit,
        })
    }

    fn parse_prefix_decl(&mut self) -> Result<()> {
        let prefix = match self.next() {
            Some(Token::Word(w)) if w.ends_with(':') && w.matches(':').count() == 1 => {
                w.trim_end_matches(':').to_string()
            }
            other => return Err(bad(format!("invalid PREFIX name {:?}", other))),
        };
        match self.next() {
            Some(Token::Iri(ns)) => {
                self.prefixes.insert(prefix, ns);
                Ok(())
            }
            other => Err(bad(format!("PREFIX requires an IRI, found {:?}", other))),
        }
    }

    fn parse_projection(&mut self) -> Result<Projection> {
        if self.peek() == Some(&Token::Star) {
            self.pos += 1;
            return Ok(Projection::All);
        }
        let mut vars = Vec::new();
        while let Some(Token::Var(name)) = self.peek() {
            vars.push(name.clone());
            self.pos += 1;
        }
        if vars.is_empty() {
            return Err(bad("SELECT requires * or at least one variable"));
        }
        Ok(Projection::Vars(vars))
    }

    fn parse_patterns(&mut self) -> Result<Vec<TriplePattern>> {
        let mut patterns = Vec::new();
        while self.peek() != Some(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(bad("unbalanced braces"));
            }
            let subject = self.parse_node("subject")?;
            if matches!(subject, PatternTerm::Term(Term::Literal(_))) {
                return Err(bad("literal in subject position"));
            }
            let predicate = self.parse_predicate()?;
            let object = self.parse_node("object")?;
            patterns.push(TriplePattern {
                subject,
                predicate,
                object,
            });

            match self.peek() {
                Some(Token::Dot) => self.pos += 1,
                Some(Token::RBrace) => {}
                other => return Err(bad(format!("expected '.' or '}}', found {:?}", other))),
            }
        }
        if patterns.is_empty() {
            return Err(bad("empty graph pattern"));
        }
        Ok(patterns)
    }

    fn parse_predicate(&mut self) -> Result<PatternTerm> {
        if self.eat_keyword("a") {
            return Ok(PatternTerm::Term(Term::iri(rdf::TYPE)));
        }
        match self.parse_node("predicate")? {
            PatternTerm::Term(Term::Literal(_)) => Err(bad("literal in predicate position")),
            term => Ok(term),
        }
    }

    fn parse_node(&mut self, position: &str) -> Result<PatternTerm> {
        match self.next() {
            Some(Token::Var(name)) => Ok(PatternTerm::Var(name)),
            Some(Token::Iri(iri)) => Ok(PatternTerm::Term(Term::Iri(iri))),
            Some(Token::Literal(value)) => Ok(PatternTerm::Term(Term::Literal(value))),
            Some(Token::Word(word)) => self.expand(&word).map(|iri| PatternTerm::Term(Term::Iri(iri))),
            other => Err(bad(format!("expected {}, found {:?}", position, other))),
        }
    }

    fn expand(&self, prefixed: &str) -> Result<String> {
        let (prefix, local) = prefixed
            .split_once(':')
            .ok_or_else(|| bad(format!("unexpected word {:?}", prefixed)))?;
        let ns = self
            .prefixes
            .get(prefix)
            .ok_or_else(|| bad(format!("unknown prefix {:?}", prefix)))?;
        Ok(format!("{}{}", ns, local))
    }
}

/// Parse query text.
pub fn parse(text: &str) -> Result<Query> {
    Parser::new(tokenize(text)?).parse_query()
}
