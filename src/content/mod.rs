//! # Content expressions
//!
//! Node specs describe which children they allow with a small expression
//! language, e.g. `block+` or `(component0 | component1){0,3}`. This module
//! parses those expressions and checks child sequences against them.
//!
//! Only sequences of terms are supported. Each term is a node name, a group
//! name or a parenthesized alternation of names, followed by an optional
//! repetition (`+`, `*`, `?`, `{n}`, `{n,}` or `{n,m}`).

use displaydoc::Display;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing a content expression
#[derive(Debug, Error, Display, PartialEq, Eq)]
pub enum ContentError {
    /// Unexpected end of content expression
    UnexpectedEnd,
    /// Unexpected token `{0}` in content expression
    UnexpectedToken(String),
    /// Repetition minimum {0} exceeds its maximum {1}
    InvalidRange(usize, usize),
}

/// Resolves names in a content expression to node types
pub trait TypeResolver {
    /// Whether `node_type` is the node type `name` or part of the group `name`
    fn is_a(&self, node_type: &str, name: &str) -> bool;
    /// All node types matched by `name`, in schema order
    fn members(&self, name: &str) -> Vec<String>;
}

/// One repeated alternation in a content expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub choices: Vec<String>,
    pub min: usize,
    /// `None` means there is no upper bound
    pub max: Option<usize>,
}

/// A parsed content expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentExpr {
    pub terms: Vec<Term>,
}

impl Term {
    fn accepts<R: TypeResolver + ?Sized>(&self, node_type: &str, resolver: &R) -> bool {
        self.choices.iter().any(|c| resolver.is_a(node_type, c))
    }

    /// How many children starting at `from` this term can consume
    fn run_length<R: TypeResolver + ?Sized>(
        &self,
        children: &[&str],
        from: usize,
        resolver: &R,
    ) -> usize {
        let mut n = 0;
        while from + n < children.len()
            && self.max.map_or(true, |max| n < max)
            && self.accepts(children[from + n], resolver)
        {
            n += 1;
        }
        n
    }
}

impl ContentExpr {
    /// Whether this expression accepts no children at all
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `children` is a valid, complete content for this expression
    pub fn matches<R: TypeResolver + ?Sized>(&self, children: &[&str], resolver: &R) -> bool {
        self.match_from(0, children, 0, resolver, false)
    }

    /// Whether `children` can be extended into a valid content
    pub fn matches_prefix<R: TypeResolver + ?Sized>(
        &self,
        children: &[&str],
        resolver: &R,
    ) -> bool {
        self.match_from(0, children, 0, resolver, true)
    }

    fn match_from<R: TypeResolver + ?Sized>(
        &self,
        term: usize,
        children: &[&str],
        from: usize,
        resolver: &R,
        prefix: bool,
    ) -> bool {
        if prefix && from == children.len() {
            return true;
        }
        let t = match self.terms.get(term) {
            Some(t) => t,
            None => return from == children.len(),
        };
        let run = t.run_length(children, from, resolver);
        (0..=run).rev().any(|k| {
            if k < t.min {
                prefix && from + k == children.len()
            } else {
                self.match_from(term + 1, children, from + k, resolver, prefix)
            }
        })
    }

    /// The first node type that can be appended to `children`.
    ///
    /// Returns `None` once the content cannot take any further child, e.g.
    /// when a bounded repetition is full. Text nodes are never a default.
    pub fn default_type_after<R: TypeResolver + ?Sized>(
        &self,
        children: &[&str],
        resolver: &R,
    ) -> Option<String> {
        for term in &self.terms {
            for choice in &term.choices {
                for member in resolver.members(choice) {
                    if member == "text" {
                        continue;
                    }
                    let mut candidate: Vec<&str> = children.to_vec();
                    candidate.push(&member);
                    if self.matches_prefix(&candidate, resolver) {
                        return Some(member);
                    }
                }
            }
        }
        None
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.choices.len() == 1 {
            write!(f, "{}", self.choices[0])?;
        } else {
            write!(f, "({})", self.choices.join(" | "))?;
        }
        match (self.min, self.max) {
            (1, Some(1)) => Ok(()),
            (1, None) => write!(f, "+"),
            (0, None) => write!(f, "*"),
            (0, Some(1)) => write!(f, "?"),
            (min, None) => write!(f, "{{{},}}", min),
            (min, Some(max)) if min == max => write!(f, "{{{}}}", min),
            (min, Some(max)) => write!(f, "{{{},{}}}", min, max),
        }
    }
}

impl fmt::Display for ContentExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        rest = rest.trim_start();
        let c = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };
        let len = if c.is_alphanumeric() || c == '_' {
            rest.find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or_else(|| rest.len())
        } else {
            c.len_utf8()
        };
        let (token, tail) = rest.split_at(len);
        tokens.push(token);
        rest = tail;
    }
    tokens
}

struct Parser<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<&'a str, ContentError> {
        let token = self.peek().ok_or(ContentError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn name(&mut self) -> Result<String, ContentError> {
        let token = self.next()?;
        if token.chars().all(|c| c.is_alphanumeric() || c == '_') {
            Ok(token.to_owned())
        } else {
            Err(ContentError::UnexpectedToken(token.to_owned()))
        }
    }

    fn number(&mut self) -> Result<usize, ContentError> {
        let token = self.next()?;
        token
            .parse()
            .map_err(|_| ContentError::UnexpectedToken(token.to_owned()))
    }

    fn term(&mut self) -> Result<Term, ContentError> {
        let choices = if self.eat("(") {
            let mut choices = vec![self.name()?];
            while self.eat("|") {
                choices.push(self.name()?);
            }
            if !self.eat(")") {
                return Err(match self.peek() {
                    Some(t) => ContentError::UnexpectedToken(t.to_owned()),
                    None => ContentError::UnexpectedEnd,
                });
            }
            choices
        } else {
            vec![self.name()?]
        };
        let (min, max) = match self.peek() {
            Some("+") => (1, None),
            Some("*") => (0, None),
            Some("?") => (0, Some(1)),
            Some("{") => {
                self.pos += 1;
                let min = self.number()?;
                let max = if self.eat(",") {
                    if self.peek() == Some("}") {
                        None
                    } else {
                        Some(self.number()?)
                    }
                } else {
                    Some(min)
                };
                if self.peek() != Some("}") {
                    return Err(match self.peek() {
                        Some(t) => ContentError::UnexpectedToken(t.to_owned()),
                        None => ContentError::UnexpectedEnd,
                    });
                }
                if let Some(max) = max {
                    if max < min {
                        return Err(ContentError::InvalidRange(min, max));
                    }
                }
                (min, max)
            }
            _ => {
                return Ok(Term {
                    choices,
                    min: 1,
                    max: Some(1),
                })
            }
        };
        self.pos += 1;
        Ok(Term { choices, min, max })
    }
}

impl FromStr for ContentExpr {
    type Err = ContentError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            tokens: tokenize(input),
            pos: 0,
        };
        let mut terms = Vec::new();
        while parser.peek().is_some() {
            terms.push(parser.term()?);
        }
        Ok(ContentExpr { terms })
    }
}
