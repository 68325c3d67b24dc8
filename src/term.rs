//! The parsed form of a KISP term.
//!
//! Terms are parsed with pest (grammar in `kisp.pest`) into a small tree of
//! atoms and compounds. Rewriting may replace atoms by already evaluated
//! values, so a term can also hold a [`Value`] directly. Rendering a term
//! with `Display` gives its canonical text. [`Term::to_key`] gives the key of
//! the evaluation cache, which is the same text with persons spelled by id.

use std::fmt;

use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use regex::Regex;

use crate::datatype::Value;
use crate::error::{KispError, Result};

#[derive(Parser)]
#[grammar = "kisp.pest"]
pub struct TermParser;

pub const DEFINE: &str = "define";
pub const LAMBDA: &str = "lambda";
pub const IF: &str = "if";

/// Words that can never be (re)defined.
pub const KEYWORDS: [&str; 9] = [DEFINE, LAMBDA, IF, "true", "false", "void", "now", "vacant", "people"];

lazy_static! {
    static ref REFERENCE: Regex = Regex::new(r"^[a-z]+(-[a-z]+)*\??$").unwrap();
}

/// A bare name: lowercase hyphenated words with an optional trailing `?`.
pub fn is_reference(name: &str) -> bool {
    REFERENCE.is_match(name)
}

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Atom(String),
    Compound(Vec<Term>),
    Value(Value),
}

impl Term {
    pub fn parse(text: &str) -> Result<Term> {
        let query = TermParser::parse(Rule::query, text)?
            .next()
            .ok_or_else(|| KispError::MalformedTerm(format!("Empty term: {text}")))?;
        let expr = query
            .into_inner()
            .find(|pair| pair.as_rule() != Rule::EOI)
            .ok_or_else(|| KispError::MalformedTerm(format!("Empty term: {text}")))?;
        Ok(Self::build(expr))
    }

    fn build(pair: Pair<Rule>) -> Term {
        match pair.as_rule() {
            Rule::compound => Term::Compound(pair.into_inner().map(Self::build).collect()),
            _ => Term::Atom(pair.as_str().to_string()),
        }
    }

    pub fn atom(&self) -> Option<&str> {
        match self {
            Term::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// The leading atom of a compound, used to spot special forms.
    pub fn leader(&self) -> Option<&str> {
        match self {
            Term::Compound(parts) => parts.first().and_then(Term::atom),
            _ => None,
        }
    }

    pub fn is_special_form(&self, keyword: &str) -> bool {
        self.leader() == Some(keyword)
    }
}

impl Term {
    /// The text results of this term are cached under.
    ///
    /// Matches the [`Display`](fmt::Display) form except for evaluated
    /// values, which are rendered with [`Value::to_key`].
    pub fn to_key(&self) -> String {
        match self {
            Term::Atom(atom) => atom.clone(),
            Term::Value(value) => value.to_key(),
            Term::Compound(parts) => {
                let parts: Vec<String> = parts.iter().map(Term::to_key).collect();
                format!("({})", parts.join(" "))
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Atom(atom) => write!(f, "{}", atom),
            Term::Value(value) => write!(f, "{}", value.to_term()),
            Term::Compound(parts) => {
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
        }
    }
}
