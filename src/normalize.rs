//! Textual preparation of raw terms before they are parsed.
//!
//! Three primitives live here:
//! * [`is_valid`] rejects text that can never become a term (unbalanced
//!   parentheses, an odd number of quotes, the literal marker [`STRIPMARK`]).
//! * [`clip`] produces the canonical spelling of a term: single spaces, no
//!   whitespace just inside parentheses, string literals untouched.
//! * [`split_terms`] cuts a script into its top-level terms and drops `;` comments.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{KispError, Result};

/// Stands in for a string literal that has been lifted out of a term.
pub const STRIPMARK: char = 15 as char;

const QUOTE: char = '\'';
const COMMENT: char = ';';

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref AFTER_OPEN: Regex = Regex::new(r"\(\s").unwrap();
    static ref BEFORE_CLOSE: Regex = Regex::new(r"\s\)").unwrap();
}

/// Checks that `term` is well-formed enough to be clipped and parsed.
///
/// Parentheses inside string literals are not counted. The scan stops at the
/// first defect it cannot recover from.
pub fn is_valid(term: &str) -> bool {
    let mut nesting: i64 = 1;
    let mut quotes_even = true;
    let mut sentinel = false;
    for c in term.chars() {
        match c {
            QUOTE => quotes_even = !quotes_even,
            '(' if quotes_even => nesting += 1,
            ')' if quotes_even => nesting -= 1,
            STRIPMARK => sentinel = true,
            _ => (),
        }
        if nesting <= 0 || sentinel {
            break;
        }
    }
    nesting == 1 && quotes_even && !sentinel
}

/// Collapses insignificant whitespace while keeping string literals verbatim.
///
/// Literals are lifted out first and replaced by a [`STRIPMARK`], the
/// remaining text is squeezed, and the literals are then put back in order.
/// Callers are expected to have checked the term with [`is_valid`].
pub fn clip(term: &str) -> String {
    let mut in_string = false;
    let mut stripped = String::with_capacity(term.len());
    let mut strip = String::new();
    let mut strips: Vec<String> = Vec::new();
    for c in term.chars() {
        if in_string {
            strip.push(c);
            if c == QUOTE {
                in_string = false;
                strips.push(std::mem::take(&mut strip));
                stripped.push(STRIPMARK);
            }
        }
        else if c == QUOTE {
            in_string = true;
            strip.push(c);
        }
        else {
            stripped.push(c);
        }
    }
    // an unterminated literal is kept as it was
    if in_string {
        stripped.push_str(&strip);
    }
    let squeezed = WHITESPACE.replace_all(stripped.trim(), " ");
    let squeezed = AFTER_OPEN.replace_all(&squeezed, "(");
    let squeezed = BEFORE_CLOSE.replace_all(&squeezed, ")");
    let mut clipped = String::with_capacity(term.len());
    let mut strips = strips.into_iter();
    for c in squeezed.chars() {
        if c == STRIPMARK {
            clipped.push_str(&strips.next().unwrap_or_default());
        }
        else {
            clipped.push(c);
        }
    }
    clipped
}

/// Splits a script into its top-level terms.
///
/// A `;` outside a string literal comments out the rest of its line. Each
/// returned term is clipped. Text that cannot be split into balanced terms is
/// reported as malformed together with the offending fragment.
pub fn split_terms(script: &str) -> Result<Vec<String>> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut in_comment = false;
    for c in script.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
            continue;
        }
        if !in_string && c == COMMENT {
            in_comment = true;
            continue;
        }
        if c == QUOTE {
            in_string = !in_string;
        }
        if !in_string {
            if c.is_whitespace() && depth == 0 {
                if !current.is_empty() {
                    terms.push(clip(&current));
                    current.clear();
                }
                continue;
            }
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(KispError::MalformedTerm(format!("Unbalanced parenthesis after: {current}")));
                    }
                }
                _ => (),
            }
        }
        current.push(c);
        if depth == 0 && !in_string && c == ')' {
            terms.push(clip(&current));
            current.clear();
        }
    }
    if in_string || depth != 0 {
        return Err(KispError::MalformedTerm(format!("Unterminated term: {}", current.trim())));
    }
    if !current.trim().is_empty() {
        terms.push(clip(&current));
    }
    Ok(terms)
}
