//! Substitution of bound names inside a term.
//!
//! The same primitive expands global definitions before a query is evaluated
//! and binds the parameters of a lambda to its evaluated arguments before the
//! body is evaluated. Bound names are replaced by [`Term::Value`] nodes, so an
//! argument is never evaluated twice and string literals are never touched.

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::datatype::Value;
use crate::term::{DEFINE, LAMBDA, Term};

/// Anything that can answer "what is this name bound to".
pub trait Bindings {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

impl<S: BuildHasher> Bindings for HashMap<String, Value, S> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// Hides the parameters of a nested lambda from the enclosing bindings.
struct Shadowed<'a, B: Bindings + ?Sized> {
    outer: &'a B,
    hidden: Vec<&'a str>,
}

impl<B: Bindings + ?Sized> Bindings for Shadowed<'_, B> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        if self.hidden.contains(&name) { None } else { self.outer.lookup(name) }
    }
}

pub fn rewrite<B: Bindings + ?Sized>(term: &Term, bindings: &B) -> Term {
    match term {
        Term::Atom(atom) => match bindings.lookup(atom) {
            Some(value) => Term::Value(value.clone()),
            None => term.clone(),
        },
        Term::Value(_) => term.clone(),
        Term::Compound(parts) if term.is_special_form(LAMBDA) && parts.len() == 3 => {
            let hidden: Vec<&str> = match &parts[1] {
                Term::Compound(params) => params.iter().filter_map(Term::atom).collect(),
                _ => Vec::new(),
            };
            let inner = Shadowed { outer: bindings, hidden };
            let body = rewrite(&parts[2], &inner as &dyn Bindings);
            Term::Compound(vec![parts[0].clone(), parts[1].clone(), body])
        }
        Term::Compound(parts) if term.is_special_form(DEFINE) => {
            // the defined name itself is never substituted
            let mut rewritten = Vec::with_capacity(parts.len());
            for (i, part) in parts.iter().enumerate() {
                rewritten.push(if i < 2 { part.clone() } else { rewrite(part, bindings) });
            }
            Term::Compound(rewritten)
        }
        Term::Compound(parts) => Term::Compound(parts.iter().map(|part| rewrite(part, bindings)).collect()),
    }
}
