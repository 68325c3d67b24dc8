//! The KISP evaluator.
//!
//! A query goes through `validate -> clip -> parse`, and is then either a
//! top-level `define` or is rewritten with the known definitions and
//! evaluated. Evaluation handles the special forms `lambda` and `if` itself
//! and treats every other compound as a function application, whose result
//! is memoized under the canonical text of the (rewritten) term, with persons
//! spelled by id. Results are only kept once the whole query has succeeded.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, trace};

use crate::OtherHasher;
use crate::datatype::{Arity, Body, Function, Kind, LiteralContext, Value};
use crate::error::{KispError, Result};
use crate::genealogy::{Genealogy, PersonId, Profile};
use crate::graph::FamilyTree;
use crate::kinship::KinshipDictionary;
use crate::library::{self, FunctionTable};
use crate::normalize;
use crate::rewrite::rewrite;
use crate::term::{DEFINE, IF, LAMBDA, Term, is_keyword, is_reference};

/// Lambdas get names no reference can spell, unique for the whole process.
static NEXT_LAMBDA: AtomicUsize = AtomicUsize::new(0);

// ------------- Evaluation cache -------------
#[derive(Debug)]
pub struct Cache {
    entries: HashMap<String, Value, OtherHasher>,
    // results of the running query, dropped if it fails
    pending: HashMap<String, Value, OtherHasher>,
    enabled: bool,
}

impl Cache {
    fn new() -> Self {
        Self { entries: HashMap::default(), pending: HashMap::default(), enabled: true }
    }
    pub fn get(&self, term: &str) -> Option<&Value> {
        self.entries.get(term).or_else(|| self.pending.get(term))
    }
    /// Stores a result unless one is already there. It is kept once the running query succeeds.
    pub fn put(&mut self, term: String, value: Value) {
        if !self.entries.contains_key(&term) {
            self.pending.entry(term).or_insert(value);
        }
    }
    fn commit(&mut self) {
        for (term, value) in self.pending.drain() {
            self.entries.entry(term).or_insert(value);
        }
    }
    fn discard(&mut self) {
        self.pending.clear();
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    pub fn expunge(&mut self) {
        if !self.entries.is_empty() {
            debug!(entries = self.entries.len(), "cache expunged");
        }
        self.entries.clear();
        self.pending.clear();
    }
}

// ------------- Interpreter -------------
pub struct Interpreter {
    functions: FunctionTable,
    definitions: HashMap<String, Value, OtherHasher>,
    cache: Cache,
    genealogy: Genealogy,
    dictionary: KinshipDictionary,
    today: NaiveDate,
}

impl Interpreter {
    pub fn new(genealogy: Genealogy, dictionary: KinshipDictionary) -> Self {
        Self {
            functions: library::atomic_functions(),
            definitions: HashMap::default(),
            cache: Cache::new(),
            genealogy,
            dictionary,
            today: Local::now().date_naive(),
        }
    }

    /// Pins the date `now` resolves to.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Executes one query and returns the value it evaluates to.
    ///
    /// A failing query leaves the definitions and the cache untouched.
    pub fn exec(&mut self, query: &str) -> Result<Value> {
        self.cache.discard();
        let result = self.exec_query(query);
        if result.is_ok() {
            self.cache.commit();
        }
        else {
            self.cache.discard();
        }
        result
    }

    fn exec_query(&mut self, query: &str) -> Result<Value> {
        if !normalize::is_valid(query) {
            return Err(KispError::MalformedTerm(format!("Not well-formed term: {query}")));
        }
        let term = Term::parse(&normalize::clip(query))?;
        match &term {
            Term::Compound(parts) if term.is_special_form(DEFINE) => self.define(parts),
            _ => {
                let rewritten = rewrite(&term, &self.definitions);
                self.eval(&rewritten)
            }
        }
    }

    /// Executes every top-level term of a script, discarding the results.
    ///
    /// Returns the number of terms executed. The first failure aborts the script.
    pub fn exec_script(&mut self, script: &str) -> Result<usize> {
        let terms = normalize::split_terms(script)?;
        for term in &terms {
            self.exec(term)?;
        }
        Ok(terms.len())
    }

    pub fn exec_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let script = std::fs::read_to_string(path)
            .map_err(|e| KispError::Persistence(format!("{}: {}", path.display(), e)))?;
        let executed = self.exec_script(&script)?;
        info!(path = %path.display(), terms = executed, "script executed");
        Ok(executed)
    }

    fn define(&mut self, parts: &[Term]) -> Result<Value> {
        let name = match parts.get(1) {
            Some(Term::Atom(name)) if is_reference(name) => name.clone(),
            Some(other) => return Err(KispError::MalformedTerm(format!("Expected a reference, found {other}"))),
            None => return Err(KispError::MalformedTerm("define needs a name and a term".into())),
        };
        if parts.len() != 3 {
            return Err(KispError::MalformedTerm(format!("Malformed define term: {}", Term::Compound(parts.to_vec()))));
        }
        if is_keyword(&name) {
            return Err(KispError::Redefinition(format!("Cannot redefine a keyword: {name}")));
        }
        if self.functions.contains_key(&name) {
            return Err(KispError::Redefinition(format!("Cannot redefine an atomic function: {name}")));
        }
        if self.definitions.contains_key(&name) {
            return Err(KispError::Redefinition(format!("Cannot redefine previously defined reference: {name}")));
        }
        let designatum = rewrite(&parts[2], &self.definitions);
        let value = self.eval(&designatum)?;
        info!(%name, value = %value.to_term(), "definition registered");
        self.definitions.insert(name, value);
        Ok(Value::Void)
    }

    pub fn eval(&mut self, term: &Term) -> Result<Value> {
        match term {
            Term::Value(value) => Ok(value.clone()),
            Term::Atom(atom) => self.eval_atom(atom),
            Term::Compound(parts) => match term.leader() {
                Some(LAMBDA) => self.eval_lambda(parts),
                Some(IF) => self.eval_if(parts),
                Some(DEFINE) => Err(KispError::MalformedTerm(format!("define is only allowed at the top level: {term}"))),
                _ => self.eval_application(term, parts),
            },
        }
    }

    fn eval_atom(&mut self, atom: &str) -> Result<Value> {
        if let Some(kind) = Kind::recognize(atom) {
            return kind.parse(atom, self);
        }
        if let Some(function) = self.functions.get(atom) {
            return Ok(Value::Function(Arc::clone(function)));
        }
        // names a lambda body refers to, resolved when the body runs
        if let Some(value) = self.definitions.get(atom) {
            return Ok(value.clone());
        }
        Err(KispError::MalformedTerm(format!("Unbounded identifier: {atom}")))
    }

    fn eval_lambda(&mut self, parts: &[Term]) -> Result<Value> {
        if parts.len() != 3 {
            return Err(KispError::MalformedTerm(format!("Malformed lambda term: {}", Term::Compound(parts.to_vec()))));
        }
        let Term::Compound(declared) = &parts[1] else {
            return Err(KispError::MalformedTerm(format!("Expected a parameter list, found {}", parts[1])));
        };
        let mut params: Vec<String> = Vec::with_capacity(declared.len());
        for param in declared {
            match param.atom() {
                Some(name) if is_reference(name) && !is_keyword(name) && !params.iter().any(|p| p == name) => {
                    params.push(name.to_string())
                }
                _ => return Err(KispError::MalformedTerm(format!("Invalid lambda parameter: {param}"))),
            }
        }
        let name = format!("$lambda-{}", NEXT_LAMBDA.fetch_add(1, Ordering::Relaxed) + 1);
        Ok(Value::Function(Arc::new(Function::lambda(name, params, parts[2].clone()))))
    }

    /// Only the branch picked by the condition is evaluated.
    fn eval_if(&mut self, parts: &[Term]) -> Result<Value> {
        if parts.len() != 4 {
            return Err(KispError::Arity(format!(
                "if expects a condition and two branches, but got {} arguments",
                parts.len() - 1
            )));
        }
        let condition = self.eval(&parts[1])?.as_boolean(IF)?;
        self.eval(&parts[if condition { 2 } else { 3 }])
    }

    fn eval_application(&mut self, term: &Term, parts: &[Term]) -> Result<Value> {
        let Some((leader, arguments)) = parts.split_first() else {
            return Err(KispError::MalformedTerm("Empty functional term: ()".into()));
        };
        let key = self.cache.is_enabled().then(|| term.to_key());
        if let Some(cached) = key.as_ref().and_then(|key| self.cache.get(key)) {
            trace!(term = %term, "cache hit");
            return Ok(cached.clone());
        }
        let function = self.resolve_leader(leader)?;
        function.check_arity(arguments.len())?;
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.eval(argument)?);
        }
        let result = self.apply(&function, &values)?;
        if let Some(key) = key {
            if self.cache.is_enabled() {
                self.cache.put(key, result.clone());
            }
        }
        Ok(result)
    }

    /// Resolves the function a compound applies: a definition, a registered
    /// function, or whatever the leader evaluates to.
    fn resolve_leader(&mut self, leader: &Term) -> Result<Arc<Function>> {
        if let Term::Atom(name) = leader {
            if let Some(Value::Function(function)) = self.definitions.get(name) {
                return Ok(Arc::clone(function));
            }
            if let Some(function) = self.functions.get(name) {
                return Ok(Arc::clone(function));
            }
        }
        match self.eval(leader)? {
            Value::Function(function) => Ok(function),
            other => Err(KispError::Type(format!("{} is not a function", other.to_term()))),
        }
    }

    /// Applies a function to already evaluated arguments.
    ///
    /// A lambda binds its parameters by rewriting its body with the argument
    /// values and then evaluates the rewritten body.
    pub fn apply(&mut self, function: &Function, args: &[Value]) -> Result<Value> {
        function.check_arity(args.len())?;
        match function.body() {
            Body::Builtin(call) => call(self, args),
            Body::Lambda { params, body } => {
                let bindings: HashMap<String, Value, OtherHasher> =
                    params.iter().cloned().zip(args.iter().cloned()).collect();
                let body = rewrite(body, &bindings);
                self.eval(&body)
            }
        }
    }

    /// Adds a host-provided function next to the atomic ones.
    pub fn register<F>(&mut self, name: &str, arity: Arity, call: F) -> Result<()>
    where
        F: Fn(&mut Interpreter, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        if is_keyword(name) || self.functions.contains_key(name) || self.definitions.contains_key(name) {
            return Err(KispError::Redefinition(format!("Cannot register {name}, the name is taken")));
        }
        self.functions
            .insert(name.to_string(), Arc::new(Function::builtin(name, arity, Arc::new(call))));
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&Arc<Function>> {
        self.functions.get(name)
    }

    pub fn definition(&self, name: &str) -> Option<&Value> {
        self.definitions.get(name)
    }

    /// All definitions as `(name, term)` pairs, sorted by name.
    pub fn definitions(&self) -> Vec<(String, String)> {
        let mut definitions: Vec<(String, String)> = self
            .definitions
            .iter()
            .map(|(name, value)| (name.clone(), value.to_term()))
            .collect();
        definitions.sort();
        definitions
    }

    // ------------- Cache controls -------------
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn enable_caching(&mut self) {
        self.cache.enabled = true;
    }

    pub fn disable_caching(&mut self) {
        self.cache.enabled = false;
    }

    pub fn expunge_cache(&mut self) {
        self.cache.expunge();
    }

    // ------------- Genealogy and kinship -------------
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn genealogy(&self) -> &Genealogy {
        &self.genealogy
    }

    pub fn tree(&mut self) -> Arc<FamilyTree> {
        self.genealogy.tree()
    }

    pub fn dictionary(&self) -> &KinshipDictionary {
        &self.dictionary
    }

    /// Adds a kinship dictionary entry; cached results may depend on the old dictionary.
    pub fn put_kinship_term(&mut self, key: &str, name: &str) -> Result<bool> {
        let added = self.dictionary.put(key, name)?;
        if added {
            self.cache.expunge();
        }
        Ok(added)
    }

    pub fn add_person(&mut self, profile: Profile) -> Result<()> {
        self.genealogy.add_person(profile)?;
        self.cache.expunge();
        Ok(())
    }

    pub fn remove_person(&mut self, id: PersonId) -> Result<()> {
        self.genealogy.remove_person(id)?;
        self.cache.expunge();
        Ok(())
    }

    pub fn marry(&mut self, first: PersonId, second: PersonId, wedding: NaiveDate) -> Result<()> {
        self.genealogy.marry(first, second, wedding)?;
        self.cache.expunge();
        Ok(())
    }

    pub fn divorce(&mut self, first: PersonId, second: PersonId) -> Result<()> {
        self.genealogy.divorce(first, second)?;
        self.cache.expunge();
        Ok(())
    }

    pub fn add_parentage(&mut self, parent: PersonId, child: PersonId) -> Result<()> {
        self.genealogy.add_parentage(parent, child)?;
        self.cache.expunge();
        Ok(())
    }

    pub fn remove_parentage(&mut self, parent: PersonId, child: PersonId) -> Result<()> {
        self.genealogy.remove_parentage(parent, child)?;
        self.cache.expunge();
        Ok(())
    }
}

impl LiteralContext for Interpreter {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn people(&mut self) -> Vec<Value> {
        self.tree()
            .vertices()
            .iter()
            .map(|vertex| Value::Person(Arc::clone(vertex.profile())))
            .collect()
    }
}
