//! KISP – a small query language over a genealogical knowledge graph.
//!
//! Queries are S-expressions such as `(father (mother ego))`. Every query is
//! normalized, parsed into a [`term::Term`], rewritten with the definitions
//! made so far and evaluated into a [`datatype::Value`]:
//! * A [`datatype::Value`] is one of a closed set of kinds: boolean, numeral,
//!   string, date, list, person, function and void.
//! * Every value renders back into a term that evaluates to an equal value
//!   ([`datatype::Value::to_term`]).
//! * `(define name term)` binds a name once and for all, `(lambda (x ...) body)`
//!   builds a function and `(if condition then else)` evaluates one branch only.
//!
//! ## Modules
//! * [`normalize`] – Validation and whitespace canonicalization of raw terms.
//! * [`term`] – The pest grammar and the term tree it produces.
//! * [`rewrite`] – Substitution of bound names by their values inside a term.
//! * [`datatype`] – Values, kinds, literal parsing, arities and functions.
//! * [`library`] – The atomic functions, one registry per kind.
//! * [`interpreter`] – Special forms, application and the evaluation cache.
//! * [`genealogy`] – Person profiles and bonds, the input the engine is handed.
//! * [`graph`] – The family tree with breadth-first kinship and generation distance.
//! * [`kinship`] – The kinship dictionary and its `shorten` compression.
//! * [`interface`], [`server`], [`settings`] – The shared query interface, the
//!   HTTP endpoint and the configuration of the `kisp` binary.
//!
//! ## Kinship
//! `(kinship a b)` lists the basic terms (`father`, `mother`, `husband`, `wife`,
//! `son`, `daughter`) that lead from `b` to `a`, read from `b`: a maternal
//! grandfather is `(list 'mother' 'father')` as seen from his grandchild.
//! `(shorten ...)` compresses such a list with the kinship dictionary, so the
//! same grandfather may become `(list 'maternal-grandfather')`.
//!
//! ## Quick Start
//! ```
//! use kisp::{genealogy::Genealogy, interpreter::Interpreter, kinship::KinshipDictionary};
//! let mut interpreter = Interpreter::new(Genealogy::default(), KinshipDictionary::new());
//! interpreter.exec("(define square (lambda (x) (* x x)))").unwrap();
//! let value = interpreter.exec("(map square (list 1 2 3))").unwrap();
//! assert_eq!(value.to_term(), "(list 1 4 9)");
//! ```

use std::hash::BuildHasherDefault;

use seahash::SeaHasher;

pub mod datatype;
pub mod error;
pub mod genealogy;
pub mod graph;
pub mod interface;
pub mod interpreter;
pub mod kinship;
pub mod library;
pub mod normalize;
pub mod rewrite;
pub mod server;
pub mod settings;
pub mod term;

// Hashing names and terms does not need to be DoS resistant.
pub type OtherHasher = BuildHasherDefault<SeaHasher>;

pub use datatype::{Kind, Value};
pub use error::{KispError, Result};
pub use interpreter::Interpreter;
