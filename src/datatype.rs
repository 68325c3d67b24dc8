// used for dates and the resolution of `now`
use chrono::{Datelike, Days, NaiveDate};
// used to print out readable forms of a value
use std::fmt;
// used to share profiles and functions between values
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{KispError, Result};
use crate::genealogy::Profile;
use crate::interpreter::Interpreter;
use crate::term::Term;

pub const TRUE: &str = "true";
pub const FALSE: &str = "false";
pub const VOID: &str = "void";
pub const NOW: &str = "now";
pub const VACANT: &str = "vacant";
pub const PEOPLE: &str = "people";

lazy_static! {
    static ref NUMERAL: Regex = Regex::new(r"^-?\d+$").unwrap();
    static ref STRING: Regex = Regex::new(r"^'[^']*'$").unwrap();
    static ref DATE: Regex = Regex::new(r"^(0?[1-9]|[1-2]\d|30|31)\.(0?[1-9]|1[0-2])\.([1-2]\d\d\d)$").unwrap();
}

/// What a literal may need from its surroundings while being parsed.
pub trait LiteralContext {
    /// The date `now` resolves to.
    fn today(&self) -> NaiveDate;
    /// Every person of the genealogy, for the `people` keyword.
    fn people(&mut self) -> Vec<Value>;
}

// ------------- Kinds --------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Boolean,
    Numeral,
    String,
    Void,
    Date,
    List,
    Person,
    Function,
}

impl Kind {
    /// Kinds that have a literal form, in the order a raw atom is tried against them.
    pub const LITERALS: [Kind; 7] = [
        Kind::Boolean,
        Kind::Numeral,
        Kind::String,
        Kind::Void,
        Kind::Date,
        Kind::List,
        Kind::Person,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Boolean => "boolean",
            Kind::Numeral => "numeral",
            Kind::String => "string",
            Kind::Void => "void",
            Kind::Date => "date",
            Kind::List => "list",
            Kind::Person => "person",
            Kind::Function => "function",
        }
    }

    pub fn from_name(name: &str) -> Option<Kind> {
        let name = name.to_lowercase();
        Kind::LITERALS
            .iter()
            .chain(std::iter::once(&Kind::Function))
            .find(|kind| kind.name() == name)
            .copied()
    }

    pub fn can_parse(&self, text: &str) -> bool {
        match self {
            Kind::Boolean => text == TRUE || text == FALSE,
            Kind::Numeral => NUMERAL.is_match(text),
            Kind::String => STRING.is_match(text),
            Kind::Void => text == VOID,
            Kind::Date => text == NOW || DATE.is_match(text),
            Kind::List => text == VACANT,
            Kind::Person => text == PEOPLE,
            Kind::Function => false,
        }
    }

    /// The first kind whose recognizer accepts `text`.
    pub fn recognize(text: &str) -> Option<Kind> {
        Kind::LITERALS.into_iter().find(|kind| kind.can_parse(text))
    }

    pub fn parse(&self, text: &str, context: &mut dyn LiteralContext) -> Result<Value> {
        if !self.can_parse(text) {
            return Err(KispError::MalformedTerm(format!("Cannot parse {} as a {}", text, self.name())));
        }
        match self {
            Kind::Boolean => Ok(Value::Boolean(text == TRUE)),
            Kind::Numeral => text
                .parse::<i64>()
                .map(Value::Numeral)
                .map_err(|e| KispError::Domain(format!("Numeral {text} is out of range: {e}"))),
            Kind::String => Ok(Value::String(text[1..text.len() - 1].to_string())),
            Kind::Void => Ok(Value::Void),
            Kind::Date if text == NOW => Ok(Value::Date(context.today())),
            Kind::Date => parse_date(text).map(Value::Date),
            Kind::List => Ok(Value::vacant()),
            // `people` is the list of everyone in the graph
            Kind::Person => Ok(Value::List(context.people())),
            Kind::Function => Err(KispError::MalformedTerm(format!("Functions have no literal form: {text}"))),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ------------- Dates --------------

/// Parses `day.month.year`.
///
/// The day is not checked against the length of the month: an overflowing day
/// rolls into the following month, so `31.02.2000` is the 2nd of March.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let captures = DATE
        .captures(text)
        .ok_or_else(|| KispError::Domain(format!("Not a date: {text}")))?;
    let field = |i: usize| captures[i].parse::<u32>().unwrap_or_default();
    let (day, month, year) = (field(1), field(2), field(3) as i32);
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(day - 1))))
        .ok_or_else(|| KispError::Domain(format!("Not a date: {text}")))
}

pub fn render_date(date: &NaiveDate) -> String {
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}

// ------------- Arity --------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Between(low, high) => low <= count && count <= high,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
        match *self {
            Arity::Exactly(n) => write!(f, "exactly {} {}", n, plural(n)),
            Arity::AtLeast(n) => write!(f, "at least {} {}", n, plural(n)),
            Arity::Between(low, high) => write!(f, "{} to {} arguments", low, high),
        }
    }
}

// ------------- Functions --------------
pub type Builtin = Arc<dyn Fn(&mut Interpreter, &[Value]) -> Result<Value> + Send + Sync>;

#[derive(Clone)]
pub enum Body {
    Builtin(Builtin),
    Lambda { params: Vec<String>, body: Term },
}

/// A callable value: either one of the atomic functions or a user lambda.
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: Arity,
    body: Body,
}

impl Function {
    pub fn builtin(name: &str, arity: Arity, call: Builtin) -> Self {
        Self { name: name.to_string(), arity, body: Body::Builtin(call) }
    }

    pub fn lambda(name: String, params: Vec<String>, body: Term) -> Self {
        Self { name, arity: Arity::Exactly(params.len()), body: Body::Lambda { params, body } }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self.body, Body::Lambda { .. })
    }

    pub fn check_arity(&self, count: usize) -> Result<()> {
        if self.arity.accepts(count) {
            Ok(())
        }
        else {
            Err(KispError::Arity(format!("{} expects {}, but got {}", self.name, self.arity, count)))
        }
    }

    pub fn to_term(&self) -> String {
        match &self.body {
            Body::Builtin(_) => self.name.clone(),
            Body::Lambda { params, body } => format!("(lambda ({}) {})", params.join(" "), body),
        }
    }

    fn to_key(&self) -> String {
        match &self.body {
            Body::Builtin(_) => self.name.clone(),
            Body::Lambda { params, body } => format!("(lambda ({}) {})", params.join(" "), body.to_key()),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Function").field("name", &self.name).field("arity", &self.arity).finish()
    }
}

// ------------- Values --------------
#[derive(Debug, Clone)]
pub enum Value {
    Boolean(bool),
    Numeral(i64),
    String(String),
    Date(NaiveDate),
    List(Vec<Value>),
    Person(Arc<Profile>),
    Function(Arc<Function>),
    Void,
}

impl Value {
    /// The empty list.
    pub fn vacant() -> Value {
        Value::List(Vec::new())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Boolean(_) => Kind::Boolean,
            Value::Numeral(_) => Kind::Numeral,
            Value::String(_) => Kind::String,
            Value::Date(_) => Kind::Date,
            Value::List(_) => Kind::List,
            Value::Person(_) => Kind::Person,
            Value::Function(_) => Kind::Function,
            Value::Void => Kind::Void,
        }
    }

    /// Renders the value as a term that evaluates back to an equal value.
    pub fn to_term(&self) -> String {
        match self {
            Value::Boolean(b) => if *b { TRUE.into() } else { FALSE.into() },
            Value::Numeral(n) => n.to_string(),
            Value::String(s) => format!("'{}'", s),
            Value::Date(d) => render_date(d),
            Value::List(items) if items.is_empty() => VACANT.into(),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(Value::to_term).collect();
                format!("(list {})", items.join(" "))
            }
            Value::Person(p) => format!("(person '{}' '{}')", p.first_name, p.last_name),
            Value::Function(f) => f.to_term(),
            Value::Void => VOID.into(),
        }
    }

    /// Like [`Value::to_term`], but persons are spelled by id, so namesakes
    /// never share a key.
    pub fn to_key(&self) -> String {
        match self {
            Value::List(items) if !items.is_empty() => {
                let items: Vec<String> = items.iter().map(Value::to_key).collect();
                format!("(list {})", items.join(" "))
            }
            Value::Person(p) => format!("(person #{})", p.id),
            Value::Function(f) => f.to_key(),
            _ => self.to_term(),
        }
    }

    fn mismatch(&self, operation: &str, expected: Kind) -> KispError {
        KispError::Type(format!(
            "{} expected a {}, but got the {} {}",
            operation,
            expected,
            self.kind(),
            self.to_term()
        ))
    }

    pub fn as_boolean(&self, operation: &str) -> Result<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.mismatch(operation, Kind::Boolean)),
        }
    }

    pub fn as_numeral(&self, operation: &str) -> Result<i64> {
        match self {
            Value::Numeral(n) => Ok(*n),
            _ => Err(self.mismatch(operation, Kind::Numeral)),
        }
    }

    pub fn as_str(&self, operation: &str) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.mismatch(operation, Kind::String)),
        }
    }

    pub fn as_date(&self, operation: &str) -> Result<NaiveDate> {
        match self {
            Value::Date(d) => Ok(*d),
            _ => Err(self.mismatch(operation, Kind::Date)),
        }
    }

    pub fn as_list(&self, operation: &str) -> Result<&[Value]> {
        match self {
            Value::List(items) => Ok(items),
            _ => Err(self.mismatch(operation, Kind::List)),
        }
    }

    pub fn as_person(&self, operation: &str) -> Result<&Arc<Profile>> {
        match self {
            Value::Person(p) => Ok(p),
            _ => Err(self.mismatch(operation, Kind::Person)),
        }
    }

    pub fn as_function(&self, operation: &str) -> Result<&Arc<Function>> {
        match self {
            Value::Function(f) => Ok(f),
            _ => Err(self.mismatch(operation, Kind::Function)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Numeral(a), Value::Numeral(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Person(a), Value::Person(b)) => a.id == b.id,
            (Value::Function(a), Value::Function(b)) => a.name == b.name,
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Person(p) => write!(f, "{} {}", p.first_name, p.last_name),
            Value::Function(func) if !func.is_lambda() => write!(f, "{}", func.name),
            _ => write!(f, "{}", self.to_term()),
        }
    }
}
