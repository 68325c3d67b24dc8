//! The atomic functions: one registry per value kind, merged into a single table.
//!
//! Every function is arity-checked by the interpreter before it is called, so
//! the closures below may index their arguments freely within their arity.

use std::collections::HashMap;
use std::sync::Arc;

use crate::OtherHasher;
use crate::datatype::{Arity, Function, Kind, Value};
use crate::error::Result;
use crate::interpreter::Interpreter;

mod boolean;
mod date;
mod list;
mod numeral;
mod person;
mod string;

pub type FunctionTable = HashMap<String, Arc<Function>, OtherHasher>;

/// Registers one atomic function.
pub(crate) fn add<F>(table: &mut FunctionTable, name: &str, arity: Arity, call: F)
where
    F: Fn(&mut Interpreter, &[Value]) -> Result<Value> + Send + Sync + 'static,
{
    table.insert(name.to_string(), Arc::new(Function::builtin(name, arity, Arc::new(call))));
}

/// The complete table of atomic functions.
pub fn atomic_functions() -> FunctionTable {
    let mut table = FunctionTable::default();
    generic(&mut table);
    boolean::register(&mut table);
    numeral::register(&mut table);
    string::register(&mut table);
    date::register(&mut table);
    list::register(&mut table);
    person::register(&mut table);
    table
}

fn generic(table: &mut FunctionTable) {
    add(table, "=", Arity::Exactly(2), |_, args| Ok(Value::Boolean(args[0] == args[1])));
    add(table, "of-type?", Arity::Exactly(2), |_, args| {
        let name = args[1].as_str("of-type?")?;
        Ok(Value::Boolean(Kind::from_name(name) == Some(args[0].kind())))
    });
}
