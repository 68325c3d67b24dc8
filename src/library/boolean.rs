use crate::datatype::{Arity, Value};

use super::{FunctionTable, add};

pub(super) fn register(table: &mut FunctionTable) {
    // every argument is checked, even after the outcome is known
    add(table, "and", Arity::AtLeast(1), |_, args| {
        let mut all = true;
        for arg in args {
            all &= arg.as_boolean("and")?;
        }
        Ok(Value::Boolean(all))
    });
    add(table, "or", Arity::AtLeast(1), |_, args| {
        let mut any = false;
        for arg in args {
            any |= arg.as_boolean("or")?;
        }
        Ok(Value::Boolean(any))
    });
    add(table, "not", Arity::Exactly(1), |_, args| Ok(Value::Boolean(!args[0].as_boolean("not")?)));
}
