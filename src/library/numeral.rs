use crate::datatype::{Arity, Value};
use crate::error::{KispError, Result};

use super::{FunctionTable, add};

fn overflow(operation: &str) -> KispError {
    KispError::Domain(format!("{operation} overflowed the numeral range"))
}

fn fold(operation: &'static str, args: &[Value], identity: i64, step: fn(i64, i64) -> Option<i64>) -> Result<Value> {
    let mut total = identity;
    for arg in args {
        total = step(total, arg.as_numeral(operation)?).ok_or_else(|| overflow(operation))?;
    }
    Ok(Value::Numeral(total))
}

fn operands(operation: &str, args: &[Value]) -> Result<(i64, i64)> {
    Ok((args[0].as_numeral(operation)?, args[1].as_numeral(operation)?))
}

fn divisor(operation: &str, value: &Value) -> Result<i64> {
    match value.as_numeral(operation)? {
        0 => Err(KispError::Domain(format!("{operation} by zero"))),
        d => Ok(d),
    }
}

fn compare(table: &mut FunctionTable, name: &'static str, test: fn(i64, i64) -> bool) {
    add(table, name, Arity::Exactly(2), move |_, args| {
        let (a, b) = operands(name, args)?;
        Ok(Value::Boolean(test(a, b)))
    });
}

pub(super) fn register(table: &mut FunctionTable) {
    add(table, "+", Arity::AtLeast(1), |_, args| fold("+", args, 0, i64::checked_add));
    add(table, "*", Arity::AtLeast(1), |_, args| fold("*", args, 1, i64::checked_mul));
    add(table, "-", Arity::Exactly(2), |_, args| {
        let (a, b) = operands("-", args)?;
        a.checked_sub(b).map(Value::Numeral).ok_or_else(|| overflow("-"))
    });
    // truncates toward zero
    add(table, "div", Arity::Exactly(2), |_, args| {
        let a = args[0].as_numeral("div")?;
        let b = divisor("div", &args[1])?;
        a.checked_div(b).map(Value::Numeral).ok_or_else(|| overflow("div"))
    });
    add(table, "mod", Arity::Exactly(2), |_, args| {
        let a = args[0].as_numeral("mod")?;
        let b = divisor("mod", &args[1])?;
        a.checked_rem(b).map(Value::Numeral).ok_or_else(|| overflow("mod"))
    });
    compare(table, "<", |a, b| a < b);
    compare(table, "<=", |a, b| a <= b);
    compare(table, ">", |a, b| a > b);
    compare(table, ">=", |a, b| a >= b);
}
