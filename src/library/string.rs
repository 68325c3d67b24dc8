use crate::datatype::{Arity, Value};
use crate::error::KispError;

use super::{FunctionTable, add};

pub(super) fn register(table: &mut FunctionTable) {
    add(table, "concat", Arity::AtLeast(1), |_, args| {
        let mut joined = String::new();
        for arg in args {
            joined.push_str(arg.as_str("concat")?);
        }
        Ok(Value::String(joined))
    });
    add(table, "chars", Arity::Exactly(1), |_, args| {
        let chars = args[0].as_str("chars")?.chars().map(|c| Value::String(c.to_string())).collect();
        Ok(Value::List(chars))
    });
    // indexes count characters, not bytes
    add(table, "substr", Arity::Between(2, 3), |_, args| {
        let text = args[0].as_str("substr")?;
        let length = text.chars().count() as i64;
        let begin = args[1].as_numeral("substr")?;
        let end = match args.get(2) {
            Some(end) => end.as_numeral("substr")?,
            None => length,
        };
        if begin < 0 || end > length || begin > end {
            return Err(KispError::Domain(format!(
                "substr bounds {begin}..{end} are out of range for a string of length {length}"
            )));
        }
        let sub = text.chars().skip(begin as usize).take((end - begin) as usize).collect();
        Ok(Value::String(sub))
    });
    add(table, "string", Arity::Exactly(1), |_, args| {
        Ok(Value::String(args[0].as_numeral("string")?.to_string()))
    });
}
