use crate::datatype::{Arity, Value};

use super::{FunctionTable, add};

pub(super) fn register(table: &mut FunctionTable) {
    add(table, "list", Arity::AtLeast(1), |_, args| Ok(Value::List(args.to_vec())));
    add(table, "count", Arity::Exactly(1), |_, args| {
        Ok(Value::Numeral(args[0].as_list("count")?.len() as i64))
    });
    // negative indexes count from the end, anything out of range is void
    add(table, "at", Arity::Exactly(2), |_, args| {
        let items = args[0].as_list("at")?;
        let index = args[1].as_numeral("at")?;
        let len = items.len() as i64;
        let position = if index < 0 { len + index } else { index };
        if (0..len).contains(&position) {
            Ok(items[position as usize].clone())
        }
        else {
            Ok(Value::Void)
        }
    });
    add(table, "join", Arity::AtLeast(1), |_, args| {
        let mut joined = Vec::new();
        for arg in args {
            joined.extend_from_slice(arg.as_list("join")?);
        }
        Ok(Value::List(joined))
    });
    add(table, "append", Arity::AtLeast(2), |_, args| {
        let mut items = args[0].as_list("append")?.to_vec();
        items.extend_from_slice(&args[1..]);
        Ok(Value::List(items))
    });
    add(table, "head", Arity::Exactly(1), |_, args| {
        Ok(args[0].as_list("head")?.first().cloned().unwrap_or_else(Value::vacant))
    });
    add(table, "tail", Arity::Exactly(1), |_, args| {
        let items = args[0].as_list("tail")?;
        Ok(if items.len() < 2 { Value::vacant() } else { Value::List(items[1..].to_vec()) })
    });
    add(table, "filter", Arity::Exactly(2), |interpreter, args| {
        let predicate = args[0].as_function("filter")?;
        let mut kept = Vec::new();
        for item in args[1].as_list("filter")? {
            let verdict = interpreter.apply(predicate, std::slice::from_ref(item))?;
            if verdict.as_boolean(predicate.name())? {
                kept.push(item.clone());
            }
        }
        Ok(Value::List(kept))
    });
    // a binary mapping walks two lists pairwise and stops at the shorter one
    add(table, "map", Arity::Between(2, 3), |interpreter, args| {
        let mapping = args[0].as_function("map")?;
        let first = args[1].as_list("map")?;
        let mut mapped = Vec::with_capacity(first.len());
        match args.get(2) {
            Some(second) => {
                for (a, b) in first.iter().zip(second.as_list("map")?) {
                    mapped.push(interpreter.apply(mapping, &[a.clone(), b.clone()])?);
                }
            }
            None => {
                for item in first {
                    mapped.push(interpreter.apply(mapping, std::slice::from_ref(item))?);
                }
            }
        }
        Ok(Value::List(mapped))
    });
}
