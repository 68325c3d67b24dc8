use chrono::Datelike;

use crate::datatype::{Arity, Kind, Value, parse_date};
use crate::error::KispError;

use super::{FunctionTable, add};

pub(super) fn register(table: &mut FunctionTable) {
    add(table, "before", Arity::Exactly(2), |_, args| {
        Ok(Value::Boolean(args[0].as_date("before")? < args[1].as_date("before")?))
    });
    add(table, "after", Arity::Exactly(2), |_, args| {
        Ok(Value::Boolean(args[0].as_date("after")? > args[1].as_date("after")?))
    });
    // inclusive on both ends
    add(table, "during", Arity::Exactly(3), |_, args| {
        let date = args[0].as_date("during")?;
        let (from, to) = (args[1].as_date("during")?, args[2].as_date("during")?);
        Ok(Value::Boolean(from <= date && date <= to))
    });
    add(table, "day", Arity::Exactly(1), |_, args| Ok(Value::Numeral(i64::from(args[0].as_date("day")?.day()))));
    add(table, "month", Arity::Exactly(1), |_, args| {
        Ok(Value::Numeral(i64::from(args[0].as_date("month")?.month())))
    });
    add(table, "year", Arity::Exactly(1), |_, args| Ok(Value::Numeral(i64::from(args[0].as_date("year")?.year()))));
    add(table, "date", Arity::Exactly(1), |_, args| match &args[0] {
        Value::Date(date) => Ok(Value::Date(*date)),
        other => {
            let text = other.as_str("date")?;
            if !Kind::Date.can_parse(text) {
                return Err(KispError::Domain(format!("'{text}' is not a day.month.year date")));
            }
            parse_date(text).map(Value::Date)
        }
    });
}
