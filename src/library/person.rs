//! Person functions: lookups in the family tree, attributes, kinship paths and
//! their compression through the kinship dictionary.

use std::sync::Arc;

use chrono::Datelike;

use crate::datatype::{Arity, Value};
use crate::error::{KispError, Result};
use crate::genealogy::Profile;
use crate::graph::{DAUGHTER, FATHER, FamilyTree, HUSBAND, MOTHER, SON, Vertex, WIFE};
use crate::interpreter::Interpreter;

use super::{FunctionTable, add};

/// The vertex index of a person value in the current tree.
fn vertex_of(tree: &FamilyTree, operation: &str, value: &Value) -> Result<usize> {
    let profile = value.as_person(operation)?;
    tree.index_of(profile.id).ok_or_else(|| {
        KispError::Domain(format!("{operation}: {} is no longer in the genealogy", profile.full_name()))
    })
}

fn person_at(tree: &FamilyTree, index: usize) -> Option<Value> {
    tree.vertex(index).map(|vertex| Value::Person(Arc::clone(vertex.profile())))
}

/// Applies a relation to a person or to every person of a list, collecting
/// whoever the relation yields. Absent relatives are dropped.
fn related(
    interpreter: &mut Interpreter,
    operation: &'static str,
    arg: &Value,
    relation: fn(&Vertex) -> Vec<usize>,
) -> Result<Value> {
    let tree = interpreter.tree();
    let people = match arg {
        Value::List(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };
    let mut result = Vec::new();
    for person in people {
        let index = vertex_of(&tree, operation, person)?;
        if let Some(vertex) = tree.vertex(index) {
            result.extend(relation(vertex).into_iter().filter_map(|i| person_at(&tree, i)));
        }
    }
    Ok(Value::List(result))
}

fn terms(operation: &str, value: &Value) -> Result<Vec<String>> {
    value
        .as_list(operation)?
        .iter()
        .map(|term| term.as_str(operation).map(str::to_string))
        .collect()
}

fn strings(terms: Vec<String>) -> Value {
    Value::List(terms.into_iter().map(Value::String).collect())
}

/// Whether a compressed kinship term names the requested relation or relation group.
fn matches_relation(term: &str, relation: &str) -> bool {
    match relation {
        "child" | "children" => term == SON || term == DAUGHTER,
        "parent" | "parents" => term == FATHER || term == MOTHER,
        "spouse" => term == HUSBAND || term == WIFE,
        _ => term == relation,
    }
}

fn attribute(interpreter: &mut Interpreter, profile: &Profile, key: &str) -> Value {
    match key.trim().to_lowercase().as_str() {
        "first name" => Value::String(profile.first_name.clone()),
        "second name" | "last name" => Value::String(profile.last_name.clone()),
        "full name" => Value::String(profile.full_name()),
        "age" => Value::Numeral(i64::from(interpreter.today().year() - profile.birth.year())),
        "birth" | "birth date" | "date of birth" => Value::Date(profile.birth),
        "sex" | "gender" => Value::String(profile.sex.name().to_string()),
        "occupation" => Value::String(profile.occupation.clone()),
        "phone" | "phone number" | "tel" => Value::String(profile.phone.clone()),
        "email" | "e-mail" => Value::String(profile.email.clone()),
        "wedding" | "wedding date" | "date of wedding" | "marriage" | "marriage date" | "date of marriage" => {
            let tree = interpreter.tree();
            tree.index_of(profile.id)
                .and_then(|index| tree.vertex(index))
                .and_then(Vertex::wedding)
                .map_or(Value::Void, Value::Date)
        }
        _ => Value::Void,
    }
}

pub(super) fn register(table: &mut FunctionTable) {
    add(table, "person", Arity::Between(1, 2), |interpreter, args| {
        let tree = interpreter.tree();
        let found = match args {
            [full_name] => tree.find_by_full_name(full_name.as_str("person")?),
            [first, last, ..] => tree.find(first.as_str("person")?, last.as_str("person")?),
            [] => None,
        };
        Ok(found.and_then(|index| person_at(&tree, index)).unwrap_or(Value::Void))
    });
    add(table, "father", Arity::Exactly(1), |interpreter, args| {
        related(interpreter, "father", &args[0], |v| v.father().into_iter().collect())
    });
    add(table, "mother", Arity::Exactly(1), |interpreter, args| {
        related(interpreter, "mother", &args[0], |v| v.mother().into_iter().collect())
    });
    add(table, "spouse", Arity::Exactly(1), |interpreter, args| {
        related(interpreter, "spouse", &args[0], |v| v.spouse().into_iter().collect())
    });
    add(table, "children", Arity::Exactly(1), |interpreter, args| {
        related(interpreter, "children", &args[0], |v| v.children().to_vec())
    });
    add(table, "attr", Arity::Exactly(2), |interpreter, args| {
        let profile = Arc::clone(args[0].as_person("attr")?);
        let key = args[1].as_str("attr")?;
        Ok(attribute(interpreter, &profile, key))
    });
    add(table, "kinship", Arity::Exactly(2), |interpreter, args| {
        let tree = interpreter.tree();
        let from = vertex_of(&tree, "kinship", &args[0])?;
        let to = vertex_of(&tree, "kinship", &args[1])?;
        Ok(strings(tree.kinship(from, to)))
    });
    add(table, "gen-dist", Arity::Exactly(2), |interpreter, args| {
        let tree = interpreter.tree();
        let from = vertex_of(&tree, "gen-dist", &args[0])?;
        let to = vertex_of(&tree, "gen-dist", &args[1])?;
        Ok(Value::Numeral(tree.generation_distance(from, to)))
    });
    add(table, "shorten", Arity::Exactly(1), |interpreter, args| {
        let kinship = terms("shorten", &args[0])?;
        Ok(strings(interpreter.dictionary().shorten(&kinship)))
    });
    add(table, "put-kinship-term", Arity::Exactly(2), |interpreter, args| {
        let key = args[0].as_str("put-kinship-term")?;
        let name = args[1].as_str("put-kinship-term")?;
        interpreter.put_kinship_term(key, name)?;
        Ok(Value::Void)
    });
    // everyone whose shortened kinship to the given person is exactly the relation
    add(table, "relatives", Arity::Exactly(2), |interpreter, args| {
        let tree = interpreter.tree();
        let ego = vertex_of(&tree, "relatives", &args[0])?;
        let relation = args[1].as_str("relatives")?.trim().to_lowercase();
        let mut found = Vec::new();
        for index in (0..tree.len()).filter(|&index| index != ego) {
            let shortened = interpreter.dictionary().shorten(&tree.kinship(index, ego));
            if let [term] = shortened.as_slice() {
                if matches_relation(term, &relation) {
                    found.extend(person_at(&tree, index));
                }
            }
        }
        Ok(Value::List(found))
    });
}
