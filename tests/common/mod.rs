#![allow(dead_code)]

use chrono::NaiveDate;
use kisp::datatype::Value;
use kisp::genealogy::{Bond, Genealogy, Profile, Sex};
use kisp::interpreter::Interpreter;
use kisp::kinship::KinshipDictionary;

pub const EGO: &str = "Евгений Грязнов";

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Three generations: grandparents Валентин and Нина, their children Светлана
/// (married to Сергей) and Андрей, and the grandchildren Евгений, Мария and Павел.
pub fn genealogy() -> Genealogy {
    let people = vec![
        Profile::new(1, "Валентин", "Грязнов", Sex::Male, date(1941, 3, 12)),
        Profile::new(2, "Нина", "Грязнова", Sex::Female, date(1944, 7, 2)),
        Profile::new(3, "Светлана", "Грязнова", Sex::Female, date(1968, 1, 25)),
        Profile::new(4, "Сергей", "Грязнов", Sex::Male, date(1966, 9, 14)),
        Profile::new(5, "Андрей", "Грязнов", Sex::Male, date(1970, 5, 30)),
        Profile::new(6, "Евгений", "Грязнов", Sex::Male, date(1995, 11, 30)),
        Profile::new(7, "Мария", "Грязнова", Sex::Female, date(1998, 4, 8)),
        Profile::new(8, "Павел", "Грязнов", Sex::Male, date(2001, 12, 19)),
    ];
    let bonds = vec![
        Bond::Marital { first: 1, second: 2, wedding: date(1965, 6, 20) },
        Bond::Marital { first: 4, second: 3, wedding: date(1993, 8, 7) },
        Bond::Parental { parent: 1, child: 3 },
        Bond::Parental { parent: 2, child: 3 },
        Bond::Parental { parent: 1, child: 5 },
        Bond::Parental { parent: 2, child: 5 },
        Bond::Parental { parent: 3, child: 6 },
        Bond::Parental { parent: 4, child: 6 },
        Bond::Parental { parent: 3, child: 7 },
        Bond::Parental { parent: 4, child: 7 },
        Bond::Parental { parent: 5, child: 8 },
    ];
    Genealogy::new(people, bonds).expect("consistent genealogy")
}

pub fn dictionary() -> KinshipDictionary {
    KinshipDictionary::from_entries([
        ("father,father", "paternal-grandfather"),
        ("father,mother", "paternal-grandmother"),
        ("mother,father", "maternal-grandfather"),
        ("mother,mother", "maternal-grandmother"),
        ("parent,son", "brother"),
        ("parent,daughter", "sister"),
        ("parent,parent,son", "uncle"),
        ("parent,parent,daughter", "aunt"),
        ("parent,parent,child,son", "cousin"),
        ("parent,parent,child,daughter", "cousin"),
        ("child,son", "grandson"),
        ("child,daughter", "granddaughter"),
        ("spouse,father", "father-in-law"),
        ("spouse,mother", "mother-in-law"),
    ])
    .expect("valid entries")
}

pub fn today() -> NaiveDate {
    date(2020, 6, 15)
}

/// An interpreter over the test family with the prelude loaded and `ego` defined.
pub fn setup() -> Interpreter {
    let mut interpreter = Interpreter::new(genealogy(), dictionary()).with_today(today());
    interpreter
        .exec_script(include_str!("../../res/prelude.kisp"))
        .expect("prelude ok");
    interpreter
        .exec(&format!("(define ego (person '{EGO}'))"))
        .expect("ego defined");
    interpreter
}

/// Evaluates a query and renders the result as a term.
pub fn eval(interpreter: &mut Interpreter, query: &str) -> String {
    interpreter
        .exec(query)
        .unwrap_or_else(|e| panic!("{query} failed: {e}"))
        .to_term()
}

pub fn value(interpreter: &mut Interpreter, query: &str) -> Value {
    interpreter.exec(query).unwrap_or_else(|e| panic!("{query} failed: {e}"))
}
