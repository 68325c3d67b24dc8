mod common;

use common::{eval, setup};
use kisp::KispError;

#[test]
fn addition_and_multiplication_fold() {
    let mut interpreter = setup();
    assert_eq!(eval(&mut interpreter, "(+ 1 9)"), "10");
    assert_eq!(eval(&mut interpreter, "(+ 1 2 3 4)"), "10");
    assert_eq!(eval(&mut interpreter, "(* 2 3 4)"), "24");
    assert_eq!(eval(&mut interpreter, "(* 7)"), "7");
    assert_eq!(eval(&mut interpreter, "(- 3 10)"), "-7");
}

#[test]
fn division_truncates_toward_zero() {
    let mut interpreter = setup();
    assert_eq!(eval(&mut interpreter, "(div 10 -10)"), "-1");
    assert_eq!(eval(&mut interpreter, "(div 7 -2)"), "-3");
    assert_eq!(eval(&mut interpreter, "(div -7 2)"), "-3");
    assert_eq!(eval(&mut interpreter, "(mod -7 2)"), "-1");
    assert_eq!(eval(&mut interpreter, "(mod 17 5)"), "2");
}

#[test]
fn division_by_zero_is_a_domain_error() {
    let mut interpreter = setup();
    let err = interpreter.exec("(mod 5 0)").unwrap_err();
    assert!(matches!(err, KispError::Domain(_)), "got {err}");
    let err = interpreter.exec("(div 5 0)").unwrap_err();
    assert!(matches!(err, KispError::Domain(_)), "got {err}");
}

#[test]
fn arity_is_checked_before_anything_runs() {
    let mut interpreter = setup();
    assert!(matches!(interpreter.exec("(+)").unwrap_err(), KispError::Arity(_)));
    assert!(matches!(interpreter.exec("(- 5)").unwrap_err(), KispError::Arity(_)));
    assert!(matches!(interpreter.exec("(not)").unwrap_err(), KispError::Arity(_)));
    // the argument would fail on its own, but the arity check comes first
    assert!(matches!(interpreter.exec("(< 1 2 (div 1 0))").unwrap_err(), KispError::Arity(_)));
}

#[test]
fn overflow_is_reported() {
    let mut interpreter = setup();
    let err = interpreter.exec("(+ 9223372036854775807 1)").unwrap_err();
    assert!(matches!(err, KispError::Domain(_)), "got {err}");
    let err = interpreter.exec("99999999999999999999").unwrap_err();
    assert!(matches!(err, KispError::Domain(_)), "got {err}");
}

#[test]
fn comparisons() {
    let mut interpreter = setup();
    assert_eq!(eval(&mut interpreter, "(< 1 2)"), "true");
    assert_eq!(eval(&mut interpreter, "(<= 2 2)"), "true");
    assert_eq!(eval(&mut interpreter, "(> 1 2)"), "false");
    assert_eq!(eval(&mut interpreter, "(>= -1 -2)"), "true");
    let err = interpreter.exec("(< 1 '2')").unwrap_err();
    assert!(matches!(err, KispError::Type(_)), "got {err}");
    assert!(err.to_string().contains("<"));
}

#[test]
fn booleans() {
    let mut interpreter = setup();
    assert_eq!(eval(&mut interpreter, "(and true true false)"), "false");
    assert_eq!(eval(&mut interpreter, "(and true)"), "true");
    assert_eq!(eval(&mut interpreter, "(or false false true)"), "true");
    assert_eq!(eval(&mut interpreter, "(not true)"), "false");
    assert_eq!(eval(&mut interpreter, "(implies false false)"), "true");
    assert_eq!(eval(&mut interpreter, "(implies true false)"), "false");
    assert!(matches!(interpreter.exec("(and true 1)").unwrap_err(), KispError::Type(_)));
}

#[test]
fn equality_and_type_tests() {
    let mut interpreter = setup();
    assert_eq!(eval(&mut interpreter, "(= 1 1)"), "true");
    assert_eq!(eval(&mut interpreter, "(= 1 '1')"), "false");
    assert_eq!(eval(&mut interpreter, "(= (list 1 2) (list 1 2))"), "true");
    assert_eq!(eval(&mut interpreter, "(= void void)"), "true");
    assert_eq!(eval(&mut interpreter, "(of-type? 5 'numeral')"), "true");
    assert_eq!(eval(&mut interpreter, "(of-type? 'x' 'String')"), "true");
    assert_eq!(eval(&mut interpreter, "(of-type? vacant 'list')"), "true");
    assert_eq!(eval(&mut interpreter, "(of-type? now 'date')"), "true");
    assert_eq!(eval(&mut interpreter, "(of-type? inc 'function')"), "true");
    assert_eq!(eval(&mut interpreter, "(of-type? ego 'person')"), "true");
    assert_eq!(eval(&mut interpreter, "(of-type? 1 'nothing')"), "false");
}

#[test]
fn prelude_helpers() {
    let mut interpreter = setup();
    assert_eq!(eval(&mut interpreter, "(inc 41)"), "42");
    assert_eq!(eval(&mut interpreter, "(dec 0)"), "-1");
    assert_eq!(eval(&mut interpreter, "(square -4)"), "16");
    assert_eq!(eval(&mut interpreter, "(double 21)"), "42");
    assert_eq!(eval(&mut interpreter, "(odd? 7)"), "true");
    assert_eq!(eval(&mut interpreter, "(even? 7)"), "false");
    assert_eq!(eval(&mut interpreter, "(odd? -3)"), "true");
}
