use kisp::normalize::{STRIPMARK, clip, is_valid, split_terms};
use kisp::term::Term;

#[test]
fn validation() {
    assert!(is_valid("(+ 1 2)"));
    assert!(is_valid("atom"));
    assert!(is_valid("(concat ')' '(')"));
    assert!(is_valid("(a (b (c)))"));
    assert!(!is_valid("(+ 1 2"));
    assert!(!is_valid("(+ 1 2))"));
    assert!(!is_valid(")("));
    assert!(!is_valid("(concat 'abc)"));
    assert!(!is_valid(&format!("(concat '{}')", STRIPMARK)));
    assert!(!is_valid(&format!("(a {})", STRIPMARK)));
}

#[test]
fn clipping_squeezes_whitespace_outside_literals() {
    assert_eq!(clip("(  +   1\n 2 )"), "(+ 1 2)");
    assert_eq!(clip("( ( a ) )"), "((a))");
    assert_eq!(clip("  (concat  'a   b'\t'  c ' )  "), "(concat 'a   b' '  c ')");
    assert_eq!(clip("(f '( x )' )"), "(f '( x )')");
}

#[test]
fn scripts_split_at_top_level() {
    let terms = split_terms("(define a 1)\n; comment (ignored)\n(define b\n   (+ a 1)) 'x;y' c").expect("split ok");
    assert_eq!(terms, vec!["(define a 1)", "(define b (+ a 1))", "'x;y'", "c"]);
    assert!(split_terms("(a))").is_err());
    assert!(split_terms("(a 'b)").is_err());
    assert!(split_terms("").expect("split ok").is_empty());
}

#[test]
fn parsed_terms_render_canonically() {
    let text = "(map (lambda (x) (concat x '!  ')) (list 'a b' 'c'))";
    let term = Term::parse(text).expect("parse ok");
    assert_eq!(term.to_string(), text);
    assert_eq!(term.leader(), Some("map"));
    assert!(Term::parse("(a b").is_err());
}
