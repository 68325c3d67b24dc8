use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};

use kisp::genealogy::{Bond, Genealogy, PersonId, Profile, Sex};
use kisp::interpreter::Interpreter;
use kisp::kinship::KinshipDictionary;

// a line of fathers and sons, each son married, so every search spans the whole tree
fn lineage(generations: u64) -> Genealogy {
    let birth = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
    let mut people = Vec::new();
    let mut bonds = Vec::new();
    for g in 0..generations {
        let (son, wife): (PersonId, PersonId) = (2 * g + 1, 2 * g + 2);
        people.push(Profile::new(son, &format!("son{g}"), "line", Sex::Male, birth));
        people.push(Profile::new(wife, &format!("wife{g}"), "line", Sex::Female, birth));
        bonds.push(Bond::Marital { first: son, second: wife, wedding: birth });
        if g > 0 {
            bonds.push(Bond::Parental { parent: son - 2, child: son });
            bonds.push(Bond::Parental { parent: wife - 2, child: son });
        }
    }
    Genealogy::new(people, bonds).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let dictionary = KinshipDictionary::load(concat!(env!("CARGO_MANIFEST_DIR"), "/res/kinship-dict.json")).unwrap();
    let path: Vec<String> = ["mother", "father", "son", "son", "wife", "father", "father", "mother", "daughter"]
        .iter()
        .cycle()
        .take(90)
        .map(|t| t.to_string())
        .collect();
    c.bench_function("shorten 9", |b| b.iter(|| dictionary.shorten(black_box(&path[..9]))));
    c.bench_function("shorten 90", |b| b.iter(|| dictionary.shorten(black_box(&path))));

    let mut genealogy = lineage(500);
    let tree = genealogy.tree();
    let (first, last) = (0, tree.len() - 2);
    c.bench_function("kinship 1k", |b| b.iter(|| tree.kinship(black_box(last), black_box(first))));
    c.bench_function("gen-dist 1k", |b| b.iter(|| tree.generation_distance(black_box(first), black_box(last))));

    let mut interpreter = Interpreter::new(Genealogy::default(), KinshipDictionary::new());
    interpreter
        .exec_script("(define fib (lambda (n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2))))))")
        .unwrap();
    interpreter.disable_caching();
    c.bench_function("fib 15 uncached", |b| b.iter(|| interpreter.exec(black_box("(fib 15)")).unwrap()));
    interpreter.enable_caching();
    c.bench_function("fib 60 cached", |b| b.iter(|| {
        interpreter.expunge_cache();
        interpreter.exec(black_box("(fib 60)")).unwrap()
    }));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
