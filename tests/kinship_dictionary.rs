use std::collections::BTreeMap;

use kisp::KispError;
use kisp::kinship::KinshipDictionary;

fn chain(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

#[test]
fn placeholders_expand_into_every_combination() {
    let dictionary = KinshipDictionary::from_entries([("parent,child", "sibling-or-self"), ("spouse,parent", "parent-in-law")])
        .expect("valid entries");
    assert_eq!(dictionary.len(), 2);
    for first in ["mother", "father"] {
        for second in ["son", "daughter"] {
            assert_eq!(dictionary.get(&chain(&[first, second])), Some("sibling-or-self"));
        }
    }
    assert_eq!(dictionary.get(&chain(&["wife", "father"])), Some("parent-in-law"));
    assert_eq!(dictionary.get(&chain(&["husband", "mother"])), Some("parent-in-law"));
    assert_eq!(dictionary.get(&chain(&["parent", "child"])), None);
}

#[test]
fn shorten_prefers_the_longest_then_the_leftmost_match() {
    let dictionary = KinshipDictionary::from_entries([("a,b", "L"), ("b,c", "R"), ("b,c,d", "M")]).expect("valid entries");
    assert_eq!(dictionary.shorten(&chain(&["a", "b", "c"])), chain(&["L", "c"]));
    assert_eq!(dictionary.shorten(&chain(&["a", "b", "c", "d"])), chain(&["a", "M"]));
    assert_eq!(dictionary.shorten(&chain(&["x", "a", "b", "y", "b", "c"])), chain(&["x", "L", "y", "R"]));
    assert_eq!(dictionary.shorten(&chain(&["x"])), chain(&["x"]));
    assert!(dictionary.shorten(&[]).is_empty());
}

#[test]
fn shorten_is_greedy_not_optimal() {
    let dictionary =
        KinshipDictionary::from_entries([("b,c,d,e", "Y"), ("a,b,c", "P"), ("d,e,f", "Q")]).expect("valid entries");
    // [P, Q] would be shorter, but the longest match is taken first
    assert_eq!(dictionary.shorten(&chain(&["a", "b", "c", "d", "e", "f"])), chain(&["a", "Y", "f"]));
}

#[test]
fn invalid_entries_are_rejected() {
    let mut dictionary = KinshipDictionary::new();
    for (key, name) in [("father,,mother", "x"), ("", "x"), ("father", " "), ("father,mother", "o'grand")] {
        let err = dictionary.put(key, name).unwrap_err();
        assert!(matches!(err, KispError::Domain(_)), "{key:?} gave {err}");
    }
    assert!(dictionary.is_empty());
}

#[test]
fn additions_are_persisted() {
    let path = std::env::temp_dir().join(format!("kisp-dictionary-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut dictionary = KinshipDictionary::load(&path).expect("missing file is fine");
    assert!(dictionary.is_empty());
    assert!(dictionary.put("parent, son", "brother").expect("put ok"));
    assert!(!dictionary.put("parent,son", "sibling").expect("put ok"));
    assert!(dictionary.put("spouse,father", "father-in-law").expect("put ok"));

    let raw: BTreeMap<String, String> =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("file written")).expect("json object");
    assert_eq!(raw.get("parent,son").map(String::as_str), Some("brother"));
    assert_eq!(raw.len(), 2);

    let reloaded = KinshipDictionary::load(&path).expect("reload ok");
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get(&chain(&["mother", "son"])), Some("brother"));
    assert_eq!(reloaded.get(&chain(&["husband", "father"])), Some("father-in-law"));
    std::fs::remove_file(&path).expect("cleanup");
}

#[test]
fn shipped_dictionary_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/res/kinship-dict.json");
    let dictionary = KinshipDictionary::load(path).expect("shipped dictionary");
    assert!(!dictionary.is_empty());
    assert_eq!(dictionary.shorten(&chain(&["mother", "father"])), chain(&["maternal-grandfather"]));
    assert_eq!(dictionary.shorten(&chain(&["father", "son"])), chain(&["brother"]));
}
