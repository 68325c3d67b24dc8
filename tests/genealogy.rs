mod common;

use common::{date, genealogy, setup};
use kisp::KispError;
use kisp::genealogy::{Bond, Genealogy, Profile, Sex};
use kisp::interface::{QueryId, QueryInterface};
use kisp::settings::Settings;

#[test]
fn snapshots_load_from_json() {
    let mut genealogy = Genealogy::from_json(include_str!("../res/genealogy.json").as_bytes()).expect("valid snapshot");
    assert_eq!(genealogy.people().len(), 8);
    let tree = genealogy.tree();
    let ego = tree.find_by_full_name("Евгений Грязнов").expect("ego exists");
    let grandfather = tree.find_by_full_name("Валентин Грязнов").expect("grandfather exists");
    assert_eq!(tree.kinship(grandfather, ego), vec!["mother", "father"]);
    assert_eq!(genealogy.person(3).map(|p| p.email.as_str()), Some("svetlana@example.org"));
}

#[test]
fn quotes_in_profiles_are_refused() {
    let mut genealogy = genealogy();
    let mut profile = Profile::new(9, "Shane", "O'Neil", Sex::Male, date(1980, 3, 3));
    assert!(matches!(genealogy.add_person(profile.clone()), Err(KispError::Domain(_))));
    profile.last_name = "ONeil".into();
    profile.occupation = "it's complicated".into();
    assert!(matches!(genealogy.add_person(profile.clone()), Err(KispError::Domain(_))));
    profile.occupation = "pilot".into();
    genealogy.add_person(profile).expect("person added");

    let json = r#"{"people": [{"id": 1, "first_name": "D'Arcy", "last_name": "Smith", "sex": "male", "birth": "1970-01-01"}]}"#;
    assert!(matches!(Genealogy::from_json(json.as_bytes()), Err(KispError::Domain(_))));
}

#[test]
fn snapshots_round_trip() {
    let genealogy = genealogy();
    let json = serde_json::to_string(&genealogy.snapshot()).expect("serializable");
    let restored = Genealogy::from_json(json.as_bytes()).expect("valid snapshot");
    assert_eq!(restored.people().len(), genealogy.people().len());
    assert_eq!(restored.bonds(), genealogy.bonds());
}

#[test]
fn inconsistent_edits_are_refused() {
    let mut genealogy = genealogy();
    // Светлана is married to Сергей
    assert!(matches!(genealogy.marry(3, 5, date(2000, 1, 1)), Err(KispError::Domain(_))));
    assert!(matches!(genealogy.marry(5, 5, date(2000, 1, 1)), Err(KispError::Domain(_))));
    // Евгений already has a father
    assert!(matches!(genealogy.add_parentage(5, 6), Err(KispError::Domain(_))));
    assert!(matches!(genealogy.add_parentage(6, 6), Err(KispError::Domain(_))));
    assert!(matches!(genealogy.divorce(1, 4), Err(KispError::Domain(_))));
    assert!(matches!(genealogy.remove_parentage(5, 6), Err(KispError::Domain(_))));
    assert!(matches!(
        genealogy.add_person(Profile::new(1, "Дубль", "Грязнов", Sex::Male, date(1950, 1, 1))),
        Err(KispError::Domain(_))
    ));
}

#[test]
fn edits_regenerate_the_tree() {
    let mut genealogy = genealogy();
    let before = genealogy.tree();
    assert_eq!(before.len(), 8);
    genealogy.remove_person(5).expect("removed");
    assert!(!genealogy.bonds().iter().any(|bond| bond.is_linked_to(5)));
    let after = genealogy.tree();
    assert_eq!(after.len(), 7);
    let pavel = after.find("Павел", "Грязнов").expect("Павел still exists");
    assert_eq!(after.vertex(pavel).and_then(|v| v.father()), None);

    genealogy.add_parentage(4, 8).expect("adopted");
    assert!(genealogy.bonds().contains(&Bond::Parental { parent: 4, child: 8 }));
    let tree = genealogy.tree();
    let pavel = tree.find("Павел", "Грязнов").expect("Павел still exists");
    assert_eq!(tree.vertex(pavel).and_then(|v| v.father()), tree.index_of(4));
}

#[test]
fn removed_people_are_gone_from_queries() {
    let mut interpreter = setup();
    interpreter.exec("(define uncle (person 'Андрей' 'Грязнов'))").expect("query ok");
    interpreter.remove_person(5).expect("removed");
    assert_eq!(interpreter.exec("(person 'Андрей' 'Грязнов')").expect("query ok").to_term(), "void");
    let err = interpreter.exec("(children uncle)").unwrap_err();
    assert!(matches!(err, KispError::Domain(_)), "got {err}");
}

#[test]
fn query_interface_numbers_queries() {
    let interface = QueryInterface::new(setup());
    let outcome = interface.run("(+ 1 2)").expect("query ok");
    assert_eq!(outcome.id, QueryId(1));
    assert_eq!(outcome.value.to_term(), "3");
    let failure = interface.run("(+ 1").unwrap_err();
    assert_eq!(failure.id, QueryId(2));
    assert!(failure.error.is_language_error());
    assert!(interface.last_elapsed().is_some());
    let cached = interface.with(|interpreter| interpreter.cache().len()).expect("lock ok");
    assert!(cached >= 1);
}

#[test]
fn settings_fall_back_to_defaults() {
    let settings = Settings::load_from("no-such-kisp-settings").expect("defaults");
    assert!(settings.genealogy.is_none());
    assert_eq!(settings.kinship_dictionary.to_str(), Some("res/kinship-dict.json"));
    assert!(settings.caching);
    assert!(!settings.server.enabled);
    assert_eq!(settings.server.bind, "127.0.0.1:3000");
}
