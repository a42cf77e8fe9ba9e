mod common;

use std::any::TypeId;
use std::sync::Arc;

use objmap_map::{AccessError, ConversionFailure, Mapper, MappingError};
use objmap_model::{TypeDef, TypeRegistry, ValueError, impl_field_value_object};
use proptest::prelude::*;

use common::{
    Address, Adres, CONFIG, Employee, Medewerker, Person, Persoon, Ploeg, Team, john,
    register_models, registry,
};

/// Not registered anywhere.
#[derive(Debug, Clone, Default, PartialEq)]
struct Badge {
    code: String,
}

impl_field_value_object!(Badge);

#[derive(Debug, Default)]
struct Visitor {
    name: String,
    badge: Option<Badge>,
}

#[derive(Debug, Default)]
struct Bezoeker {
    naam: String,
    pasje: Option<Badge>,
}

fn mapper() -> Mapper {
    Mapper::from_json_str(CONFIG, registry()).expect("valid configuration")
}

fn person(first: &str, last: &str) -> Person {
    Person {
        first_name: first.to_string(),
        last_name: last.to_string(),
        ..Person::default()
    }
}

#[test]
fn maps_person_with_nested_address() {
    let persoon: Persoon = mapper().map(&john()).expect("map person");
    assert_eq!(
        persoon,
        Persoon {
            voornaam: "John".to_string(),
            achternaam: "Doe".to_string(),
            leeftijd: 42,
            adres: Some(Adres {
                straat: "123 Main St".to_string(),
                stad: "Anytown".to_string(),
            }),
        }
    );
}

#[test]
fn null_nested_value_stays_null() {
    let persoon: Persoon = mapper().map(&person("Jane", "Roe")).expect("map person");
    assert_eq!(persoon.voornaam, "Jane");
    assert_eq!(persoon.adres, None);
}

#[test]
fn mapping_twice_yields_equal_targets() {
    let mapper = mapper();
    let source = john();
    let first: Persoon = mapper.map(&source).expect("first");
    let second: Persoon = mapper.map(&source).expect("second");
    assert_eq!(first, second);
}

#[test]
fn empty_collection_maps_to_empty_vec() {
    let people: Vec<Person> = Vec::new();
    let mapped: Vec<Persoon> = mapper().map_all(&people).expect("map empty");
    assert!(mapped.is_empty());
}

#[test]
fn first_failing_element_aborts_collection() {
    let mut too_old = person("Old", "Timer");
    too_old.age = 300;
    let people = vec![john(), too_old, john()];

    let err = mapper()
        .map_all::<Person, Persoon, _>(&people)
        .unwrap_err();
    let MappingError::Conversion { source, .. } = &err else {
        panic!("expected a conversion error, got {err:?}");
    };
    assert!(matches!(
        source,
        ConversionFailure::Access(AccessError::Assign {
            source: ValueError::OutOfRange { target: "u8", .. },
            ..
        })
    ));
}

#[test]
fn unconfigured_pair_fails_fast() {
    let err = mapper()
        .map::<Persoon, Person>(&Persoon::default())
        .unwrap_err();
    assert!(matches!(err, MappingError::NoConverter { .. }));
    assert_eq!(
        err.to_string(),
        "no mapping registered for com.example.models.Persoon -> com.example.models.Person"
    );
}

#[test]
fn unregistered_source_names_rust_type() {
    let err = mapper().map::<String, Persoon>(&String::new()).unwrap_err();
    let (source_type, target_type) = err.type_pair();
    assert!(source_type.contains("String"));
    assert_eq!(target_type, "com.example.models.Persoon");
}

#[test]
fn inherited_fields_are_read_and_written() {
    let employee = Employee {
        person: john(),
        employee_id: "E-7".to_string(),
    };
    let medewerker: Medewerker = mapper().map(&employee).expect("map employee");
    assert_eq!(medewerker.personeelsnummer, "E-7");
    assert_eq!(medewerker.persoon.voornaam, "John");
    assert_eq!(
        medewerker.persoon.adres.map(|adres| adres.stad),
        Some("Anytown".to_string())
    );
    // Not listed in the configuration.
    assert_eq!(medewerker.persoon.achternaam, "");
}

#[test]
fn list_elements_are_converted() {
    let team = Team {
        name: "Core".to_string(),
        members: vec![john(), person("Jane", "Roe")],
    };
    let ploeg: Ploeg = mapper().map(&team).expect("map team");
    assert_eq!(ploeg.naam, "Core");
    let names: Vec<&str> = ploeg.leden.iter().map(|p| p.voornaam.as_str()).collect();
    assert_eq!(names, vec!["John", "Jane"]);
}

#[test]
fn nested_values_are_copied_when_no_namespace_is_mappable() {
    let json = CONFIG.replace(r#"["com.example.models"]"#, "[]");
    let mapper = Mapper::from_json_str(&json, registry()).expect("valid configuration");

    let err = mapper.map::<Person, Persoon>(&john()).unwrap_err();
    assert!(matches!(
        err,
        MappingError::Conversion {
            source: ConversionFailure::Access(AccessError::Assign { ref field, .. }),
            ..
        } if field == "adres"
    ));

    // Without a nested value there is nothing to convert.
    let persoon: Persoon = mapper.map(&person("Jane", "Roe")).expect("flat person");
    assert_eq!(persoon.achternaam, "Roe");
}

#[test]
fn nested_pair_without_mapping_fails_whole_conversion() {
    let json = r#"{
      "mappablePackages": ["com.example.models"],
      "mappings": [{
        "sourceClass": "com.example.models.Person",
        "targetClass": "com.example.models.Persoon",
        "fields": { "firstName": "voornaam", "address": "adres" }
      }]
    }"#;
    let mapper = Mapper::from_json_str(json, registry()).expect("valid configuration");

    let err = mapper.map::<Person, Persoon>(&john()).unwrap_err();
    let MappingError::Conversion {
        source: ConversionFailure::Nested { field, source },
        ..
    } = &err
    else {
        panic!("expected a nested conversion error, got {err:?}");
    };
    assert_eq!(field, "adres");
    assert_eq!(
        source.type_pair(),
        ("com.example.models.Address", "com.example.models.Adres")
    );
    assert!(matches!(**source, MappingError::NoConverter { .. }));

    let persoon: Persoon = mapper.map(&person("Jane", "Roe")).expect("no nested value");
    assert_eq!(persoon.voornaam, "Jane");
}

#[test]
fn unregistered_nested_type_is_copied() {
    let mut registry = TypeRegistry::new();
    register_models(&mut registry).expect("models");
    registry
        .register(
            TypeDef::<Visitor>::new("com.example.models.Visitor")
                .field("name", |v| &v.name, |v| &mut v.name)
                .field("badge", |v| &v.badge, |v| &mut v.badge),
        )
        .expect("visitor");
    registry
        .register(
            TypeDef::<Bezoeker>::new("com.example.models.Bezoeker")
                .field("naam", |b| &b.naam, |b| &mut b.naam)
                .field("pasje", |b| &b.pasje, |b| &mut b.pasje),
        )
        .expect("bezoeker");
    let json = r#"{
      "mappablePackages": ["com.example"],
      "mappings": [{
        "sourceClass": "com.example.models.Visitor",
        "targetClass": "com.example.models.Bezoeker",
        "fields": { "name": "naam", "badge": "pasje" }
      }]
    }"#;
    let mapper = Mapper::from_json_str(json, Arc::new(registry)).expect("valid configuration");

    let visitor = Visitor {
        name: "Ada".to_string(),
        badge: Some(Badge {
            code: "B-12".to_string(),
        }),
    };
    let bezoeker: Bezoeker = mapper.map(&visitor).expect("map visitor");
    assert_eq!(bezoeker.naam, "Ada");
    assert_eq!(bezoeker.pasje, visitor.badge);
}

#[test]
fn target_without_constructor_fails_at_map_time() {
    let json = r#"{
      "mappings": [{
        "sourceClass": "com.example.models.Address",
        "targetClass": "com.example.models.Sealed",
        "fields": { "street": "straat" }
      }]
    }"#;
    let mapper = Mapper::from_json_str(json, registry()).expect("accepted at load time");
    let err = mapper
        .map::<Address, common::Sealed>(&Address::default())
        .unwrap_err();
    assert!(err.to_string().contains("has no default constructor"));
}

#[test]
fn dynamic_mapping_returns_boxed_target() {
    let mapper = mapper();
    let boxed = mapper
        .map_dyn(&john(), TypeId::of::<Persoon>())
        .expect("map dyn");
    let persoon = boxed.downcast::<Persoon>().expect("Persoon");
    assert_eq!(persoon.achternaam, "Doe");
}

#[test]
fn reports_configured_pairs() {
    let mapper = mapper();
    assert!(mapper.has_mapping::<Person, Persoon>());
    assert!(mapper.has_mapping::<Address, Adres>());
    assert!(!mapper.has_mapping::<Persoon, Person>());
    assert_eq!(mapper.config().class_mappings().len(), 4);
}

#[test]
fn shared_mapper_maps_concurrently() {
    let mapper = Arc::new(mapper());
    let expected: Persoon = mapper.map(&john()).expect("reference result");
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mapper = Arc::clone(&mapper);
                scope.spawn(move || mapper.map::<Person, Persoon>(&john()))
            })
            .collect();
        for handle in handles {
            let persoon = handle.join().expect("thread").expect("map");
            assert_eq!(persoon, expected);
        }
    });
}

proptest! {
    #[test]
    fn collection_mapping_preserves_length_and_order(
        names in prop::collection::vec(("[a-z]{1,8}", "[a-z]{1,8}"), 0..16)
    ) {
        let mapper = mapper();
        let people: Vec<Person> = names.iter().map(|(first, last)| person(first, last)).collect();
        let mapped: Vec<Persoon> = mapper.map_all(&people).expect("map all");

        prop_assert_eq!(mapped.len(), people.len());
        for (source, target) in people.iter().zip(&mapped) {
            prop_assert_eq!(&target.voornaam, &source.first_name);
            prop_assert_eq!(&target.achternaam, &source.last_name);
        }
    }
}
