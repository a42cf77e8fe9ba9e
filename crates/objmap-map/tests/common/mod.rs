#![allow(dead_code)]

use std::sync::Arc;

use objmap_model::{TypeDef, TypeRegistry, impl_field_value_object};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adres {
    pub straat: String,
    pub stad: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Persoon {
    pub voornaam: String,
    pub achternaam: String,
    pub leeftijd: u8,
    pub adres: Option<Adres>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Employee {
    pub person: Person,
    pub employee_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Medewerker {
    pub persoon: Persoon,
    pub personeelsnummer: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub name: String,
    pub members: Vec<Person>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ploeg {
    pub naam: String,
    pub leden: Vec<Persoon>,
}

/// Registered without a constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Sealed {
    pub straat: String,
}

impl_field_value_object!(Address, Adres, Person, Persoon);

pub const CONFIG: &str = r#"{
  "mappablePackages": ["com.example.models"],
  "mappings": [
    {
      "sourceClass": "com.example.models.Person",
      "targetClass": "com.example.models.Persoon",
      "fields": {
        "firstName": "voornaam",
        "lastName": "achternaam",
        "age": "leeftijd",
        "address": "adres"
      }
    },
    {
      "sourceClass": "com.example.models.Address",
      "targetClass": "com.example.models.Adres",
      "fields": { "street": "straat", "city": "stad" }
    },
    {
      "sourceClass": "com.example.models.Employee",
      "targetClass": "com.example.models.Medewerker",
      "fields": {
        "firstName": "voornaam",
        "address": "adres",
        "employeeId": "personeelsnummer"
      }
    },
    {
      "sourceClass": "com.example.models.Team",
      "targetClass": "com.example.models.Ploeg",
      "fields": { "name": "naam", "members": "leden" }
    }
  ]
}"#;

pub fn registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    register_models(&mut registry).expect("register test models");
    Arc::new(registry)
}

pub fn register_models(registry: &mut TypeRegistry) -> objmap_model::Result<()> {
    registry.register(
        TypeDef::<Address>::new("com.example.models.Address")
            .field("street", |a| &a.street, |a| &mut a.street)
            .field("city", |a| &a.city, |a| &mut a.city),
    )?;
    registry.register(
        TypeDef::<Adres>::new("com.example.models.Adres")
            .field("straat", |a| &a.straat, |a| &mut a.straat)
            .field("stad", |a| &a.stad, |a| &mut a.stad),
    )?;
    registry.register(
        TypeDef::<Person>::new("com.example.models.Person")
            .field("firstName", |p| &p.first_name, |p| &mut p.first_name)
            .field("lastName", |p| &p.last_name, |p| &mut p.last_name)
            .field("age", |p| &p.age, |p| &mut p.age)
            .field("address", |p| &p.address, |p| &mut p.address),
    )?;
    registry.register(
        TypeDef::<Persoon>::new("com.example.models.Persoon")
            .field("voornaam", |p| &p.voornaam, |p| &mut p.voornaam)
            .field("achternaam", |p| &p.achternaam, |p| &mut p.achternaam)
            .field("leeftijd", |p| &p.leeftijd, |p| &mut p.leeftijd)
            .field("adres", |p| &p.adres, |p| &mut p.adres),
    )?;
    registry.register(
        TypeDef::<Employee>::new("com.example.models.Employee")
            .extends(|e| &e.person, |e| &mut e.person)
            .field("employeeId", |e| &e.employee_id, |e| &mut e.employee_id),
    )?;
    registry.register(
        TypeDef::<Medewerker>::new("com.example.models.Medewerker")
            .extends(|m| &m.persoon, |m| &mut m.persoon)
            .field(
                "personeelsnummer",
                |m| &m.personeelsnummer,
                |m| &mut m.personeelsnummer,
            ),
    )?;
    registry.register(
        TypeDef::<Team>::new("com.example.models.Team")
            .field("name", |t| &t.name, |t| &mut t.name)
            .field("members", |t| &t.members, |t| &mut t.members),
    )?;
    registry.register(
        TypeDef::<Ploeg>::new("com.example.models.Ploeg")
            .field("naam", |p| &p.naam, |p| &mut p.naam)
            .field("leden", |p| &p.leden, |p| &mut p.leden),
    )?;
    registry.register(
        TypeDef::<Sealed>::without_constructor("com.example.models.Sealed")
            .field("straat", |s| &s.straat, |s| &mut s.straat),
    )?;
    Ok(())
}

pub fn john() -> Person {
    Person {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        age: 42,
        address: Some(Address {
            street: "123 Main St".to_string(),
            city: "Anytown".to_string(),
        }),
    }
}
