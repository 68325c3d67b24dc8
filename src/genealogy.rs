//! The genealogy the engine is handed: person profiles and the bonds between them.
//!
//! A [`Genealogy`] owns profiles and bonds and keeps a lazily generated
//! [`FamilyTree`]. Every structural edit (marriage, divorce, birth, death,
//! parentage) drops the generated tree; the next query regenerates it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KispError, Result};
use crate::graph::FamilyTree;

pub type PersonId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn name(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub birth: NaiveDate,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl Profile {
    pub fn new(id: PersonId, first_name: &str, last_name: &str, sex: Sex, birth: NaiveDate) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            sex,
            birth,
            occupation: String::new(),
            phone: String::new(),
            email: String::new(),
        }
    }

    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Bond {
    Marital { first: PersonId, second: PersonId, wedding: NaiveDate },
    Parental { parent: PersonId, child: PersonId },
}

impl Bond {
    pub fn is_linked_to(&self, id: PersonId) -> bool {
        match *self {
            Bond::Marital { first, second, .. } => first == id || second == id,
            Bond::Parental { parent, child } => parent == id || child == id,
        }
    }

    fn is_marriage_of(&self, a: PersonId, b: PersonId) -> bool {
        matches!(*self, Bond::Marital { first, second, .. } if (first, second) == (a, b) || (first, second) == (b, a))
    }
}

/// Serialized form of a genealogy, as read from a JSON file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub people: Vec<Profile>,
    #[serde(default)]
    pub bonds: Vec<Bond>,
}

#[derive(Debug, Default)]
pub struct Genealogy {
    people: Vec<Arc<Profile>>,
    bonds: Vec<Bond>,
    tree: Option<Arc<FamilyTree>>,
}

impl Genealogy {
    pub fn new(people: Vec<Profile>, bonds: Vec<Bond>) -> Result<Self> {
        let mut genealogy = Self::default();
        for profile in people {
            genealogy.add_person(profile)?;
        }
        for bond in bonds {
            match bond {
                Bond::Marital { first, second, wedding } => genealogy.marry(first, second, wedding)?,
                Bond::Parental { parent, child } => genealogy.add_parentage(parent, child)?,
            }
        }
        Ok(genealogy)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        Self::new(snapshot.people, snapshot.bonds)
    }

    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        Self::from_snapshot(snapshot)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())
            .map_err(|e| KispError::Persistence(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(BufReader::new(file))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            people: self.people.iter().map(|p| p.as_ref().clone()).collect(),
            bonds: self.bonds.clone(),
        }
    }

    pub fn people(&self) -> &[Arc<Profile>] {
        &self.people
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn person(&self, id: PersonId) -> Option<&Arc<Profile>> {
        self.people.iter().find(|p| p.id == id)
    }

    /// The family tree of the current people and bonds, generated on demand.
    pub fn tree(&mut self) -> Arc<FamilyTree> {
        if let Some(tree) = &self.tree {
            return Arc::clone(tree);
        }
        let tree = Arc::new(FamilyTree::build(&self.people, &self.bonds));
        debug!(vertices = tree.len(), "family tree generated");
        self.tree = Some(Arc::clone(&tree));
        tree
    }

    pub fn is_married(&self, id: PersonId) -> bool {
        self.bonds.iter().any(|b| matches!(b, Bond::Marital { .. }) && b.is_linked_to(id))
    }

    fn require(&self, id: PersonId) -> Result<&Arc<Profile>> {
        self.person(id).ok_or_else(|| KispError::Domain(format!("No person with id {id}")))
    }

    fn invalidate(&mut self) {
        if self.tree.take().is_some() {
            debug!("family tree invalidated");
        }
    }

    /// Adds a person. Profile text may not contain a quote, since string
    /// literals cannot spell one.
    pub fn add_person(&mut self, profile: Profile) -> Result<()> {
        if self.person(profile.id).is_some() {
            return Err(KispError::Domain(format!("A person with id {} already exists", profile.id)));
        }
        let fields = [
            ("first name", &profile.first_name),
            ("last name", &profile.last_name),
            ("occupation", &profile.occupation),
            ("phone", &profile.phone),
            ("email", &profile.email),
        ];
        if let Some((field, text)) = fields.iter().find(|(_, text)| text.contains('\'')) {
            return Err(KispError::Domain(format!("The {field} of person {} contains a quote: {text}", profile.id)));
        }
        self.people.push(Arc::new(profile));
        self.invalidate();
        Ok(())
    }

    /// Removes a person together with every bond linked to them.
    pub fn remove_person(&mut self, id: PersonId) -> Result<()> {
        self.require(id)?;
        self.people.retain(|p| p.id != id);
        self.bonds.retain(|b| !b.is_linked_to(id));
        self.invalidate();
        Ok(())
    }

    pub fn marry(&mut self, first: PersonId, second: PersonId, wedding: NaiveDate) -> Result<()> {
        self.require(first)?;
        self.require(second)?;
        if first == second {
            return Err(KispError::Domain(format!("Person {first} cannot marry themselves")));
        }
        if let Some(married) = [first, second].into_iter().find(|id| self.is_married(*id)) {
            return Err(KispError::Domain(format!("Person {married} is already married")));
        }
        self.bonds.push(Bond::Marital { first, second, wedding });
        self.invalidate();
        Ok(())
    }

    pub fn divorce(&mut self, first: PersonId, second: PersonId) -> Result<()> {
        let before = self.bonds.len();
        self.bonds.retain(|b| !b.is_marriage_of(first, second));
        if self.bonds.len() == before {
            return Err(KispError::Domain(format!("Persons {first} and {second} are not married")));
        }
        self.invalidate();
        Ok(())
    }

    /// Links `child` to `parent`; the parent becomes father or mother by sex.
    pub fn add_parentage(&mut self, parent: PersonId, child: PersonId) -> Result<()> {
        let parent_sex = self.require(parent)?.sex;
        self.require(child)?;
        if parent == child {
            return Err(KispError::Domain(format!("Person {parent} cannot be their own parent")));
        }
        for bond in &self.bonds {
            if let Bond::Parental { parent: p, child: c } = *bond {
                if c == child && (p == parent || self.person(p).map(|p| p.sex) == Some(parent_sex)) {
                    return Err(KispError::Domain(format!(
                        "Person {child} already has a {}",
                        if parent_sex == Sex::Male { "father" } else { "mother" }
                    )));
                }
            }
        }
        self.bonds.push(Bond::Parental { parent, child });
        self.invalidate();
        Ok(())
    }

    pub fn remove_parentage(&mut self, parent: PersonId, child: PersonId) -> Result<()> {
        let before = self.bonds.len();
        self.bonds.retain(|b| *b != Bond::Parental { parent, child });
        if self.bonds.len() == before {
            return Err(KispError::Domain(format!("Person {parent} is not a parent of {child}")));
        }
        self.invalidate();
        Ok(())
    }
}
