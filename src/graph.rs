//! The family tree: one vertex per person, linked by father, mother, spouse and children.
//!
//! Vertices only refer to each other by index, the tree owns them all. For
//! traversal the links are undirected, so a vertex's father, mother, spouse
//! and children are all its neighbours. Breadth-first searches keep their
//! marks in a bitmap local to the call, so searches never affect each other.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

// used to map person ids to vertex indexes and back
use bimap::BiMap;
use chrono::NaiveDate;
// used to mark the vertices a search has discovered
use roaring::RoaringBitmap;

use crate::genealogy::{Bond, PersonId, Profile};
use crate::OtherHasher;

pub const FATHER: &str = "father";
pub const MOTHER: &str = "mother";
pub const HUSBAND: &str = "husband";
pub const WIFE: &str = "wife";
pub const SON: &str = "son";
pub const DAUGHTER: &str = "daughter";

/// Predecessor of every vertex a search discovered, keyed by vertex index.
pub type Predecessors = HashMap<usize, usize, OtherHasher>;

#[derive(Debug, Clone)]
pub struct Vertex {
    profile: Arc<Profile>,
    father: Option<usize>,
    mother: Option<usize>,
    spouse: Option<usize>,
    wedding: Option<NaiveDate>,
    children: Vec<usize>,
}

impl Vertex {
    fn new(profile: Arc<Profile>) -> Self {
        Self { profile, father: None, mother: None, spouse: None, wedding: None, children: Vec::new() }
    }
    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }
    pub fn father(&self) -> Option<usize> {
        self.father
    }
    pub fn mother(&self) -> Option<usize> {
        self.mother
    }
    pub fn spouse(&self) -> Option<usize> {
        self.spouse
    }
    pub fn wedding(&self) -> Option<NaiveDate> {
        self.wedding
    }
    pub fn children(&self) -> &[usize] {
        &self.children
    }
    /// Neighbours in the order a search visits them.
    fn neighbours(&self) -> impl Iterator<Item = usize> + '_ {
        self.father
            .into_iter()
            .chain(self.mother)
            .chain(self.spouse)
            .chain(self.children.iter().copied())
    }
}

#[derive(Debug)]
pub struct FamilyTree {
    vertices: Vec<Vertex>,
    index: BiMap<PersonId, usize>,
}

impl FamilyTree {
    pub fn build(people: &[Arc<Profile>], bonds: &[Bond]) -> Self {
        let mut vertices = Vec::with_capacity(people.len());
        let mut index = BiMap::new();
        for profile in people {
            index.insert(profile.id, vertices.len());
            vertices.push(Vertex::new(Arc::clone(profile)));
        }
        for bond in bonds {
            match *bond {
                Bond::Marital { first, second, wedding } => {
                    if let (Some(&a), Some(&b)) = (index.get_by_left(&first), index.get_by_left(&second)) {
                        vertices[a].spouse = Some(b);
                        vertices[a].wedding = Some(wedding);
                        vertices[b].spouse = Some(a);
                        vertices[b].wedding = Some(wedding);
                    }
                }
                Bond::Parental { parent, child } => {
                    if let (Some(&p), Some(&c)) = (index.get_by_left(&parent), index.get_by_left(&child)) {
                        vertices[p].children.push(c);
                        if vertices[p].profile.is_male() {
                            vertices[c].father = Some(p);
                        }
                        else {
                            vertices[c].mother = Some(p);
                        }
                    }
                }
            }
        }
        Self { vertices, index }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn index_of(&self, id: PersonId) -> Option<usize> {
        self.index.get_by_left(&id).copied()
    }

    pub fn id_of(&self, index: usize) -> Option<PersonId> {
        self.index.get_by_right(&index).copied()
    }

    /// Finds a person by first and last name, ignoring case.
    ///
    /// An empty first name matches on the last name alone and vice versa.
    pub fn find(&self, first_name: &str, last_name: &str) -> Option<usize> {
        let first = first_name.to_lowercase();
        let last = last_name.to_lowercase();
        self.vertices.iter().position(|v| {
            let v_first = v.profile.first_name.to_lowercase();
            let v_last = v.profile.last_name.to_lowercase();
            if first.is_empty() {
                v_last == last
            }
            else if last.is_empty() {
                v_first == first
            }
            else {
                v_first == first && v_last == last
            }
        })
    }

    /// Finds a person by full name, split at the first space into first and last name.
    pub fn find_by_full_name(&self, full_name: &str) -> Option<usize> {
        match full_name.split_once(' ') {
            Some((first, last)) => self.find(first, last),
            None => self.find(full_name, ""),
        }
    }

    /// Breadth-first search from `from`, returning the predecessor of each discovered vertex.
    pub fn bfs(&self, from: usize) -> Predecessors {
        let mut predecessors = Predecessors::default();
        if from >= self.vertices.len() {
            return predecessors;
        }
        let mut discovered = RoaringBitmap::new();
        let mut frontier = VecDeque::new();
        discovered.insert(from as u32);
        frontier.push_back(from);
        while let Some(next) = frontier.pop_front() {
            for neighbour in self.vertices[next].neighbours() {
                if discovered.insert(neighbour as u32) {
                    predecessors.insert(neighbour, next);
                    frontier.push_back(neighbour);
                }
            }
        }
        predecessors
    }

    /// Names the predecessor `by` relative to the vertex `found` it discovered.
    ///
    /// The term is gendered by the sex of the person it names.
    fn basic_term(&self, found: usize, by: usize) -> &'static str {
        let vertex = &self.vertices[found];
        let male = self.vertices[by].profile.is_male();
        if vertex.spouse == Some(by) {
            if male { HUSBAND } else { WIFE }
        }
        else if vertex.father == Some(by) {
            FATHER
        }
        else if vertex.mother == Some(by) {
            MOTHER
        }
        else if male {
            SON
        }
        else {
            DAUGHTER
        }
    }

    /// Walks the search path from `to` back to `from`, one basic term per step.
    fn path_terms(&self, from: usize, to: usize) -> Vec<&'static str> {
        let predecessors = self.bfs(from);
        let mut terms = Vec::new();
        let mut current = to;
        while let Some(&previous) = predecessors.get(&current) {
            terms.push(self.basic_term(current, previous));
            current = previous;
        }
        terms
    }

    /// How `from` is related to `to`, as a chain of basic terms read from `to`.
    ///
    /// `kinship(grandfather, ego)` is `[mother, father]` when the grandfather is
    /// the father of ego's mother. The chain is empty when `from == to` and when
    /// no path exists.
    pub fn kinship(&self, from: usize, to: usize) -> Vec<String> {
        self.path_terms(from, to).into_iter().map(String::from).collect()
    }

    /// Generations `from` stands above `to`: parents are 1, children -1, spouses 0.
    pub fn generation_distance(&self, from: usize, to: usize) -> i64 {
        self.path_terms(from, to)
            .into_iter()
            .map(|term| match term {
                FATHER | MOTHER => 1,
                SON | DAUGHTER => -1,
                _ => 0,
            })
            .sum()
    }
}
