//! The kinship dictionary: compact names for chains of basic kinship terms.
//!
//! Entries are written with the gendered placeholders `parent`, `child` and
//! `spouse`, which are expanded into every concrete combination before they
//! are looked up, e.g. `parent,son` stands for both `mother,son` and
//! `father,son`. The raw entries are persisted as a JSON object
//! `{"t1,t2,...": "name"}` and rewritten in full on every addition.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::OtherHasher;
use crate::error::{KispError, Result};
use crate::graph::{DAUGHTER, FATHER, HUSBAND, MOTHER, SON, WIFE};

const DELIMITER: char = ',';

/// A placeholder term and the two basic terms it stands for.
const PLACEHOLDERS: [(&str, [&str; 2]); 3] = [
    ("parent", [MOTHER, FATHER]),
    ("child", [SON, DAUGHTER]),
    ("spouse", [HUSBAND, WIFE]),
];

#[derive(Debug, Default)]
pub struct KinshipDictionary {
    raw: BTreeMap<String, String>,
    expanded: HashMap<Vec<String>, String, OtherHasher>,
    path: Option<PathBuf>,
}

impl KinshipDictionary {
    /// An empty dictionary that is never written to disk.
    pub fn new() -> Self {
        Self::default()
    }

    /// An in-memory dictionary seeded with raw entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut dictionary = Self::new();
        for (key, name) in entries {
            dictionary.insert(key, name)?;
        }
        Ok(dictionary)
    }

    /// Loads the dictionary persisted at `path` and keeps writing additions back to it.
    ///
    /// A missing file gives an empty dictionary.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut dictionary = Self { path: Some(path.to_path_buf()), ..Self::default() };
        if !path.exists() {
            warn!(path = %path.display(), "no kinship dictionary found, starting empty");
            return Ok(dictionary);
        }
        let raw: BTreeMap<String, String> = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        for (key, name) in &raw {
            dictionary.insert(key, name)?;
        }
        info!(path = %path.display(), entries = dictionary.raw.len(), "kinship dictionary loaded");
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Raw entries, placeholders included.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.raw.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The compact name of an exact chain of basic terms.
    pub fn get(&self, terms: &[String]) -> Option<&str> {
        self.expanded.get(terms).map(String::as_str)
    }

    /// Adds an entry and persists the dictionary.
    ///
    /// Returns `false` without touching anything when the raw key is already present.
    pub fn put(&mut self, key: &str, name: &str) -> Result<bool> {
        if self.raw.contains_key(&normalize_key(key)) {
            return Ok(false);
        }
        self.insert(key, name)?;
        self.save()?;
        Ok(true)
    }

    fn insert(&mut self, key: &str, name: &str) -> Result<()> {
        let key = normalize_key(key);
        let name = name.trim();
        let quoted = key.contains('\'') || name.contains('\'');
        if key.is_empty() || key.split(DELIMITER).any(str::is_empty) || name.is_empty() || quoted {
            return Err(KispError::Domain(format!("Invalid kinship entry: '{key}' -> '{name}'")));
        }
        for terms in expand(&key) {
            self.expanded.insert(terms, name.to_string());
        }
        self.raw.insert(key, name.to_string());
        Ok(())
    }

    /// Writes all raw entries to the backing file, if there is one.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, &self.raw)?;
        out.flush()?;
        info!(path = %path.display(), entries = self.raw.len(), "kinship dictionary saved");
        Ok(())
    }

    /// Compresses a chain of basic terms with the entries of this dictionary.
    ///
    /// The longest stretch of two or more terms that has a name is replaced by
    /// that name, preferring the leftmost start among equally long stretches.
    /// The parts before and after it are compressed the same way. This greedy
    /// choice does not always give the shortest possible result.
    pub fn shorten(&self, kinship: &[String]) -> Vec<String> {
        let len = kinship.len();
        let mut shortcut: Option<(usize, usize)> = None;
        let mut shortcut_len = 1;
        for i in 0..len {
            for j in (i + 1..len).rev() {
                if j - i + 1 > shortcut_len && self.expanded.contains_key(&kinship[i..=j]) {
                    shortcut = Some((i, j));
                    shortcut_len = j - i + 1;
                }
            }
        }
        match shortcut {
            None => kinship.to_vec(),
            Some((i, j)) => {
                let mut result = self.shorten(&kinship[..i]);
                result.push(self.expanded[&kinship[i..=j]].clone());
                result.extend(self.shorten(&kinship[j + 1..]));
                result
            }
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.split(DELIMITER).map(str::trim).collect::<Vec<_>>().join(",")
}

/// Every concrete chain a raw key stands for.
fn expand(key: &str) -> Vec<Vec<String>> {
    let mut chains: Vec<Vec<String>> = vec![Vec::new()];
    for term in key.split(DELIMITER) {
        match PLACEHOLDERS.iter().find(|(placeholder, _)| *placeholder == term) {
            Some((_, [first, second])) => {
                let mut seconds = chains.clone();
                for chain in &mut chains {
                    chain.push(first.to_string());
                }
                for chain in &mut seconds {
                    chain.push(second.to_string());
                }
                chains.extend(seconds);
            }
            None => {
                for chain in &mut chains {
                    chain.push(term.to_string());
                }
            }
        }
    }
    chains
}
