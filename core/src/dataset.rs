use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level record for one health condition, keyed by its title in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub title: String,
    pub url: String,
    /// Comma-joined keyword metadata; the first item is the site's category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub subpages: BTreeMap<String, Subpage>,
}

/// Category page (symptoms, causes, ...) attached to a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default)]
    pub text: String,
}

/// A change produced by scraping one page.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Condition(Condition),
    Subpage { parent: String, label: String, subpage: Subpage },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    entries: BTreeMap<String, Condition>,
}

impl Dataset {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, title: &str) -> Option<&Condition> { self.entries.get(title) }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Condition> { self.entries.get_mut(title) }

    pub fn contains(&self, title: &str) -> bool { self.entries.contains_key(title) }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> { self.entries.values() }

    /// Inserts or refreshes a condition. Subpages already attached under the same title survive.
    pub fn insert_condition(&mut self, mut condition: Condition) {
        if let Some(existing) = self.entries.remove(&condition.title) {
            for (label, subpage) in existing.subpages {
                condition.subpages.entry(label).or_insert(subpage);
            }
        }
        self.entries.insert(condition.title.clone(), condition);
    }

    pub fn attach_subpage(&mut self, parent: &str, label: &str, subpage: Subpage) -> Result<()> {
        match self.entries.get_mut(parent) {
            Some(condition) => {
                condition.subpages.insert(label.to_string(), subpage);
                Ok(())
            }
            None => Err(Error::MissingEntry { title: parent.to_string(), url: subpage.url }),
        }
    }

    pub fn subpage_count(&self) -> usize {
        self.entries.values().map(|c| c.subpages.len()).sum()
    }

    /// Checks the invariants that the rest of the system assumes about loaded data.
    pub fn validate(&self) -> Result<()> {
        for (key, condition) in &self.entries {
            if key != &condition.title {
                return Err(Error::InvalidRecord {
                    key: key.clone(),
                    reason: format!("title {:?} does not match its key", condition.title),
                });
            }
            if condition.url.trim().is_empty() {
                return Err(Error::InvalidRecord { key: key.clone(), reason: "empty url".into() });
            }
            for (label, subpage) in &condition.subpages {
                if subpage.url.trim().is_empty() {
                    return Err(Error::InvalidRecord {
                        key: key.clone(),
                        reason: format!("subpage {label:?} has an empty url"),
                    });
                }
            }
        }
        Ok(())
    }
}
