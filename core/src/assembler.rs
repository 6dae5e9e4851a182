use crate::{Dataset, Error, Mutation, Subpage};
use std::collections::HashMap;

/// Applies scraped mutations to a single dataset.
///
/// Fetches complete in any order, so a subpage may arrive before the introduction page
/// that creates its parent. Such subpages are held back and attached as soon as the
/// parent shows up; whatever is still waiting at [`Assembler::finish`] is dropped.
#[derive(Debug, Default)]
pub struct Assembler {
    dataset: Dataset,
    parked: HashMap<String, Vec<(String, Subpage)>>,
}

impl Assembler {
    pub fn new() -> Self { Self::default() }

    pub fn dataset(&self) -> &Dataset { &self.dataset }

    /// Number of subpages still waiting for their parent.
    pub fn parked(&self) -> usize { self.parked.values().map(Vec::len).sum() }

    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Condition(condition) => {
                let title = condition.title.clone();
                let late = self.parked.remove(&title).unwrap_or_default();
                let mut condition = condition;
                for (label, subpage) in late {
                    tracing::debug!(%title, %label, url = %subpage.url, "attaching late subpage");
                    condition.subpages.entry(label).or_insert(subpage);
                }
                self.dataset.insert_condition(condition);
            }
            Mutation::Subpage { parent, label, subpage } => match self.dataset.get_mut(&parent) {
                Some(condition) => {
                    condition.subpages.insert(label, subpage);
                }
                None => {
                    tracing::debug!(%parent, %label, url = %subpage.url, "parent not scraped yet, parking subpage");
                    self.parked.entry(parent).or_default().push((label, subpage));
                }
            },
        }
    }

    /// Returns the dataset together with one `MissingEntry` per subpage whose parent never appeared.
    pub fn finish(self) -> (Dataset, Vec<Error>) {
        let mut dropped = Vec::new();
        for (title, subpages) in self.parked {
            for (_, subpage) in subpages {
                let err = Error::MissingEntry { title: title.clone(), url: subpage.url };
                tracing::warn!("{err}; skipping");
                dropped.push(err);
            }
        }
        (self.dataset, dropped)
    }
}
