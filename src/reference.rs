// 📚 Reference Tables - Unique names seen on the page
//
// Every list entry is bucketed by its shape and reduced to a bare name:
//   "395,000 Roubles"     → items   "Roubles"
//   "Ragman LL3"          → traders "Ragman"
//   "Metabolism Level 3"  → skills  "Metabolism"
//   "Level 2 Stash"       → modules "Stash"
// The sorted, de-duplicated buckets show what the current content uses, so
// the curated tables can be kept in sync.

use crate::classifier::{LineClassifier, LineKind};
use crate::source::RawModuleRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub items: BTreeSet<String>,
    pub traders: BTreeSet<String>,
    pub skills: BTreeSet<String>,
    pub modules: BTreeSet<String>,

    /// Entries that fit no bucket, in page order
    pub unclassified: Vec<String>,
}

impl ReferenceTables {
    /// Bucket a batch of list entries
    pub fn collect<S: AsRef<str>>(classifier: &LineClassifier, lines: &[S]) -> Self {
        let mut tables = ReferenceTables::default();
        for line in lines {
            tables.add(classifier, line.as_ref());
        }
        tables
    }

    /// Bucket every requirement line of every row
    pub fn from_rows(classifier: &LineClassifier, rows: &[RawModuleRow]) -> Self {
        let mut tables = ReferenceTables::default();
        for line in rows.iter().flat_map(|r| r.lines.iter()) {
            tables.add(classifier, line);
        }
        tables
    }

    pub fn add(&mut self, classifier: &LineClassifier, line: &str) {
        let text = line.trim();
        if text.is_empty() {
            return;
        }

        match classifier.classify(text) {
            LineKind::Item => {
                if let Some((_, name)) = classifier.item_parts(text) {
                    self.items.insert(name.to_string());
                }
            }
            LineKind::Trader => {
                if let Some((name, _)) = classifier.trader_parts(text) {
                    self.traders.insert(name.to_string());
                }
            }
            LineKind::Skill => {
                if let Some((name, _)) = classifier.skill_parts(text) {
                    self.skills.insert(name.to_string());
                }
            }
            LineKind::Module => {
                if let Some((name, _)) = classifier.module_parts(text) {
                    self.modules.insert(name.to_string());
                }
            }
            LineKind::Unclassified => self.unclassified.push(text.to_string()),
        }
    }

    pub fn counts(&self) -> ReferenceCounts {
        ReferenceCounts {
            items: self.items.len(),
            traders: self.traders.len(),
            skills: self.skills.len(),
            modules: self.modules.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCounts {
    pub items: usize,
    pub traders: usize,
    pub skills: usize,
    pub modules: usize,
}
