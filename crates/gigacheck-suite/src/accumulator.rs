//! Cross-model reply accumulator
//!
//! Owned by the runner for one suite run and handed to each cross-model case
//! by `&mut`; nothing about it is global.

use std::collections::BTreeMap;

/// Result of recording one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniquenessCheck {
    /// Not enough distinct models yet
    Pending { have: usize, need: usize },
    /// Threshold reached, every reply differs
    Distinct,
    /// Threshold reached, these model pairs answered identically
    Duplicates(Vec<(String, String)>),
    /// The check already ran in this run
    AlreadyChecked,
}

/// Replies keyed by model name
#[derive(Debug, Clone)]
pub struct ModelResponses {
    replies: BTreeMap<String, String>,
    threshold: usize,
    checked: bool,
}

impl Default for ModelResponses {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ModelResponses {
    pub fn new(threshold: usize) -> Self {
        Self {
            replies: BTreeMap::new(),
            threshold: threshold.max(2),
            checked: false,
        }
    }

    /// Store `model`'s reply; compare all replies when the threshold is first reached
    ///
    /// A second reply from the same model replaces the first.
    pub fn record(&mut self, model: &str, content: &str) -> UniquenessCheck {
        self.replies.insert(model.to_string(), content.to_string());

        if self.checked {
            return UniquenessCheck::AlreadyChecked;
        }
        if self.replies.len() < self.threshold {
            return UniquenessCheck::Pending {
                have: self.replies.len(),
                need: self.threshold,
            };
        }

        self.checked = true;
        let duplicates = self.duplicate_pairs();
        if duplicates.is_empty() {
            UniquenessCheck::Distinct
        } else {
            UniquenessCheck::Duplicates(duplicates)
        }
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    pub fn get(&self, model: &str) -> Option<&str> {
        self.replies.get(model).map(String::as_str)
    }

    fn duplicate_pairs(&self) -> Vec<(String, String)> {
        let entries: Vec<(&String, &String)> = self.replies.iter().collect();
        let mut pairs = Vec::new();
        for (i, (model_a, reply_a)) in entries.iter().enumerate() {
            for (model_b, reply_b) in &entries[i + 1..] {
                if reply_a == reply_b {
                    pairs.push((model_a.to_string(), model_b.to_string()));
                }
            }
        }
        pairs
    }
}
