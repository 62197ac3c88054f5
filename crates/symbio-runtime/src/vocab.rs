//! Word vocabulary of the default cortex.
//!
//! Text is lowercased and split on anything that is not alphanumeric. Token
//! ids are assigned in first-seen order and never change once assigned.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use symbio_core::types::TokenId;

/// Lowercase alphanumeric words of `text`, in order.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    words: IndexSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add every unseen word of every text. Returns how many were new.
    pub fn fit<S: AsRef<str>>(&mut self, texts: &[S]) -> usize {
        let before = self.words.len();
        for text in texts {
            for word in words(text.as_ref()) {
                self.words.insert(word);
            }
        }
        self.words.len() - before
    }

    pub fn id(&self, word: &str) -> Option<TokenId> {
        self.words.get_index_of(word).map(|i| i as TokenId)
    }

    pub fn word(&self, id: TokenId) -> Option<&str> {
        self.words.get_index(id as usize).map(String::as_str)
    }

    /// Ids of the known words of `text`. Unknown words are skipped.
    pub fn encode(&self, text: &str) -> Vec<TokenId> {
        words(text).filter_map(|w| self.id(&w)).collect()
    }

    /// Space-joined words of `ids`. Unknown ids are skipped.
    pub fn decode(&self, ids: &[TokenId]) -> String {
        ids.iter()
            .filter_map(|&id| self.word(id))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
