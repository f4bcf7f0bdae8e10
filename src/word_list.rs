//! The dictionary of candidate words shared by every slot.

use smallvec::SmallVec;
use std::collections::HashSet;

use crate::MAX_SLOT_LENGTH;

/// An identifier for a given word, based on its index in the `WordList`'s
/// `words` field.
pub type WordId = usize;

/// A word that can be chosen for a slot, with its characters broken out so
/// offset comparisons don't have to re-walk the string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The character at the given cell offset, or `None` if the word is too
    /// short to reach it.
    pub fn glyph(&self, idx: usize) -> Option<char> {
        self.glyphs.get(idx).copied()
    }
}

/// The deduplicated dictionary. Word ids are assigned in first-seen order, so
/// a fixed input always produces the same ids and the same candidate
/// orderings downstream.
#[derive(Debug, Default)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    pub fn new<I, S>(raw: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut words = Vec::new();
        for word in raw {
            let word = word.into();
            if seen.insert(word.clone()) {
                words.push(Word {
                    glyphs: word.chars().collect(),
                    string: word,
                });
            }
        }
        WordList { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id]
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}
