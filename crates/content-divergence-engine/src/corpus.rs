//! Named text corpora as handed over by the corpus store.

/// Category used when an id carries no `<category>_` prefix and no explicit tag.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A named body of text, immutable once loaded.
///
/// Text is kept as raw bytes so non-UTF-8 corpora can be analyzed too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    id: String,
    text: Vec<u8>,
    category: Option<String>,
}

impl Corpus {
    /// Create a corpus from an id and its text.
    pub fn new(id: impl Into<String>, text: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: None,
        }
    }

    /// Attach an explicit category tag.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Stable string id of this corpus.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw corpus bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.text
    }

    /// Corpus as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.text).ok()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the corpus has no content.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Grouping tag: the explicit category, else the id prefix before the
    /// first `_` (ids follow `<category>_<name>`, e.g. `animal_lion`).
    pub fn category(&self) -> &str {
        if let Some(category) = &self.category {
            return category;
        }
        match self.id.split_once('_') {
            Some((prefix, _)) if !prefix.is_empty() => prefix,
            _ => UNCATEGORIZED,
        }
    }

    /// First half (training) and second half (held-out) of the corpus.
    pub fn halves(&self) -> (&[u8], &[u8]) {
        split_halves(&self.text)
    }
}

/// Split bytes at `len / 2` into the training half and the held-out half.
///
/// The two halves are disjoint and together cover the input.
pub fn split_halves(bytes: &[u8]) -> (&[u8], &[u8]) {
    bytes.split_at(bytes.len() / 2)
}
