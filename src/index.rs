//! Cross-reference index built by the preparse pass.

use std::collections::BTreeMap;

use crate::element::DocType;

/// Titles, figure numbers, glossary terms and section order, keyed by id.
///
/// Every table keeps the first registration of an id; later duplicates are
/// ignored. Glossary terms are built up piecewise, so preparse only appends
/// text from the first entry carrying a given id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct CrossRefIndex {
    pub doctype: DocType,
    titles: BTreeMap<String, String>,
    figures: BTreeMap<String, u32>,
    glossary: BTreeMap<String, String>,
    sections: SectionIdStack,
}

impl CrossRefIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a section title. Returns `false` if `id` already had one.
    pub fn add_title(&mut self, id: &str, title: &str) -> bool {
        insert_first(&mut self.titles, id, title.to_string())
    }

    /// Record a figure number. Returns `false` if `id` already had one.
    pub fn add_figure(&mut self, id: &str, number: u32) -> bool {
        insert_first(&mut self.figures, id, number)
    }

    /// Append text to a glossary entry's term.
    pub fn append_glossary_term(&mut self, id: &str, text: &str) {
        self.glossary.entry(id.to_string()).or_default().push_str(text);
    }

    pub fn title(&self, id: &str) -> Option<&str> {
        self.titles.get(id).map(String::as_str)
    }

    pub fn figure_number(&self, id: &str) -> Option<u32> {
        self.figures.get(id).copied()
    }

    pub fn glossary_term(&self, id: &str) -> Option<&str> {
        self.glossary.get(id).map(String::as_str)
    }

    pub fn sections(&self) -> &SectionIdStack {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut SectionIdStack {
        &mut self.sections
    }
}

fn insert_first<V>(map: &mut BTreeMap<String, V>, id: &str, value: V) -> bool {
    if map.contains_key(id) {
        log::debug!("duplicate id {id:?} ignored");
        return false;
    }
    map.insert(id.to_string(), value);
    true
}

/// Section ids in document order; the last section's id is on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(transparent))]
pub struct SectionIdStack(Vec<String>);

/// Where a navigation link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// The document's table of contents.
    Contents,
    Section(String),
}

/// Previous/next links for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbors {
    pub previous: NavTarget,
    pub next: Option<String>,
}

impl SectionIdStack {
    pub fn push(&mut self, id: &str) {
        self.0.push(id.to_string());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Id on top of the stack: the last section in document order.
    pub fn top(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Id at the bottom of the stack: the first section in document order.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Ids from the top of the stack down.
    pub fn iter_from_top(&self) -> impl Iterator<Item = &str> {
        self.0.iter().rev().map(String::as_str)
    }

    /// Navigation for `id`, walking from the top of the stack.
    ///
    /// The entry above `id` (toward the top) is its successor in document
    /// order and becomes "next"; the entry below is its predecessor. With
    /// no predecessor, "previous" leads back to the table of contents.
    pub fn neighbors(&self, id: &str) -> Option<Neighbors> {
        let pos = self.0.iter().rposition(|s| s.eq_ignore_ascii_case(id))?;
        let next = self.0.get(pos + 1).cloned();
        let previous = match pos.checked_sub(1) {
            Some(below) => NavTarget::Section(self.0[below].clone()),
            None => NavTarget::Contents,
        };
        Some(Neighbors { previous, next })
    }
}

impl<'a> FromIterator<&'a str> for SectionIdStack {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}
