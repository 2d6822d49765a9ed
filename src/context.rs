//! Mutable traversal state shared by both passes.

use crate::element::{DocType, ElementIndex};

/// Attributes captured at start-tag time, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Case-insensitive attribute lookup; the first occurrence wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One open element.
#[derive(Debug, Clone)]
pub struct StackElement {
    pub index: ElementIndex,
    /// Name as written in the source; unknown elements are matched by it.
    pub name: String,
    pub attrs: Attributes,
}

/// Level a sectioning element occupies in the numbering scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLevel {
    Preface,
    Chapter,
    Appendix,
    /// `sect1`..`sect5`, or a nested `section` at that depth.
    Sect(usize),
}

/// Hierarchical section counters.
///
/// Entering a level increments its counter and zeroes every deeper one.
/// Leaving a level does not touch them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounters {
    pub preface: u32,
    pub chapter: u32,
    pub appendix: u32,
    pub sect: [u32; 5],
}

impl SectionCounters {
    pub fn enter(&mut self, level: SectionLevel) {
        match level {
            SectionLevel::Preface => {
                self.preface += 1;
                self.chapter = 0;
                self.sect = [0; 5];
            }
            SectionLevel::Chapter => {
                self.chapter += 1;
                self.sect = [0; 5];
            }
            SectionLevel::Appendix => {
                self.appendix += 1;
                self.chapter = 0;
                self.sect = [0; 5];
            }
            SectionLevel::Sect(depth) => {
                let depth = depth.clamp(1, 5);
                self.sect[depth - 1] += 1;
                for deeper in &mut self.sect[depth..] {
                    *deeper = 0;
                }
            }
        }
    }

    /// Counter value for `sect{depth}`.
    pub fn get(&self, depth: usize) -> u32 {
        match depth {
            1..=5 => self.sect[depth - 1],
            _ => 0,
        }
    }

    /// Dotted number for a `sect{depth}` heading: the chapter number (or
    /// appendix letter) followed by every non-zero counter from depth 1 to
    /// `depth`, each with a trailing `.`.
    pub fn number(&self, depth: usize) -> String {
        let mut out = self.prefix();
        for value in self.sect.iter().take(depth.min(5)) {
            if *value != 0 {
                out.push_str(&value.to_string());
                out.push('.');
            }
        }
        out
    }

    /// `"2."` inside chapter 2, `"B."` inside appendix B, empty otherwise.
    pub fn prefix(&self) -> String {
        if self.chapter > 0 {
            format!("{}.", self.chapter)
        } else if self.appendix > 0 {
            format!("{}.", appendix_letter(self.appendix))
        } else {
            String::new()
        }
    }
}

/// `1 -> A`, `26 -> Z`, `27 -> AA`.
pub fn appendix_letter(mut n: u32) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Counts of recoverable anomalies seen during a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Diagnostics {
    /// End tags that did not match the innermost open element.
    pub stack_mismatches: usize,
    /// Start tags outside the recognized vocabulary.
    pub unknown_elements: usize,
    /// Entity references with no definition, emitted literally.
    pub unresolved_entities: usize,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Traversal state for one pass, generic over the pass payload.
#[derive(Debug)]
pub struct Context<S> {
    pub base_file: String,
    pub base_path: String,
    pub target_section: Option<String>,
    stack: Vec<StackElement>,
    pub doctype: DocType,
    pub counters: SectionCounters,
    /// True until character data is seen inside the current element.
    pub empty_element: bool,
    /// One buffer per footnote, in document order.
    pub footnotes: Vec<String>,
    pub diagnostics: Diagnostics,
    pub payload: S,
}

impl<S> Context<S> {
    pub fn new(payload: S) -> Self {
        Self {
            base_file: String::new(),
            base_path: String::new(),
            target_section: None,
            stack: Vec::new(),
            doctype: DocType::default(),
            counters: SectionCounters::default(),
            empty_element: false,
            footnotes: Vec::new(),
            diagnostics: Diagnostics::default(),
            payload,
        }
    }

    pub fn push(&mut self, index: ElementIndex, name: &str, attrs: Attributes) {
        self.stack.push(StackElement {
            index,
            name: name.to_string(),
            attrs,
        });
        self.empty_element = true;
    }

    pub fn pop(&mut self) -> Option<StackElement> {
        self.stack.pop()
    }

    /// Innermost open element.
    pub fn current(&self) -> Option<&StackElement> {
        self.stack.last()
    }

    /// Element enclosing the innermost one.
    pub fn parent(&self) -> Option<&StackElement> {
        self.stack.iter().rev().nth(1)
    }

    pub fn current_index(&self) -> ElementIndex {
        self.current()
            .map(|el| el.index)
            .unwrap_or(ElementIndex::Undefined)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Innermost open element whose index is in `candidates`, the current
    /// element included.
    pub fn find_first_element(&self, candidates: &[ElementIndex]) -> Option<&StackElement> {
        self.stack
            .iter()
            .rev()
            .find(|el| candidates.contains(&el.index))
    }

    /// Index of the innermost open element in `candidates`, or
    /// [`ElementIndex::Undefined`].
    pub fn find_first_ancestor(&self, candidates: &[ElementIndex]) -> ElementIndex {
        self.find_first_element(candidates)
            .map(|el| el.index)
            .unwrap_or(ElementIndex::Undefined)
    }

    pub fn has_ancestor(&self, index: ElementIndex) -> bool {
        self.stack.iter().any(|el| el.index == index)
    }

    /// Number of open elements with the given index.
    pub fn count_open(&self, index: ElementIndex) -> usize {
        self.stack.iter().filter(|el| el.index == index).count()
    }

    /// Attribute of the innermost open element.
    pub fn current_attr(&self, name: &str) -> Option<&str> {
        self.current().and_then(|el| el.attrs.get(name))
    }

    /// Whether `id` names the requested subsection.
    pub fn is_target(&self, id: &str) -> bool {
        self.target_section
            .as_deref()
            .is_some_and(|target| target.eq_ignore_ascii_case(id))
    }
}
