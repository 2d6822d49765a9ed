//! Preparse pass: walks the whole document once to build the
//! [`CrossRefIndex`] that rendering consults.

use std::collections::BTreeSet;

use crate::context::{Attributes, Context};
use crate::dispatch::{DispatchTable, ElementHandler};
use crate::element::{self, DocType, ElementIndex};
use crate::index::CrossRefIndex;

/// Ancestors a title can belong to.
const TITLE_OWNERS: &[ElementIndex] = &[
    ElementIndex::Preface,
    ElementIndex::Chapter,
    ElementIndex::Sect1,
    ElementIndex::Sect2,
    ElementIndex::Sect3,
    ElementIndex::Sect4,
    ElementIndex::Sect5,
    ElementIndex::Appendix,
    ElementIndex::Section,
    ElementIndex::Figure,
];

/// Preparse payload.
#[derive(Debug, Default)]
pub struct PreparseState {
    pub index: CrossRefIndex,
    figure_count: u32,
    /// Text of the title being read, if any.
    title: Option<String>,
    /// Ids of the open glossary entries, innermost last.
    glossentries: Vec<Option<String>>,
    /// Every glossary entry id seen so far.
    glossentry_ids: BTreeSet<String>,
    in_glossterm: bool,
}

impl PreparseState {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect(&mut self, text: &str) {
        if let Some(title) = self.title.as_mut() {
            title.push_str(text);
        }
        if self.in_glossterm
            && let Some(Some(id)) = self.glossentries.last()
        {
            self.index.append_glossary_term(id, text);
        }
    }
}

/// Preparse dispatch table.
pub struct PreparseTable;

impl DispatchTable<PreparseState> for PreparseTable {
    fn handler(&self, index: ElementIndex) -> Option<&dyn ElementHandler<PreparseState>> {
        use ElementIndex::*;
        Some(match index {
            Article | Book | Glossary => &Root,
            Preface | Chapter | Appendix | Sect1 | Sect2 | Sect3 | Sect4 | Sect5 | Section
            | GlossDiv => &Sect,
            Title | Subtitle => &TitleText,
            Figure => &FigureNumber,
            GlossEntry => &GlossEntryId,
            GlossTerm => &GlossTermText,
            _ => &Text,
        })
    }
}

struct Root;

impl ElementHandler<PreparseState> for Root {
    fn on_start(&self, ctx: &mut Context<PreparseState>, el: ElementIndex, _: &Attributes) {
        if ctx.depth() != 1 {
            return;
        }
        if let Some(doctype) = element::detect_doctype(el) {
            ctx.doctype = doctype;
            ctx.payload.index.doctype = doctype;
        }
    }
}

/// Pushes navigable section ids in document order.
struct Sect;

impl ElementHandler<PreparseState> for Sect {
    fn on_start(&self, ctx: &mut Context<PreparseState>, el: ElementIndex, attrs: &Attributes) {
        let Some(id) = attrs.id() else {
            return;
        };

        let navigable = match el {
            ElementIndex::Chapter | ElementIndex::Preface | ElementIndex::Appendix => true,
            ElementIndex::Sect1 => {
                ctx.doctype == DocType::Article && !ctx.has_ancestor(ElementIndex::Appendix)
            }
            // Only outermost sections; the element itself is on the stack
            ElementIndex::Section => ctx.count_open(ElementIndex::Section) == 1,
            ElementIndex::GlossDiv => ctx.doctype == DocType::Glossary,
            _ => false,
        };
        if navigable {
            log::trace!(target: "db2html.preparse", "section id {id}");
            ctx.payload.index.sections_mut().push(id);
        }
    }
}

struct TitleText;

impl ElementHandler<PreparseState> for TitleText {
    fn on_start(&self, ctx: &mut Context<PreparseState>, _: ElementIndex, _: &Attributes) {
        ctx.payload.title = Some(String::new());
    }

    fn on_end(&self, ctx: &mut Context<PreparseState>, _: ElementIndex) {
        let Some(title) = ctx.payload.title.take() else {
            return;
        };
        let owner = ctx
            .find_first_element(TITLE_OWNERS)
            .and_then(|el| el.attrs.id())
            .map(str::to_string);
        if let Some(id) = owner {
            ctx.payload.index.add_title(&id, &title);
        }
    }

    fn on_characters(&self, ctx: &mut Context<PreparseState>, text: &str) {
        ctx.payload.collect(text);
    }
}

struct FigureNumber;

impl ElementHandler<PreparseState> for FigureNumber {
    fn on_start(&self, ctx: &mut Context<PreparseState>, _: ElementIndex, attrs: &Attributes) {
        ctx.payload.figure_count += 1;
        if let Some(id) = attrs.id() {
            let number = ctx.payload.figure_count;
            ctx.payload.index.add_figure(id, number);
        }
    }
}

struct GlossEntryId;

impl ElementHandler<PreparseState> for GlossEntryId {
    fn on_start(&self, ctx: &mut Context<PreparseState>, _: ElementIndex, attrs: &Attributes) {
        // A repeated id contributes no term text; the first entry owns it
        let id = attrs
            .id()
            .filter(|id| ctx.payload.glossentry_ids.insert(id.to_string()))
            .map(str::to_string);
        if id.is_none()
            && let Some(dup) = attrs.id()
        {
            log::debug!("duplicate glossary entry id {dup:?} ignored");
        }
        ctx.payload.glossentries.push(id);
    }

    fn on_end(&self, ctx: &mut Context<PreparseState>, _: ElementIndex) {
        ctx.payload.glossentries.pop();
    }
}

struct GlossTermText;

impl ElementHandler<PreparseState> for GlossTermText {
    fn on_start(&self, ctx: &mut Context<PreparseState>, _: ElementIndex, _: &Attributes) {
        ctx.payload.in_glossterm = true;
    }

    fn on_end(&self, ctx: &mut Context<PreparseState>, _: ElementIndex) {
        ctx.payload.in_glossterm = false;
    }

    fn on_characters(&self, ctx: &mut Context<PreparseState>, text: &str) {
        ctx.payload.collect(text);
    }
}

/// Everything else only contributes text to an enclosing title or term.
struct Text;

impl ElementHandler<PreparseState> for Text {
    fn on_characters(&self, ctx: &mut Context<PreparseState>, text: &str) {
        ctx.payload.collect(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use crate::sax;

    fn preparse(src: &str) -> CrossRefIndex {
        let mut dispatcher = Dispatcher::new(&PreparseTable, Context::new(PreparseState::new()));
        sax::parse(src, &mut dispatcher).unwrap();
        dispatcher.into_context().payload.index
    }

    #[test]
    fn test_doctype_from_root() {
        assert_eq!(preparse("<book/>").doctype, DocType::Book);
        assert_eq!(preparse("<glossary/>").doctype, DocType::Glossary);
        assert_eq!(preparse("<article/>").doctype, DocType::Article);
    }

    #[test]
    fn test_titles_by_section_id() {
        let index = preparse(
            r#"<article>
                <sect1 id="a"><title>Alpha <emphasis>one</emphasis></title>
                  <sect2 id="a2"><title>Deeper</title></sect2>
                  <sect2><title>No id</title></sect2>
                </sect1>
                <sect1 id="a"><title>Duplicate</title></sect1>
              </article>"#,
        );
        assert_eq!(index.title("a"), Some("Alpha one"));
        assert_eq!(index.title("a2"), Some("Deeper"));
    }

    #[test]
    fn test_subtitle_does_not_replace_title() {
        let index = preparse(
            r#"<article><sect1 id="s"><title>Main</title><subtitle>Sub</subtitle></sect1></article>"#,
        );
        assert_eq!(index.title("s"), Some("Main"));
    }

    #[test]
    fn test_figure_numbers_count_every_figure() {
        let index = preparse(
            r#"<article>
                <figure id="f1"><title>One</title></figure>
                <figure><title>Two</title></figure>
                <figure id="f3"/>
                <figure id="f1"/>
              </article>"#,
        );
        assert_eq!(index.figure_number("f1"), Some(1));
        assert_eq!(index.figure_number("f3"), Some(3));
        assert_eq!(index.title("f1"), Some("One"));
    }

    #[test]
    fn test_article_section_stack() {
        let index = preparse(
            r#"<article>
                <sect1 id="a"><sect2 id="a1"/></sect1>
                <sect1/>
                <sect1 id="b"/>
                <appendix id="app"><sect1 id="inapp"/></appendix>
              </article>"#,
        );
        let ids: Vec<&str> = index.sections().iter_from_top().collect();
        assert_eq!(ids, ["app", "b", "a"]);
    }

    #[test]
    fn test_book_section_stack() {
        let index = preparse(
            r#"<book>
                <preface id="pre"/>
                <chapter id="c1"><sect1 id="c1s1"/></chapter>
                <chapter id="c2"><section id="outer"><section id="inner"/></section></chapter>
              </book>"#,
        );
        assert_eq!(index.sections().first(), Some("pre"));
        let ids: Vec<&str> = index.sections().iter_from_top().collect();
        assert_eq!(ids, ["outer", "c2", "c1", "pre"]);
    }

    #[test]
    fn test_glossary_terms() {
        let index = preparse(
            r#"<glossary>
                <glossdiv id="gd"><title>G</title>
                  <glossentry id="gui"><glossterm>Graphical <acronym>UI</acronym></glossterm>
                    <glossdef><para>ignored</para></glossdef>
                  </glossentry>
                  <glossentry><glossterm>No id</glossterm></glossentry>
                </glossdiv>
              </glossary>"#,
        );
        assert_eq!(index.glossary_term("gui"), Some("Graphical UI"));
        assert_eq!(index.sections().top(), Some("gd"));
    }

    #[test]
    fn test_duplicate_glossary_entry_keeps_first_term() {
        let index = preparse(
            r#"<glossary>
                <glossentry id="g"><glossterm>First</glossterm></glossentry>
                <glossentry id="g"><glossterm>Second</glossterm></glossentry>
              </glossary>"#,
        );
        assert_eq!(index.glossary_term("g"), Some("First"));
    }
}
