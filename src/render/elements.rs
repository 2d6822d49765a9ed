//! Render-pass element handlers and their dispatch table.

use crate::context::{Attributes, Context, SectionLevel, appendix_letter};
use crate::dispatch::{DispatchTable, ElementHandler};
use crate::element::{self, ElementIndex};

use super::emit::{self, escape_attr, escape_text};
use super::{FigureInfo, LEGAL_NOTICE_ID, RenderState, SectionState};

type Ctx<'a> = Context<RenderState<'a>>;

/// Render dispatch table.
pub struct RenderTable;

impl<'a> DispatchTable<RenderState<'a>> for RenderTable {
    fn handler(&self, index: ElementIndex) -> Option<&dyn ElementHandler<RenderState<'a>>> {
        use ElementIndex::*;
        Some(match index {
            Article | Book | Glossary => &Root,
            Preface | Chapter | Appendix | Sect1 | Sect2 | Sect3 | Sect4 | Sect5 | Section
            | GlossDiv | GlossEntry => &Sect,
            ArtHeader | BookInfo | ArticleInfo | GlossaryInfo | DocInfo => &Header,
            Author | AuthorGroup | Affiliation | FirstName | OtherName | Surname | OrgName
            | Copyright | Year | Holder | ReleaseInfo => &HeaderPart,
            LegalNotice => &Legal,
            Title | Subtitle | GlossTerm => &TitleHandler,
            Para | LegalPara => &Paragraph,
            Footnote => &FootnoteHandler,
            Ulink => &Ulinks,
            Link => &Links,
            Xref => &XrefHandler,
            Anchor => &AnchorHandler,
            Figure => &FigureHandler,
            Graphic | InlineGraphic => &GraphicHandler,
            ScreenInfo => return None,
            ItemizedList => &UL,
            OrderedList => &OL,
            VariableList => &DL,
            Term => &DT,
            ListItem => &ListItemHandler,
            Table => &NumberedTable,
            InformalTable | SimpleList => &PLAIN_TABLE,
            Thead => &THEAD,
            Tbody => &TBODY,
            Row => &TR,
            Entry => &EntryHandler,
            Member => &MEMBER,
            Tip | Warning | Important | Note | Caution => &Admonition,
            ProgramListing | Screen => &LISTING,
            LiteralLayout => &PRE,
            Cdata => &CdataHandler,
            FuncSynopsis => &Synopsis,
            FuncPrototype => &Prototype,
            ParamDef => &Param,
            Void => &VoidHandler,
            FuncParams => &PARENS,
            Emphasis => &EmphasisHandler,
            FirstTerm => &EM,
            Application | Filename | SgmlTag | Function | Literal | Prompt | VarName | Option
            | Envar | ComputerOutput => &TT,
            Command | GuiButton | GuiIcon | GuiMenuItem | Keycap => &B,
            GuiLabel | Hardware | UserInput => &B_TT,
            Replaceable | Parameter => &TT_I,
            CiteTitle => &I,
            GuiMenu | GuiSubmenu => &MenuPart,
            Keysym => &KEYSYM,
            Superscript => &SUP,
            Quote => &QUOTE,
            BlockQuote => &BLOCKQUOTE,
            BridgeHead => &BRIDGEHEAD,
            Question => &QUESTION,
            Answer => &ANSWER,
            GlossSee | GlossSeeAlso => &SeeAlso,
            Email => &EmailHandler,
            Address => &AddressHandler,
            Street | City | Country => &AddressLine,
            Undefined => &Passthrough,
            _ => &Text,
        })
    }
}

/// Markup printed around an element's content when live.
struct Wrap {
    open: &'static str,
    close: &'static str,
}

impl<'a> ElementHandler<RenderState<'a>> for Wrap {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if ctx.is_live() {
            ctx.print(self.open);
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.is_live() {
            ctx.print(self.close);
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

const fn wrap(open: &'static str, close: &'static str) -> Wrap {
    Wrap { open, close }
}

const EM: Wrap = wrap("<EM>", "</EM>");
const TT: Wrap = wrap("<TT>", "</TT>");
const B: Wrap = wrap("<B>", "</B>");
const B_TT: Wrap = wrap("<B><TT>", "</TT></B>");
const TT_I: Wrap = wrap("<TT><I>", "</I></TT>");
const I: Wrap = wrap("<I>", "</I>");
const SUP: Wrap = wrap("<SUP>", "</SUP>");
const KEYSYM: Wrap = wrap("<B>(", ")</B>");
const QUOTE: Wrap = wrap("\"", "\"");
const BLOCKQUOTE: Wrap = wrap("<BLOCKQUOTE>", "</BLOCKQUOTE>\n");
const BRIDGEHEAD: Wrap = wrap("<H2>", "</H2>\n");
const PRE: Wrap = wrap("<PRE>", "</PRE>\n");
const LISTING: Wrap = wrap(emit::LISTING_OPEN, emit::LISTING_CLOSE);
const UL: Wrap = wrap("<UL>\n", "</UL>\n");
const OL: Wrap = wrap("<OL>\n", "</OL>\n");
const DL: Wrap = wrap("<DL>\n", "</DL>\n");
const DT: Wrap = wrap("<DT>", "</DT>\n");
const PLAIN_TABLE: Wrap = wrap("<TABLE BORDER=\"0\">\n", "</TABLE>\n");
const THEAD: Wrap = wrap("<THEAD>", "</THEAD>");
const TBODY: Wrap = wrap("<TBODY>", "</TBODY>");
const TR: Wrap = wrap("<TR>\n", "</TR>\n");
const MEMBER: Wrap = wrap("<TR><TD>", "</TD></TR>\n");
const PARENS: Wrap = wrap("(", ")");
const QUESTION: Wrap = wrap("<P><B>Q: </B>", "</P>\n");
const ANSWER: Wrap = wrap("<P><B>A: </B>", "</P>\n");

/// Elements with no markup of their own.
struct Text;

impl<'a> ElementHandler<RenderState<'a>> for Text {
    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// Content of unrecognized elements is copied through unescaped.
struct Passthrough;

impl<'a> ElementHandler<RenderState<'a>> for Passthrough {
    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        if ctx.payload.pending_title.is_none() && !ctx.in_header() && ctx.is_live() {
            ctx.print(text);
        } else {
            ctx.write_text(text);
        }
    }
}

struct Root;

impl<'a> ElementHandler<RenderState<'a>> for Root {
    fn on_start(&self, ctx: &mut Ctx<'a>, el: ElementIndex, _: &Attributes) {
        if ctx.depth() != 1 {
            return;
        }
        if let Some(doctype) = element::detect_doctype(el) {
            ctx.doctype = doctype;
        }
        ctx.payload.out.push_str("<HTML>");
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.depth() != 1 || ctx.footnotes.is_empty() || ctx.payload.footer_emitted {
            return;
        }
        let table = emit::footnote_table(&ctx.footnotes);
        ctx.emit(&table);
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

fn section_level(ctx: &Ctx<'_>, el: ElementIndex) -> Option<SectionLevel> {
    Some(match el {
        ElementIndex::Preface => SectionLevel::Preface,
        ElementIndex::Chapter => SectionLevel::Chapter,
        ElementIndex::Appendix => SectionLevel::Appendix,
        ElementIndex::Sect1 => SectionLevel::Sect(1),
        ElementIndex::Sect2 => SectionLevel::Sect(2),
        ElementIndex::Sect3 => SectionLevel::Sect(3),
        ElementIndex::Sect4 => SectionLevel::Sect(4),
        ElementIndex::Sect5 => SectionLevel::Sect(5),
        ElementIndex::Section => SectionLevel::Sect(ctx.count_open(ElementIndex::Section).min(5)),
        _ => return None,
    })
}

/// Sectioning elements: counters and the section state machine.
struct Sect;

impl<'a> ElementHandler<RenderState<'a>> for Sect {
    fn on_start(&self, ctx: &mut Ctx<'a>, el: ElementIndex, attrs: &Attributes) {
        if let Some(level) = section_level(ctx, el) {
            ctx.counters.enter(level);
        }
        if ctx.payload.section == Some(SectionState::LookingForSect)
            && attrs.id().is_some_and(|id| ctx.is_target(id))
        {
            ctx.payload.section = Some(SectionState::LookingForSectTitle);
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        let is_target = ctx
            .current()
            .and_then(|el| el.attrs.id())
            .is_some_and(|id| ctx.is_target(id));
        if is_target
            && matches!(
                ctx.payload.section,
                Some(SectionState::InSect | SectionState::LookingForSectTitle)
            )
        {
            log::debug!(target: "db2html.render", "left requested section");
            ctx.payload.section = Some(SectionState::LookingForPostSect);
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// Document header containers. In full-document mode the head is written
/// once the header has been read.
struct Header;

impl<'a> ElementHandler<RenderState<'a>> for Header {
    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.payload.section.is_none() && !ctx.payload.head_emitted {
            ctx.emit_document_head();
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

struct HeaderPart;

impl<'a> ElementHandler<RenderState<'a>> for HeaderPart {
    fn on_start(&self, ctx: &mut Ctx<'a>, el: ElementIndex, _: &Attributes) {
        ctx.begin_header_field(el);
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// `legalnotice`: rendered only as its own pseudo-section.
struct Legal;

impl<'a> ElementHandler<RenderState<'a>> for Legal {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if ctx.is_target(LEGAL_NOTICE_ID)
            && ctx.payload.section == Some(SectionState::LookingForSect)
        {
            ctx.payload.out.push_str(&emit::legal_notice_preamble());
            ctx.payload.head_emitted = true;
            ctx.payload.section = Some(SectionState::InSect);
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.is_target(LEGAL_NOTICE_ID) && ctx.payload.section == Some(SectionState::InSect) {
            let home = ctx.link(None);
            ctx.emit_footer(Some(&home), Some(&home), None);
            ctx.payload.section = Some(SectionState::DoneWithSect);
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// Heading label and level for a section title.
fn section_heading(ctx: &Ctx<'_>, owner: ElementIndex) -> (u8, String) {
    let counters = &ctx.counters;
    match owner {
        ElementIndex::Preface => (1, "Preface".to_string()),
        ElementIndex::Chapter => (1, format!("Chapter {}.", counters.chapter)),
        ElementIndex::Appendix => (1, format!("Appendix {}.", appendix_letter(counters.appendix))),
        _ => {
            let depth = match section_level(ctx, owner) {
                Some(SectionLevel::Sect(depth)) => depth,
                _ => 1,
            };
            let level = if depth == 1 { 2 } else { 3 };
            (level, format!("Section {}", counters.number(depth)))
        }
    }
}

fn title_open(ctx: &Ctx<'_>, el: ElementIndex, owner: ElementIndex, id: Option<&str>) -> Option<String> {
    use ElementIndex::*;
    if owner == Figure {
        return None;
    }
    if el == GlossTerm {
        return Some("<B><H2>".to_string());
    }
    if el == Subtitle {
        return Some("<I>".to_string());
    }
    Some(match owner {
        o if o.is_section() => {
            let (level, label) = section_heading(ctx, o);
            emit::heading(level, id, &label) + "<B>"
        }
        Table => format!("<P><B>Table {}. ", ctx.payload.table_count),
        Article | Book | Glossary => "<H1>".to_string(),
        Example => "<H3>".to_string(),
        GlossDiv => "<H2>".to_string(),
        FormalPara | LegalNotice => "<B>".to_string(),
        o if o.is_admonition() => "<B>".to_string(),
        _ => return None,
    })
}

fn title_close(el: ElementIndex, owner: ElementIndex) -> Option<&'static str> {
    use ElementIndex::*;
    if owner == Figure {
        return None;
    }
    if el == GlossTerm {
        return Some("</H2></B>\n");
    }
    if el == Subtitle {
        return Some("</I><BR>\n");
    }
    Some(match owner {
        o if o.is_section() => "</B><BR>\n",
        Table => "</B></P>\n",
        Article | Book | Glossary => "</H1>\n",
        Example => "</H3>\n",
        GlossDiv => "</H2>\n",
        FormalPara => ".</B> ",
        LegalNotice => "</B><BR>\n",
        o if o.is_admonition() => "</B><BR>\n",
        _ => return None,
    })
}

/// `title`, `subtitle`, and the `glossterm` heading a glossary entry.
struct TitleHandler;

impl<'a> ElementHandler<RenderState<'a>> for TitleHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, el: ElementIndex, _: &Attributes) {
        let Some(parent) = ctx.parent() else {
            return;
        };
        let owner = parent.index;
        let id = parent.attrs.id().map(str::to_string);
        if el == ElementIndex::GlossTerm && owner != ElementIndex::GlossEntry {
            return;
        }

        if el != ElementIndex::Subtitle
            && ctx.payload.section == Some(SectionState::LookingForSectTitle)
        {
            ctx.payload.pending_title = Some(String::new());
            return;
        }
        if ctx.in_header() {
            ctx.begin_header_field(el);
            return;
        }
        if !ctx.is_live() {
            return;
        }
        ctx.payload.title_owner = Some(owner);
        if let Some(open) = title_open(ctx, el, owner, id.as_deref()) {
            ctx.print(&open);
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, el: ElementIndex) {
        if let Some(title) = ctx.payload.pending_title.take() {
            ctx.begin_section(&title);
            return;
        }
        let Some(owner) = ctx.payload.title_owner.take() else {
            return;
        };
        if let Some(close) = title_close(el, owner) {
            ctx.print(close);
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// Scopes deciding how a paragraph is wrapped.
const PARA_SCOPE: &[ElementIndex] = &[
    ElementIndex::Figure,
    ElementIndex::Footnote,
    ElementIndex::FormalPara,
    ElementIndex::Question,
    ElementIndex::Answer,
];

fn para_markup(ctx: &Ctx<'_>) -> Option<(&'static str, &'static str)> {
    match ctx.find_first_ancestor(PARA_SCOPE) {
        ElementIndex::FormalPara => Some(("<P>", "</P>\n")),
        ElementIndex::Undefined => Some(("<P>\n", "</P>\n")),
        _ => None,
    }
}

struct Paragraph;

impl<'a> ElementHandler<RenderState<'a>> for Paragraph {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if ctx.is_live()
            && let Some((open, _)) = para_markup(ctx)
        {
            ctx.print(open);
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.is_live()
            && let Some((_, close)) = para_markup(ctx)
        {
            ctx.print(close);
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

struct FootnoteHandler;

impl<'a> ElementHandler<RenderState<'a>> for FootnoteHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if !ctx.is_live() {
            return;
        }
        ctx.footnotes.push(String::new());
        let marker = emit::footnote_marker(ctx.footnotes.len());
        ctx.emit(&marker);
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

struct Ulinks;

impl<'a> ElementHandler<RenderState<'a>> for Ulinks {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, attrs: &Attributes) {
        if !ctx.is_live() {
            return;
        }
        match attrs.get("url") {
            Some(url) => ctx.print(&format!("<A HREF=\"{}\">", escape_attr(url))),
            None => ctx.print("<A>"),
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.is_live() {
            ctx.print("</A>\n");
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// `link`: a link into this document.
struct Links;

impl<'a> ElementHandler<RenderState<'a>> for Links {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, attrs: &Attributes) {
        if !ctx.is_live() {
            return;
        }
        match attrs.get("linkend") {
            Some(linkend) => {
                let href = ctx.link(Some(linkend));
                ctx.print(&format!("<A HREF=\"{}\">", escape_attr(&href)));
            }
            None => ctx.print("<A>"),
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.is_live() {
            ctx.print("</A>");
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

struct XrefHandler;

impl<'a> ElementHandler<RenderState<'a>> for XrefHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, attrs: &Attributes) {
        if !ctx.is_live() {
            return;
        }
        let linkend = attrs.get("linkend");
        if let Some(number) = linkend.and_then(|id| ctx.payload.index.figure_number(id)) {
            ctx.print(&format!("Figure {number}"));
            return;
        }

        let href = ctx.link(linkend);
        let text = match linkend.and_then(|id| ctx.payload.index.title(id)) {
            Some(title) => format!("the section <EM>{}</EM>", escape_text(title)),
            None => "the section here".to_string(),
        };
        ctx.print(&format!("<A HREF=\"{}\">{text}</A>", escape_attr(&href)));
    }
}

struct AnchorHandler;

impl<'a> ElementHandler<RenderState<'a>> for AnchorHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, attrs: &Attributes) {
        if ctx.is_live()
            && let Some(id) = attrs.id()
        {
            ctx.print(&format!("<A NAME=\"{}\"></A>", escape_attr(id)));
        }
    }
}

struct FigureHandler;

impl<'a> ElementHandler<RenderState<'a>> for FigureHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, attrs: &Attributes) {
        ctx.payload.figure_count += 1;
        if ctx.is_live() {
            ctx.payload.figure = Some(FigureInfo {
                id: attrs.id().map(str::to_string),
                number: ctx.payload.figure_count,
                ..FigureInfo::default()
            });
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        let Some(figure) = ctx.payload.figure.take() else {
            return;
        };
        if ctx.is_live() {
            let html = emit::figure(
                figure.number,
                figure.id.as_deref(),
                figure.title.as_deref(),
                &ctx.base_path,
                figure.img.as_deref(),
            );
            ctx.print(&html);
        }
    }
}

/// `graphic` and `inlinegraphic`. A graphic inside a figure supplies the
/// figure's image; anywhere else it is shown in place.
struct GraphicHandler;

impl<'a> ElementHandler<RenderState<'a>> for GraphicHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, el: ElementIndex, attrs: &Attributes) {
        if !ctx.is_live() {
            return;
        }
        let Some(fileref) = attrs.get("fileref") else {
            return;
        };
        let file = emit::image_file(fileref, attrs.get("format"));
        if el == ElementIndex::Graphic
            && let Some(figure) = ctx.payload.figure.as_mut()
        {
            figure.img = Some(file);
            return;
        }
        let html = emit::image(&ctx.base_path, &file, None);
        ctx.print(&html);
    }
}

struct ListItemHandler;

impl ListItemHandler {
    fn in_varlist(ctx: &Ctx<'_>) -> bool {
        ctx.find_first_ancestor(&[
            ElementIndex::VarListEntry,
            ElementIndex::ItemizedList,
            ElementIndex::OrderedList,
        ]) == ElementIndex::VarListEntry
    }
}

impl<'a> ElementHandler<RenderState<'a>> for ListItemHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if ctx.is_live() {
            let open = if Self::in_varlist(ctx) { "<DD>" } else { "<LI>" };
            ctx.print(open);
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.is_live() {
            let close = if Self::in_varlist(ctx) { "</DD>\n" } else { "</LI>\n" };
            ctx.print(close);
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// `table`: bordered and numbered. Every table counts, shown or not.
struct NumberedTable;

impl<'a> ElementHandler<RenderState<'a>> for NumberedTable {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        ctx.payload.table_count += 1;
        if ctx.is_live() {
            ctx.print("<TABLE BORDER=\"1\">\n");
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.is_live() {
            ctx.print("</TABLE>\n");
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// Table cell: a header cell inside `thead`, a data cell otherwise.
struct EntryHandler;

impl EntryHandler {
    fn is_head(ctx: &Ctx<'_>) -> bool {
        ctx.find_first_ancestor(&[ElementIndex::Thead, ElementIndex::Tbody]) == ElementIndex::Thead
    }
}

impl<'a> ElementHandler<RenderState<'a>> for EntryHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if ctx.is_live() {
            let cell = if Self::is_head(ctx) { "TH" } else { "TD" };
            ctx.print(&format!("<{cell} ALIGN=\"LEFT\" VALIGN=\"TOP\">"));
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if !ctx.is_live() {
            return;
        }
        if ctx.empty_element {
            ctx.print("&nbsp;");
        }
        let close = if Self::is_head(ctx) { "</TH>\n" } else { "</TD>\n" };
        ctx.print(close);
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

struct Admonition;

impl<'a> ElementHandler<RenderState<'a>> for Admonition {
    fn on_start(&self, ctx: &mut Ctx<'a>, el: ElementIndex, _: &Attributes) {
        if !ctx.is_live() {
            return;
        }
        let name = el.name().unwrap_or_default();
        let icon_file = if el == ElementIndex::Warning {
            "gnome-warning.png"
        } else {
            "gnome-info.png"
        };
        let icon = ctx
            .payload
            .options
            .pixmap_dir
            .as_ref()
            .map(|dir| dir.join(icon_file).display().to_string());
        ctx.print(&emit::admonition_open(name, icon.as_deref()));
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.is_live() {
            ctx.print(emit::ADMONITION_CLOSE);
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

struct CdataHandler;

impl<'a> ElementHandler<RenderState<'a>> for CdataHandler {
    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        if ctx.is_live() {
            ctx.print(&emit::cdata(text));
        }
    }
}

/// `funcsynopsis`: prototypes are collected and emitted as one table.
struct Synopsis;

impl<'a> ElementHandler<RenderState<'a>> for Synopsis {
    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        let protos = std::mem::take(&mut ctx.payload.func_synopsis);
        if ctx.is_live() && !protos.is_empty() {
            ctx.print(&emit::funcsynopsis(&protos));
        }
    }
}

struct Prototype;

impl<'a> ElementHandler<RenderState<'a>> for Prototype {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        ctx.payload.func_synopsis.push(super::FuncPrototype::default());
    }
}

struct Param;

impl<'a> ElementHandler<RenderState<'a>> for Param {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if let Some(proto) = ctx.payload.func_synopsis.last_mut() {
            proto.params.push(String::new());
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

struct VoidHandler;

impl<'a> ElementHandler<RenderState<'a>> for VoidHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if ctx.is_live() {
            ctx.print("void");
        }
    }
}

/// `emphasis`; a `role` attribute renders it bold.
struct EmphasisHandler;

impl<'a> ElementHandler<RenderState<'a>> for EmphasisHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, attrs: &Attributes) {
        let bold = attrs.get("role").is_some();
        ctx.payload.emphasis.push(bold);
        if ctx.is_live() {
            ctx.print(if bold { "<B>" } else { "<EM>" });
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        let bold = ctx.payload.emphasis.pop().unwrap_or(false);
        if ctx.is_live() {
            ctx.print(if bold { "</B>" } else { "</EM>" });
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// `guimenu` and `guisubmenu`, followed by an arrow inside a `menuchoice`.
struct MenuPart;

impl<'a> ElementHandler<RenderState<'a>> for MenuPart {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if ctx.is_live() {
            ctx.print("<B>");
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if !ctx.is_live() {
            return;
        }
        if ctx.has_ancestor(ElementIndex::MenuChoice) {
            ctx.print("-&gt;</B>");
        } else {
            ctx.print("</B>");
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// `glosssee` and `glossseealso`.
struct SeeAlso;

impl<'a> ElementHandler<RenderState<'a>> for SeeAlso {
    fn on_start(&self, ctx: &mut Ctx<'a>, el: ElementIndex, attrs: &Attributes) {
        if !ctx.is_live() {
            return;
        }
        let label = if el == ElementIndex::GlossSee { "See" } else { "See also" };
        let Some(other) = attrs.get("otherterm") else {
            ctx.print(&format!("<BR>{label}: "));
            return;
        };
        let term = ctx.payload.index.glossary_term(other).unwrap_or(other);
        let html = format!(
            "<BR>{label}: <A HREF=\"{}\">{}</A>\n",
            escape_attr(&ctx.link(Some(other))),
            escape_text(term)
        );
        ctx.print(&html);
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

/// `email`: collected inside the header, a mailto link elsewhere.
struct EmailHandler;

impl<'a> ElementHandler<RenderState<'a>> for EmailHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, el: ElementIndex, _: &Attributes) {
        if ctx.in_header() {
            ctx.begin_header_field(el);
        } else if ctx.is_live() {
            ctx.payload.email = Some(String::new());
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        let Some(address) = ctx.payload.email.take() else {
            return;
        };
        let html = format!(
            "<TT>&lt;<A href=\"mailto:{}\">{}</A>&gt;</TT>",
            escape_attr(&address),
            escape_text(&address)
        );
        ctx.print(&html);
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

struct AddressHandler;

impl<'a> ElementHandler<RenderState<'a>> for AddressHandler {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if ctx.is_live() {
            ctx.payload.address_start = true;
            ctx.print("<P>");
        }
    }

    fn on_end(&self, ctx: &mut Ctx<'a>, _: ElementIndex) {
        if ctx.is_live() {
            ctx.print("</P>\n");
        }
    }
}

/// `street`, `city`, `country`: one indented address line each.
struct AddressLine;

impl<'a> ElementHandler<RenderState<'a>> for AddressLine {
    fn on_start(&self, ctx: &mut Ctx<'a>, _: ElementIndex, _: &Attributes) {
        if !ctx.is_live() {
            return;
        }
        if std::mem::take(&mut ctx.payload.address_start) {
            ctx.print("&nbsp;&nbsp;&nbsp;");
        } else {
            ctx.print("<BR>&nbsp;&nbsp;&nbsp;");
        }
    }

    fn on_characters(&self, ctx: &mut Ctx<'a>, text: &str) {
        ctx.write_text(text);
    }
}

#[cfg(test)]
mod tests {
    use crate::convert::{ConvertOptions, convert};

    fn full(src: &str) -> String {
        convert(src, &ConvertOptions::new("doc.xml")).unwrap().html
    }

    fn section(src: &str, id: &str) -> String {
        let options = ConvertOptions::new("doc.xml").with_target_section(id);
        convert(src, &options).unwrap().html
    }

    #[test]
    fn test_section_heading_and_paragraph() {
        let html = full(
            r#"<article><artheader><title>T</title></artheader><sect1 id="s1"><title>Intro</title><para>Hello</para></sect1></article>"#,
        );
        let heading = html
            .find("<H2><A name=\"s1\">Section 1.&nbsp;&nbsp;</A></H2>")
            .unwrap();
        let para = html.find("<P>\nHello</P>").unwrap();
        assert!(heading < para);
        assert!(html.contains("<B>Intro</B><BR>\n"));
        assert!(html.starts_with("<HTML><HEAD>\n<TITLE>T</TITLE>"));
    }

    #[test]
    fn test_chapter_and_appendix_labels() {
        let html = full(
            r#"<book>
                <chapter id="c1"><title>One</title></chapter>
                <chapter id="c2"><title>Two</title><sect1 id="c2s1"><title>Sub</title></sect1></chapter>
                <appendix id="a1"><title>Extra</title><sect1><title>More</title></sect1></appendix>
              </book>"#,
        );
        assert!(html.contains("<H1><A name=\"c2\">Chapter 2.&nbsp;&nbsp;</A></H1>"));
        assert!(html.contains("<H2><A name=\"c2s1\">Section 2.1.&nbsp;&nbsp;</A></H2>"));
        assert!(html.contains("<H1><A name=\"a1\">Appendix A.&nbsp;&nbsp;</A></H1>"));
        assert!(html.contains("<H2>Section A.1.&nbsp;&nbsp;</H2>"));
    }

    #[test]
    fn test_figures_and_xrefs() {
        let html = full(
            r#"<article><sect1 id="s1"><title>Intro</title>
                <figure><title>First</title><graphic fileref="one"/></figure>
                <figure id="f2"><title>Second &amp; last</title><graphic fileref="two" format="gif"/></figure>
                <para>See <xref linkend="f2"/>, <xref linkend="s1"/> and <xref linkend="nowhere"/>.</para>
              </sect1></article>"#,
        );
        assert!(html.contains("<A NAME=\"f2\"><P><B>Figure 2. Second &amp; last</A></B>"));
        assert!(html.contains("two.gif"));
        assert!(html.contains("See Figure 2, "));
        assert!(html.contains("<A HREF=\"help:doc.xml?s1\">the section <EM>Intro</EM></A>"));
        assert!(html.contains("<A HREF=\"help:doc.xml?nowhere\">the section here</A>"));
    }

    #[test]
    fn test_ulink_in_body() {
        let html = full(
            r#"<article><sect1><title>T</title><para>see <ulink url="http://x.org/?a&amp;b">here</ulink> now</para></sect1></article>"#,
        );
        assert!(html.contains("see <A HREF=\"http://x.org/?a&amp;b\">here</A>\n now</P>"));
    }

    #[test]
    fn test_footnote_markers_and_table() {
        let html = full(
            r#"<article><sect1 id="s"><title>T</title>
                <para>A<footnote><para>first <ulink url="http://x.org">x</ulink></para></footnote>
                B<footnote><para>second</para></footnote></para>
              </sect1></article>"#,
        );
        assert!(html.contains("A<A NAME=\"HEADNOTE1\" HREF=\"#FOOTNOTE1\">[1]</A>"));
        assert!(html.contains("<A HREF=\"#HEADNOTE2\" NAME=\"FOOTNOTE2\">[2]</A>"));
        assert!(html.contains("first <A HREF=\"http://x.org\">x</A>\n"));
        let table = html.find("<H4>Notes</H4>").unwrap();
        assert!(html.find("first").unwrap() > table);
        assert!(!html[..table].contains("second"));
    }

    #[test]
    fn test_function_synopsis() {
        let html = full(
            r#"<article><sect1><title>API</title><funcsynopsis>
                <funcprototype><funcdef>int <function>add</function></funcdef>
                  <paramdef>int <parameter>a</parameter></paramdef>
                  <paramdef>int <parameter>b</parameter></paramdef></funcprototype>
                <funcprototype><funcdef>void <function>reset</function></funcdef><void/></funcprototype>
              </funcsynopsis></sect1></article>"#,
        );
        assert!(html.contains("&nbsp;<TT>add</TT></TD>"));
        assert!(html.contains("int <TT><I>a</I></TT>,<BR>\nint <TT><I>b</I></TT>)"));
        assert!(html.contains("void)</TD>"));
    }

    #[test]
    fn test_inline_markup() {
        let html = full(
            r#"<article><sect1><title>T</title><para><emphasis>soft</emphasis> <emphasis role="strong">hard</emphasis>
                <command>ls</command> <replaceable>file</replaceable>
                <menuchoice><guimenu>File</guimenu><guimenuitem>Open</guimenuitem></menuchoice>
                <email>me@x.org</email></para></sect1></article>"#,
        );
        assert!(html.contains("<EM>soft</EM> <B>hard</B>"));
        assert!(html.contains("<B>ls</B> <TT><I>file</I></TT>"));
        assert!(html.contains("<B>File-&gt;</B><B>Open</B>"));
        assert!(html.contains("<TT>&lt;<A href=\"mailto:me@x.org\">me@x.org</A>&gt;</TT>"));
    }

    #[test]
    fn test_header_metadata() {
        let html = full(
            r#"<article><artheader><title>Guide</title><subtitle>Sub</subtitle>
                <authorgroup><author><firstname>Ada</firstname><surname>Lovelace</surname>
                  <affiliation><orgname>Engines</orgname><address><email>ada@x.org</email></address></affiliation>
                </author></authorgroup>
                <copyright><year>1999</year><year>2000</year><holder>Ada</holder></copyright>
                <legalnotice><para>Do not copy.</para></legalnotice>
                <releaseinfo>Draft</releaseinfo>
              </artheader><sect1><title>S</title></sect1></article>"#,
        );
        assert!(html.contains("<H1>Guide</H1>\n<H2>Sub</H2>"));
        assert!(html.contains("<H3> by Ada Lovelace</H3>\nEngines<BR><TT>&lt;ada@x.org&gt;</TT>"));
        assert!(html.contains("&copy; 1999, 2000 by Ada"));
        assert!(html.contains("<I>Draft</I>"));
        assert!(!html.contains("Do not copy"));
        assert_eq!(html.matches("<HEAD>").count(), 1);
    }

    #[test]
    fn test_legal_notice_section() {
        let src = r#"<article><artheader><title>Guide</title>
            <legalnotice><title>Terms</title><para>Do not copy.</para></legalnotice>
            </artheader><sect1 id="s"><title>S</title><para>Body</para></sect1></article>"#;
        let html = section(src, "legalnotice");
        assert!(html.starts_with("<HTML><HEAD>\n<TITLE>Legal Notice</TITLE>"));
        assert!(html.contains("<B>Terms</B><BR>\n<P>\nDo not copy.</P>"));
        assert!(!html.contains("Body"));
        assert_eq!(html.matches("</BODY></HTML>").count(), 1);
    }

    #[test]
    fn test_tables_and_lists() {
        let html = full(
            r#"<article><sect1><title>T</title>
                <table><title>Sizes</title><thead><row><entry>Name</entry></row></thead>
                  <tbody><row><entry>x</entry><entry></entry></row></tbody></table>
                <variablelist><varlistentry><term>k</term><listitem><para>v</para></listitem></varlistentry></variablelist>
                <itemizedlist><listitem><para>i</para></listitem></itemizedlist>
              </sect1></article>"#,
        );
        assert!(html.contains("<TABLE BORDER=\"1\">\n<P><B>Table 1. Sizes</B></P>"));
        assert!(html.contains("<TH ALIGN=\"LEFT\" VALIGN=\"TOP\">Name</TH>"));
        assert!(html.contains("<TD ALIGN=\"LEFT\" VALIGN=\"TOP\">&nbsp;</TD>"));
        assert!(html.contains("<DT>k</DT>\n<DD><P>\nv</P>\n</DD>"));
        assert!(html.contains("<LI><P>\ni</P>\n</LI>"));
    }

    #[test]
    fn test_admonition_icon() {
        let src = r#"<article><sect1><title>T</title><warning><title>Careful</title><para>Hot</para></warning></sect1></article>"#;
        let options = ConvertOptions::new("doc.xml").with_pixmap_dir("/usr/share/pixmaps");
        let html = convert(src, &options).unwrap().html;
        assert!(html.contains("<IMG ALT=\"warning\" SRC=\"file:///usr/share/pixmaps/gnome-warning.png\">"));
        assert!(html.contains("<B>Careful</B><BR>\n"));
        assert!(full(src).contains(">warning</TD>"));
    }

    #[test]
    fn test_glossary_see_links() {
        let html = full(
            r#"<glossary><title>Terms</title><glossdiv id="g"><title>G</title>
                <glossentry id="gui"><glossterm>GUI</glossterm><glossdef><para>Graphics</para></glossdef></glossentry>
                <glossentry id="w"><glossterm>Widget</glossterm><glosssee otherterm="gui"/></glossentry>
              </glossdiv></glossary>"#,
        );
        assert!(html.contains("<H1>Terms</H1>"));
        assert!(html.contains("<H2>G</H2>"));
        assert!(html.contains("<B><H2>Widget</H2></B>"));
        assert!(html.contains("<BR>See: <A HREF=\"help:doc.xml?gui\">GUI</A>"));
    }

    #[test]
    fn test_cdata_and_unknown_passthrough() {
        let html = full(
            "<article><sect1><title>T</title><programlisting><![CDATA[\nif (a < b)]]></programlisting>\
             <para><blink>a &amp; <b>b</b></blink></para></sect1></article>",
        );
        assert!(html.contains("<PRE>if (a &lt; b)</PRE>"));
        assert!(html.contains("<P>\na & b</P>"));
    }
}
