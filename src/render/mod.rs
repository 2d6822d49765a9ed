//! Render pass: streams HTML while walking the document a second time.
//!
//! Output is gated by the section state machine. A full-document render
//! has no machine and is always live; a subsection render starts in
//! [`SectionState::LookingForSect`] and only emits between the requested
//! section's title and its end tag.

mod elements;
pub mod emit;

use crate::context::{Context, Diagnostics};
use crate::convert::ConvertOptions;
use crate::element::ElementIndex;
use crate::index::{CrossRefIndex, NavTarget};

pub use elements::RenderTable;

/// Position of a subsection render relative to the requested section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    LookingForSect,
    LookingForSectTitle,
    InSect,
    LookingForPostSect,
    DoneWithSect,
}

/// Document header metadata, collected from the `artheader` family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub authors: Vec<AuthorInfo>,
    pub copyright_year: Option<String>,
    pub copyright_holder: Option<String>,
    pub releaseinfo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorInfo {
    pub firstname: Option<String>,
    pub othername: Option<String>,
    pub surname: Option<String>,
    pub orgname: Option<String>,
    pub email: Option<String>,
}

/// Figure being rendered; emitted at its end tag.
#[derive(Debug, Clone, Default)]
pub struct FigureInfo {
    pub id: Option<String>,
    pub number: u32,
    pub title: Option<String>,
    pub img: Option<String>,
}

/// One `funcprototype` of a function synopsis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncPrototype {
    pub retval: Option<String>,
    pub func: String,
    pub params: Vec<String>,
}

/// Render payload.
#[derive(Debug)]
pub struct RenderState<'a> {
    pub index: &'a CrossRefIndex,
    pub options: &'a ConvertOptions,
    pub out: String,
    /// `None` renders the whole document.
    pub section: Option<SectionState>,
    pub header: HeaderInfo,
    head_emitted: bool,
    footer_emitted: bool,
    /// Title of the requested section, read before the preamble is emitted.
    pending_title: Option<String>,
    /// Element owning the open `title`, when it is being rendered.
    title_owner: Option<ElementIndex>,
    /// Address of an `email` outside the header, emitted at its end tag.
    email: Option<String>,
    figure: Option<FigureInfo>,
    figure_count: u32,
    table_count: u32,
    func_synopsis: Vec<FuncPrototype>,
    /// Whether each open `emphasis` rendered bold.
    emphasis: Vec<bool>,
    address_start: bool,
}

impl<'a> RenderState<'a> {
    pub fn new(index: &'a CrossRefIndex, options: &'a ConvertOptions) -> Self {
        let section = options
            .target_section
            .as_ref()
            .map(|_| SectionState::LookingForSect);
        Self {
            index,
            options,
            out: String::new(),
            section,
            header: HeaderInfo::default(),
            head_emitted: false,
            footer_emitted: false,
            pending_title: None,
            title_owner: None,
            email: None,
            figure: None,
            figure_count: 0,
            table_count: 0,
            func_synopsis: Vec::new(),
            emphasis: Vec::new(),
            address_start: false,
        }
    }
}

/// Elements whose content is redirected away from the main output.
const ROUTES: &[ElementIndex] = &[
    ElementIndex::Footnote,
    ElementIndex::FuncPrototype,
    ElementIndex::FuncDef,
    ElementIndex::ParamDef,
];

/// Nearest of these decides whether header-like content is shown.
const SUPPRESSING: &[ElementIndex] = &[
    ElementIndex::LegalNotice,
    ElementIndex::ArtHeader,
    ElementIndex::BookInfo,
    ElementIndex::ArticleInfo,
    ElementIndex::GlossaryInfo,
    ElementIndex::DocInfo,
];

pub(crate) const LEGAL_NOTICE_ID: &str = "legalnotice";

/// Header elements whose text is collected into [`HeaderInfo`].
const HEADER_FIELDS: &[ElementIndex] = &[
    ElementIndex::Title,
    ElementIndex::Subtitle,
    ElementIndex::FirstName,
    ElementIndex::OtherName,
    ElementIndex::Surname,
    ElementIndex::OrgName,
    ElementIndex::Email,
    ElementIndex::Year,
    ElementIndex::Holder,
    ElementIndex::ReleaseInfo,
];

impl HeaderInfo {
    /// Buffer collecting the text of header element `field`.
    fn slot(&mut self, field: ElementIndex) -> Option<&mut String> {
        let slot = match field {
            ElementIndex::Title => &mut self.title,
            ElementIndex::Subtitle => &mut self.subtitle,
            ElementIndex::Year => &mut self.copyright_year,
            ElementIndex::Holder => &mut self.copyright_holder,
            ElementIndex::ReleaseInfo => &mut self.releaseinfo,
            ElementIndex::FirstName
            | ElementIndex::OtherName
            | ElementIndex::Surname
            | ElementIndex::OrgName
            | ElementIndex::Email => {
                if self.authors.is_empty() {
                    self.authors.push(AuthorInfo::default());
                }
                let author = self.authors.last_mut()?;
                match field {
                    ElementIndex::FirstName => &mut author.firstname,
                    ElementIndex::OtherName => &mut author.othername,
                    ElementIndex::Surname => &mut author.surname,
                    ElementIndex::OrgName => &mut author.orgname,
                    _ => &mut author.email,
                }
            }
            _ => return None,
        };
        Some(slot.get_or_insert_with(String::new))
    }

    /// Prepare the buffer for a header element about to be read. Titles are
    /// replaced; repeated copyright years and holders are listed.
    fn begin(&mut self, field: ElementIndex) {
        match field {
            ElementIndex::Title => self.title = Some(String::new()),
            ElementIndex::Subtitle => self.subtitle = Some(String::new()),
            ElementIndex::Author => self.authors.push(AuthorInfo::default()),
            ElementIndex::Year | ElementIndex::Holder => {
                if let Some(slot) = self.slot(field)
                    && !slot.is_empty()
                {
                    slot.push_str(", ");
                }
            }
            _ => {}
        }
    }
}

impl Context<RenderState<'_>> {
    /// Whether output may be produced at the current position.
    pub fn is_live(&self) -> bool {
        if !self
            .payload
            .section
            .is_none_or(|state| state == SectionState::InSect)
        {
            return false;
        }
        match self.find_first_ancestor(SUPPRESSING) {
            ElementIndex::Undefined => true,
            ElementIndex::LegalNotice => self.is_target(LEGAL_NOTICE_ID),
            _ => false,
        }
    }

    /// Inside a document header container, and not inside a legal notice
    /// nested in it.
    pub fn in_header(&self) -> bool {
        self.find_first_ancestor(SUPPRESSING).is_header()
    }

    /// Write markup, routed to the innermost footnote or function synopsis
    /// being collected, or to the main output.
    pub fn print(&mut self, s: &str) {
        let top = self.current_index();
        match self.find_first_ancestor(ROUTES) {
            ElementIndex::Footnote => {
                if let Some(buffer) = self.footnotes.last_mut() {
                    buffer.push_str(s);
                }
            }
            ElementIndex::FuncDef => {
                if let Some(proto) = self.payload.func_synopsis.last_mut() {
                    if top == ElementIndex::Function {
                        proto.func.push_str(s);
                    } else if proto.retval.is_none() {
                        proto.retval = Some(s.to_string());
                    }
                }
            }
            ElementIndex::ParamDef => {
                if let Some(param) = self
                    .payload
                    .func_synopsis
                    .last_mut()
                    .and_then(|proto| proto.params.last_mut())
                {
                    param.push_str(s);
                }
            }
            ElementIndex::FuncPrototype => {
                if top == ElementIndex::Void
                    && let Some(proto) = self.payload.func_synopsis.last_mut()
                    && proto.params.is_empty()
                {
                    proto.params.push(s.to_string());
                }
            }
            _ => self.emit(s),
        }
    }

    /// Write to the main output, bypassing routing.
    pub fn emit(&mut self, s: &str) {
        if self.payload.section.is_none() && !self.payload.head_emitted {
            self.emit_document_head();
        }
        self.payload.out.push_str(s);
    }

    /// Character data. Captured while the requested section's title is
    /// read, collected inside the document header, otherwise escaped and
    /// printed when live.
    pub fn write_text(&mut self, text: &str) {
        if let Some(title) = self.payload.pending_title.as_mut() {
            title.push_str(text);
            return;
        }
        if self.in_header() {
            let field = self.find_first_ancestor(HEADER_FIELDS);
            if let Some(slot) = self.payload.header.slot(field) {
                slot.push_str(text);
            }
            return;
        }
        if !self.is_live() {
            return;
        }
        if let Some(email) = self.payload.email.as_mut() {
            email.push_str(text);
            return;
        }
        if self.payload.title_owner == Some(ElementIndex::Figure)
            && let Some(figure) = self.payload.figure.as_mut()
        {
            figure.title.get_or_insert_with(String::new).push_str(text);
            return;
        }
        let escaped = emit::escape_text(text).into_owned();
        self.print(&escaped);
    }

    /// Start of a header element: reset or extend its buffer.
    pub fn begin_header_field(&mut self, field: ElementIndex) {
        if self.in_header() {
            self.payload.header.begin(field);
        }
    }

    /// `help:base?id` style link into this document.
    pub fn link(&self, id: Option<&str>) -> String {
        emit::help_link(&self.payload.options.link_scheme, &self.base_file, id)
    }

    fn emit_document_head(&mut self) {
        let legal = self.link(Some(LEGAL_NOTICE_ID));
        let head = emit::document_head(
            &self.payload.header,
            &self.payload.options.default_title,
            &legal,
        );
        self.payload.head_emitted = true;
        self.payload.out.push_str(&head);
    }

    /// Emit the preamble of the requested subsection and go live.
    fn begin_section(&mut self, title: &str) {
        let contents = self.link(None);
        let preamble = emit::section_preamble(title, &contents);
        self.payload.out.push_str(&preamble);
        self.payload.head_emitted = true;
        self.payload.section = Some(SectionState::InSect);
        log::debug!(target: "db2html.render", "entered requested section: {title}");
    }

    fn emit_footer(&mut self, previous: Option<&str>, home: Option<&str>, next: Option<&str>) {
        let footer = emit::footer(previous, home, next);
        self.payload.out.push_str(&footer);
        self.payload.footer_emitted = true;
    }
}

/// Complete the document after the render walk: make sure a head exists
/// and close with the navigation footer.
pub fn finish(mut ctx: Context<RenderState<'_>>) -> (String, Diagnostics) {
    if !ctx.payload.head_emitted {
        match ctx.payload.section {
            None => ctx.emit_document_head(),
            Some(_) => {
                log::debug!(target: "db2html.render", "requested section not found");
                let title = ctx.payload.options.default_title.clone();
                let contents = ctx.link(None);
                let preamble = emit::section_preamble(&title, &contents);
                ctx.payload.out.push_str(&preamble);
                ctx.payload.head_emitted = true;
            }
        }
    }

    if !ctx.payload.footer_emitted {
        let sections = ctx.payload.index.sections();
        let home = ctx.link(None);
        match ctx.target_section.clone() {
            None => {
                let next = sections.first().map(|id| ctx.link(Some(id)));
                ctx.emit_footer(None, None, next.as_deref());
            }
            Some(target) => {
                let (previous, next) = match sections.neighbors(&target) {
                    Some(n) => {
                        let previous = match n.previous {
                            NavTarget::Contents => ctx.link(None),
                            NavTarget::Section(id) => ctx.link(Some(&id)),
                        };
                        (previous, n.next.map(|id| ctx.link(Some(&id))))
                    }
                    None => (ctx.link(None), None),
                };
                ctx.emit_footer(Some(&previous), Some(&home), next.as_deref());
            }
        }
    }

    if !ctx.payload.out.starts_with("<HTML>") {
        ctx.payload.out.insert_str(0, "<HTML>");
    }

    (ctx.payload.out, ctx.diagnostics)
}
