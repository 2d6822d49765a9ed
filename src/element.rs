//! The closed element vocabulary shared by every pass.
//!
//! Both dispatch tables accept exactly this set of names. Anything else
//! maps to [`ElementIndex::Undefined`]: its content is still walked, but no
//! semantic action fires for it.

macro_rules! vocabulary {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Identifies every recognized markup element.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ElementIndex {
            $($variant,)*
            /// Sentinel for names outside the vocabulary.
            Undefined,
        }

        /// One row per recognized element name.
        pub static ELEMENTS: &[ElementInfo] = &[
            $(ElementInfo { index: ElementIndex::$variant, name: $name },)*
        ];
    };
}

vocabulary! {
    Article => "article",
    Book => "book",
    Glossary => "glossary",
    Section => "section",
    Sect1 => "sect1",
    Sect2 => "sect2",
    Sect3 => "sect3",
    Sect4 => "sect4",
    Sect5 => "sect5",
    Chapter => "chapter",
    Preface => "preface",
    Appendix => "appendix",
    Para => "para",
    FormalPara => "formalpara",
    BookInfo => "bookinfo",
    ArtHeader => "artheader",
    ArticleInfo => "articleinfo",
    GlossaryInfo => "glossaryinfo",
    DocInfo => "docinfo",
    AuthorGroup => "authorgroup",
    Author => "author",
    FirstName => "firstname",
    OtherName => "othername",
    Surname => "surname",
    Affiliation => "affiliation",
    Email => "email",
    OrgName => "orgname",
    Address => "address",
    Street => "street",
    City => "city",
    State => "state",
    Postcode => "postcode",
    Country => "country",
    Copyright => "copyright",
    Year => "year",
    Holder => "holder",
    ReleaseInfo => "releaseinfo",
    LegalNotice => "legalnotice",
    LegalPara => "legalpara",
    Title => "title",
    Subtitle => "subtitle",
    Ulink => "ulink",
    Link => "link",
    Xref => "xref",
    Anchor => "anchor",
    Footnote => "footnote",
    Figure => "figure",
    Graphic => "graphic",
    InlineGraphic => "inlinegraphic",
    Screenshot => "screenshot",
    ScreenInfo => "screeninfo",
    ItemizedList => "itemizedlist",
    OrderedList => "orderedlist",
    VariableList => "variablelist",
    VarListEntry => "varlistentry",
    Term => "term",
    ListItem => "listitem",
    SimpleList => "simplelist",
    Member => "member",
    ProgramListing => "programlisting",
    Screen => "screen",
    LiteralLayout => "literallayout",
    Cdata => "cdata",
    Tip => "tip",
    Warning => "warning",
    Important => "important",
    Note => "note",
    Caution => "caution",
    Table => "table",
    InformalTable => "informaltable",
    Thead => "thead",
    Tbody => "tbody",
    Row => "row",
    Entry => "entry",
    Emphasis => "emphasis",
    FirstTerm => "firstterm",
    CiteTitle => "citetitle",
    Application => "application",
    Filename => "filename",
    SgmlTag => "sgmltag",
    Command => "command",
    Replaceable => "replaceable",
    Function => "function",
    GuiButton => "guibutton",
    GuiIcon => "guiicon",
    GuiLabel => "guilabel",
    GuiMenu => "guimenu",
    GuiMenuItem => "guimenuitem",
    GuiSubmenu => "guisubmenu",
    MenuChoice => "menuchoice",
    Hardware => "hardware",
    Keycap => "keycap",
    Keycode => "keycode",
    Keysym => "keysym",
    Literal => "literal",
    Parameter => "parameter",
    Prompt => "prompt",
    Symbol => "symbol",
    UserInput => "userinput",
    StructName => "structname",
    StructField => "structfield",
    Interface => "interface",
    Acronym => "acronym",
    Markup => "markup",
    MouseButton => "mousebutton",
    Superscript => "superscript",
    SystemItem => "systemitem",
    VarName => "varname",
    Option => "option",
    Envar => "envar",
    ComputerOutput => "computeroutput",
    BlockQuote => "blockquote",
    Quote => "quote",
    BridgeHead => "bridgehead",
    FuncSynopsis => "funcsynopsis",
    FuncPrototype => "funcprototype",
    FuncDef => "funcdef",
    FuncParams => "funcparams",
    ParamDef => "paramdef",
    Void => "void",
    QandaSet => "qandaset",
    QandaEntry => "qandaentry",
    Question => "question",
    Answer => "answer",
    GlossDiv => "glossdiv",
    GlossEntry => "glossentry",
    GlossTerm => "glossterm",
    GlossSee => "glosssee",
    GlossSeeAlso => "glossseealso",
    Example => "example",
}

/// A vocabulary row: the element's tag and its canonical (lowercase) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementInfo {
    pub index: ElementIndex,
    pub name: &'static str,
}

/// Case-insensitive lookup of an element name.
pub fn lookup(name: &str) -> ElementIndex {
    ELEMENTS
        .iter()
        .find(|info| info.name.eq_ignore_ascii_case(name))
        .map(|info| info.index)
        .unwrap_or(ElementIndex::Undefined)
}

/// Elements that carry sectioning semantics: counters, ids, navigation.
pub const SECTIONS: &[ElementIndex] = &[
    ElementIndex::Preface,
    ElementIndex::Chapter,
    ElementIndex::Sect1,
    ElementIndex::Sect2,
    ElementIndex::Sect3,
    ElementIndex::Sect4,
    ElementIndex::Sect5,
    ElementIndex::Appendix,
    ElementIndex::Section,
];

/// Document header containers whose content is collected, not rendered.
pub const HEADERS: &[ElementIndex] = &[
    ElementIndex::ArtHeader,
    ElementIndex::BookInfo,
    ElementIndex::ArticleInfo,
    ElementIndex::GlossaryInfo,
    ElementIndex::DocInfo,
];

impl ElementIndex {
    /// Canonical name, `None` for [`ElementIndex::Undefined`].
    pub fn name(self) -> Option<&'static str> {
        ELEMENTS.iter().find(|info| info.index == self).map(|info| info.name)
    }

    /// Elements defined to have no content. They are popped right after
    /// their start callback and never see an end callback.
    pub fn is_contentless(self) -> bool {
        matches!(self, Self::Xref | Self::Void | Self::Anchor)
    }

    pub fn is_section(self) -> bool {
        SECTIONS.contains(&self)
    }

    pub fn is_header(self) -> bool {
        HEADERS.contains(&self)
    }

    pub fn is_admonition(self) -> bool {
        matches!(
            self,
            Self::Tip | Self::Warning | Self::Important | Self::Note | Self::Caution
        )
    }
}

/// Kind of document, taken from the root element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "snake_case"))]
pub enum DocType {
    #[default]
    Article,
    Book,
    Glossary,
}

/// Document-type detection table, consulted by every pass for the root
/// element.
static DOCTYPES: &[(ElementIndex, DocType)] = &[
    (ElementIndex::Article, DocType::Article),
    (ElementIndex::Book, DocType::Book),
    (ElementIndex::Glossary, DocType::Glossary),
];

/// Document type for a root element, if it is one.
pub fn detect_doctype(index: ElementIndex) -> Option<DocType> {
    DOCTYPES
        .iter()
        .find(|(root, _)| *root == index)
        .map(|(_, doctype)| *doctype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("sect1"), ElementIndex::Sect1);
        assert_eq!(lookup("SECT1"), ElementIndex::Sect1);
        assert_eq!(lookup("UlInK"), ElementIndex::Ulink);
    }

    #[test]
    fn test_unknown_is_undefined() {
        assert_eq!(lookup("blink"), ElementIndex::Undefined);
        assert_eq!(lookup(""), ElementIndex::Undefined);
        assert_eq!(ElementIndex::Undefined.name(), None);
    }

    #[test]
    fn test_names_are_unique_and_lowercase() {
        for (i, a) in ELEMENTS.iter().enumerate() {
            assert_eq!(a.name, a.name.to_ascii_lowercase());
            for b in &ELEMENTS[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.index, b.index);
            }
        }
    }

    #[test]
    fn test_every_row_round_trips() {
        for info in ELEMENTS {
            assert_eq!(lookup(info.name), info.index);
            assert_eq!(info.index.name(), Some(info.name));
        }
    }

    #[test]
    fn test_contentless() {
        assert!(ElementIndex::Xref.is_contentless());
        assert!(ElementIndex::Void.is_contentless());
        assert!(ElementIndex::Anchor.is_contentless());
        assert!(!ElementIndex::Para.is_contentless());
    }

    #[test]
    fn test_kind_sets() {
        assert!(ElementIndex::Sect3.is_section());
        assert!(ElementIndex::Appendix.is_section());
        assert!(!ElementIndex::GlossEntry.is_section());
        assert!(ElementIndex::BookInfo.is_header());
        assert!(!ElementIndex::LegalNotice.is_header());
        assert!(ElementIndex::Caution.is_admonition());
        assert!(!ElementIndex::Para.is_admonition());
    }

    #[test]
    fn test_detect_doctype() {
        assert_eq!(detect_doctype(ElementIndex::Article), Some(DocType::Article));
        assert_eq!(detect_doctype(ElementIndex::Book), Some(DocType::Book));
        assert_eq!(detect_doctype(ElementIndex::Glossary), Some(DocType::Glossary));
        assert_eq!(detect_doctype(ElementIndex::Sect1), None);
    }
}
