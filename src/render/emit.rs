//! Stateless HTML formatting routines used by the render pass.

use std::borrow::Cow;
use std::fmt::Write;

use super::{AuthorInfo, FuncPrototype, HeaderInfo};

pub const BODY: &str = "<BODY BGCOLOR=\"#FFFFFF\" TEXT=\"#000000\" LINK=\"#0000FF\" \
                        VLINK=\"#840084\" ALINK=\"#0000FF\">\n";

/// Escape character data for element content.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text, |c| matches!(c, b'<' | b'>' | b'&'))
}

/// Escape an attribute value for a double-quoted attribute.
pub fn escape_attr(text: &str) -> Cow<'_, str> {
    escape(text, |c| matches!(c, b'<' | b'>' | b'&' | b'"'))
}

fn escape(text: &str, needs: impl Fn(u8) -> bool) -> Cow<'_, str> {
    if !text.bytes().any(&needs) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' if needs(b'"') => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// CDATA content: a leading newline is dropped and `<` escaped.
pub fn cdata(text: &str) -> String {
    let text = text.strip_prefix('\n').unwrap_or(text);
    text.replace('<', "&lt;")
}

/// `help:base` or `help:base?id`.
pub fn help_link(scheme: &str, base_file: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{scheme}:{base_file}?{id}"),
        None => format!("{scheme}:{base_file}"),
    }
}

/// Full-document head: title block, authors, copyright and release info.
pub fn document_head(header: &HeaderInfo, default_title: &str, legal_href: &str) -> String {
    let title = header.title.as_deref().unwrap_or(default_title);
    let mut out = String::new();
    let _ = write!(
        out,
        "<HEAD>\n<TITLE>{}</TITLE>\n</HEAD>\n{BODY}",
        escape_text(title)
    );
    if let Some(title) = &header.title {
        let _ = writeln!(out, "<H1>{}</H1>", escape_text(title));
    }
    if let Some(subtitle) = &header.subtitle {
        let _ = writeln!(out, "<H2>{}</H2>", escape_text(subtitle));
    }
    for author in &header.authors {
        out.push_str(&author_block(author));
    }
    out.push_str("<P>");
    if let (Some(year), Some(holder)) = (&header.copyright_year, &header.copyright_holder) {
        let _ = write!(
            out,
            "<A HREF=\"{}\">Copyright</A> &copy; {} by {}",
            escape_attr(legal_href),
            escape_text(year),
            escape_text(holder)
        );
    }
    if let Some(info) = &header.releaseinfo {
        let _ = write!(
            out,
            "<P><FONT SIZE=\"-1\"><I>{}</I></FONT></P>",
            escape_text(info)
        );
    }
    out.push_str("<HR>\n");
    out
}

fn author_block(author: &AuthorInfo) -> String {
    let mut out = String::from("<H3> by ");
    let names: Vec<&str> = [&author.firstname, &author.othername, &author.surname]
        .into_iter()
        .filter_map(|n| n.as_deref())
        .collect();
    out.push_str(&escape_text(&names.join(" ")));
    out.push_str("</H3>\n");
    if let Some(org) = &author.orgname {
        let _ = write!(out, "{}<BR>", escape_text(org));
    }
    if let Some(email) = &author.email {
        let _ = writeln!(out, "<TT>&lt;{}&gt;</TT>", escape_text(email));
    }
    out.push_str("<BR>");
    out
}

/// Head and body preamble of a single rendered subsection.
pub fn section_preamble(title: &str, contents_href: &str) -> String {
    let title = escape_text(title);
    format!(
        "<HEAD>\n<TITLE>{title}</TITLE>\n</HEAD>\n{BODY}\
         <A href=\"{}\"><font size=3>Up to Table of Contents</font></A><BR>\n\
         <H1>{title}</H1>\n",
        escape_attr(contents_href)
    )
}

pub fn legal_notice_preamble() -> String {
    format!("<HEAD>\n<TITLE>Legal Notice</TITLE>\n</HEAD>\n{BODY}<H1>Legal Notice</H1>\n")
}

/// Numbered section heading. The title text follows it separately.
pub fn heading(level: u8, id: Option<&str>, label: &str) -> String {
    match id {
        Some(id) => format!(
            "<H{level}><A name=\"{}\">{label}&nbsp;&nbsp;</A></H{level}>\n",
            escape_attr(id)
        ),
        None => format!("<H{level}>{label}&nbsp;&nbsp;</H{level}>\n"),
    }
}

/// Navigation footer closing the document.
pub fn footer(previous: Option<&str>, home: Option<&str>, next: Option<&str>) -> String {
    let cell = |href: Option<&str>, text: &str| match href {
        Some(href) => format!("<A HREF=\"{}\">{text}</A>", escape_attr(href)),
        None => "&nbsp;".to_string(),
    };
    format!(
        "\n<HR ALIGN=\"LEFT\" WIDTH=\"100%\">\n\
         <TABLE WIDTH=\"100%\" BORDER=\"0\" CELLPADDING=\"0\" CELLSPACING=\"0\">\n\
         <TR>\n<TD WIDTH=\"33%\" ALIGN=\"LEFT\" VALIGN=\"TOP\">{}</TD>\n\
         <TD WIDTH=\"34%\" ALIGN=\"CENTER\" VALIGN=\"TOP\">{}</TD>\n\
         <TD WIDTH=\"33%\" ALIGN=\"RIGHT\" VALIGN=\"TOP\">{}</TD>\n\
         </TR></TABLE>\n</BODY></HTML>\n",
        cell(previous, "&#60;&#60;&#60; Previous"),
        cell(home, "Home"),
        cell(next, "Next &#62;&#62;&#62;"),
    )
}

/// Inline marker linking to footnote `n` (1-based).
pub fn footnote_marker(n: usize) -> String {
    format!("<A NAME=\"HEADNOTE{n}\" HREF=\"#FOOTNOTE{n}\">[{n}]</A>")
}

/// End-of-document footnote table, cross-linked with the inline markers.
pub fn footnote_table(footnotes: &[String]) -> String {
    let mut out = String::from("<HR><H4>Notes</H4><TABLE BORDER=\"0\" WIDTH=\"100%\">\n\n");
    for (i, body) in footnotes.iter().enumerate() {
        let n = i + 1;
        let _ = write!(
            out,
            "<TR><TD ALIGN=\"LEFT\" VALIGN=\"TOP\" WIDTH=\"5%\">\n\
             <A HREF=\"#HEADNOTE{n}\" NAME=\"FOOTNOTE{n}\">[{n}]</A></TD>\n\
             <TD ALIGN=\"LEFT\" VALIGN=\"TOP\" WIDTH=\"95%\">\n{body}\n</TD></TR>\n"
        );
    }
    out.push_str("</TABLE>");
    out
}

/// Image file name for a `fileref` and optional `format` attribute.
///
/// PNG is assumed when no format is given; `jpg`/`jpeg` keep their
/// spelling in lower case; anything else is used verbatim.
pub fn image_file(fileref: &str, format: Option<&str>) -> String {
    match format {
        None => format!("{fileref}.png"),
        Some(f) if f.eq_ignore_ascii_case("gif") => format!("{fileref}.gif"),
        Some(f) if f.eq_ignore_ascii_case("jpg") || f.eq_ignore_ascii_case("jpeg") => {
            format!("{fileref}.{}", f.to_ascii_lowercase())
        }
        Some(f) => format!("{fileref}.{f}"),
    }
}

pub fn image(base_path: &str, file: &str, alt: Option<&str>) -> String {
    let src = escape_attr(&format!("file://{base_path}{file}")).into_owned();
    match alt {
        Some(alt) => format!("<IMG SRC=\"{src}\" ALT=\"{}\">", escape_attr(alt)),
        None => format!("<IMG SRC=\"{src}\">"),
    }
}

/// Caption and image of a figure.
pub fn figure(
    number: u32,
    id: Option<&str>,
    title: Option<&str>,
    base_path: &str,
    file: Option<&str>,
) -> String {
    let mut out = String::new();
    if let Some(id) = id {
        let _ = write!(out, "<A NAME=\"{}\">", escape_attr(id));
    }
    let _ = write!(out, "<P><B>Figure {number}.");
    if let Some(title) = title {
        let _ = write!(out, " {}", escape_text(title));
    }
    if id.is_some() {
        out.push_str("</A>");
    }
    out.push_str("</B><P>");
    if let Some(file) = file {
        out.push_str(&image(base_path, file, Some("IMAGE")));
        out.push_str("<P>");
    }
    out
}

/// Opening of an admonition box. Without an icon the element name is shown.
pub fn admonition_open(name: &str, icon: Option<&str>) -> String {
    let marker = match icon {
        Some(icon) => format!(
            "<IMG ALT=\"{name}\" SRC=\"file://{}\">",
            escape_attr(icon)
        ),
        None => name.to_string(),
    };
    format!(
        "<TABLE BORDER=\"0\" WIDTH=\"100%\">\n<TR><TD WIDTH=\"10%\" ALIGN=\"CENTER\" VALIGN=\"TOP\">\
         {marker}</TD>\n<TD>&nbsp;</TD>\n<TD ALIGN=\"LEFT\" VALIGN=\"TOP\">\n"
    )
}

pub const ADMONITION_CLOSE: &str = "</TD></TR>\n</TABLE>\n";

pub const LISTING_OPEN: &str =
    "<TABLE BORDER=\"0\" BGCOLOR=\"#E0E0E0\" WIDTH=\"100%\">\n<TR><TD>\n<PRE>";

pub const LISTING_CLOSE: &str = "</PRE>\n</TD></TR>\n</TABLE>\n";

/// Table of collected function prototypes.
pub fn funcsynopsis(protos: &[FuncPrototype]) -> String {
    const CELL: &str = "<TD VALIGN=TOP BGCOLOR=\"#E0E0E0\">";
    let mut out = String::from(
        "<TABLE BGCOLOR=\"#E0E0E0\" CELLSPACING=\"0\" CELLPADDING=\"0\" BORDER=\"0\">\n",
    );
    for proto in protos {
        out.push_str("<TR BGCOLOR=\"#E0E0E0\">");
        let _ = writeln!(out, "{CELL}{}</TD>", proto.retval.as_deref().unwrap_or(""));
        if proto.func.is_empty() {
            let _ = writeln!(out, "{CELL}</TD>");
        } else {
            let _ = writeln!(out, "{CELL}&nbsp;{}</TD>{CELL}&nbsp;(</TD>", proto.func);
        }
        let _ = writeln!(out, "{CELL}");
        out.push_str(&proto.params.join(",<BR>\n"));
        out.push_str(")</TD></TR>\n");
    }
    out.push_str("</TABLE><BR>\n");
    out
}
