//! The two-pass conversion pipeline.
//!
//! The preparse pass walks the whole document to build a [`CrossRefIndex`];
//! the render pass then walks it again from the start, consulting the index
//! for titles, figure numbers, glossary terms and navigation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::context::{Context, Diagnostics};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::index::CrossRefIndex;
use crate::preparse::{PreparseState, PreparseTable};
use crate::render::{self, RenderState, RenderTable};
use crate::{sax, util};

/// Conversion settings.
///
/// ```
/// use db2html::ConvertOptions;
///
/// let options = ConvertOptions::new("/usr/share/help/manual.xml")
///     .with_target_section("intro")
///     .with_link_scheme("ghelp");
/// assert_eq!(options.target_section.as_deref(), Some("intro"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Section to render on its own; `None` renders the whole document.
    pub target_section: Option<String>,
    /// Document name used in generated links.
    pub base_file: String,
    /// Directory prefix for image sources, with a trailing `/`.
    pub base_path: String,
    /// Scheme of links back into the document.
    pub link_scheme: String,
    /// Page title when the document supplies none.
    pub default_title: String,
    /// Directory holding admonition icons.
    pub pixmap_dir: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            target_section: None,
            base_file: String::new(),
            base_path: String::new(),
            link_scheme: "help".to_string(),
            default_title: "Documentation".to_string(),
            pixmap_dir: None,
        }
    }
}

impl ConvertOptions {
    pub fn new(base_file: impl Into<String>) -> Self {
        Self {
            base_file: base_file.into(),
            ..Self::default()
        }
    }

    /// Options for an invocation argument `[file://]FILE[?SECTION_ID]`.
    pub fn from_target(arg: &str) -> Self {
        let (file, section) = util::parse_target(arg);
        let mut options = Self::new(file).with_base_path(util::base_path_for(file));
        options.target_section = section.map(str::to_string);
        options
    }

    pub fn with_target_section(mut self, id: impl Into<String>) -> Self {
        self.target_section = Some(id.into());
        self
    }

    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = path.into();
        self
    }

    pub fn with_link_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.link_scheme = scheme.into();
        self
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    pub fn with_pixmap_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pixmap_dir = Some(dir.into());
        self
    }

    /// File to read, as named by `base_file`.
    pub fn input_path(&self) -> &Path {
        Path::new(&self.base_file)
    }
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub html: String,
    pub index: CrossRefIndex,
    /// Anomalies recovered from during the render pass.
    pub diagnostics: Diagnostics,
}

/// Build the cross-reference index of a document.
pub fn preparse(source: &str) -> Result<CrossRefIndex> {
    let mut dispatcher = Dispatcher::new(&PreparseTable, Context::new(PreparseState::new()));
    sax::parse(source, &mut dispatcher)?;
    let ctx = dispatcher.into_context();
    log::debug!(
        target: "db2html.preparse",
        "indexed {} navigable sections",
        ctx.payload.index.sections().len()
    );
    Ok(ctx.payload.index)
}

/// Convert a document held in memory.
///
/// A fatal tokenizer error in either pass aborts the conversion; no partial
/// output is returned.
pub fn convert(source: &str, options: &ConvertOptions) -> Result<Conversion> {
    let index = preparse(source)?;

    let mut ctx = Context::new(RenderState::new(&index, options));
    ctx.base_file = options.base_file.clone();
    ctx.base_path = options.base_path.clone();
    ctx.target_section = options.target_section.clone();

    let mut dispatcher = Dispatcher::new(&RenderTable, ctx);
    sax::parse(source, &mut dispatcher)?;
    let (html, diagnostics) = render::finish(dispatcher.into_context());

    if !diagnostics.is_clean() {
        log::debug!(target: "db2html.render", "recovered from {diagnostics:?}");
    }
    Ok(Conversion {
        html,
        index,
        diagnostics,
    })
}

/// Convert raw document bytes, decoding them first.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<Conversion> {
    let source = util::decode_document(bytes)?;
    convert(&source, options)
}

/// Read and convert the file named by `options.base_file`.
pub fn convert_file(options: &ConvertOptions) -> Result<Conversion> {
    let bytes = fs::read(options.input_path())?;
    convert_bytes(&bytes, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_target() {
        let options = ConvertOptions::from_target("file:///usr/doc/guide.xml?intro");
        assert_eq!(options.base_file, "/usr/doc/guide.xml");
        assert_eq!(options.base_path, "/usr/doc/");
        assert_eq!(options.target_section.as_deref(), Some("intro"));
        assert_eq!(options.link_scheme, "help");

        let whole = ConvertOptions::from_target("/usr/doc/guide.xml?");
        assert_eq!(whole.target_section, None);
    }

    #[test]
    fn test_fatal_error_aborts() {
        let result = convert("<article><para>unclosed <!-- comment", &ConvertOptions::new("x.xml"));
        assert!(matches!(result, Err(crate::Error::Xml { .. })));
    }

    #[test]
    fn test_index_is_returned() {
        let conversion = convert(
            r#"<article><sect1 id="a"><title>A</title></sect1></article>"#,
            &ConvertOptions::new("x.xml"),
        )
        .unwrap();
        assert_eq!(conversion.index.title("a"), Some("A"));
        assert!(conversion.diagnostics.is_clean());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let options = ConvertOptions::new("/nonexistent/dir/doc.xml");
        assert!(matches!(convert_file(&options), Err(crate::Error::Io(_))));
    }
}
