//! # db2html
//!
//! Converts DocBook-style help documents to HTML in two passes.
//!
//! ## Features
//!
//! - Whole-document rendering with a header block and navigation footer
//! - Single-section rendering (`FILE?SECTION_ID`) with previous/next links
//! - Section numbering, figure numbering, footnotes and cross references
//! - Tolerant of unknown elements and mismatched end tags
//!
//! ## Quick Start
//!
//! ```
//! use db2html::{convert, ConvertOptions};
//!
//! let source = r#"<article><sect1 id="s1"><title>Intro</title><para>Hello</para></sect1></article>"#;
//! let options = ConvertOptions::new("guide.xml");
//! let conversion = convert(source, &options).unwrap();
//! assert!(conversion.html.contains("<P>\nHello</P>"));
//! ```
//!
//! ## Rendering one section
//!
//! ```
//! use db2html::{convert, ConvertOptions};
//!
//! let source = r#"<article>
//!   <sect1 id="a"><title>A</title><para>first</para></sect1>
//!   <sect1 id="b"><title>B</title><para>second</para></sect1>
//! </article>"#;
//! let options = ConvertOptions::new("guide.xml").with_target_section("b");
//! let html = convert(source, &options).unwrap().html;
//! assert!(html.contains("second"));
//! assert!(!html.contains("first"));
//! assert!(html.contains("<A HREF=\"help:guide.xml?a\">"));
//! ```

pub mod context;
pub mod convert;
pub mod dispatch;
pub mod element;
pub mod entities;
pub mod error;
pub mod index;
pub mod preparse;
pub mod render;
pub mod sax;
pub mod util;

pub use context::{Attributes, Context, Diagnostics};
pub use convert::{Conversion, ConvertOptions, convert, convert_bytes, convert_file, preparse};
pub use element::{DocType, ElementIndex};
pub use error::{Error, Result};
pub use index::{CrossRefIndex, NavTarget, Neighbors, SectionIdStack};
