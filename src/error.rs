//! Error types for db2html conversions.

use thiserror::Error;

/// Errors that abort a conversion.
///
/// Everything recoverable (unknown elements, mismatched end tags, missing
/// ids, unresolved entities) is handled where it is detected and only shows
/// up in [`Diagnostics`](crate::Diagnostics).
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Unsupported encoding: {0}")]
    Encoding(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
