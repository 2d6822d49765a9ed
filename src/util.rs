//! Input decoding and invocation helpers.

use std::env;

use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode raw document bytes to a string.
///
/// 1. A UTF-8 byte order mark is dropped.
/// 2. Well-formed UTF-8 is used as is.
/// 3. Otherwise the encoding named in `<?xml encoding="..."?>` is used. An
///    unknown label is an error, as is malformed input that explicitly
///    declares UTF-8.
/// 4. Without a declaration, Windows-1252 is assumed.
pub fn decode_document(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let (text, malformed) = encoding_rs::UTF_8.decode_without_bom_handling(bytes);
    if !malformed {
        return Ok(text.into_owned());
    }

    if let Some(label) = extract_xml_encoding(bytes) {
        let encoding = encoding_rs::Encoding::for_label(label.as_bytes())
            .ok_or_else(|| Error::Encoding(label.to_string()))?;
        if encoding == encoding_rs::UTF_8 {
            return Ok(String::from_utf8(bytes.to_vec())?);
        }
        log::debug!("decoding input as {}", encoding.name());
        let (text, _, _) = encoding.decode(bytes);
        return Ok(text.into_owned());
    }

    log::debug!("input is not UTF-8, falling back to windows-1252");
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    Ok(text.into_owned())
}

/// Encoding label from the XML declaration, if any.
///
/// Only the first 100 bytes are examined.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(100)];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let (&quote, rest) = after_enc.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let end = rest.iter().position(|&b| b == quote)?;
    std::str::from_utf8(&rest[..end]).ok()
}

/// Split an invocation argument `[file://]FILE[?SECTION_ID]` into the file
/// path and the requested section. An empty section id requests none.
pub fn parse_target(arg: &str) -> (&str, Option<&str>) {
    let arg = arg.strip_prefix("file://").unwrap_or(arg);
    match arg.split_once('?') {
        Some((file, "")) => (file, None),
        Some((file, id)) => (file, Some(id)),
        None => (arg, None),
    }
}

/// Directory images are resolved against, with a trailing `/`.
///
/// A path without a directory separator is taken relative to the working
/// directory: the `PWD` environment value, or the process's current
/// directory when that is unset.
pub fn base_path_for(path: &str) -> String {
    if let Some(pos) = path.rfind('/') {
        return path[..=pos].to_string();
    }
    let cwd = env::var("PWD").ok().or_else(|| {
        env::current_dir()
            .ok()
            .map(|dir| dir.display().to_string())
    });
    match cwd {
        Some(dir) if dir.ends_with('/') => dir,
        Some(dir) => format!("{dir}/"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBF<article>caf\xC3\xA9</article>";
        assert_eq!(decode_document(bytes).unwrap(), "<article>café</article>");
    }

    #[test]
    fn test_decode_declared_latin1() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><para>caf\xE9</para>";
        assert!(decode_document(bytes).unwrap().ends_with("<para>café</para>"));
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        let bytes = b"<para>\x93quoted\x94</para>";
        assert_eq!(decode_document(bytes).unwrap(), "<para>\u{201C}quoted\u{201D}</para>");
    }

    #[test]
    fn test_decode_errors() {
        let unknown = b"<?xml version=\"1.0\" encoding=\"klingon\"?><a>\xFF</a>";
        assert!(matches!(decode_document(unknown), Err(Error::Encoding(label)) if label == "klingon"));

        let lying = b"<?xml version=\"1.0\" encoding=\"utf-8\"?><a>\xFF</a>";
        assert!(matches!(decode_document(lying), Err(Error::Utf8(_))));
    }

    #[test]
    fn test_extract_xml_encoding() {
        assert_eq!(
            extract_xml_encoding(b"<?xml version='1.0' encoding='koi8-r'?>"),
            Some("koi8-r")
        );
        assert_eq!(extract_xml_encoding(b"<?xml version=\"1.0\"?>"), None);
        assert_eq!(extract_xml_encoding(b"<article/>"), None);
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("file:///usr/doc/a.xml?intro"), ("/usr/doc/a.xml", Some("intro")));
        assert_eq!(parse_target("a.xml?"), ("a.xml", None));
        assert_eq!(parse_target("a.xml"), ("a.xml", None));
    }

    #[test]
    fn test_base_path() {
        assert_eq!(base_path_for("/usr/doc/a.xml"), "/usr/doc/");
        assert_eq!(base_path_for("doc/a.xml"), "doc/");
        assert!(base_path_for("a.xml").ends_with('/'));
    }
}
