//! Character entity table.
//!
//! DocBook help sources lean on the ISO 8879 Latin-1 entity set
//! (`&eacute;`, `&copy;`, ...) without shipping a DTD. The table here maps
//! those names to code points so the tokenizer can expand them, and is
//! extended per document by `<!ENTITY>` declarations found in the internal
//! subset.

use std::collections::HashMap;

/// Predefined entities, sorted by name for binary search.
static ENTITIES: &[(&str, u32)] = &[
    ("AElig", 0xC6),
    ("Aacute", 0xC1),
    ("Acirc", 0xC2),
    ("Agrave", 0xC0),
    ("Aring", 0xC5),
    ("Atilde", 0xC3),
    ("Auml", 0xC4),
    ("Ccedil", 0xC7),
    ("Dagger", 0x2021),
    ("ETH", 0xD0),
    ("Eacute", 0xC9),
    ("Ecirc", 0xCA),
    ("Egrave", 0xC8),
    ("Euml", 0xCB),
    ("Iacute", 0xCD),
    ("Icirc", 0xCE),
    ("Igrave", 0xCC),
    ("Iuml", 0xCF),
    ("Ntilde", 0xD1),
    ("OElig", 0x152),
    ("Oacute", 0xD3),
    ("Ocirc", 0xD4),
    ("Ograve", 0xD2),
    ("Oslash", 0xD8),
    ("Otilde", 0xD5),
    ("Ouml", 0xD6),
    ("Scaron", 0x160),
    ("THORN", 0xDE),
    ("Uacute", 0xDA),
    ("Ucirc", 0xDB),
    ("Ugrave", 0xD9),
    ("Uuml", 0xDC),
    ("Yacute", 0xDD),
    ("Yuml", 0x178),
    ("aacute", 0xE1),
    ("acirc", 0xE2),
    ("acute", 0xB4),
    ("aelig", 0xE6),
    ("agrave", 0xE0),
    ("amp", 0x26),
    ("apos", 0x27),
    ("aring", 0xE5),
    ("atilde", 0xE3),
    ("auml", 0xE4),
    ("bdquo", 0x201E),
    ("brvbar", 0xA6),
    ("bull", 0x2022),
    ("ccedil", 0xE7),
    ("cedil", 0xB8),
    ("cent", 0xA2),
    ("circ", 0x2C6),
    ("copy", 0xA9),
    ("curren", 0xA4),
    ("dagger", 0x2020),
    ("deg", 0xB0),
    ("divide", 0xF7),
    ("eacute", 0xE9),
    ("ecirc", 0xEA),
    ("egrave", 0xE8),
    ("emsp", 0x2003),
    ("ensp", 0x2002),
    ("eth", 0xF0),
    ("euml", 0xEB),
    ("euro", 0x20AC),
    ("frac12", 0xBD),
    ("frac14", 0xBC),
    ("frac34", 0xBE),
    ("gt", 0x3E),
    ("hellip", 0x2026),
    ("iacute", 0xED),
    ("icirc", 0xEE),
    ("iexcl", 0xA1),
    ("igrave", 0xEC),
    ("iquest", 0xBF),
    ("iuml", 0xEF),
    ("laquo", 0xAB),
    ("ldquo", 0x201C),
    ("lsaquo", 0x2039),
    ("lsquo", 0x2018),
    ("lt", 0x3C),
    ("macr", 0xAF),
    ("mdash", 0x2014),
    ("micro", 0xB5),
    ("middot", 0xB7),
    ("nbsp", 0xA0),
    ("ndash", 0x2013),
    ("not", 0xAC),
    ("ntilde", 0xF1),
    ("oacute", 0xF3),
    ("ocirc", 0xF4),
    ("oelig", 0x153),
    ("ograve", 0xF2),
    ("ordf", 0xAA),
    ("ordm", 0xBA),
    ("oslash", 0xF8),
    ("otilde", 0xF5),
    ("ouml", 0xF6),
    ("para", 0xB6),
    ("permil", 0x2030),
    ("plusmn", 0xB1),
    ("pound", 0xA3),
    ("quot", 0x22),
    ("raquo", 0xBB),
    ("rdquo", 0x201D),
    ("reg", 0xAE),
    ("rsaquo", 0x203A),
    ("rsquo", 0x2019),
    ("sbquo", 0x201A),
    ("scaron", 0x161),
    ("sect", 0xA7),
    ("shy", 0xAD),
    ("sup1", 0xB9),
    ("sup2", 0xB2),
    ("sup3", 0xB3),
    ("szlig", 0xDF),
    ("thinsp", 0x2009),
    ("thorn", 0xFE),
    ("tilde", 0x2DC),
    ("times", 0xD7),
    ("trade", 0x2122),
    ("uacute", 0xFA),
    ("ucirc", 0xFB),
    ("ugrave", 0xF9),
    ("uml", 0xA8),
    ("uuml", 0xFC),
    ("yacute", 0xFD),
    ("yen", 0xA5),
    ("yuml", 0xFF),
];

/// Look up a predefined entity's code point.
pub fn lookup(name: &str) -> Option<char> {
    ENTITIES
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .ok()
        .and_then(|i| char::from_u32(ENTITIES[i].1))
}

/// Entity table for one document: the predefined set plus any internal
/// subset declarations.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    declared: HashMap<String, String>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the `<!ENTITY name "value">` declarations of a DOCTYPE
    /// internal subset. Parameter entities and external entities are
    /// skipped. The first declaration of a name wins, as in XML.
    pub fn register_internal_subset(&mut self, doctype: &str) {
        let mut rest = doctype;
        while let Some(start) = rest.find("<!ENTITY") {
            rest = rest[start + "<!ENTITY".len()..].trim_start();
            let parameter = rest.starts_with('%');
            if parameter {
                rest = rest[1..].trim_start();
            }
            let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let name = &rest[..name_end];
            rest = rest[name_end..].trim_start();

            // SYSTEM / PUBLIC entities have no literal value
            let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
                continue;
            };
            let Some(close) = rest[1..].find(quote) else {
                break;
            };
            let value = &rest[1..1 + close];
            rest = &rest[close + 2..];

            if !parameter && !name.is_empty() {
                let value = self.expand(value);
                self.declared.entry(name.to_string()).or_insert(value);
            }
        }
    }

    /// Resolve an entity reference name (without `&` and `;`).
    ///
    /// Handles numeric references (`#233`, `#xE9`), internal subset
    /// declarations, and the predefined table, in that order.
    pub fn resolve(&self, name: &str) -> Option<String> {
        if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
            return u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from);
        }
        if let Some(dec) = name.strip_prefix('#') {
            return dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from);
        }
        if let Some(value) = self.declared.get(name) {
            return Some(value.clone());
        }
        lookup(name).map(String::from)
    }

    /// Expand every resolvable `&name;` reference in `text`; unresolvable
    /// references are kept verbatim.
    pub fn expand(&self, text: &str) -> String {
        if memchr::memchr(b'&', text.as_bytes()).is_none() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let tail = &rest[amp + 1..];
            match tail.find(';') {
                Some(semi) if semi > 0 => match self.resolve(&tail[..semi]) {
                    Some(value) => {
                        out.push_str(&value);
                        rest = &tail[semi + 1..];
                    }
                    None => {
                        out.push('&');
                        rest = tail;
                    }
                },
                _ => {
                    out.push('&');
                    rest = tail;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        for pair in ENTITIES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_lookup_latin1() {
        assert_eq!(lookup("eacute"), Some('é'));
        assert_eq!(lookup("Eacute"), Some('É'));
        assert_eq!(lookup("copy"), Some('©'));
        assert_eq!(lookup("nbsp"), Some('\u{a0}'));
        assert_eq!(lookup("bogus"), None);
    }

    #[test]
    fn test_resolve_numeric() {
        let table = EntityTable::new();
        assert_eq!(table.resolve("#65"), Some("A".to_string()));
        assert_eq!(table.resolve("#x41"), Some("A".to_string()));
        assert_eq!(table.resolve("#x2019"), Some("\u{2019}".to_string()));
        assert_eq!(table.resolve("#xZZ"), None);
    }

    #[test]
    fn test_internal_subset() {
        let mut table = EntityTable::new();
        table.register_internal_subset(
            r#"article PUBLIC "-//OASIS//DTD DocBook V3.1//EN" [
  <!ENTITY app "<application>Gnumeric</application>">
  <!ENTITY version '1.0'>
  <!ENTITY version "2.0">
  <!ENTITY % local.common.attrib "">
  <!ENTITY acme "ACME&trade;">
]"#,
        );
        assert_eq!(table.resolve("version"), Some("1.0".to_string()));
        assert_eq!(table.resolve("acme"), Some("ACME\u{2122}".to_string()));
        assert!(table.resolve("app").is_some());
        assert_eq!(table.resolve("local.common.attrib"), None);
    }

    #[test]
    fn test_expand() {
        let table = EntityTable::new();
        assert_eq!(table.expand("a &amp; b"), "a & b");
        assert_eq!(table.expand("caf&eacute;"), "café");
        assert_eq!(table.expand("&unknown; &"), "&unknown; &");
        assert_eq!(table.expand("plain"), "plain");
    }
}
