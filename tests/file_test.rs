//! Converting documents read from disk.

use std::fs;
use std::io::Write;

use tempfile::{NamedTempFile, TempDir};

use db2html::{ConvertOptions, Error, convert_file};

const DOC: &str = concat!(
    "<?xml version=\"1.0\"?>\n",
    "<article><artheader><title>Disk</title></artheader>",
    "<sect1 id=\"pics\"><title>Pictures</title>",
    "<figure id=\"shot\"><title>Screen</title><graphic fileref=\"screen\" format=\"gif\"/></figure>",
    "</sect1></article>"
);

#[test]
fn test_convert_file_resolves_images_against_its_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manual.xml");
    fs::write(&path, DOC).unwrap();

    let target = format!("file://{}?pics", path.display());
    let options = ConvertOptions::from_target(&target);
    let conversion = convert_file(&options).unwrap();

    let expected = format!("SRC=\"file://{}/screen.gif\"", dir.path().display());
    assert!(conversion.html.contains(&expected));
    assert!(conversion.html.contains("<TITLE>Pictures</TITLE>"));
    assert_eq!(conversion.index.figure_number("shot"), Some(1));
}

#[test]
fn test_convert_latin1_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<article><sect1><title>Caf\xE9</title></sect1></article>")
        .unwrap();

    let options = ConvertOptions::from_target(&file.path().display().to_string());
    let html = convert_file(&options).unwrap().html;
    assert!(html.contains("<B>Caf\u{e9}</B>"));
}

#[test]
fn test_malformed_file_is_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"<article><sect1><!-- unterminated").unwrap();

    let options = ConvertOptions::from_target(&file.path().display().to_string());
    assert!(matches!(convert_file(&options), Err(Error::Xml { .. })));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let options = ConvertOptions::from_target(&dir.path().join("absent.xml").display().to_string());
    assert!(matches!(convert_file(&options), Err(Error::Io(_))));
}
