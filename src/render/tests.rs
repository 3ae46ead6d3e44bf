use std::collections::HashMap;
use std::io::{Cursor, Read};

use chrono::Utc;
use uuid::Uuid;
use zip::ZipArchive;

use super::{docx, render_row, RenderError};
use crate::template::model::Template;

fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn text_template(content: &str) -> Template {
    Template {
        id: Uuid::new_v4(),
        name: "test".to_string(),
        content: content.to_string(),
        docx_file: None,
        original_file_name: None,
        created_at: Utc::now(),
    }
}

fn read_part(package: &[u8], part: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(package)).expect("valid package");
    let mut entry = archive.by_name(part).expect("part present");
    let mut content = String::new();
    entry.read_to_string(&mut content).expect("readable part");
    content
}

#[test]
fn test_txt_render_is_substituted_text() {
    let template = text_template("Hello ${name}");
    let bytes = render_row(&template, &row(&[("name", "Alice")]), "txt").unwrap();
    assert_eq!(bytes, b"Hello Alice");
}

#[test]
fn test_unknown_format_falls_back_to_text() {
    let template = text_template("Hi ${who}");
    let bytes = render_row(&template, &row(&[("who", "there")]), "html").unwrap();
    assert_eq!(bytes, b"Hi there");
}

#[test]
fn test_format_matching_is_case_insensitive() {
    let template = text_template("x");
    let bytes = render_row(&template, &HashMap::new(), "DOCX").unwrap();
    // A DOCX package is a ZIP file; check the magic bytes.
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_docx_from_text_contains_paragraphs() {
    let package = docx::from_text("line one\nline two").unwrap();
    let document = read_part(&package, "word/document.xml");
    assert!(document.contains("line one"));
    assert!(document.contains("line two"));
    // The package must also carry the content types and relationships parts.
    read_part(&package, "[Content_Types].xml");
    read_part(&package, "_rels/.rels");
}

#[test]
fn test_docx_from_text_escapes_markup() {
    let package = docx::from_text("a < b & c").unwrap();
    let document = read_part(&package, "word/document.xml");
    assert!(document.contains("a &lt; b &amp; c"));
}

#[test]
fn test_binary_template_substitution() {
    // Use a generated package as the uploaded template payload.
    let payload = docx::from_text("Dear ${name}, your id is ${id}").unwrap();
    let rendered =
        docx::render_binary_template(&payload, &row(&[("name", "Bob"), ("id", "42")])).unwrap();
    let document = read_part(&rendered, "word/document.xml");
    assert!(document.contains("Dear Bob, your id is 42"));
    assert!(!document.contains("${name}"));
}

#[test]
fn test_binary_template_escapes_values() {
    let payload = docx::from_text("v=${v}").unwrap();
    let rendered = docx::render_binary_template(&payload, &row(&[("v", "<&>")])).unwrap();
    let document = read_part(&rendered, "word/document.xml");
    assert!(document.contains("v=&lt;&amp;&gt;"));
}

#[test]
fn test_binary_template_rejects_garbage_payload() {
    let result = docx::render_binary_template(b"not a zip at all", &HashMap::new());
    assert!(matches!(result, Err(RenderError::DocxRead(_))));
}

#[test]
fn test_docx_render_prefers_binary_payload() {
    let mut template = text_template("text body ${name}");
    template.docx_file = Some(docx::from_text("binary body ${name}").unwrap());
    let rendered = render_row(&template, &row(&[("name", "X")]), "docx").unwrap();
    let document = read_part(&rendered, "word/document.xml");
    assert!(document.contains("binary body X"));
    assert!(!document.contains("text body"));
}
