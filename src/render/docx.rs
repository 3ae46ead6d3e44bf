//! DOCX rendering.
//!
//! A DOCX file is a ZIP package of WordprocessingML parts. `from_text` writes
//! a minimal package from scratch; `render_binary_template` rewrites an
//! uploaded template package, substituting placeholders inside its XML parts.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::RenderError;
use crate::engine;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Escape text for inclusion in a WordprocessingML text node.
fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build a minimal DOCX package with one paragraph per line of `text`.
pub fn from_text(text: &str) -> Result<Vec<u8>, RenderError> {
    let mut body = String::new();
    for line in text.lines() {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&escape_xml(line));
        body.push_str("</w:t></w:r></w:p>");
    }
    if text.is_empty() {
        body.push_str("<w:p/>");
    }
    let document_xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}<w:sectPr/></w:body></w:document>",
        body
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", RELS_XML),
        ("word/document.xml", document_xml.as_str()),
    ] {
        writer.start_file(name, options).map_err(RenderError::DocxZip)?;
        writer
            .write_all(content.as_bytes())
            .map_err(RenderError::DocxIo)?;
    }
    let cursor = writer.finish().map_err(RenderError::DocxZip)?;
    Ok(cursor.into_inner())
}

/// Substitute `${key}` placeholders inside an uploaded DOCX template.
///
/// Every part of the package is copied through untouched except the document
/// body, headers and footers, whose XML text gets the substitution pass.
/// Placeholders must not be split across formatting runs in the template.
pub fn render_binary_template(
    payload: &[u8],
    data: &HashMap<String, String>,
) -> Result<Vec<u8>, RenderError> {
    // Values are XML-escaped before they reach the document parts.
    let escaped: HashMap<String, String> = data
        .iter()
        .map(|(k, v)| (k.clone(), escape_xml(v)))
        .collect();

    let mut archive =
        ZipArchive::new(Cursor::new(payload)).map_err(RenderError::DocxRead)?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut saw_document = false;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(RenderError::DocxRead)?;
        let name = entry.name().to_string();
        if entry.is_dir() {
            writer
                .add_directory(name, options)
                .map_err(RenderError::DocxZip)?;
            continue;
        }

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes).map_err(RenderError::DocxIo)?;

        writer
            .start_file(name.as_str(), options)
            .map_err(RenderError::DocxZip)?;
        if is_substitutable_part(&name) {
            saw_document |= name == "word/document.xml";
            let xml = String::from_utf8_lossy(&bytes);
            let replaced = engine::substitute(&xml, &escaped);
            writer
                .write_all(replaced.as_bytes())
                .map_err(RenderError::DocxIo)?;
        } else {
            writer.write_all(&bytes).map_err(RenderError::DocxIo)?;
        }
    }

    if !saw_document {
        return Err(RenderError::DocxMissingDocumentXml);
    }
    let cursor = writer.finish().map_err(RenderError::DocxZip)?;
    Ok(cursor.into_inner())
}

fn is_substitutable_part(name: &str) -> bool {
    name == "word/document.xml"
        || (name.starts_with("word/header") && name.ends_with(".xml"))
        || (name.starts_with("word/footer") && name.ends_with(".xml"))
}
