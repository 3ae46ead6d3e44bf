//! PDF rendering via genpdf.

use std::env;

use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{from_files, FontData, FontFamily};

use super::RenderError;

const DEFAULT_FONTS_DIR: &str = "./fonts";
const FONT_SIZE_PT: u8 = 11;
const MARGIN_MM: i32 = 10;

/// Load the font family used for generated PDFs.
///
/// genpdf needs TTF files on disk; the directory comes from `FONTS_DIR`.
/// LiberationSans is tried first, DejaVuSans as a fallback.
fn load_font_family() -> Result<FontFamily<FontData>, RenderError> {
    let dir = env::var("FONTS_DIR").unwrap_or_else(|_| DEFAULT_FONTS_DIR.to_string());
    let mut last_error = String::new();
    for name in ["LiberationSans", "DejaVuSans"] {
        match from_files(&dir, name, None) {
            Ok(family) => return Ok(family),
            Err(err) => last_error = err.to_string(),
        }
    }
    Err(RenderError::FontLoad {
        dir,
        message: last_error,
    })
}

/// Render already-substituted text into a single PDF document, one paragraph
/// per line, preserving blank lines as vertical breaks.
pub fn from_text(text: &str) -> Result<Vec<u8>, RenderError> {
    let font_family = load_font_family()?;
    let mut doc = genpdf::Document::new(font_family);
    doc.set_title("Generated document");
    doc.set_font_size(FONT_SIZE_PT);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(MARGIN_MM);
    doc.set_page_decorator(decorator);

    for line in text.lines() {
        if line.is_empty() {
            doc.push(Break::new(1));
        } else {
            doc.push(Paragraph::new(line));
        }
    }

    let mut out = Vec::new();
    doc.render(&mut out).map_err(RenderError::Pdf)?;
    Ok(out)
}
