//! Document rendering: classified blocks in, `.docx` files out.
//!
//! Every document starts from the same skeleton - a `Title` style plus
//! `Heading1`–`Heading5` - so Word shows real heading levels rather than
//! styled body text. Blocks are appended strictly in extraction order.
//!
//! Two assembly modes mirror the two output modes:
//! - [`build_page_document`] - a standalone document for one page,
//! - [`CombinedDocument`] - one shared document, each page a page-broken
//!   `Source N:` section, failed pages included as failure sections.
//!
//! Saving is atomic: the container is packed in memory, written to a
//! `.docx.tmp` sibling, then renamed into place so a crash never leaves a
//! half-written docx behind.

use crate::error::Web2DocxError;
use crate::pipeline::image::EmbeddedImage;
use docx_rs::{BreakType, Docx, Paragraph, Pic, Run, Style, StyleType};
use std::io::Cursor;
use std::path::Path;
use tracing::info;

const EMU_PER_INCH: u32 = 914_400;
/// Images are displayed at a fixed 3-inch width; height follows the aspect.
const IMAGE_DISPLAY_WIDTH_EMU: u32 = 3 * EMU_PER_INCH;

/// A block as it lands in the document: the classified text blocks, an
/// embedded picture, or the placeholder left by a failed image.
#[derive(Debug, Clone)]
pub enum RenderedBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem(String),
    Image(EmbeddedImage),
    ImagePlaceholder(String),
}

/// Document skeleton shared by both output modes.
fn base_docx() -> Docx {
    let mut docx = Docx::new().add_style(
        Style::new("Title", StyleType::Paragraph)
            .name("Title")
            .size(56)
            .bold(),
    );
    for level in 1..=5usize {
        docx = docx.add_style(
            Style::new(format!("Heading{level}"), StyleType::Paragraph)
                .name(format!("Heading {level}"))
                .size(34 - 2 * level)
                .bold(),
        );
    }
    docx
}

fn text_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn styled_paragraph(text: &str, style: &str) -> Paragraph {
    text_paragraph(text).style(style)
}

fn page_break() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
}

fn image_paragraph(img: &EmbeddedImage) -> Paragraph {
    let height_emu =
        (IMAGE_DISPLAY_WIDTH_EMU as u64 * img.height as u64 / img.width.max(1) as u64) as u32;
    let pic = Pic::new(img.png.as_slice()).size(IMAGE_DISPLAY_WIDTH_EMU, height_emu);
    Paragraph::new().add_run(Run::new().add_image(pic))
}

/// Append blocks to a document in order.
fn append_blocks(mut docx: Docx, blocks: &[RenderedBlock]) -> Docx {
    for block in blocks {
        docx = match block {
            RenderedBlock::Heading { level, text } => {
                let style = format!("Heading{}", (*level).clamp(1, 5));
                docx.add_paragraph(styled_paragraph(text, &style))
            }
            RenderedBlock::Paragraph(text) | RenderedBlock::ListItem(text) => {
                docx.add_paragraph(text_paragraph(text))
            }
            RenderedBlock::Image(img) => docx.add_paragraph(image_paragraph(img)),
            RenderedBlock::ImagePlaceholder(reason) => docx.add_paragraph(text_paragraph(
                &format!("Image could not be added: {reason}"),
            )),
        };
    }
    docx
}

/// Build a standalone document for one page: title, source line, blocks.
pub fn build_page_document(title: &str, url: &str, blocks: &[RenderedBlock]) -> Docx {
    let docx = base_docx()
        .add_paragraph(styled_paragraph(title, "Title"))
        .add_paragraph(text_paragraph(&format!("Source URL: {url}")));
    append_blocks(docx, blocks)
}

/// Accumulator for the combined output mode: one document, one page-broken
/// section per URL, failures included as textual sections.
pub struct CombinedDocument {
    docx: Docx,
    sections: usize,
}

impl CombinedDocument {
    pub fn new() -> Self {
        Self {
            docx: base_docx()
                .add_paragraph(styled_paragraph("Web Content Compilation", "Title")),
            sections: 0,
        }
    }

    /// Number of sections added so far (successes plus failures).
    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Append a successfully extracted page as a new section.
    pub fn add_page(&mut self, url: &str, blocks: &[RenderedBlock]) {
        let docx = self.start_section(url);
        self.docx = append_blocks(docx, blocks);
    }

    /// Append a failure section for a page that could not be retrieved.
    pub fn add_failure(&mut self, url: &str, error: &str) {
        let docx = self.start_section(url);
        self.docx = docx.add_paragraph(text_paragraph(&format!(
            "Failed to retrieve content: {error}"
        )));
    }

    fn start_section(&mut self, url: &str) -> Docx {
        self.sections += 1;
        let docx = std::mem::take(&mut self.docx);
        docx.add_paragraph(page_break()).add_paragraph(styled_paragraph(
            &format!("Source {}: {url}", self.sections),
            "Heading1",
        ))
    }

    pub fn finish(self) -> Docx {
        self.docx
    }
}

impl Default for CombinedDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack a document and save it atomically (`.docx.tmp` + rename).
pub async fn save_docx(docx: Docx, path: &Path) -> Result<(), Web2DocxError> {
    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| Web2DocxError::DocxBuild {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    let tmp = path.with_extension("docx.tmp");
    tokio::fs::write(&tmp, buf.into_inner())
        .await
        .map_err(|e| Web2DocxError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| Web2DocxError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Saved {}", path.display());
    Ok(())
}

/// Characters Windows and most filesystems refuse in file names.
const ILLEGAL_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Derive a safe filename stem from arbitrary title text.
///
/// Illegal and control characters become `_`, the result is truncated to
/// `max_len` characters, and trailing dots/spaces are stripped (Windows
/// rejects them). Never returns an empty string.
pub fn sanitize_filename(name: &str, max_len: usize) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if ILLEGAL_FILENAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .take(max_len)
        .collect();

    let cleaned = cleaned.trim().trim_end_matches('.').trim().to_string();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_to_bytes(docx: Docx) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    fn tiny_image() -> EmbeddedImage {
        use image::{DynamicImage, Rgba, RgbaImage};
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 255])));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        EmbeddedImage {
            png,
            width: 4,
            height: 2,
        }
    }

    #[test]
    fn page_document_packs_to_zip() {
        let blocks = vec![
            RenderedBlock::Heading {
                level: 1,
                text: "Title".into(),
            },
            RenderedBlock::Paragraph("Hello".into()),
            RenderedBlock::Image(tiny_image()),
            RenderedBlock::ImagePlaceholder("HTTP 404".into()),
        ];
        let bytes = pack_to_bytes(build_page_document(
            "Title",
            "https://example.com/a",
            &blocks,
        ));
        // docx is a zip container
        assert_eq!(&bytes[..2], b"PK");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn combined_document_counts_sections() {
        let mut combined = CombinedDocument::new();
        combined.add_page("https://example.com/a", &[RenderedBlock::Paragraph("x".into())]);
        combined.add_failure("https://example.com/b", "HTTP 500");
        assert_eq!(combined.sections(), 2);
        let bytes = pack_to_bytes(combined.finish());
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn save_is_atomic_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        save_docx(build_page_document("T", "https://example.com", &[]), &path)
            .await
            .unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("out.docx.tmp").exists());
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn sanitize_replaces_illegal_chars() {
        let out = sanitize_filename(r#"A/B\C*D?E:F"G<H>I|J"#, 100);
        for c in ILLEGAL_FILENAME_CHARS {
            assert!(!out.contains(*c), "found {c:?} in {out:?}");
        }
        assert_eq!(out, "A_B_C_D_E_F_G_H_I_J");
    }

    #[test]
    fn sanitize_truncates_by_chars() {
        let out = sanitize_filename(&"ä".repeat(200), 50);
        assert_eq!(out.chars().count(), 50);
    }

    #[test]
    fn sanitize_never_empty() {
        assert_eq!(sanitize_filename("", 50), "untitled");
        assert_eq!(sanitize_filename("   ", 50), "untitled");
        assert_eq!(sanitize_filename("???", 50), "___");
    }

    #[test]
    fn sanitize_strips_trailing_dots() {
        assert_eq!(sanitize_filename("Report v1.2...", 100), "Report v1.2");
    }
}
