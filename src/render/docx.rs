use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run, Style, StyleType};

use crate::error::{PipelineError, Result};

use super::DocumentSink;

/// Font sizes (half-points) of Heading1..Heading4
const HEADING_SIZES: [usize; 4] = [32, 28, 26, 24];

/// Word document: headings map 1:1 onto the Heading1..Heading4 styles
#[derive(Debug, Default)]
pub struct DocxSink {
    paragraphs: Vec<Paragraph>,
}

impl DocxSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.paragraphs.len()
    }
}

fn heading_style_id(level: usize) -> String {
    format!("Heading{}", level.clamp(1, HEADING_SIZES.len()))
}

fn heading_styles() -> Vec<Style> {
    HEADING_SIZES
        .iter()
        .enumerate()
        .map(|(index, size)| {
            let level = index + 1;
            Style::new(&heading_style_id(level), StyleType::Paragraph)
                .name(&format!("Heading {}", level))
                .size(*size)
                .bold()
        })
        .collect()
}

impl DocumentSink for DocxSink {
    fn heading(&mut self, level: usize, text: &str) {
        self.paragraphs.push(
            Paragraph::new()
                .add_run(Run::new().add_text(text))
                .style(&heading_style_id(level)),
        );
    }

    fn field(&mut self, label: &str, value: &str) {
        self.paragraphs.push(
            Paragraph::new()
                .add_run(Run::new().add_text(format!("{}: ", label)).bold())
                .add_run(Run::new().add_text(value)),
        );
    }

    fn paragraph(&mut self, text: &str) {
        self.paragraphs
            .push(Paragraph::new().add_run(Run::new().add_text(text)));
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut docx = Docx::new();
        for style in heading_styles() {
            docx = docx.add_style(style);
        }
        for paragraph in self.paragraphs {
            docx = docx.add_paragraph(paragraph);
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| PipelineError::Docx(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::{decision, header, RecordingSink};
    use crate::render::{render_document, walk};

    #[test]
    fn test_heading_style_ids() {
        assert_eq!(heading_style_id(1), "Heading1");
        assert_eq!(heading_style_id(4), "Heading4");
        assert_eq!(heading_style_id(7), "Heading4");
        assert_eq!(heading_style_id(0), "Heading1");
    }

    #[test]
    fn test_one_paragraph_per_callback() {
        let decisions = vec![
            decision("T190123EP1", Some("[EN] Holding"), Some("[EN] Key")),
            decision("T190124DP1", Some("[DE] Leitsatz"), None),
        ];

        let mut recorder = RecordingSink::default();
        walk(&decisions, &header(2), &mut recorder);
        let mut sink = DocxSink::new();
        walk(&decisions, &header(2), &mut sink);

        assert_eq!(sink.len(), recorder.events.len());
    }

    /// Main part of a packed document
    fn document_xml(bytes: &[u8]) -> String {
        use std::io::{Cursor, Read};

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    /// Paragraph style of the paragraph holding `text`
    fn style_of(xml: &str, text: &str) -> Option<String> {
        let before = &xml[..xml.find(text)?];
        let paragraph = &before[before.rfind("<w:p ").or_else(|| before.rfind("<w:p>"))?..];
        let marker = "w:pStyle w:val=\"";
        let start = paragraph.find(marker)? + marker.len();
        let end = paragraph[start..].find('"')? + start;
        Some(paragraph[start..end].to_string())
    }

    #[test]
    fn test_headings_use_level_styles() {
        let decisions = vec![
            decision("T190123EP1", Some("[EN] Holding"), None),
            decision("T190124EP1", None, None),
        ];
        let bytes = render_document(&decisions, &header(2), DocxSink::new()).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));

        let xml = document_xml(&bytes);
        assert_eq!(style_of(&xml, "Headnotes").as_deref(), Some("Heading1"));
        assert_eq!(style_of(&xml, "English Decisions").as_deref(), Some("Heading2"));
        assert_eq!(style_of(&xml, "T-Decisions").as_deref(), Some("Heading3"));
        assert_eq!(style_of(&xml, "T 123/19 (T190123EP1)").as_deref(), Some("Heading4"));
        assert!(!style_of(&xml, "[EN] Holding").is_some_and(|s| s.starts_with("Heading")));
        assert!(!xml.contains("T190124EP1"));
    }
}
