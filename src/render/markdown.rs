use crate::error::Result;

use super::DocumentSink;

/// Markdown: ATX headings, bold field labels, one block per line
#[derive(Debug, Default)]
pub struct MarkdownSink {
    output: String,
    /// Whether the previous block was a field line
    in_fields: bool,
}

impl MarkdownSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn start_block(&mut self) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.in_fields = false;
    }
}

impl DocumentSink for MarkdownSink {
    fn heading(&mut self, level: usize, text: &str) {
        self.start_block();
        let level = level.clamp(1, 6);
        self.output.push_str(&format!("{} {}\n", "#".repeat(level), text));
    }

    fn field(&mut self, label: &str, value: &str) {
        // Consecutive fields become separate lines of one paragraph
        if self.in_fields {
            self.output.truncate(self.output.trim_end_matches('\n').len());
            self.output.push_str("  \n");
        } else {
            self.start_block();
        }
        self.output.push_str(&format!("**{}:** {}\n", label, value));
        self.in_fields = true;
    }

    fn paragraph(&mut self, text: &str) {
        self.start_block();
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(self.output.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_document;
    use crate::render::tests::{decision, header};

    #[test]
    fn test_markdown_document() {
        let decisions = vec![decision("T190123EP1", Some("[EN] Holding"), Some("[EN] Key"))];
        let bytes = render_document(&decisions, &header(1), MarkdownSink::new()).unwrap();
        let markdown = String::from_utf8(bytes).unwrap();

        assert_eq!(
            markdown,
            "# Headnotes\n\
             \n\
             **Date:** 2025-03-14  \n\
             **Total Extracted Decisions:** 1\n\
             \n\
             ## Source\n\
             \n\
             Test corpus\n\
             \n\
             ## English Decisions\n\
             \n\
             ### T-Decisions\n\
             \n\
             #### T 123/19 (T190123EP1)\n\
             \n\
             **Headnote:** [EN] Holding  \n\
             **Catchword:** [EN] Key\n"
        );
    }

    #[test]
    fn test_heading_levels_are_clamped() {
        let mut sink = MarkdownSink::new();
        sink.heading(9, "Deep");
        assert_eq!(String::from_utf8(sink.finish().unwrap()).unwrap(), "###### Deep\n");
    }
}
