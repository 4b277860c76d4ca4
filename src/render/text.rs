use crate::error::Result;

use super::DocumentSink;

/// Plain text: no markup, sections separated by blank lines
#[derive(Debug, Default)]
pub struct TextSink {
    output: String,
}

impl TextSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentSink for TextSink {
    fn heading(&mut self, _level: usize, text: &str) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn field(&mut self, label: &str, value: &str) {
        self.output.push_str(&format!("{}: {}\n", label, value));
    }

    fn paragraph(&mut self, text: &str) {
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
    fn test_text_document() {
        let decisions = vec![decision("T190123EP1", Some("[EN] Holding"), None)];
        let bytes = render_document(&decisions, &header(1), TextSink::new()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "Headnotes\n\
             Date: 2025-03-14\n\
             Total Extracted Decisions: 1\n\
             \n\
             Source\n\
             Test corpus\n\
             \n\
             English Decisions\n\
             \n\
             T-Decisions\n\
             \n\
             T 123/19 (T190123EP1)\n\
             Headnote: [EN] Holding\n"
        );
        assert!(!text.contains('#'));
        assert!(!text.contains("**"));
    }
}
