//! Document rendering.
//!
//! Every output format walks the same tree: run header, then language
//! sections, decision-type subsections and one block per decision. Formats
//! only differ in how they emit headings, labelled fields and paragraphs.

pub mod docx;
pub mod markdown;
pub mod text;
pub mod workbook;

pub use docx::DocxSink;
pub use markdown::MarkdownSink;
pub use text::TextSink;
pub use workbook::{build_workbook, cross_tab_rows, CrossTabRow};

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{DecisionType, Language, NormalizedDecision};

/// Run-level information printed above the decision sections
#[derive(Debug, Clone)]
pub struct RunHeader {
    pub title: String,
    /// Date the documents were generated, not a source field
    pub date: NaiveDate,
    /// Decisions left after filtering and deduplication
    pub total: usize,
    /// Provenance citation of the source corpus
    pub source: String,
}

/// Emission callbacks of one output format
pub trait DocumentSink {
    /// Open the document with the run header
    fn start(&mut self, header: &RunHeader) {
        self.heading(1, &header.title);
        self.field("Date", &header.date.format("%Y-%m-%d").to_string());
        self.field("Total Extracted Decisions", &header.total.to_string());
        self.heading(2, "Source");
        self.paragraph(&header.source);
    }

    /// Heading at `level`, 1 being the document title
    fn heading(&mut self, level: usize, text: &str);

    /// A short `label: value` line
    fn field(&mut self, label: &str, value: &str);

    fn paragraph(&mut self, text: &str);

    /// Finish the document and return its encoded bytes
    fn finish(self) -> Result<Vec<u8>>;
}

/// Walk the sorted decisions and emit the document into `sink`.
///
/// Decisions keep their incoming order inside each group. Decisions with
/// neither headnote nor catchword are skipped, and so are languages and
/// decision types left without anything to show.
pub fn walk<S: DocumentSink>(decisions: &[NormalizedDecision], header: &RunHeader, sink: &mut S) {
    sink.start(header);

    for language in Language::DISPLAY_ORDER {
        let sections: Vec<(DecisionType, Vec<&NormalizedDecision>)> = DecisionType::DISPLAY_ORDER
            .into_iter()
            .map(|decision_type| (decision_type, group(decisions, language, decision_type)))
            .filter(|(_, group)| !group.is_empty())
            .collect();

        if sections.is_empty() {
            continue;
        }

        sink.heading(2, &format!("{} Decisions", language));
        for (decision_type, group) in sections {
            sink.heading(3, &format!("{}-Decisions", decision_type));
            for decision in group {
                emit_decision(decision, sink);
            }
        }
    }
}

fn group(decisions: &[NormalizedDecision], language: Language, decision_type: DecisionType) -> Vec<&NormalizedDecision> {
    decisions
        .iter()
        .filter(|d| d.language == language && d.decision_type == decision_type)
        .filter(|d| d.record.has_content())
        .collect()
}

fn emit_decision<S: DocumentSink>(decision: &NormalizedDecision, sink: &mut S) {
    sink.heading(4, &format!("{} ({})", decision.case_number, decision.record.reference));
    if let Some(headnote) = &decision.record.headnote {
        sink.field("Headnote", headnote);
    }
    if let Some(catchword) = &decision.record.catchword {
        sink.field("Catchword", catchword);
    }
}

/// Render one document with a fresh sink
pub fn render_document<S: DocumentSink>(decisions: &[NormalizedDecision], header: &RunHeader, mut sink: S) -> Result<Vec<u8>> {
    walk(decisions, header, &mut sink);
    sink.finish()
}
