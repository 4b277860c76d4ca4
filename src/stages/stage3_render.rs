use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::error::Result;
use crate::io::{commit_outputs, RenderedFile};
use crate::models::{DecisionStats, DecisionType, Language, NormalizedDecision};
use crate::render::{build_workbook, render_document, DocxSink, MarkdownSink, RunHeader, TextSink};

pub const DEFAULT_TITLE: &str = "Headnotes and Catchwords of EPO Board of Appeal Decisions";
pub const DEFAULT_SOURCE: &str = "14.6 EPO Boards of Appeal decisions - BoA decisions March 2025 - \
     https://publication-bdds.apps.epo.org/raw-data/products/public/product/21";

/// Configuration for Stage 3 rendering
#[derive(Debug, Clone)]
pub struct Stage3Config {
    /// Directory receiving every output file
    pub output_dir: PathBuf,
    pub title: String,
    /// Provenance citation printed in the run header
    pub source: String,
    /// Generation date printed in the run header
    pub date: NaiveDate,
    pub text_file: String,
    pub markdown_file: String,
    pub docx_file: String,
    pub stats_file: String,
}

impl Default for Stage3Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            title: DEFAULT_TITLE.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            date: chrono::Local::now().date_naive(),
            text_file: "epo_decisions.txt".to_string(),
            markdown_file: "epo_decisions.md".to_string(),
            docx_file: "epo_decisions.docx".to_string(),
            stats_file: "decision_analysis.xlsx".to_string(),
        }
    }
}

/// Result of Stage 3 rendering
#[derive(Debug)]
pub struct Stage3Result {
    /// Paths of the files written, documents first
    pub written: Vec<PathBuf>,
    /// Decisions that appear in the documents
    pub rendered_decisions: usize,
    /// Counts over every normalized decision, rendered or not
    pub stats: DecisionStats,
}

/// Render every output in memory; nothing touches the filesystem
pub fn render_outputs(decisions: &[NormalizedDecision], config: &Stage3Config) -> Result<Vec<RenderedFile>> {
    let header = RunHeader {
        title: config.title.clone(),
        date: config.date,
        total: decisions.len(),
        source: config.source.clone(),
    };
    let dir = &config.output_dir;

    let text = render_document(decisions, &header, TextSink::new())?;
    let markdown = render_document(decisions, &header, MarkdownSink::new())?;
    let docx = render_document(decisions, &header, DocxSink::new())?;
    let workbook = build_workbook(&DecisionStats::from_decisions(decisions))?;

    Ok(vec![
        RenderedFile::new(dir.join(&config.text_file), text),
        RenderedFile::new(dir.join(&config.markdown_file), markdown),
        RenderedFile::new(dir.join(&config.docx_file), docx),
        RenderedFile::new(dir.join(&config.stats_file), workbook),
    ])
}

/// Execute Stage 3: Rendering
///
/// Produces three documents with the same structure (plain text, Markdown,
/// DOCX) plus the statistics workbook. All four are rendered before the
/// first one is written.
pub fn execute_stage3(decisions: &[NormalizedDecision], config: &Stage3Config) -> Result<Stage3Result> {
    info!("Stage 3: Rendering {} decisions", decisions.len());
    let files = render_outputs(decisions, config)?;

    commit_outputs(&files)?;
    let written: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();
    for path in &written {
        info!("Output written to {:?}", path);
    }

    Ok(Stage3Result::new(decisions, written))
}

impl Stage3Result {
    pub fn new(decisions: &[NormalizedDecision], written: Vec<PathBuf>) -> Self {
        Self {
            written,
            rendered_decisions: decisions.iter().filter(|d| is_rendered(d)).count(),
            stats: DecisionStats::from_decisions(decisions),
        }
    }
}

/// Whether a decision shows up in the documents
fn is_rendered(decision: &NormalizedDecision) -> bool {
    decision.record.has_content()
        && decision.language != Language::Unknown
        && decision.decision_type != DecisionType::Unknown
}
