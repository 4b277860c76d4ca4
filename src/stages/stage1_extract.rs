use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::io::{
    commit_outputs, encode_decision_table, encode_decision_workbook, parse_decisions_file, RenderedFile,
    TableEncoding,
};
use crate::models::DecisionRecord;

/// Configuration for Stage 1 extraction
#[derive(Debug, Clone)]
pub struct Stage1Config {
    /// Encoding of the decision table written by this stage
    pub encoding: TableEncoding,
    /// Also write the table as an `.xlsx` workbook next to the CSV
    pub workbook: bool,
}

impl Default for Stage1Config {
    fn default() -> Self {
        Self {
            encoding: TableEncoding::default(),
            workbook: true,
        }
    }
}

/// Coverage counts reported after extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Decision elements found in the document
    pub total: usize,
    /// Decisions without any headnote block
    pub without_headnote: usize,
    /// Decisions with a headnote, a catchword, or both
    pub with_headnote_or_catchword: usize,
}

impl ExtractionSummary {
    pub fn from_records(records: &[DecisionRecord]) -> Self {
        Self {
            total: records.len(),
            without_headnote: records.iter().filter(|r| !r.has_headnote()).count(),
            with_headnote_or_catchword: records.iter().filter(|r| r.has_content()).count(),
        }
    }
}

/// Result of Stage 1 extraction
#[derive(Debug)]
pub struct Stage1Result {
    pub records: Vec<DecisionRecord>,
    pub summary: ExtractionSummary,
}

/// Execute Stage 1: Extraction
///
/// Parses the whole decisions document before anything is written, so a
/// malformed document leaves any existing decision table untouched.
pub fn execute_stage1(input: &Path, output: &Path, config: &Stage1Config) -> Result<Stage1Result> {
    info!("Stage 1: Extracting decisions from {:?}", input);
    let records = parse_decisions_file(input)?;
    let summary = ExtractionSummary::from_records(&records);

    info!(
        "Stage 1: {} decisions, {} without headnote, {} with headnote or catchword",
        summary.total, summary.without_headnote, summary.with_headnote_or_catchword
    );

    let files = table_files(&records, output, config)?;
    info!("Writing decision table ({}) to {:?}", config.encoding, output);
    commit_outputs(&files)?;

    Ok(Stage1Result { records, summary })
}

/// Encode the decision table in memory: the CSV at `output` first, then the
/// workbook copy at the same path with an `.xlsx` extension when enabled
pub fn table_files(records: &[DecisionRecord], output: &Path, config: &Stage1Config) -> Result<Vec<RenderedFile>> {
    let mut files = vec![RenderedFile::new(output, encode_decision_table(records, config.encoding)?)];
    if config.workbook {
        files.push(RenderedFile::new(
            output.with_extension("xlsx"),
            encode_decision_workbook(records)?,
        ));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_table_files() {
        let records = vec![DecisionRecord::new("T190123EP1")];
        let files = table_files(&records, Path::new("out/ep_appeal_decisions.csv"), &Stage1Config::default()).unwrap();
        let paths: Vec<&PathBuf> = files.iter().map(|f| &f.path).collect();
        assert_eq!(
            paths,
            vec![
                &PathBuf::from("out/ep_appeal_decisions.csv"),
                &PathBuf::from("out/ep_appeal_decisions.xlsx"),
            ]
        );

        let config = Stage1Config {
            workbook: false,
            ..Default::default()
        };
        assert_eq!(table_files(&records, Path::new("table.csv"), &config).unwrap().len(), 1);
    }

    #[test]
    fn test_summary_counts() {
        let mut with_headnote = DecisionRecord::new("T190123EP1");
        with_headnote.headnote = Some("[EN] Holding".to_string());
        let mut catchword_only = DecisionRecord::new("T190124EP1");
        catchword_only.catchword = Some("[EN] Key point".to_string());
        let empty = DecisionRecord::new("T190125EP1");

        let summary = ExtractionSummary::from_records(&[with_headnote, catchword_only, empty]);

        assert_eq!(
            summary,
            ExtractionSummary {
                total: 3,
                without_headnote: 2,
                with_headnote_or_catchword: 2,
            }
        );
    }
}
