use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::io::{commit_outputs, decode_decision_table, parse_decisions_file};

use super::{
    normalize, render_outputs, table_files, ExtractionSummary, NormalizationResult, Stage1Config, Stage3Config,
    Stage3Result,
};

/// Configuration for a full extract, normalize and render run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub extract: Stage1Config,
    /// File name of the decision table inside the render output directory
    pub table_file: String,
    pub render: Stage3Config,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extract: Stage1Config::default(),
            table_file: "ep_appeal_decisions.csv".to_string(),
            render: Stage3Config::default(),
        }
    }
}

#[derive(Debug)]
pub struct PipelineResult {
    pub extraction: ExtractionSummary,
    pub normalization: NormalizationResult,
    pub render: Stage3Result,
}

impl PipelineConfig {
    pub fn table_path(&self) -> PathBuf {
        self.render.output_dir.join(&self.table_file)
    }
}

/// Run all three stages and write every file in one commit.
///
/// The normalizer reads the table back from its encoded bytes, so the run
/// sees exactly what separate `extract` and `render` runs would. Nothing is
/// written unless every stage succeeded.
pub fn execute_pipeline(input: &Path, config: &PipelineConfig) -> Result<PipelineResult> {
    info!("Stage 1: Extracting decisions from {:?}", input);
    let records = parse_decisions_file(input)?;
    let extraction = ExtractionSummary::from_records(&records);
    let mut files = table_files(&records, &config.table_path(), &config.extract)?;

    info!("Stage 2: Normalizing {} decisions", records.len());
    let table = decode_decision_table(&files[0].bytes, config.extract.encoding)?;
    let normalization = normalize(table);

    info!("Stage 3: Rendering {} decisions", normalization.decisions.len());
    files.extend(render_outputs(&normalization.decisions, &config.render)?);

    commit_outputs(&files)?;
    let written: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();
    for path in &written {
        info!("Output written to {:?}", path);
    }

    let render = Stage3Result::new(&normalization.decisions, written);
    Ok(PipelineResult {
        extraction,
        normalization,
        render,
    })
}
