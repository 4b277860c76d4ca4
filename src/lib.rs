pub mod error;
pub mod io;
pub mod models;
pub mod render;
pub mod stages;

pub use error::{PipelineError, Result};
pub use io::{parse_decisions_file, parse_decisions_xml, read_decision_table, TableEncoding};
pub use models::{
    decode, DecisionRecord, DecisionStats, DecisionType, DecodedReference, Language, NormalizedDecision,
};
pub use render::{walk, DocumentSink, RunHeader};
pub use stages::{
    execute_pipeline, execute_stage1, execute_stage2, execute_stage3, normalize, ExtractionSummary,
    NormalizationResult, PipelineConfig, PipelineResult, Stage1Config, Stage2Config, Stage3Config,
};
