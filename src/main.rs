use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use headnotes::render::cross_tab_rows;
use headnotes::{
    execute_pipeline, execute_stage1, execute_stage2, execute_stage3, DecisionStats, ExtractionSummary,
    NormalizationResult, PipelineConfig, Stage1Config, Stage2Config, Stage3Config, TableEncoding,
};

const DEFAULT_INPUT: &str = "./EPDecisions_March2025/EPDecisions_March2025.xml";
const DEFAULT_TABLE: &str = "ep_appeal_decisions.csv";

#[derive(Parser)]
#[command(name = "headnotes")]
#[command(author, version, about = "Headnote and catchword reports for EPO Boards of Appeal decisions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract decisions from the XML corpus into the decision table
    Extract {
        /// Decisions XML document
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Decision table to write (CSV)
        #[arg(short, long, default_value = DEFAULT_TABLE)]
        output: PathBuf,

        /// Decision table encoding (utf-8 or latin-1)
        #[arg(long, default_value = "utf-8")]
        encoding: TableEncoding,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Normalize the decision table and render documents and statistics
    Render {
        /// Decision table to read (CSV)
        #[arg(short, long, default_value = DEFAULT_TABLE)]
        input: PathBuf,

        /// Directory for the rendered files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Decision table encoding (utf-8 or latin-1)
        #[arg(long, default_value = "utf-8")]
        encoding: TableEncoding,

        /// Source citation printed in the document header
        #[arg(long)]
        source: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Extract, normalize and render in one go
    Run {
        /// Decisions XML document
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Directory for the decision table and rendered files, written together
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Decision table encoding (utf-8 or latin-1)
        #[arg(long, default_value = "utf-8")]
        encoding: TableEncoding,

        /// Source citation printed in the document header
        #[arg(long)]
        source: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the language and decision-type breakdown of a decision table
    Analyze {
        /// Decision table to read (CSV)
        #[arg(short, long, default_value = DEFAULT_TABLE)]
        input: PathBuf,

        /// Decision table encoding (utf-8 or latin-1)
        #[arg(long, default_value = "utf-8")]
        encoding: TableEncoding,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            encoding,
            verbose,
        } => {
            setup_logging(verbose);
            extract(&input, &output, encoding)
        }
        Commands::Render {
            input,
            output_dir,
            encoding,
            source,
            verbose,
        } => {
            setup_logging(verbose);
            let normalized = read_and_normalize(&input, encoding)?;
            render(normalized, output_dir, source)
        }
        Commands::Run {
            input,
            output_dir,
            encoding,
            source,
            verbose,
        } => {
            setup_logging(verbose);
            run(&input, output_dir, encoding, source)
        }
        Commands::Analyze {
            input,
            encoding,
            verbose,
        } => {
            setup_logging(verbose);
            let normalized = read_and_normalize(&input, encoding)?;
            print_statistics(&DecisionStats::from_decisions(&normalized.decisions));
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn extract(input: &Path, output: &Path, encoding: TableEncoding) -> Result<()> {
    let config = Stage1Config {
        encoding,
        ..Default::default()
    };
    let result = execute_stage1(input, output, &config)
        .with_context(|| format!("Failed to extract decisions from {:?}", input))?;

    print_extraction_summary(&result.summary);
    Ok(())
}

fn read_and_normalize(input: &Path, encoding: TableEncoding) -> Result<NormalizationResult> {
    let config = Stage2Config { encoding };
    let result = execute_stage2(input, &config)
        .with_context(|| format!("Failed to read decision table {:?}", input))?;
    Ok(result)
}

fn render_config(output_dir: PathBuf, source: Option<String>) -> Stage3Config {
    let mut config = Stage3Config {
        output_dir,
        ..Default::default()
    };
    if let Some(source) = source {
        config.source = source;
    }
    config
}

fn render(normalized: NormalizationResult, output_dir: PathBuf, source: Option<String>) -> Result<()> {
    let config = render_config(output_dir, source);
    let result = execute_stage3(&normalized.decisions, &config).context("Failed to render outputs")?;

    print_statistics(&result.stats);
    info!(
        "Complete: {} decisions in the documents, {} written files",
        result.rendered_decisions,
        result.written.len()
    );
    Ok(())
}

fn run(input: &Path, output_dir: PathBuf, encoding: TableEncoding, source: Option<String>) -> Result<()> {
    let config = PipelineConfig {
        extract: Stage1Config {
            encoding,
            ..Default::default()
        },
        table_file: DEFAULT_TABLE.to_string(),
        render: render_config(output_dir, source),
    };
    let result = execute_pipeline(input, &config)
        .with_context(|| format!("Failed to process decisions from {:?}", input))?;

    print_extraction_summary(&result.extraction);
    print_statistics(&result.render.stats);
    info!(
        "Complete: {} of {} rows kept, {} decisions in the documents, {} written files",
        result.normalization.decisions.len(),
        result.normalization.input_rows,
        result.render.rendered_decisions,
        result.render.written.len()
    );
    Ok(())
}

fn print_extraction_summary(summary: &ExtractionSummary) {
    println!("Extraction Summary");
    println!("==================");
    println!("Total decisions: {}", summary.total);
    println!("Decisions without headnote: {}", summary.without_headnote);
    println!(
        "Decisions with headnote or catchword: {}",
        summary.with_headnote_or_catchword
    );
    println!();
}

fn print_statistics(stats: &DecisionStats) {
    let (columns, rows) = cross_tab_rows(stats);

    println!("Decisions per Language and Type");
    println!("-------------------------------");
    let header: Vec<String> = columns.iter().map(|t| format!("{:>8}", t.code())).collect();
    println!("{:<9}{}{:>8}", "", header.join(""), "Total");
    for row in &rows {
        let counts: Vec<String> = row.counts.iter().map(|c| format!("{:>8}", c)).collect();
        println!("{:<9}{}{:>8}", row.language.tag(), counts.join(""), row.total);
    }
    println!();

    println!("Decisions per Type");
    println!("------------------");
    for decision_type in &columns {
        println!("{}: {}", decision_type, stats.type_total(*decision_type));
    }
    println!();

    println!("Decisions per Language");
    println!("----------------------");
    for (language, total) in stats.languages_by_total() {
        println!("{}: {}", language, total);
    }
    println!("Total: {}", stats.total());
}

