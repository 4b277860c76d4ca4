use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::io::{read_decision_table, TableEncoding};
use crate::models::reference::{decision_type_from_reference, has_known_language_code};
use crate::models::{decode, DecisionRecord, DecisionType, Language, NormalizedDecision};

/// Configuration for Stage 2 normalization
#[derive(Debug, Clone, Default)]
pub struct Stage2Config {
    /// Encoding of the decision table read by this stage
    pub encoding: TableEncoding,
}

/// Result of Stage 2 normalization
#[derive(Debug)]
pub struct NormalizationResult {
    /// Filtered, deduplicated decisions in display order
    pub decisions: Vec<NormalizedDecision>,
    /// Rows read before any filtering
    pub input_rows: usize,
    /// Rows dropped because the reference has no FP/EP/DP code
    pub dropped_unknown: usize,
    /// Rows removed as duplicate headnote/catchword pairs
    pub removed_duplicates: usize,
}

/// Execute Stage 2: read the decision table and normalize it
pub fn execute_stage2(input: &Path, config: &Stage2Config) -> Result<NormalizationResult> {
    info!("Stage 2: Reading decision table ({}) from {:?}", config.encoding, input);
    let records = read_decision_table(input, config.encoding)?;
    Ok(normalize(records))
}

/// Normalize decision records for rendering
///
/// This stage:
/// 1. Drops rows whose reference carries no known language code
/// 2. Derives language, decision type and case number
/// 3. Removes duplicate headnote/catchword pairs (first one wins)
/// 4. Sorts by language, decision type and year (newest first)
pub fn normalize(records: Vec<DecisionRecord>) -> NormalizationResult {
    let input_rows = records.len();

    let filtered = filter_known_references(records);
    let dropped_unknown = input_rows - filtered.len();
    debug!("Dropped {} rows without a known language code", dropped_unknown);

    let derived = derive_fields(filtered);
    let derived_rows = derived.len();

    let unique = deduplicate(derived);
    let removed_duplicates = derived_rows - unique.len();

    let decisions = sort_for_display(unique);

    info!(
        "Stage 2: {} of {} rows kept ({} unknown references, {} duplicates)",
        decisions.len(),
        input_rows,
        dropped_unknown,
        removed_duplicates
    );

    NormalizationResult {
        decisions,
        input_rows,
        dropped_unknown,
        removed_duplicates,
    }
}

/// Keep rows whose reference contains FP, EP or DP followed by digits
pub fn filter_known_references(records: Vec<DecisionRecord>) -> Vec<DecisionRecord> {
    records
        .into_iter()
        .filter(|r| has_known_language_code(&r.reference))
        .collect()
}

pub fn derive_fields(records: Vec<DecisionRecord>) -> Vec<NormalizedDecision> {
    records.into_iter().map(derive).collect()
}

/// Enrich one record with language, decision type, case number and year
pub fn derive(record: DecisionRecord) -> NormalizedDecision {
    let decoded = decode(&record.reference);

    let language = language_from_tags(
        record.catchword_language.as_deref(),
        record.headnote_language.as_deref(),
    )
    .unwrap_or(decoded.language);

    let decision_type = match record.case_code.as_deref() {
        Some(code) => DecisionType::from_code(code),
        None => decision_type_from_reference(&record.reference),
    };

    let year = record
        .year
        .as_deref()
        .and_then(|y| y.trim().parse::<u32>().ok());

    NormalizedDecision {
        record,
        language,
        decision_type,
        case_number: decoded.case_number,
        year,
    }
}

/// Language from the first present tag list, catchword before headnote.
///
/// A multi-language list such as `EN, FR` resolves to its first tag.
fn language_from_tags(catchword_language: Option<&str>, headnote_language: Option<&str>) -> Option<Language> {
    catchword_language
        .or(headnote_language)
        .map(|tags| Language::from_tag(tags.split(',').next().unwrap_or_default()))
}

/// Drop rows whose (headnote, catchword) pair was already seen.
///
/// Rows with neither headnote nor catchword have no text to compare and are
/// always kept.
pub fn deduplicate(decisions: Vec<NormalizedDecision>) -> Vec<NormalizedDecision> {
    let mut seen: HashSet<(Option<String>, Option<String>)> = HashSet::new();
    decisions
        .into_iter()
        .filter(|d| {
            !d.record.has_content() || seen.insert((d.record.headnote.clone(), d.record.catchword.clone()))
        })
        .collect()
}

/// Stable sort: language, then decision type, then year descending.
/// Rows without a year follow the dated ones and keep their input order.
pub fn sort_for_display(mut decisions: Vec<NormalizedDecision>) -> Vec<NormalizedDecision> {
    decisions.sort_by(|a, b| {
        a.language
            .cmp(&b.language)
            .then(a.decision_type.cmp(&b.decision_type))
            .then_with(|| newest_first(a.year, b.year))
    });
    decisions
}

fn newest_first(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
