use std::fmt;
use std::path::Path;
use std::str::FromStr;

use encoding_rs::UTF_8;
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::models::{DecisionRecord, COLUMNS};

/// Character encoding of the decision table.
///
/// UTF-8 is canonical. Latin-1 exists for tables exchanged with legacy
/// tooling; writer and reader must be given the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableEncoding {
    #[default]
    Utf8,
    /// Strict ISO-8859-1: one byte per code point up to U+00FF
    Latin1,
}

impl TableEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            TableEncoding::Utf8 => "utf-8",
            TableEncoding::Latin1 => "latin-1",
        }
    }

    /// Encode text, failing on the first character the encoding cannot hold
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            TableEncoding::Utf8 => Ok(UTF_8.encode(text).0.into_owned()),
            TableEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c).map_err(|_| self.unrepresentable(c)))
                .collect(),
        }
    }

    /// Decode bytes, failing on any sequence that is invalid in the encoding
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TableEncoding::Utf8 => UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or_else(|| PipelineError::Encoding {
                    encoding: self.label(),
                    details: "input contains byte sequences that are invalid in this encoding".to_string(),
                }),
            // Every byte is a code point; 0x80..0x9F are the C1 controls
            TableEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    fn unrepresentable(&self, c: char) -> PipelineError {
        PipelineError::Encoding {
            encoding: self.label(),
            details: format!("character {:?} (U+{:04X}) cannot be represented", c, c as u32),
        }
    }
}

impl fmt::Display for TableEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TableEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TableEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TableEncoding::Latin1),
            other => Err(format!("unsupported table encoding '{}' (expected utf-8 or latin-1)", other)),
        }
    }
}

/// Serialize records into an encoded decision table with a header row
pub fn encode_decision_table(records: &[DecisionRecord], encoding: TableEncoding) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;

    // csv output is always valid UTF-8 since every field came from a String
    let text = String::from_utf8_lossy(&bytes);
    encoding.encode(&text)
}

/// Parse an encoded decision table, checking that every column is present
pub fn decode_decision_table(bytes: &[u8], encoding: TableEncoding) -> Result<Vec<DecisionRecord>> {
    let text = encoding.decode(bytes)?;
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if let Some(missing) = COLUMNS.iter().copied().find(|c| !headers.iter().any(|h| h == *c)) {
        return Err(PipelineError::MissingColumn(missing.to_string()));
    }

    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<DecisionRecord>, _>>()?;
    Ok(records)
}

/// Worksheet holding the spreadsheet copy of the decision table
pub const TABLE_SHEET: &str = "Decisions";

/// Serialize records into a one-sheet workbook with the table's columns.
///
/// Absent fields are left as blank cells; spreadsheets have no need for the
/// absent marker.
pub fn encode_decision_workbook(records: &[DecisionRecord]) -> Result<Vec<u8>> {
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(TABLE_SHEET)?;
    for (column, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, column as u16, *name, &bold)?;
    }
    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (column, value) in record.cells().into_iter().enumerate() {
            if let Some(value) = value {
                sheet.write_string(row, column as u16, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn read_decision_table(path: &Path, encoding: TableEncoding) -> Result<Vec<DecisionRecord>> {
    let bytes = std::fs::read(path)?;
    debug!("Reading decision table {:?} as {}", path, encoding);
    decode_decision_table(&bytes, encoding)
}
