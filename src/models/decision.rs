use serde::{Deserialize, Serialize};

/// Cell value standing in for an absent field in the decision table.
///
/// An empty cell is an empty string, never an absent value.
pub const ABSENT_MARKER: &str = "None";

/// Column headers of the decision table, in write order.
pub const COLUMNS: [&str; 10] = [
    "Reference",
    "ep-distribution-code",
    "ep-headnote",
    "ep-headnote-language",
    "ep-catchword",
    "ep-catchword-language",
    "Case Code",
    "Country",
    "Appeal Number",
    "Year",
];

/// One row per appeal decision, as extracted from the XML corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Bibliographic reference, e.g. `T190123EU1`; `None` when the source had none
    #[serde(rename = "Reference")]
    pub reference: String,
    #[serde(rename = "ep-distribution-code", with = "absent_marker")]
    pub distribution_code: Option<String>,
    /// `[LANG] text` segments joined by ` | `
    #[serde(rename = "ep-headnote", with = "absent_marker")]
    pub headnote: Option<String>,
    /// Distinct language tags of the headnote blocks, e.g. `EN, FR`
    #[serde(rename = "ep-headnote-language", with = "absent_marker")]
    pub headnote_language: Option<String>,
    #[serde(rename = "ep-catchword", with = "absent_marker")]
    pub catchword: Option<String>,
    #[serde(rename = "ep-catchword-language", with = "absent_marker")]
    pub catchword_language: Option<String>,
    #[serde(rename = "Case Code", with = "absent_marker")]
    pub case_code: Option<String>,
    #[serde(rename = "Country", with = "absent_marker")]
    pub country: Option<String>,
    #[serde(rename = "Appeal Number", with = "absent_marker")]
    pub appeal_number: Option<String>,
    #[serde(rename = "Year", with = "absent_marker")]
    pub year: Option<String>,
}

impl DecisionRecord {
    /// A record carrying only a reference, every other field absent
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            distribution_code: None,
            headnote: None,
            headnote_language: None,
            catchword: None,
            catchword_language: None,
            case_code: None,
            country: None,
            appeal_number: None,
            year: None,
        }
    }

    pub fn has_headnote(&self) -> bool {
        self.headnote.is_some()
    }

    /// Whether there is anything to render for this decision
    pub fn has_content(&self) -> bool {
        self.headnote.is_some() || self.catchword.is_some()
    }

    /// Field values in `COLUMNS` order, `None` where absent
    pub fn cells(&self) -> [Option<&str>; COLUMNS.len()] {
        [
            Some(self.reference.as_str()),
            self.distribution_code.as_deref(),
            self.headnote.as_deref(),
            self.headnote_language.as_deref(),
            self.catchword.as_deref(),
            self.catchword_language.as_deref(),
            self.case_code.as_deref(),
            self.country.as_deref(),
            self.appeal_number.as_deref(),
            self.year.as_deref(),
        ]
    }
}

mod absent_marker {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ABSENT_MARKER;

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(ABSENT_MARKER))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok((raw != ABSENT_MARKER).then_some(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_content() {
        let mut record = DecisionRecord::new("T190123EP1");
        assert!(!record.has_content());

        record.catchword = Some("[EN] Inventive step".to_string());
        assert!(record.has_content());
        assert!(!record.has_headnote());
    }

    #[test]
    fn test_columns_match_serialized_header() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(DecisionRecord::new("T190123EP1")).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let header = text.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn test_cells_follow_column_order() {
        let mut record = DecisionRecord::new("T190123EP1");
        record.catchword = Some("[EN] Key".to_string());
        record.year = Some("2019".to_string());

        let cells = record.cells();
        assert_eq!(cells[0], Some("T190123EP1"));
        assert_eq!(cells[COLUMNS.iter().position(|c| *c == "ep-catchword").unwrap()], Some("[EN] Key"));
        assert_eq!(cells[COLUMNS.iter().position(|c| *c == "Year").unwrap()], Some("2019"));
        assert_eq!(cells.iter().filter(|c| c.is_none()).count(), 7);
    }

    #[test]
    fn test_absent_and_empty_are_distinct() {
        let mut record = DecisionRecord::new("T190123EP1");
        record.country = Some(String::new());

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&record).unwrap();
        let bytes = writer.into_inner().unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let read: DecisionRecord = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(read.country, Some(String::new()));
        assert_eq!(read.year, None);
        assert_eq!(read, record);
    }
}
