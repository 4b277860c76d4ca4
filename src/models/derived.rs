use std::fmt;

use super::DecisionRecord;

/// Language of a decision, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    English,
    French,
    German,
    Unknown,
}

impl Language {
    /// Known languages in the order they are rendered
    pub const DISPLAY_ORDER: [Language; 3] = [Language::English, Language::French, Language::German];

    /// Map a two-letter language tag (`EN`, `FR`, `DE`) to a language
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "EN" => Language::English,
            "FR" => Language::French,
            "DE" => Language::German,
            _ => Language::Unknown,
        }
    }

    /// Map the letter code of a reference suffix (`EP`, `FP`, `DP`)
    pub fn from_reference_code(code: &str) -> Self {
        match code {
            "EP" => Language::English,
            "FP" => Language::French,
            "DP" => Language::German,
            _ => Language::Unknown,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::French => "FR",
            Language::German => "DE",
            Language::Unknown => "Unknown",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::German => "German",
            Language::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Board or procedure a decision belongs to, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecisionType {
    /// Enlarged Board of Appeal
    G,
    /// Legal Board of Appeal
    J,
    /// Technical Boards of Appeal
    T,
    /// Disciplinary Board of Appeal
    D,
    /// Protests under the PCT
    W,
    Unknown,
}

impl DecisionType {
    pub const DISPLAY_ORDER: [DecisionType; 5] = [
        DecisionType::G,
        DecisionType::J,
        DecisionType::T,
        DecisionType::D,
        DecisionType::W,
    ];

    /// Identity mapping from a case code such as `T`; anything else is unknown
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "G" => DecisionType::G,
            "J" => DecisionType::J,
            "T" => DecisionType::T,
            "D" => DecisionType::D,
            "W" => DecisionType::W,
            _ => DecisionType::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DecisionType::G => "G",
            DecisionType::J => "J",
            DecisionType::T => "T",
            DecisionType::D => "D",
            DecisionType::W => "W",
            DecisionType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A decision record enriched with the fields the renderer groups and sorts by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDecision {
    pub record: DecisionRecord,
    pub language: Language,
    pub decision_type: DecisionType,
    /// Human-readable case number, e.g. `T 123/19`, or the raw reference
    pub case_number: String,
    /// Numeric year for sorting; `None` when absent or not a number
    pub year: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_order_matches_ord() {
        let mut languages = vec![Language::Unknown, Language::German, Language::English, Language::French];
        languages.sort();
        assert_eq!(
            languages,
            vec![Language::English, Language::French, Language::German, Language::Unknown]
        );

        let mut types = vec![DecisionType::W, DecisionType::Unknown, DecisionType::T, DecisionType::G];
        types.sort();
        assert_eq!(
            types,
            vec![DecisionType::G, DecisionType::T, DecisionType::W, DecisionType::Unknown]
        );
    }

    #[test]
    fn test_language_from_tag() {
        assert_eq!(Language::from_tag("en"), Language::English);
        assert_eq!(Language::from_tag("DE"), Language::German);
        assert_eq!(Language::from_tag("NONE"), Language::Unknown);
    }

    #[test]
    fn test_decision_type_from_code() {
        assert_eq!(DecisionType::from_code("J"), DecisionType::J);
        assert_eq!(DecisionType::from_code("R"), DecisionType::Unknown);
        assert_eq!(DecisionType::from_code(""), DecisionType::Unknown);
    }
}
