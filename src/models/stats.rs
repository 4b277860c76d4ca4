use std::collections::BTreeMap;

use super::{DecisionType, Language, NormalizedDecision};

/// Cross-tabulation of decision counts per language and decision type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionStats {
    cells: BTreeMap<Language, BTreeMap<DecisionType, usize>>,
}

impl DecisionStats {
    pub fn from_decisions(decisions: &[NormalizedDecision]) -> Self {
        let mut stats = Self::default();
        for decision in decisions {
            *stats
                .cells
                .entry(decision.language)
                .or_default()
                .entry(decision.decision_type)
                .or_default() += 1;
        }
        stats
    }

    pub fn count(&self, language: Language, decision_type: DecisionType) -> usize {
        self.cells
            .get(&language)
            .and_then(|row| row.get(&decision_type))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of a language's row
    pub fn language_total(&self, language: Language) -> usize {
        self.cells
            .get(&language)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    pub fn type_total(&self, decision_type: DecisionType) -> usize {
        self.cells
            .values()
            .filter_map(|row| row.get(&decision_type))
            .sum()
    }

    pub fn total(&self) -> usize {
        self.cells.values().flat_map(|row| row.values()).sum()
    }

    /// Languages with at least one decision, in display order
    pub fn languages(&self) -> Vec<Language> {
        self.cells.keys().copied().collect()
    }

    /// Decision types with at least one decision in any language, in display order
    pub fn decision_types(&self) -> Vec<DecisionType> {
        let mut types: Vec<DecisionType> = self
            .cells
            .values()
            .flat_map(|row| row.keys().copied())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    /// Languages ordered by total count, largest first
    pub fn languages_by_total(&self) -> Vec<(Language, usize)> {
        let mut totals: Vec<(Language, usize)> = self
            .languages()
            .into_iter()
            .map(|language| (language, self.language_total(language)))
            .collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DecisionRecord;

    fn decision(language: Language, decision_type: DecisionType) -> NormalizedDecision {
        NormalizedDecision {
            record: DecisionRecord::new("T190123EP1"),
            language,
            decision_type,
            case_number: "T 123/19".to_string(),
            year: None,
        }
    }

    #[test]
    fn test_language_totals_equal_row_sums() {
        let decisions = vec![
            decision(Language::English, DecisionType::T),
            decision(Language::English, DecisionType::T),
            decision(Language::English, DecisionType::J),
            decision(Language::German, DecisionType::G),
            decision(Language::Unknown, DecisionType::Unknown),
        ];
        let stats = DecisionStats::from_decisions(&decisions);

        for language in stats.languages() {
            let row_sum: usize = stats
                .decision_types()
                .into_iter()
                .map(|t| stats.count(language, t))
                .sum();
            assert_eq!(stats.language_total(language), row_sum);
        }
        assert_eq!(stats.language_total(Language::English), 3);
        assert_eq!(stats.type_total(DecisionType::T), 2);
        assert_eq!(stats.total(), decisions.len());
    }

    #[test]
    fn test_ordering() {
        let decisions = vec![
            decision(Language::German, DecisionType::W),
            decision(Language::German, DecisionType::T),
            decision(Language::English, DecisionType::G),
        ];
        let stats = DecisionStats::from_decisions(&decisions);

        assert_eq!(stats.languages(), vec![Language::English, Language::German]);
        assert_eq!(
            stats.decision_types(),
            vec![DecisionType::G, DecisionType::T, DecisionType::W]
        );
        assert_eq!(
            stats.languages_by_total(),
            vec![(Language::German, 2), (Language::English, 1)]
        );
    }

    #[test]
    fn test_empty() {
        let stats = DecisionStats::from_decisions(&[]);
        assert_eq!(stats.total(), 0);
        assert!(stats.languages().is_empty());
        assert_eq!(stats.count(Language::English, DecisionType::T), 0);
    }
}
