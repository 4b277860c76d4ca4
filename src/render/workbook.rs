use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::models::{DecisionStats, DecisionType, Language};

pub const BY_LANGUAGE_AND_TYPE_SHEET: &str = "By Language & Type";
pub const TOTAL_PER_LANGUAGE_SHEET: &str = "Total per Language";

/// One language row of the language × decision-type table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossTabRow {
    pub language: Language,
    /// Counts in the order of the table's decision-type columns
    pub counts: Vec<usize>,
    pub total: usize,
}

/// Decision-type columns and one row per language present in the stats
pub fn cross_tab_rows(stats: &DecisionStats) -> (Vec<DecisionType>, Vec<CrossTabRow>) {
    let columns = stats.decision_types();
    let rows = stats
        .languages()
        .into_iter()
        .map(|language| CrossTabRow {
            language,
            counts: columns.iter().map(|t| stats.count(language, *t)).collect(),
            total: stats.language_total(language),
        })
        .collect();
    (columns, rows)
}

/// Build the two-sheet statistics workbook
pub fn build_workbook(stats: &DecisionStats) -> Result<Vec<u8>> {
    let bold = Format::new().set_bold();
    let (columns, rows) = cross_tab_rows(stats);

    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(BY_LANGUAGE_AND_TYPE_SHEET)?;
    sheet.write_string_with_format(0, 0, "Language", &bold)?;
    for (index, decision_type) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, index as u16 + 1, decision_type.code(), &bold)?;
    }
    for (index, row) in rows.iter().enumerate() {
        let sheet_row = index as u32 + 1;
        sheet.write_string(sheet_row, 0, row.language.tag())?;
        for (column, count) in row.counts.iter().enumerate() {
            sheet.write_number(sheet_row, column as u16 + 1, *count as f64)?;
        }
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(TOTAL_PER_LANGUAGE_SHEET)?;
    sheet.write_string_with_format(0, 0, "Language", &bold)?;
    sheet.write_string_with_format(0, 1, "Decisions", &bold)?;
    for (index, (language, total)) in stats.languages_by_total().into_iter().enumerate() {
        let sheet_row = index as u32 + 1;
        sheet.write_string(sheet_row, 0, language.tag())?;
        sheet.write_number(sheet_row, 1, total as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

    use super::*;
    use crate::render::tests::decision;

    fn sample_stats() -> DecisionStats {
        DecisionStats::from_decisions(&[
            decision("T190123EP1", Some("[EN] a"), None),
            decision("T190124EP1", Some("[EN] b"), None),
            decision("G190001EP1", None, None),
            decision("J190001FP1", Some("[FR] c"), None),
        ])
    }

    #[test]
    fn test_cross_tab_totals_match_rows() {
        let (columns, rows) = cross_tab_rows(&sample_stats());

        assert_eq!(columns, vec![DecisionType::G, DecisionType::J, DecisionType::T]);
        assert_eq!(
            rows,
            vec![
                CrossTabRow {
                    language: Language::English,
                    counts: vec![1, 0, 2],
                    total: 3,
                },
                CrossTabRow {
                    language: Language::French,
                    counts: vec![0, 1, 0],
                    total: 1,
                },
            ]
        );
        for row in &rows {
            assert_eq!(row.total, row.counts.iter().sum::<usize>());
        }
    }

    fn sheet_rows(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn test_build_workbook_sheets() {
        let bytes = build_workbook(&sample_stats()).unwrap();
        let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();

        assert_eq!(
            workbook.sheet_names(),
            vec![BY_LANGUAGE_AND_TYPE_SHEET.to_string(), TOTAL_PER_LANGUAGE_SHEET.to_string()]
        );
    }

    #[test]
    fn test_build_workbook_cross_tab() {
        let rows = sheet_rows(build_workbook(&sample_stats()).unwrap(), BY_LANGUAGE_AND_TYPE_SHEET);

        assert_eq!(
            rows,
            vec![
                vec![text("Language"), text("G"), text("J"), text("T")],
                vec![text("EN"), Data::Float(1.0), Data::Float(0.0), Data::Float(2.0)],
                vec![text("FR"), Data::Float(0.0), Data::Float(1.0), Data::Float(0.0)],
            ]
        );
    }

    #[test]
    fn test_build_workbook_language_totals() {
        let rows = sheet_rows(build_workbook(&sample_stats()).unwrap(), TOTAL_PER_LANGUAGE_SHEET);

        assert_eq!(
            rows,
            vec![
                vec![text("Language"), text("Decisions")],
                vec![text("EN"), Data::Float(3.0)],
                vec![text("FR"), Data::Float(1.0)],
            ]
        );
    }

    #[test]
    fn test_build_empty_workbook() {
        let rows = sheet_rows(build_workbook(&DecisionStats::default()).unwrap(), TOTAL_PER_LANGUAGE_SHEET);
        assert_eq!(rows, vec![vec![text("Language"), text("Decisions")]]);
    }
}
