//! Aggregate synthesizer: totals row with live range-sum formulas.

use crate::spec::{
    EnumCellValue, EnumRowRole, EnumValueKind, SpecCell, SpecColumn, SpecExportFormats,
    SpecExportReport, SpecRow, SpecSheetGrid,
};
use crate::util::derive_column_letter;

/// Zero-based indices of columns holding at least one number.
pub fn derive_numeric_column_indices(columns: &[SpecColumn]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter_map(|(n_idx, col)| {
            if col.kind == EnumValueKind::Number {
                Some(n_idx)
            } else {
                None
            }
        })
        .collect()
}

/// `SUM(<L><first>:<L><last>)` over one column's data rows (1-based rows).
pub fn derive_sum_formula(col_idx: usize, row_num_first: usize, row_num_last: usize) -> String {
    let c_letter = derive_column_letter(col_idx);
    format!("SUM({c_letter}{row_num_first}:{c_letter}{row_num_last})")
}

/// Append the totals row at `row_num_totals`.
///
/// The first cell holds `totals_label` unless the first column is numeric,
/// in which case its sum overwrites the label. Every numeric column gets a
/// sum over rows `2..row_num_totals`, excluding header and totals. Remaining
/// cells are blank but carry the row style.
pub fn synthesize_totals_row(
    mut grid: SpecSheetGrid,
    row_num_totals: Option<usize>,
    totals_label: &str,
    formats: &SpecExportFormats,
    report: &mut SpecExportReport,
) -> SpecSheetGrid {
    let Some(row_num_totals) = row_num_totals else {
        return grid;
    };
    let l_cols_idx_numeric = derive_numeric_column_indices(&grid.columns);
    if l_cols_idx_numeric.is_empty() || grid.columns.is_empty() || row_num_totals < 3 {
        return grid;
    }

    let n_row_num_data_first = 2;
    let n_row_num_data_last = row_num_totals - 1;

    let fmt_totals = formats.base.merge(&formats.totals);
    let fmt_totals_number = fmt_totals.merge(&formats.number);

    let mut cells: Vec<SpecCell> = (0..grid.columns.len())
        .map(|_| SpecCell {
            value: EnumCellValue::None,
            format: fmt_totals.clone(),
        })
        .collect();

    cells[0].value = EnumCellValue::String(totals_label.to_string());

    for n_idx_col in l_cols_idx_numeric {
        let col = &grid.columns[n_idx_col];
        if n_idx_col == 0 {
            log::debug!("first column {:?} is numeric; sum replaces totals label", col.name);
        }
        cells[n_idx_col] = SpecCell {
            value: EnumCellValue::Formula(derive_sum_formula(
                n_idx_col,
                n_row_num_data_first,
                n_row_num_data_last,
            )),
            format: fmt_totals_number.clone(),
        };
        report.cols_numeric.push(col.name.clone());
    }

    grid.rows.push(SpecRow {
        role: EnumRowRole::Totals,
        row_num: row_num_totals,
        cells,
    });
    report.if_has_totals = true;
    grid
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::conf::{C_COLOR_TOTALS_FILL, C_NUM_FORMAT_NUMBER};

    fn make_grid(kinds: &[EnumValueKind], n_rows_data: usize) -> SpecSheetGrid {
        let columns: Vec<SpecColumn> = kinds
            .iter()
            .enumerate()
            .map(|(n_idx, kind)| SpecColumn {
                name: format!("c{n_idx}"),
                label: format!("C{n_idx}"),
                kind: *kind,
                width: 15.0,
            })
            .collect();
        let rows = (1..=n_rows_data + 1)
            .map(|row_num| SpecRow {
                role: if row_num == 1 {
                    EnumRowRole::Header
                } else {
                    EnumRowRole::Data
                },
                row_num,
                cells: vec![],
            })
            .collect();
        SpecSheetGrid {
            sheet_name: "Data".to_string(),
            columns,
            rows,
            row_freeze: 1,
            autofilter: None,
        }
    }

    #[test]
    fn test_derive_sum_formula() {
        assert_eq!(derive_sum_formula(1, 2, 3), "SUM(B2:B3)");
        assert_eq!(derive_sum_formula(27, 2, 101), "SUM(AB2:AB101)");
    }

    #[test]
    fn test_synthesize_totals_row_sums_data_range_only() {
        let grid = make_grid(
            &[EnumValueKind::Text, EnumValueKind::Number, EnumValueKind::Date],
            2,
        );
        let mut report = SpecExportReport::default();
        let grid = synthesize_totals_row(
            grid,
            Some(4),
            "Totals",
            &SpecExportFormats::default(),
            &mut report,
        );

        let row_totals = grid.totals_row().expect("totals row");
        assert_eq!(row_totals.row_num, 4);
        let l_values: Vec<&EnumCellValue> =
            row_totals.cells.iter().map(|cell| &cell.value).collect();
        assert_eq!(
            l_values,
            vec![
                &EnumCellValue::String("Totals".to_string()),
                &EnumCellValue::Formula("SUM(B2:B3)".to_string()),
                &EnumCellValue::None,
            ]
        );

        assert_eq!(row_totals.cells[0].format.num_format, None);
        assert_eq!(row_totals.cells[0].format.bold, Some(true));
        assert_eq!(
            row_totals.cells[1].format.num_format.as_deref(),
            Some(C_NUM_FORMAT_NUMBER)
        );
        assert_eq!(row_totals.cells[1].format.align.as_deref(), Some("right"));
        assert_eq!(
            row_totals.cells[2].format.bg_color.as_deref(),
            Some(C_COLOR_TOTALS_FILL)
        );

        assert!(report.if_has_totals);
        assert_eq!(report.cols_numeric, vec!["c1".to_string()]);
    }

    #[test]
    fn test_synthesize_totals_row_absent_without_reservation() {
        let grid = make_grid(&[EnumValueKind::Number], 2);
        let mut report = SpecExportReport::default();
        let grid = synthesize_totals_row(
            grid,
            None,
            "Totals",
            &SpecExportFormats::default(),
            &mut report,
        );
        assert!(grid.totals_row().is_none());
        assert!(!report.if_has_totals);
    }

    #[test]
    fn test_synthesize_totals_row_absent_without_numeric_column() {
        let grid = make_grid(&[EnumValueKind::Text, EnumValueKind::Date], 2);
        let mut report = SpecExportReport::default();
        let grid = synthesize_totals_row(
            grid,
            Some(4),
            "Totals",
            &SpecExportFormats::default(),
            &mut report,
        );
        assert!(grid.totals_row().is_none());
    }

    #[test]
    fn test_synthesize_totals_row_sums_numeric_first_column() {
        let grid = make_grid(&[EnumValueKind::Number, EnumValueKind::Text], 2);
        let mut report = SpecExportReport::default();
        let grid = synthesize_totals_row(
            grid,
            Some(4),
            "Totals",
            &SpecExportFormats::default(),
            &mut report,
        );

        let row_totals = grid.totals_row().expect("totals row");
        assert_eq!(
            row_totals.cells[0].value,
            EnumCellValue::Formula("SUM(A2:A3)".to_string())
        );
        assert_eq!(
            row_totals.cells[0].format.num_format.as_deref(),
            Some(C_NUM_FORMAT_NUMBER)
        );
        assert_eq!(row_totals.cells[1].value, EnumCellValue::None);
        assert_eq!(report.cols_numeric, vec!["c0".to_string()]);
        assert!(report.warnings.is_empty());
    }
}
