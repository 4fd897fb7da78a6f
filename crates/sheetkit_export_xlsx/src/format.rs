//! Cell formatter: per-cell render rule and style, plus the final border pass.
//!
//! Styles are derived only from row role, value kind and row parity:
//! - header   : `base + header`
//! - data     : `base + (date | number)? + band?`
//! - totals   : built by [`crate::aggregate`] from the same layers
//! - all cells: `+ border`, applied last by [`apply_border_pass`]

use crate::spec::{
    EnumCellValue, EnumRowRole, EnumValueKind, SpecAutofilter, SpecCell, SpecCellFormat,
    SpecExportFormats, SpecRow, SpecSheetGrid, SpecSheetLayout,
};

/// Whether a data row at 1-based `row_num` receives the band fill.
pub fn is_banded_row(row_num: usize) -> bool {
    row_num % 2 == 0
}

/// Format of one data cell from its value kind and row parity.
pub fn derive_data_cell_format(
    value: &EnumCellValue,
    row_num: usize,
    formats: &SpecExportFormats,
    if_banding: bool,
) -> SpecCellFormat {
    let mut fmt = match value.kind() {
        Some(EnumValueKind::Date) => formats.base.merge(&formats.date),
        Some(EnumValueKind::Number) => formats.base.merge(&formats.number),
        Some(EnumValueKind::Text) | None => formats.base.clone(),
    };
    if if_banding && is_banded_row(row_num) {
        fmt = fmt.merge(&formats.band);
    }
    fmt
}

/// Style header and data rows of `layout` into a grid.
///
/// The totals row is not part of the output; borders are not applied yet.
pub fn format_layout(
    layout: &SpecSheetLayout,
    formats: &SpecExportFormats,
    if_banding: bool,
) -> SpecSheetGrid {
    let fmt_header = formats.base.merge(&formats.header);

    let rows = layout
        .rows
        .iter()
        .map(|row| SpecRow {
            role: row.role,
            row_num: row.row_num,
            cells: row
                .values
                .iter()
                .map(|value| SpecCell {
                    value: value.clone(),
                    format: match row.role {
                        EnumRowRole::Header => fmt_header.clone(),
                        EnumRowRole::Data | EnumRowRole::Totals => {
                            derive_data_cell_format(value, row.row_num, formats, if_banding)
                        }
                    },
                })
                .collect(),
        })
        .collect();

    let autofilter = if layout.if_autofilter && !layout.columns.is_empty() {
        Some(SpecAutofilter {
            row_idx: 0,
            col_idx_first: 0,
            col_idx_last: layout.columns.len() - 1,
        })
    } else {
        None
    };

    SpecSheetGrid {
        sheet_name: layout.sheet_name.clone(),
        columns: layout.columns.clone(),
        rows,
        row_freeze: layout.row_freeze,
        autofilter,
    }
}

/// Overlay `fmt_border` onto every cell of every row.
///
/// Runs after all other styling so nothing later can overwrite it.
pub fn apply_border_pass(mut grid: SpecSheetGrid, fmt_border: &SpecCellFormat) -> SpecSheetGrid {
    for row in &mut grid.rows {
        for cell in &mut row.cells {
            cell.format = cell.format.merge(fmt_border);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::conf::{
        C_COLOR_BAND_FILL, C_COLOR_HEADER_FILL, C_COLOR_HEADER_FONT, C_NUM_FORMAT_DATE,
        C_NUM_FORMAT_NUMBER,
    };
    use crate::spec::{SpecColumn, SpecLayoutRow};

    fn make_layout() -> SpecSheetLayout {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let data_row = |row_num| SpecLayoutRow {
            role: EnumRowRole::Data,
            row_num,
            values: vec![
                EnumCellValue::String("x".to_string()),
                EnumCellValue::Number(1.5),
                EnumCellValue::Date(dt),
                EnumCellValue::None,
            ],
        };
        SpecSheetLayout {
            sheet_name: "Data".to_string(),
            columns: ["a", "b", "c", "d"]
                .iter()
                .map(|c_name| SpecColumn {
                    name: c_name.to_string(),
                    label: c_name.to_uppercase(),
                    kind: EnumValueKind::Text,
                    width: 15.0,
                })
                .collect(),
            rows: vec![
                SpecLayoutRow {
                    role: EnumRowRole::Header,
                    row_num: 1,
                    values: ["A", "B", "C", "D"]
                        .iter()
                        .map(|c_label| EnumCellValue::String(c_label.to_string()))
                        .collect(),
                },
                data_row(2),
                data_row(3),
                data_row(4),
            ],
            row_num_totals: None,
            row_freeze: 1,
            if_autofilter: true,
        }
    }

    #[test]
    fn test_is_banded_row_by_row_number_only() {
        let l_banded: Vec<bool> = (2..=7).map(is_banded_row).collect();
        assert_eq!(l_banded, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn test_format_layout_header_style_ignores_kind() {
        let grid = format_layout(&make_layout(), &SpecExportFormats::default(), true);
        for cell in &grid.rows[0].cells {
            assert_eq!(cell.format.bold, Some(true));
            assert_eq!(cell.format.font_color.as_deref(), Some(C_COLOR_HEADER_FONT));
            assert_eq!(cell.format.bg_color.as_deref(), Some(C_COLOR_HEADER_FILL));
            assert_eq!(cell.format.num_format, None);
        }
    }

    #[test]
    fn test_format_layout_render_rules_by_value_kind() {
        let grid = format_layout(&make_layout(), &SpecExportFormats::default(), true);
        let l_cells = &grid.rows[2].cells;

        assert_eq!(l_cells[0].format.num_format, None);
        assert_eq!(l_cells[0].format.align, None);
        assert_eq!(
            l_cells[1].format.num_format.as_deref(),
            Some(C_NUM_FORMAT_NUMBER)
        );
        assert_eq!(l_cells[1].format.align.as_deref(), Some("right"));
        assert_eq!(l_cells[2].format.num_format.as_deref(), Some(C_NUM_FORMAT_DATE));
        assert_eq!(l_cells[3].format.num_format, None);
    }

    #[test]
    fn test_format_layout_banding_even_rows() {
        let grid = format_layout(&make_layout(), &SpecExportFormats::default(), true);
        let fill_of = |n_idx_row: usize| grid.rows[n_idx_row].cells[3].format.bg_color.clone();

        assert_eq!(fill_of(1).as_deref(), Some(C_COLOR_BAND_FILL));
        assert_eq!(fill_of(2), None);
        assert_eq!(fill_of(3).as_deref(), Some(C_COLOR_BAND_FILL));

        let number_cell = &grid.rows[1].cells[1].format;
        assert_eq!(number_cell.bg_color.as_deref(), Some(C_COLOR_BAND_FILL));
        assert_eq!(number_cell.num_format.as_deref(), Some(C_NUM_FORMAT_NUMBER));
    }

    #[test]
    fn test_format_layout_banding_disabled() {
        let grid = format_layout(&make_layout(), &SpecExportFormats::default(), false);
        assert!(
            grid.rows[1..]
                .iter()
                .flat_map(|row| &row.cells)
                .all(|cell| cell.format.bg_color.is_none())
        );
    }

    #[test]
    fn test_format_layout_autofilter_spans_header() {
        let grid = format_layout(&make_layout(), &SpecExportFormats::default(), true);
        assert_eq!(
            grid.autofilter,
            Some(SpecAutofilter {
                row_idx: 0,
                col_idx_first: 0,
                col_idx_last: 3
            })
        );

        let mut layout_empty = make_layout();
        layout_empty.columns.clear();
        layout_empty.rows.truncate(1);
        layout_empty.rows[0].values.clear();
        let grid_empty = format_layout(&layout_empty, &SpecExportFormats::default(), true);
        assert_eq!(grid_empty.autofilter, None);
    }

    #[test]
    fn test_apply_border_pass_covers_every_cell_and_keeps_style() {
        let formats = SpecExportFormats::default();
        let grid = apply_border_pass(format_layout(&make_layout(), &formats, true), &formats.border);

        for cell in grid.rows.iter().flat_map(|row| &row.cells) {
            assert_eq!(cell.format.border, Some(1));
        }
        assert_eq!(grid.rows[0].cells[0].format.bold, Some(true));
        assert_eq!(
            grid.rows[1].cells[1].format.bg_color.as_deref(),
            Some(C_COLOR_BAND_FILL)
        );
    }
}
