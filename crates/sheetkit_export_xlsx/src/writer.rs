//! Container encoder that serializes a styled grid into XLSX workbook bytes.

use std::collections::HashMap;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::spec::{EnumCellValue, ExportError, SpecCellFormat, SpecSheetGrid};
use crate::util::is_excel_date_in_range;

/// Encode `grid` into a single-sheet workbook.
///
/// Writes column widths, every cell with its format, the frozen header pane
/// and the header auto-filter. Output depends only on `grid`.
pub fn encode_sheet_grid(grid: &SpecSheetGrid) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&grid.sheet_name)
        .map_err(derive_xlsx_error)?;

    for (n_idx_col, col) in grid.columns.iter().enumerate() {
        worksheet
            .set_column_width(cast_col_num(n_idx_col)?, col.width)
            .map_err(derive_xlsx_error)?;
    }

    let mut dict_formats: HashMap<&SpecCellFormat, Format> = HashMap::new();
    for row in &grid.rows {
        let n_row_idx = row
            .row_num
            .checked_sub(1)
            .ok_or_else(|| ExportError::InvalidInput("row numbers are 1-based.".to_string()))?;
        for (n_idx_col, cell) in row.cells.iter().enumerate() {
            let format = dict_formats
                .entry(&cell.format)
                .or_insert_with(|| derive_rust_xlsx_format(&cell.format));
            write_cell_with_format(worksheet, n_row_idx, n_idx_col, &cell.value, format)?;
        }
    }

    if grid.row_freeze > 0 {
        worksheet
            .set_freeze_panes(cast_row_num(grid.row_freeze)?, 0)
            .map_err(derive_xlsx_error)?;
    }

    if let Some(autofilter) = grid.autofilter {
        worksheet
            .autofilter(
                cast_row_num(autofilter.row_idx)?,
                cast_col_num(autofilter.col_idx_first)?,
                cast_row_num(autofilter.row_idx)?,
                cast_col_num(autofilter.col_idx_last)?,
            )
            .map_err(derive_xlsx_error)?;
    }

    let v_bytes = workbook.save_to_buffer().map_err(derive_xlsx_error)?;
    log::debug!(
        "encoded sheet {:?}: {} rows x {} columns -> {} bytes",
        grid.sheet_name,
        grid.rows.len(),
        grid.columns.len(),
        v_bytes.len()
    );
    Ok(v_bytes)
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), ExportError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::String(val) => {
            worksheet
                .write_string_with_format(n_row, n_col, val, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet
                .write_boolean_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Date(dt) => {
            if is_excel_date_in_range(dt) {
                worksheet
                    .write_datetime_with_format(n_row, n_col, dt, format)
                    .map_err(derive_xlsx_error)?;
            } else {
                worksheet
                    .write_string_with_format(n_row, n_col, dt.to_string(), format)
                    .map_err(derive_xlsx_error)?;
            }
        }
        EnumCellValue::Formula(val) => {
            worksheet
                .write_formula_with_format(n_row, n_col, val.as_str(), format)
                .map_err(derive_xlsx_error)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, ExportError> {
    u32::try_from(value)
        .map_err(|_| ExportError::InvalidInput(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, ExportError> {
    u16::try_from(value)
        .map_err(|_| ExportError::InvalidInput(format!("column index overflow: {value}")))
}

fn derive_xlsx_error(err: XlsxError) -> ExportError {
    ExportError::EncodingFailure(format!("xlsx write error: {err}"))
}
