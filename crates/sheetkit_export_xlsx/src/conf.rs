//! Export constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecExportFormats, SpecExportOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Name of the single worksheet in every exported workbook.
pub const C_SHEET_NAME_DEFAULT: &str = "Data";
/// Fixed render width of every column (no autofit).
pub const N_WIDTH_COLUMN_DEFAULT: f64 = 15.0;
/// Label written into the first cell of the totals row.
pub const C_TOTALS_LABEL: &str = "Totals";

/// File extension appended to the caller-supplied base name.
pub const C_FILE_EXTENSION: &str = ".xlsx";
/// MIME type of the produced document.
pub const C_MIME_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Render rule for date cells.
pub const C_NUM_FORMAT_DATE: &str = "dd/mm/yyyy";
/// Render rule for numeric cells.
pub const C_NUM_FORMAT_NUMBER: &str = "#,##0.00";

/// Header fill (accent).
pub const C_COLOR_HEADER_FILL: &str = "#4F81BD";
/// Header font color.
pub const C_COLOR_HEADER_FONT: &str = "#FFFFFF";
/// Fill of banded (even-numbered) data rows.
pub const C_COLOR_BAND_FILL: &str = "#F2F2F2";
/// Fill of the totals row.
pub const C_COLOR_TOTALS_FILL: &str = "#E6E6E6";

/// Datetime layouts accepted for string values, tried in order after RFC 3339.
pub const TUP_DATETIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
/// Date-only layouts accepted for string values.
///
/// `%B` also accepts abbreviated month names when parsing.
pub const TUP_DATE_LAYOUTS: [&str; 5] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

/// Build default format presets used by [`crate::export::XlsxExporter`].
pub fn derive_default_export_formats() -> SpecExportFormats {
    SpecExportFormats {
        base: SpecCellFormat {
            font_name: Some("Arial".to_string()),
            font_size: Some(11),
            valign: Some("vcenter".to_string()),
            ..Default::default()
        },
        header: SpecCellFormat {
            bold: Some(true),
            font_color: Some(C_COLOR_HEADER_FONT.to_string()),
            bg_color: Some(C_COLOR_HEADER_FILL.to_string()),
            ..Default::default()
        },
        date: SpecCellFormat {
            num_format: Some(C_NUM_FORMAT_DATE.to_string()),
            ..Default::default()
        },
        number: SpecCellFormat {
            num_format: Some(C_NUM_FORMAT_NUMBER.to_string()),
            align: Some("right".to_string()),
            ..Default::default()
        },
        band: SpecCellFormat {
            bg_color: Some(C_COLOR_BAND_FILL.to_string()),
            ..Default::default()
        },
        totals: SpecCellFormat {
            bold: Some(true),
            bg_color: Some(C_COLOR_TOTALS_FILL.to_string()),
            ..Default::default()
        },
        border: SpecCellFormat {
            border: Some(1),
            ..Default::default()
        },
    }
}

/// Build default export options.
pub fn derive_default_export_options() -> SpecExportOptions {
    SpecExportOptions::default()
}
