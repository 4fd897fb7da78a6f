//! `sheetkit_export_xlsx` v1:
//! Record-to-XLSX export engine.
//!
//! Pipeline stages, each a pure function over the previous stage's output:
//! - `schema`    : column discovery and value classification
//! - `layout`    : header, data rows and totals reservation
//! - `format`    : per-cell render rule, style and border pass
//! - `aggregate` : totals row with live sum formulas
//! - `writer`    : container encoder (workbook bytes)
//!
//! Support modules:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options
//! - `util`   : pure helper functions
//! - `source` : JSON and Polars record sources
//! - `export` : export entry points
pub mod aggregate;
pub mod conf;
pub mod export;
pub mod format;
pub mod layout;
pub mod schema;
pub mod source;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_MIME_TYPE_XLSX, C_SHEET_NAME_DEFAULT, C_TOTALS_LABEL, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, derive_default_export_formats,
    derive_default_export_options,
};
pub use export::{XlsxExporter, export};
pub use source::{records_from_dataframe, records_from_ipc_bytes, records_from_json};
pub use spec::{
    EnumCellValue, EnumRecordValue, EnumRowRole, EnumValueKind, ExportError, SpecCell,
    SpecCellFormat, SpecColumn, SpecExportArtifact, SpecExportFormats, SpecExportOptions,
    SpecExportReport, SpecExportValuePolicy, SpecRecord, SpecRow, SpecSheetGrid,
};
pub use util::{derive_display_label, is_excel_date_in_range, sanitize_sheet_name};
