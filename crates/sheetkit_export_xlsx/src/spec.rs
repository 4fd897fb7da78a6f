//! Shared export models, options and error types.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::conf::{C_SHEET_NAME_DEFAULT, C_TOTALS_LABEL, N_WIDTH_COLUMN_DEFAULT};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format patch; `None` fields inherit from the layer below.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Font color.
    pub font_color: Option<String>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Solid background fill color.
    pub bg_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
        }
    }
}

/// Named format layers combined by the cell formatter.
///
/// Each layer is a patch; the final cell format is `base` overlaid with the
/// role/kind/parity layers and finally `border`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportFormats {
    /// Applied to every cell first.
    pub base: SpecCellFormat,
    /// Header row.
    pub header: SpecCellFormat,
    /// Date-kind data cells.
    pub date: SpecCellFormat,
    /// Number-kind data cells and numeric totals cells.
    pub number: SpecCellFormat,
    /// Even-numbered data rows.
    pub band: SpecCellFormat,
    /// Totals row.
    pub totals: SpecCellFormat,
    /// Final pass over every cell.
    pub border: SpecCellFormat,
}

impl Default for SpecExportFormats {
    fn default() -> Self {
        crate::conf::derive_default_export_formats()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordModel

/// One input scalar.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumRecordValue {
    /// Missing/blank value.
    #[default]
    Empty,
    /// Text value, possibly holding a number or a date.
    Text(String),
    /// Native numeric value.
    Number(f64),
    /// Native boolean value.
    Boolean(bool),
    /// Native temporal value.
    Date(NaiveDateTime),
}

impl From<&str> for EnumRecordValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EnumRecordValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for EnumRecordValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for EnumRecordValue {
    fn from(value: f32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i64> for EnumRecordValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for EnumRecordValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u32> for EnumRecordValue {
    fn from(value: u32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for EnumRecordValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for EnumRecordValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDate> for EnumRecordValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<EnumRecordValue>> From<Option<T>> for EnumRecordValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// One input row: an insertion-ordered `name -> value` mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecRecord {
    fields: Vec<(String, EnumRecordValue)>,
}

impl SpecRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Self::insert`].
    pub fn with_(mut self, key: impl Into<String>, value: impl Into<EnumRecordValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`; an existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<EnumRecordValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c_key, _)| *c_key == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&EnumRecordValue> {
        self.fields
            .iter()
            .find(|(c_key, _)| c_key == key)
            .map(|(_, value)| value)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c_key, _)| c_key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<EnumRecordValue>> FromIterator<(K, V)> for SpecRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = SpecRecord::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GridModel

/// Classification of a cell's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumValueKind {
    Date,
    Number,
    Text,
}

/// Normalized cell value after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Blank cell.
    None,
    /// Text written as-is.
    String(String),
    /// Finite number.
    Number(f64),
    /// Native boolean.
    Boolean(bool),
    /// Date stored as a spreadsheet date, not text.
    Date(NaiveDateTime),
    /// Live formula text without the leading `=`.
    Formula(String),
}

impl EnumCellValue {
    /// Render-rule kind of this value; blank cells have none.
    pub fn kind(&self) -> Option<EnumValueKind> {
        match self {
            Self::None => None,
            Self::String(_) | Self::Boolean(_) => Some(EnumValueKind::Text),
            Self::Number(_) | Self::Formula(_) => Some(EnumValueKind::Number),
            Self::Date(_) => Some(EnumValueKind::Date),
        }
    }
}

/// Physical row role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumRowRole {
    Header,
    Data,
    Totals,
}

/// Derived column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecColumn {
    /// Raw record key.
    pub name: String,
    /// Header text.
    pub label: String,
    /// Column-level kind (aggregate eligibility only).
    pub kind: EnumValueKind,
    /// Render width in character units.
    pub width: f64,
}

/// Unstyled row produced by the layout builder.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecLayoutRow {
    pub role: EnumRowRole,
    /// 1-based physical row number.
    pub row_num: usize,
    pub values: Vec<EnumCellValue>,
}

/// Output of the layout builder.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetLayout {
    pub sheet_name: String,
    pub columns: Vec<SpecColumn>,
    /// Header row followed by data rows.
    pub rows: Vec<SpecLayoutRow>,
    /// Reserved physical row number of the totals row.
    pub row_num_totals: Option<usize>,
    /// Rows frozen above the scroll area (0 disables).
    pub row_freeze: usize,
    pub if_autofilter: bool,
}

/// One styled cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecCell {
    pub value: EnumCellValue,
    pub format: SpecCellFormat,
}

/// One styled row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRow {
    pub role: EnumRowRole,
    /// 1-based physical row number.
    pub row_num: usize,
    pub cells: Vec<SpecCell>,
}

/// Header-row filter range, 0-based inclusive columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecAutofilter {
    pub row_idx: usize,
    pub col_idx_first: usize,
    pub col_idx_last: usize,
}

/// Fully laid-out, styled grid handed to the container encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetGrid {
    pub sheet_name: String,
    pub columns: Vec<SpecColumn>,
    pub rows: Vec<SpecRow>,
    /// Rows frozen above the scroll area (0 disables).
    pub row_freeze: usize,
    pub autofilter: Option<SpecAutofilter>,
}

impl SpecSheetGrid {
    /// Rows with the given role.
    pub fn rows_by_role(&self, role: EnumRowRole) -> impl Iterator<Item = &SpecRow> {
        self.rows.iter().filter(move |row| row.role == role)
    }

    /// The totals row, if one was synthesized.
    pub fn totals_row(&self) -> Option<&SpecRow> {
        self.rows_by_role(EnumRowRole::Totals).next()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExportOptions

/// Replacement text for numbers a worksheet cannot hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportValuePolicy {
    /// Replacement text for NaN.
    pub nan_str: String,
    /// Replacement text for positive infinity.
    pub posinf_str: String,
    /// Replacement text for negative infinity.
    pub neginf_str: String,
}

impl Default for SpecExportValuePolicy {
    fn default() -> Self {
        Self {
            nan_str: "NaN".to_string(),
            posinf_str: "Inf".to_string(),
            neginf_str: "-Inf".to_string(),
        }
    }
}

/// Exporter-wide options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecExportOptions {
    /// Worksheet name (sanitized before use).
    pub sheet_name: String,
    /// Fixed width of every column.
    pub width_column: f64,
    /// Keep the header row visible while scrolling.
    pub if_freeze_header: bool,
    /// Add filter controls across the header row.
    pub if_autofilter: bool,
    /// Fill even-numbered data rows.
    pub if_banding: bool,
    /// Append a totals row when a numeric column exists.
    pub if_totals: bool,
    /// First-cell label of the totals row.
    pub totals_label: String,
    /// Non-finite number replacement policy.
    pub value_policy: SpecExportValuePolicy,
    /// Format layers.
    pub formats: SpecExportFormats,
}

impl Default for SpecExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            width_column: N_WIDTH_COLUMN_DEFAULT,
            if_freeze_header: true,
            if_autofilter: true,
            if_banding: true,
            if_totals: true,
            totals_label: C_TOTALS_LABEL.to_string(),
            value_policy: SpecExportValuePolicy::default(),
            formats: SpecExportFormats::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportAndArtifact

/// Per-export report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecExportReport {
    /// Number of data rows written.
    pub n_rows_data: usize,
    /// Number of columns written.
    pub n_columns: usize,
    /// Raw names of columns summed in the totals row.
    pub cols_numeric: Vec<String>,
    /// Whether a totals row was appended.
    pub if_has_totals: bool,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecExportReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// Named binary document returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportArtifact {
    /// Suggested download name: `<base_name>.xlsx`.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Complete workbook bytes.
    pub bytes: Vec<u8>,
    pub report: SpecExportReport,
}

/// Top-level export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Input cannot be turned into a worksheet.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The container encoder could not produce a document.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_right_side_wins_only_when_set() {
        let fmt_base = SpecCellFormat {
            font_name: Some("Arial".to_string()),
            bold: Some(false),
            ..Default::default()
        };
        let fmt = fmt_base.with_(SpecCellFormat {
            bold: Some(true),
            bg_color: Some("#E6E6E6".to_string()),
            ..Default::default()
        });

        assert_eq!(fmt.font_name.as_deref(), Some("Arial"));
        assert_eq!(fmt.bold, Some(true));
        assert_eq!(fmt.bg_color.as_deref(), Some("#E6E6E6"));
        assert_eq!(fmt.border, None);
    }

    #[test]
    fn test_record_insert_keeps_first_position() {
        let record = SpecRecord::new()
            .with_("b", 1)
            .with_("a", "x")
            .with_("b", 2);

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&EnumRecordValue::Number(2.0)));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_record_value_from_option_and_date() {
        assert_eq!(
            EnumRecordValue::from(None::<f64>),
            EnumRecordValue::Empty
        );
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            EnumRecordValue::from(date),
            EnumRecordValue::Date(date.and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_cell_value_kind() {
        assert_eq!(EnumCellValue::None.kind(), None);
        assert_eq!(
            EnumCellValue::Boolean(true).kind(),
            Some(EnumValueKind::Text)
        );
        assert_eq!(
            EnumCellValue::Formula("SUM(B2:B3)".to_string()).kind(),
            Some(EnumValueKind::Number)
        );
    }
}
