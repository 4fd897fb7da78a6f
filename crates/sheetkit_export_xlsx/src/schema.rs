//! Schema inference: value classification and column derivation.

use crate::spec::{
    EnumCellValue, EnumRecordValue, EnumValueKind, SpecColumn, SpecExportValuePolicy, SpecRecord,
};
use crate::util::{
    convert_nan_inf_to_str, derive_display_label, is_excel_date_in_range, parse_date_str,
    parse_finite_number,
};

/// Classify one record value into a renderable cell value.
///
/// Precedence is fixed:
/// 1. a native temporal value is a date;
/// 2. a string parseable as a calendar date is a date;
/// 3. a native number, or a string parseable to a finite number, is a number;
/// 4. anything else is text.
///
/// Dates outside the spreadsheet date range and non-finite numbers degrade to
/// text. This never fails.
pub fn classify_record_value(
    value: &EnumRecordValue,
    value_policy: &SpecExportValuePolicy,
) -> EnumCellValue {
    match value {
        EnumRecordValue::Empty => EnumCellValue::None,
        EnumRecordValue::Date(dt) => {
            if is_excel_date_in_range(dt) {
                EnumCellValue::Date(*dt)
            } else {
                EnumCellValue::String(dt.to_string())
            }
        }
        EnumRecordValue::Text(s) => {
            if let Some(dt) = parse_date_str(s)
                && is_excel_date_in_range(&dt)
            {
                return EnumCellValue::Date(dt);
            }
            if let Some(n) = parse_finite_number(s) {
                return EnumCellValue::Number(n);
            }
            EnumCellValue::String(s.clone())
        }
        EnumRecordValue::Number(n) => {
            if n.is_finite() {
                EnumCellValue::Number(*n)
            } else {
                EnumCellValue::String(
                    convert_nan_inf_to_str(*n, value_policy)
                        .unwrap_or_else(|_| value_policy.nan_str.clone()),
                )
            }
        }
        EnumRecordValue::Boolean(b) => EnumCellValue::Boolean(*b),
    }
}

/// Derive the ordered column set from the first record's keys.
///
/// A column is `Number` when at least one value classifies as a number,
/// `Date` when its non-empty values classify only as dates, otherwise `Text`.
/// An empty record sequence yields no columns.
pub fn infer_columns(
    records: &[SpecRecord],
    width_column: f64,
    value_policy: &SpecExportValuePolicy,
) -> Vec<SpecColumn> {
    let Some(record_first) = records.first() else {
        return vec![];
    };

    record_first
        .keys()
        .map(|c_name| {
            let l_kinds: Vec<EnumValueKind> = records
                .iter()
                .filter_map(|record| record.get(c_name))
                .filter_map(|value| classify_record_value(value, value_policy).kind())
                .collect();

            SpecColumn {
                name: c_name.to_string(),
                label: derive_display_label(c_name),
                kind: derive_column_kind(&l_kinds),
                width: width_column,
            }
        })
        .collect()
}

fn derive_column_kind(kinds: &[EnumValueKind]) -> EnumValueKind {
    if kinds.contains(&EnumValueKind::Number) {
        return EnumValueKind::Number;
    }
    if !kinds.is_empty() && kinds.iter().all(|kind| *kind == EnumValueKind::Date) {
        return EnumValueKind::Date;
    }
    EnumValueKind::Text
}
