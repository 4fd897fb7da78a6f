//! Stateless helper utilities shared by the export pipeline stages.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::conf::{
    C_FILE_EXTENSION, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_DATE_LAYOUTS, TUP_DATETIME_LAYOUTS, TUP_EXCEL_ILLEGAL,
};
use crate::spec::SpecExportValuePolicy;

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Convert `NaN`/`Inf` to policy string; return error for finite values.
pub fn convert_nan_inf_to_str(
    x: f64,
    value_policy: &SpecExportValuePolicy,
) -> Result<String, String> {
    if x.is_nan() {
        return Ok(value_policy.nan_str.clone());
    }
    if x.is_infinite() {
        return Ok(if x.is_sign_positive() {
            value_policy.posinf_str.clone()
        } else {
            value_policy.neginf_str.clone()
        });
    }
    Err("Input is neither NaN nor Inf.".to_string())
}

/// Parse a string holding a finite number; surrounding whitespace is ignored.
pub fn parse_finite_number(s: &str) -> Option<f64> {
    let c_trimmed = s.trim();
    if c_trimmed.is_empty() {
        return None;
    }
    c_trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a string holding a calendar date or datetime.
///
/// RFC 3339 / RFC 2822 values with an offset are normalized to UTC.
pub fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    let c_trimmed = s.trim();
    if c_trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(c_trimmed) {
        return Some(dt.naive_utc());
    }
    for c_layout in TUP_DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(c_trimmed, c_layout) {
            return Some(dt);
        }
    }
    for c_layout in TUP_DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(c_trimmed, c_layout) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(c_trimmed) {
        return Some(dt.naive_utc());
    }
    None
}

/// Whether `dt` falls in the worksheet date range `1900-01-01..10000-01-01`.
pub fn is_excel_date_in_range(dt: &NaiveDateTime) -> bool {
    let (Some(date_min), Some(date_max_exclusive)) = (
        NaiveDate::from_ymd_opt(1900, 1, 1),
        NaiveDate::from_ymd_opt(10000, 1, 1),
    ) else {
        return false;
    };
    dt.date() >= date_min && dt.date() < date_max_exclusive
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnNaming

/// Turn a raw record key into a header label.
///
/// Splits on `_` and before every ASCII uppercase letter, title-cases each
/// fragment and joins with spaces. Empty fragments are dropped, so `_id`
/// yields `Id` without a leading space.
pub fn derive_display_label(name: &str) -> String {
    let mut l_fragments: Vec<String> = Vec::new();
    let mut c_current = String::new();

    for chr in name.chars() {
        if chr == '_' {
            l_fragments.push(std::mem::take(&mut c_current));
            continue;
        }
        if chr.is_ascii_uppercase() && !c_current.is_empty() {
            l_fragments.push(std::mem::take(&mut c_current));
        }
        c_current.push(chr);
    }
    l_fragments.push(c_current);

    l_fragments
        .iter()
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| derive_title_case(fragment))
        .collect::<Vec<_>>()
        .join(" ")
}

fn derive_title_case(fragment: &str) -> String {
    let mut chars = fragment.chars();
    match chars.next() {
        Some(chr_first) => chr_first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Convert a zero-based column index to its A1 letters (`0 -> A`, `26 -> AA`).
pub fn derive_column_letter(col_idx: usize) -> String {
    let mut l_letters = Vec::new();
    let mut n_rest = col_idx + 1;
    while n_rest > 0 {
        let n_rem = (n_rest - 1) % 26;
        l_letters.push(char::from(b'A' + n_rem as u8));
        n_rest = (n_rest - 1) / 26;
    }
    l_letters.iter().rev().collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Check the physical grid fits into one worksheet.
///
/// `height_total` counts header, data and totals rows.
pub fn validate_sheet_limits(height_total: usize, width_total: usize) -> Result<(), String> {
    if height_total > N_NROWS_EXCEL_MAX {
        return Err(format!(
            "Excel limit overflow: {height_total} rows exceed {N_NROWS_EXCEL_MAX}."
        ));
    }
    if width_total > N_NCOLS_EXCEL_MAX {
        return Err(format!(
            "Excel limit overflow: {width_total} columns exceed {N_NCOLS_EXCEL_MAX}."
        ));
    }
    Ok(())
}

/// Build the download name `<base_name>.xlsx`.
pub fn derive_file_name(base_name: &str) -> Result<String, String> {
    if base_name.trim().is_empty() {
        return Err("base_name must be non-empty.".to_string());
    }
    Ok(format!("{base_name}{C_FILE_EXTENSION}"))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
