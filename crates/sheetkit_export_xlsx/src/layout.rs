//! Layout builder: physical row assignment for header, data and totals.

use std::collections::BTreeSet;

use crate::schema::classify_record_value;
use crate::spec::{
    EnumCellValue, EnumRowRole, EnumValueKind, SpecColumn, SpecExportOptions, SpecExportReport,
    SpecLayoutRow, SpecRecord, SpecSheetLayout,
};
use crate::util::sanitize_sheet_name;

/// Assign physical rows.
///
/// Row 1 is the header, rows `2..=N+1` hold the records in input order and
/// row `N+2` is reserved for totals when a numeric column exists and totals
/// are enabled. Keys a record carries beyond the column set are ignored and
/// reported.
pub fn plan_sheet_layout(
    records: &[SpecRecord],
    columns: Vec<SpecColumn>,
    options: &SpecExportOptions,
    report: &mut SpecExportReport,
) -> SpecSheetLayout {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(SpecLayoutRow {
        role: EnumRowRole::Header,
        row_num: 1,
        values: columns
            .iter()
            .map(|col| EnumCellValue::String(col.label.clone()))
            .collect(),
    });

    let set_names: BTreeSet<&str> = columns.iter().map(|col| col.name.as_str()).collect();
    for (n_idx_record, record) in records.iter().enumerate() {
        let l_keys_extra: Vec<&str> = record
            .keys()
            .filter(|c_key| !set_names.contains(c_key))
            .collect();
        if !l_keys_extra.is_empty() {
            let c_msg = format!(
                "Record {n_idx_record}: keys not in first record ignored: {l_keys_extra:?}"
            );
            log::warn!("{c_msg}");
            report.warn(c_msg);
        }

        rows.push(SpecLayoutRow {
            role: EnumRowRole::Data,
            row_num: n_idx_record + 2,
            values: columns
                .iter()
                .map(|col| {
                    record
                        .get(&col.name)
                        .map_or(EnumCellValue::None, |value| {
                            classify_record_value(value, &options.value_policy)
                        })
                })
                .collect(),
        });
    }

    let if_has_numeric = columns
        .iter()
        .any(|col| col.kind == EnumValueKind::Number);
    let row_num_totals = if options.if_totals && if_has_numeric {
        Some(records.len() + 2)
    } else {
        None
    };

    SpecSheetLayout {
        sheet_name: sanitize_sheet_name(&options.sheet_name, "_"),
        columns,
        rows,
        row_num_totals,
        row_freeze: if options.if_freeze_header { 1 } else { 0 },
        if_autofilter: options.if_autofilter,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::schema::infer_columns;

    fn plan(
        records: &[SpecRecord],
        options: &SpecExportOptions,
    ) -> (SpecSheetLayout, SpecExportReport) {
        let mut report = SpecExportReport::default();
        let columns = infer_columns(records, options.width_column, &options.value_policy);
        let layout = plan_sheet_layout(records, columns, options, &mut report);
        (layout, report)
    }

    #[test]
    fn test_plan_sheet_layout_rows_in_input_order() {
        let records = vec![
            SpecRecord::new().with_("name", "b").with_("qty", 2),
            SpecRecord::new().with_("name", "a").with_("qty", 1),
            SpecRecord::new().with_("name", "c"),
        ];

        let (layout, report) = plan(&records, &SpecExportOptions::default());

        let l_row_nums: Vec<usize> = layout.rows.iter().map(|row| row.row_num).collect();
        assert_eq!(l_row_nums, vec![1, 2, 3, 4]);
        assert_eq!(layout.rows[0].role, EnumRowRole::Header);
        assert_eq!(
            layout.rows[0].values,
            vec![
                EnumCellValue::String("Name".to_string()),
                EnumCellValue::String("Qty".to_string())
            ]
        );
        assert_eq!(layout.rows[1].values[0], EnumCellValue::String("b".to_string()));
        assert_eq!(layout.rows[2].values[0], EnumCellValue::String("a".to_string()));
        assert_eq!(layout.rows[3].values[1], EnumCellValue::None);
        assert_eq!(layout.row_num_totals, Some(5));
        assert_eq!(layout.row_freeze, 1);
        assert_eq!(layout.sheet_name, "Data");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_plan_sheet_layout_without_numeric_has_no_totals() {
        let records = vec![SpecRecord::new().with_("name", "x").with_("when", "2024-01-15")];
        let (layout, _) = plan(&records, &SpecExportOptions::default());
        assert_eq!(layout.row_num_totals, None);
    }

    #[test]
    fn test_plan_sheet_layout_totals_disabled() {
        let records = vec![SpecRecord::new().with_("qty", 1)];
        let options = SpecExportOptions {
            if_totals: false,
            if_freeze_header: false,
            ..Default::default()
        };
        let (layout, _) = plan(&records, &options);
        assert_eq!(layout.row_num_totals, None);
        assert_eq!(layout.row_freeze, 0);
    }

    #[test]
    fn test_plan_sheet_layout_empty_input_is_header_only() {
        let (layout, _) = plan(&[], &SpecExportOptions::default());
        assert_eq!(layout.rows.len(), 1);
        assert!(layout.rows[0].values.is_empty());
        assert!(layout.columns.is_empty());
        assert_eq!(layout.row_num_totals, None);
    }

    #[test]
    fn test_plan_sheet_layout_reports_extra_keys() {
        let records = vec![
            SpecRecord::new().with_("a", 1),
            SpecRecord::new().with_("a", 2).with_("b", 3),
        ];
        let (layout, report) = plan(&records, &SpecExportOptions::default());
        assert_eq!(layout.columns.len(), 1);
        assert_eq!(layout.rows[2].values, vec![EnumCellValue::Number(2.0)]);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Record 1"));
    }
}
