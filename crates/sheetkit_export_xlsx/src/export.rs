//! Export entry points: record sequence in, named workbook artifact out.

use polars::prelude::DataFrame;

use crate::aggregate::synthesize_totals_row;
use crate::conf::C_MIME_TYPE_XLSX;
use crate::format::{apply_border_pass, format_layout};
use crate::layout::plan_sheet_layout;
use crate::schema::infer_columns;
use crate::source::{records_from_dataframe, records_from_ipc_bytes, records_from_json};
use crate::spec::{
    ExportError, SpecExportArtifact, SpecExportOptions, SpecExportReport, SpecRecord,
    SpecSheetGrid,
};
use crate::util::{derive_file_name, validate_sheet_limits};
use crate::writer::encode_sheet_grid;

/// Record-to-workbook exporter bound to one set of options.
///
/// Holds no state between calls; every export builds fresh intermediate
/// structures.
#[derive(Debug, Clone, Default)]
pub struct XlsxExporter {
    options: SpecExportOptions,
}

impl XlsxExporter {
    /// Create exporter with explicit options.
    pub fn new(options: SpecExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SpecExportOptions {
        &self.options
    }

    /// Run stages 1-4 and the border pass, returning the styled grid.
    pub fn build_grid(
        &self,
        records: &[SpecRecord],
        report: &mut SpecExportReport,
    ) -> Result<SpecSheetGrid, ExportError> {
        let options = &self.options;

        let columns = infer_columns(records, options.width_column, &options.value_policy);
        log::debug!(
            "inferred {} columns from {} records",
            columns.len(),
            records.len()
        );

        let layout = plan_sheet_layout(records, columns, options, report);
        let n_height_total = layout.rows.len() + usize::from(layout.row_num_totals.is_some());
        validate_sheet_limits(n_height_total, layout.columns.len())
            .map_err(ExportError::InvalidInput)?;

        let row_num_totals = layout.row_num_totals;
        let grid = format_layout(&layout, &options.formats, options.if_banding);
        let grid = synthesize_totals_row(
            grid,
            row_num_totals,
            &options.totals_label,
            &options.formats,
            report,
        );
        log::debug!(
            "laid out {} rows (totals: {})",
            grid.rows.len(),
            report.if_has_totals
        );

        Ok(apply_border_pass(grid, &options.formats.border))
    }

    /// Export records into `<base_name>.xlsx`.
    ///
    /// Returns either a complete artifact or an error, never partial bytes.
    pub fn export(
        &self,
        records: &[SpecRecord],
        base_name: &str,
    ) -> Result<SpecExportArtifact, ExportError> {
        let file_name = derive_file_name(base_name).map_err(ExportError::InvalidInput)?;

        let mut report = SpecExportReport::default();
        let grid = self.build_grid(records, &mut report)?;
        report.n_rows_data = records.len();
        report.n_columns = grid.columns.len();

        let bytes = encode_sheet_grid(&grid)?;
        log::debug!("exported {file_name:?} ({} bytes)", bytes.len());

        Ok(SpecExportArtifact {
            file_name,
            mime_type: C_MIME_TYPE_XLSX.to_string(),
            bytes,
            report,
        })
    }

    /// Export a JSON array of objects.
    pub fn export_json(
        &self,
        c_json: &str,
        base_name: &str,
    ) -> Result<SpecExportArtifact, ExportError> {
        let records = records_from_json(c_json).map_err(ExportError::InvalidInput)?;
        self.export(&records, base_name)
    }

    /// Export every row of a dataframe.
    pub fn export_dataframe(
        &self,
        df: &DataFrame,
        base_name: &str,
    ) -> Result<SpecExportArtifact, ExportError> {
        let records = records_from_dataframe(df).map_err(ExportError::InvalidInput)?;
        self.export(&records, base_name)
    }

    /// Export a Polars IPC payload.
    pub fn export_ipc_bytes(
        &self,
        v_ipc_df: &[u8],
        base_name: &str,
    ) -> Result<SpecExportArtifact, ExportError> {
        let records = records_from_ipc_bytes(v_ipc_df).map_err(ExportError::InvalidInput)?;
        self.export(&records, base_name)
    }
}

/// Export records with default options.
pub fn export(records: &[SpecRecord], base_name: &str) -> Result<SpecExportArtifact, ExportError> {
    XlsxExporter::default().export(records, base_name)
}
