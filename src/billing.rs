//! Billing export reader.
//!
//! The monthly export is a small CSV with one column per service, each
//! suffixed with a `($)` marker, and a single data row holding that
//! period's total. The reader keeps the header and first row verbatim
//! and answers per-service totals; it never aggregates across rows.

use crate::error::{Error, Result};
use std::path::Path;

/// Marker suffixed to every cost column in the export.
const COST_MARKER: &str = "($)";

/// Columns that carry the marker but are not services.
const NON_SERVICE_COLUMNS: [&str; 2] = ["Service($)", "Total costs($)"];

#[derive(Debug, Clone, Default)]
pub struct BillingExport {
    header: Vec<String>,
    row: Vec<String>,
}

impl BillingExport {
    /// Parse an export file. A missing or unreadable file, or one with
    /// no data row, is `DataUnavailable`.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?;

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = reader.records();
        let first = rows.next().ok_or_else(|| {
            Error::DataUnavailable(format!("{}: export has no data row", path.display()))
        })?;
        let row: Vec<String> = first
            .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?
            .iter()
            .map(|v| v.trim().to_string())
            .collect();

        Ok(Self { header, row })
    }

    /// A reader with no columns; every lookup fails with
    /// `DataUnavailable`. Used when the export file itself is absent so
    /// that the failure surfaces per collector, not in the combiner.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The authoritative total for one service label in this period.
    pub fn total_cost(&self, service_label: &str) -> Result<f64> {
        let column = format!("{service_label}{COST_MARKER}");
        let idx = self
            .header
            .iter()
            .position(|h| *h == column)
            .ok_or_else(|| Error::DataUnavailable(format!("no billing column {column:?}")))?;

        let raw = self
            .row
            .get(idx)
            .ok_or_else(|| Error::DataUnavailable(format!("billing row too short for {column:?}")))?;

        raw.parse::<f64>().map_err(|_| {
            Error::DataUnavailable(format!("billing value {raw:?} in {column:?} is not numeric"))
        })
    }

    /// Service labels present in the export, marker stripped, with the
    /// non-service bookkeeping columns excluded.
    pub fn service_labels(&self) -> Vec<String> {
        self.header
            .iter()
            .filter(|h| h.ends_with(COST_MARKER) && !NON_SERVICE_COLUMNS.contains(&h.as_str()))
            .map(|h| h.trim_end_matches(COST_MARKER).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_export(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_total_cost_reads_first_row() {
        let file = write_export(
            "Service($),CloudWatch($),WAF($),Total costs($)\n2025-02,100.5,12.25,112.75\n",
        );
        let export = BillingExport::load(file.path()).unwrap();
        assert_eq!(export.total_cost("CloudWatch").unwrap(), 100.5);
        assert_eq!(export.total_cost("WAF").unwrap(), 12.25);
    }

    #[test]
    fn test_missing_column_is_data_unavailable() {
        let file = write_export("Service($),CloudWatch($)\n2025-02,100.5\n");
        let export = BillingExport::load(file.path()).unwrap();
        assert!(matches!(
            export.total_cost("SQS"),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        assert!(matches!(
            BillingExport::load(Path::new("/nonexistent/costs.csv")),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_export_without_rows_is_data_unavailable() {
        let file = write_export("Service($),CloudWatch($)\n");
        assert!(matches!(
            BillingExport::load(file.path()),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_service_labels_excludes_bookkeeping_columns() {
        let file = write_export(
            "Service($),CloudWatch($),EC2-Instances($),Total costs($)\n2025-02,1,2,3\n",
        );
        let export = BillingExport::load(file.path()).unwrap();
        assert_eq!(export.service_labels(), vec!["CloudWatch", "EC2-Instances"]);
    }

    #[test]
    fn test_empty_reader_fails_every_lookup() {
        let export = BillingExport::empty();
        assert!(export.total_cost("CloudWatch").is_err());
        assert!(export.service_labels().is_empty());
    }
}
