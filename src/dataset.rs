//! Dataset artifact persistence.
//!
//! One CSV artifact per period: the five common columns plus the
//! resource id, then the sorted union of every attribute key present in
//! the record set. Cells whose column does not apply to a row are left
//! empty. The artifact is replaced wholesale on regeneration: the
//! writer produces a sibling temp file and renames it over the target
//! so a concurrent reader never observes a half-written dataset.

use crate::error::{Error, Result};
use crate::models::{AttrValue, CostRecord, Dataset, Service};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::warn;

const COMMON_COLUMNS: [&str; 6] = [
    "service",
    "resource_id",
    "cost_usd",
    "account_id",
    "start_date",
    "end_date",
];

/// Write the record set, replacing any prior artifact at `path`.
pub fn write_atomic(path: &Path, records: &[CostRecord]) -> Result<()> {
    let attr_columns: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.attributes.keys().map(String::as_str))
        .collect();

    let tmp_path = path.with_extension("tmp");
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    {
        let mut writer = csv::Writer::from_path(&tmp_path)?;

        let mut header: Vec<&str> = COMMON_COLUMNS.to_vec();
        header.extend(attr_columns.iter().copied());
        writer.write_record(&header)?;

        for record in records {
            let mut row: Vec<String> = vec![
                record.service.label().to_string(),
                record.resource_id.clone(),
                record.cost_usd.to_string(),
                record.account_id.clone(),
                record.start_date.to_string(),
                record.end_date.to_string(),
            ];
            for column in &attr_columns {
                row.push(match record.attributes.get(*column) {
                    Some(value) => value.to_string(),
                    None => String::new(),
                });
            }
            writer.write_record(&row)?;
        }

        writer.flush()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read an artifact back into records. Rows naming a service outside
/// the closed set are dropped with a warning rather than failing the
/// whole dataset.
pub fn read(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?;

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        match parse_row(&header, &row) {
            Some(record) => records.push(record),
            None => warn!(path = %path.display(), "dropping dataset row with unknown service"),
        }
    }

    Ok(Dataset::new(records))
}

fn parse_row(header: &[String], row: &csv::StringRecord) -> Option<CostRecord> {
    let field = |name: &str| -> &str {
        header
            .iter()
            .position(|h| h == name)
            .and_then(|idx| row.get(idx))
            .unwrap_or("")
    };

    let service = Service::from_label(field("service"))?;
    let cost_usd = field("cost_usd").parse::<f64>().unwrap_or(0.0);
    let start_date = parse_date(field("start_date"))?;
    let end_date = parse_date(field("end_date"))?;

    let mut record = CostRecord {
        service,
        resource_id: field("resource_id").to_string(),
        cost_usd,
        account_id: field("account_id").to_string(),
        start_date,
        end_date,
        attributes: Default::default(),
    };

    for (idx, column) in header.iter().enumerate() {
        if COMMON_COLUMNS.contains(&column.as_str()) {
            continue;
        }
        let cell = row.get(idx).unwrap_or("");
        if cell.is_empty() {
            continue;
        }
        let value = match cell.parse::<f64>() {
            Ok(n) => AttrValue::Num(n),
            Err(_) => AttrValue::Text(cell.to_string()),
        };
        record.attributes.insert(column.clone(), value);
    }

    Some(record)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;

    fn period() -> Period {
        Period {
            label: "feb-2025".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 2, 24).unwrap(),
        }
    }

    fn sample_records() -> Vec<CostRecord> {
        vec![
            CostRecord::new(Service::CloudWatch, "/aws/logs/a", 80.0, "000000000000", &period())
                .with_attr("log_group_name", "/aws/logs/a")
                .with_attr("size_gb", 80.0),
            CostRecord::new(Service::Waf, "WAF", 12.25, "000000000000", &period()),
        ]
    }

    #[test]
    fn test_round_trip_preserves_records_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_costs.csv");

        let records = sample_records();
        write_atomic(&path, &records).unwrap();
        let dataset = read(&path).unwrap();

        assert_eq!(dataset.records, records);
    }

    #[test]
    fn test_header_is_superset_union() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_costs.csv");
        write_atomic(&path, &sample_records()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "service,resource_id,cost_usd,account_id,start_date,end_date,log_group_name,size_gb"
        );
        // WAF row leaves the attribute cells empty
        assert!(content.lines().nth(2).unwrap().ends_with(",,"));
    }

    #[test]
    fn test_write_replaces_prior_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_costs.csv");

        write_atomic(&path, &sample_records()).unwrap();
        write_atomic(&path, &sample_records()[..1]).unwrap();

        let dataset = read(&path).unwrap();
        assert_eq!(dataset.len(), 1);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_empty_record_set_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_costs.csv");
        write_atomic(&path, &[]).unwrap();

        let dataset = read(&path).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_missing_artifact_is_data_unavailable() {
        assert!(matches!(
            read(Path::new("/nonexistent/all_costs.csv")),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_unknown_service_rows_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_costs.csv");
        fs::write(
            &path,
            "service,resource_id,cost_usd,account_id,start_date,end_date\n\
             Lightsail,x,1.0,000000000000,2025-02-01,2025-02-24\n\
             WAF,WAF,2.0,000000000000,2025-02-01,2025-02-24\n",
        )
        .unwrap();

        let dataset = read(&path).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].service, Service::Waf);
    }
}
