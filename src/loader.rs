// Loading and normalization of facility-month exports.
//
// Reading is strict about the table shape (header row, unique names, every
// row the same width) and permissive about cell contents: indicator cells
// that are blank or do not parse become 0.
use crate::error::{ReportError, Result};
use crate::indicators;
use crate::period::Period;
use crate::types::{Dataset, RawTable, Record};
use crate::util::parse_f64_safe;
use csv::ReaderBuilder;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub descriptor_columns: usize,
    pub indicator_columns: usize,
    /// Non-blank indicator cells that failed to parse and were zeroed.
    pub coerced_cells: usize,
    pub blank_cells: usize,
}

pub fn load_csv_path(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading CSV");
    let file = std::fs::File::open(path)?;
    load_csv_reader(file)
}

pub fn load_csv_reader<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ReportError::structure("missing header row"));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

/// Read and normalize in one step.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<(Dataset, LoadReport)> {
    let raw = load_csv_path(path)?;
    normalize_with_report(&raw)
}

pub fn normalize(raw: &RawTable) -> Result<Dataset> {
    normalize_with_report(raw).map(|(dataset, _)| dataset)
}

/// Turn a raw table into a numeric-safe dataset.
///
/// Descriptor columns are kept as text (blank cells dropped). Every other
/// column becomes an indicator whose cells are parsed as numbers, with blank
/// or malformed cells set to 0. Derived `quarter`/`year` columns in the input
/// are discarded and recomputed from `periodname`.
pub fn normalize_with_report(raw: &RawTable) -> Result<(Dataset, LoadReport)> {
    validate_shape(raw)?;

    let derived = [indicators::QUARTER, indicators::YEAR];
    let kept: Vec<(usize, &str)> = raw
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| (i, h.as_str()))
        .filter(|(_, h)| !derived.contains(h))
        .collect();

    let mut report = LoadReport {
        total_rows: raw.rows.len(),
        ..LoadReport::default()
    };
    for (_, h) in &kept {
        if indicators::is_descriptor(h) {
            report.descriptor_columns += 1;
        } else {
            report.indicator_columns += 1;
        }
    }

    let mut records = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let mut descriptors = BTreeMap::new();
        let mut values = HashMap::with_capacity(report.indicator_columns);
        for &(i, header) in &kept {
            let cell = row[i].as_str();
            let blank = cell.trim().is_empty();
            if indicators::is_descriptor(header) {
                if !blank {
                    descriptors.insert(header.to_string(), cell.to_string());
                }
                continue;
            }
            let value = match parse_f64_safe(Some(cell)) {
                Some(v) => v,
                None => {
                    if blank {
                        report.blank_cells += 1;
                    } else {
                        report.coerced_cells += 1;
                    }
                    0.0
                }
            };
            values.insert(header.to_string(), value);
        }
        let period = descriptors
            .get(indicators::PERIOD)
            .map_or_else(Period::unknown, |label| Period::classify(label));
        records.push(Record {
            descriptors,
            indicators: values,
            period,
        });
    }

    if report.coerced_cells > 0 {
        warn!(
            cells = report.coerced_cells,
            "non-numeric indicator cells treated as 0"
        );
    }
    info!(
        rows = report.total_rows,
        indicators = report.indicator_columns,
        descriptors = report.descriptor_columns,
        "dataset normalized"
    );

    let headers = kept.into_iter().map(|(_, h)| h.to_string()).collect();
    Ok((Dataset::new(headers, records), report))
}

fn validate_shape(raw: &RawTable) -> Result<()> {
    if raw.headers.is_empty() {
        return Err(ReportError::structure("missing header row"));
    }
    let mut seen = HashSet::new();
    for h in &raw.headers {
        if !seen.insert(h.as_str()) {
            return Err(ReportError::Structure {
                message: format!("duplicate column name {h:?}"),
                line: Some(1),
            });
        }
    }
    for (i, row) in raw.rows.iter().enumerate() {
        if row.len() != raw.headers.len() {
            return Err(ReportError::Structure {
                message: format!(
                    "row has {} fields, header has {}",
                    row.len(),
                    raw.headers.len()
                ),
                // header is line 1
                line: Some(i as u64 + 2),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Quarter;

    const SAMPLE: &str = "\
periodname,orgunitlevel1,orgunitlevel2,orgunitlevel3,organisationunitcode,PMTCT_ANC_1 Number of New ANC clients,Notes
March 2023,Lagos,Ikeja,General Hospital,00123,100,
April 2023,Kano,,,00456,abc,12
";

    #[test]
    fn normalizes_descriptors_and_indicators() {
        let raw = load_csv_reader(SAMPLE.as_bytes()).expect("loads");
        let (ds, report) = normalize_with_report(&raw).expect("normalizes");

        assert_eq!(ds.len(), 2);
        assert_eq!(report.descriptor_columns, 5);
        assert_eq!(report.indicator_columns, 2);
        assert_eq!(report.coerced_cells, 1);
        assert_eq!(report.blank_cells, 1);

        let first = &ds.records()[0];
        assert_eq!(first.region(), Some("Lagos"));
        assert_eq!(first.descriptor("organisationunitcode"), Some("00123"));
        assert_eq!(first.value(indicators::ANC_CLIENTS), 100.0);
        assert_eq!(first.value("Notes"), 0.0);
        assert_eq!(first.period.quarter, Quarter::Unknown);
        assert_eq!(first.period.year.label(), "2023");

        let second = &ds.records()[1];
        assert_eq!(second.sub_region(), None);
        assert_eq!(second.facility(), None);
        assert_eq!(second.value(indicators::ANC_CLIENTS), 0.0);
        assert_eq!(second.value("Notes"), 12.0);
    }

    #[test]
    fn ragged_rows_are_fatal() {
        let input = "periodname,a\nMarch 2023,1,2\n";
        assert!(load_csv_reader(input.as_bytes()).is_err());

        let raw = RawTable {
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into()]],
        };
        match normalize(&raw) {
            Err(ReportError::Structure { line, .. }) => assert_eq!(line, Some(2)),
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_and_duplicate_headers_are_fatal() {
        assert!(load_csv_reader("".as_bytes()).is_err());

        let raw = load_csv_reader("a,a\n1,2\n".as_bytes()).expect("csv accepts duplicates");
        assert!(matches!(normalize(&raw), Err(ReportError::Structure { .. })));
    }

    #[test]
    fn derived_period_columns_are_recomputed() {
        let input = "periodname,quarter,year,x\nJuly 2022,Quarter 1,1999,5\n";
        let ds = normalize(&load_csv_reader(input.as_bytes()).expect("loads")).expect("ok");
        assert_eq!(ds.headers(), ["periodname".to_string(), "x".to_string()]);
        let r = &ds.records()[0];
        assert_eq!(r.period.quarter, Quarter::Unknown);
        assert_eq!(r.period.year.label(), "2022");

        let input = "periodname,quarter,x\nJuly,Quarter 1,5\n";
        let ds = normalize(&load_csv_reader(input.as_bytes()).expect("loads")).expect("ok");
        assert_eq!(ds.records()[0].period.quarter, Quarter::Q3);
    }

    #[test]
    fn missing_period_column_gives_unknown_period() {
        let ds = normalize(&load_csv_reader("x\n1\n".as_bytes()).expect("loads")).expect("ok");
        assert_eq!(ds.records()[0].period, Period::unknown());
    }
}
