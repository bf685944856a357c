use crate::error::Result;
use crate::filter::FilteredView;
use crate::indicators;
use crate::types::{RawTable, Record};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

fn cell(record: &Record, header: &str) -> String {
    if indicators::is_descriptor(header) {
        record.descriptor(header).unwrap_or_default().to_string()
    } else {
        record.value(header).to_string()
    }
}

/// Rebuild a text table from the records in a view.
///
/// Columns follow the source header order. Descriptor cells are written as
/// loaded and indicator cells as their normalized numbers, so normalizing the
/// result again gives back the same records. Derived `quarter` and `year`
/// columns are appended when `include_period_columns` is set.
pub fn to_raw_table(view: &FilteredView<'_>, include_period_columns: bool) -> RawTable {
    let mut headers: Vec<String> = view.source().headers().to_vec();
    if include_period_columns {
        headers.push(indicators::QUARTER.to_string());
        headers.push(indicators::YEAR.to_string());
    }
    let source_headers = view.source().headers();
    let rows = view
        .records()
        .iter()
        .map(|r| {
            let mut row: Vec<String> = source_headers.iter().map(|h| cell(r, h)).collect();
            if include_period_columns {
                row.push(r.period.quarter.label().to_string());
                row.push(r.period.year.label().to_string());
            }
            row
        })
        .collect();
    RawTable { headers, rows }
}

pub fn write_table<W: Write>(writer: W, table: &RawTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the filtered records back out as CSV.
pub fn export_filtered_csv(
    path: impl AsRef<Path>,
    view: &FilteredView<'_>,
    include_period_columns: bool,
) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_table(file, &to_raw_table(view, include_period_columns))?;
    info!(path = %path.display(), rows = view.len(), "filtered data exported");
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{self, Dimension, FilterSelection};
    use crate::loader::{load_csv_reader, normalize};

    const INPUT: &str = "\
periodname,orgunitlevel1,organisationunitcode,clients
March 2023,Lagos,007,12.5
April 2023,,008,oops
";

    #[test]
    fn export_writes_normalized_cells_in_header_order() {
        let ds = normalize(&load_csv_reader(INPUT.as_bytes()).expect("loads")).expect("ok");
        let view = filter::FilteredView::unfiltered(&ds);
        let mut buf = Vec::new();
        write_table(&mut buf, &to_raw_table(&view, false)).expect("writes");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text,
            "periodname,orgunitlevel1,organisationunitcode,clients\n\
             March 2023,Lagos,007,12.5\n\
             April 2023,,008,0\n"
        );
    }

    #[test]
    fn export_can_append_period_columns() {
        let ds = normalize(&load_csv_reader(INPUT.as_bytes()).expect("loads")).expect("ok");
        let sel = FilterSelection::new().with(Dimension::Region, ["Lagos"]);
        let view = filter::apply(&ds, &sel);
        let table = to_raw_table(&view, true);
        assert_eq!(table.headers.last().map(String::as_str), Some("year"));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][4], "Unknown Quarter");
        assert_eq!(table.rows[0][5], "2023");
    }
}
