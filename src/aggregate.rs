// Column aggregation over a filtered view.
//
// Lookups are by exact column name. A column the dataset does not carry
// aggregates to 0 so every cascade can run on a partial upload.
use crate::filter::FilteredView;
use crate::util::average;
use std::collections::BTreeMap;

/// `numerator / denominator * 100`, or 0 when the denominator is not positive.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Read-only aggregate access to one filtered view.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    view: &'a FilteredView<'a>,
}

impl<'a> Aggregator<'a> {
    pub fn new(view: &'a FilteredView<'a>) -> Self {
        Self { view }
    }

    pub fn record_count(&self) -> usize {
        self.view.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.view.has_column(column)
    }

    /// Total of an indicator column; 0 if the column is absent.
    pub fn sum(&self, column: &str) -> f64 {
        if !self.view.source().is_indicator(column) {
            return 0.0;
        }
        self.view.records().iter().map(|r| r.value(column)).sum()
    }

    /// Sum of several columns.
    pub fn sum_all(&self, columns: &[&str]) -> f64 {
        columns.iter().map(|c| self.sum(c)).sum()
    }

    /// Mean of an indicator column over the view; 0 if absent or empty.
    pub fn mean(&self, column: &str) -> f64 {
        if !self.view.source().is_indicator(column) {
            return 0.0;
        }
        let values: Vec<f64> = self.view.records().iter().map(|r| r.value(column)).collect();
        average(&values)
    }

    /// Per-group means of `columns`, grouped by the text of descriptor
    /// column `group_by` and ordered by group key.
    ///
    /// Returns `None` when the dataset has no `group_by` column. Records with a
    /// blank group cell are left out.
    pub fn grouped_means(
        &self,
        group_by: &str,
        columns: &[&str],
    ) -> Option<Vec<(String, Vec<f64>)>> {
        if !self.view.has_column(group_by) {
            return None;
        }
        let mut groups: BTreeMap<&str, Vec<Vec<f64>>> = BTreeMap::new();
        for record in self.view.records() {
            let Some(key) = record.descriptor(group_by) else {
                continue;
            };
            let acc = groups
                .entry(key)
                .or_insert_with(|| vec![Vec::new(); columns.len()]);
            for (slot, column) in acc.iter_mut().zip(columns) {
                slot.push(record.value(column));
            }
        }
        Some(
            groups
                .into_iter()
                .map(|(key, samples)| {
                    let means = samples.iter().map(|s| average(s)).collect();
                    (key.to_string(), means)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{self, Dimension, FilterSelection};
    use crate::loader::{load_csv_reader, normalize};
    use crate::types::Dataset;

    fn dataset() -> Dataset {
        let input = "\
periodname,orgunitlevel1,tested,clients,rate
January 2023,Lagos,10,20,85
January 2023,Kano,5,,95
February 2023,Lagos,x,10,70
";
        normalize(&load_csv_reader(input.as_bytes()).expect("loads")).expect("normalizes")
    }

    #[test]
    fn percentage_guards_zero_denominator() {
        assert_eq!(percentage(90.0, 100.0), 90.0);
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(3.0, -1.0), 0.0);
    }

    #[test]
    fn sums_tolerate_missing_and_malformed() {
        let ds = dataset();
        let view = filter::FilteredView::unfiltered(&ds);
        let agg = Aggregator::new(&view);
        assert_eq!(agg.sum("tested"), 15.0);
        assert_eq!(agg.sum("clients"), 30.0);
        assert_eq!(agg.sum("not a column"), 0.0);
        assert_eq!(agg.sum("periodname"), 0.0);
        assert_eq!(agg.sum_all(&["tested", "clients"]), 45.0);
    }

    #[test]
    fn sums_respect_the_filter() {
        let ds = dataset();
        let sel = FilterSelection::new().with(Dimension::Region, ["Lagos"]);
        let view = filter::apply(&ds, &sel);
        let agg = Aggregator::new(&view);
        assert_eq!(agg.record_count(), 2);
        assert_eq!(agg.sum("tested"), 10.0);
    }

    #[test]
    fn grouped_means_by_period() {
        let ds = dataset();
        let view = filter::FilteredView::unfiltered(&ds);
        let agg = Aggregator::new(&view);
        let groups = agg
            .grouped_means("periodname", &["rate", "missing"])
            .expect("period column present");
        assert_eq!(
            groups,
            vec![
                ("February 2023".to_string(), vec![70.0, 0.0]),
                ("January 2023".to_string(), vec![90.0, 0.0]),
            ]
        );
        assert!(agg.grouped_means("no such column", &["rate"]).is_none());
        assert!((agg.mean("rate") - 250.0 / 3.0).abs() < 1e-9);
    }
}
