// Multi-dimensional record filtering over time and geography.
//
// A selection holds, per dimension, the set of accepted values. An empty or
// absent set accepts everything. Dimensions combine conjunctively. Blank
// geography or period cells are selectable through the `BLANK` bucket.
use crate::indicators;
use crate::types::{Dataset, Record};
use crate::util::format_int;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Option value standing for a blank region, sub-region, facility or period cell.
pub const BLANK: &str = "(blank)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Quarter,
    Year,
    Month,
    Region,
    SubRegion,
    Facility,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Quarter,
        Dimension::Year,
        Dimension::Month,
        Dimension::Region,
        Dimension::SubRegion,
        Dimension::Facility,
    ];

    /// The record's value along this dimension.
    ///
    /// Quarter and year always have a value (possibly an "Unknown" bucket);
    /// the others are `None` when the cell was blank or the column is absent.
    /// Selections match `None` against [`BLANK`].
    pub fn value_of(self, record: &Record) -> Option<&str> {
        match self {
            Dimension::Quarter => Some(record.period.quarter.label()),
            Dimension::Year => Some(record.period.year.label()),
            Dimension::Month => record.period_label(),
            Dimension::Region => record.region(),
            Dimension::SubRegion => record.sub_region(),
            Dimension::Facility => record.facility(),
        }
    }

    /// Source column the dimension is read from or derived from.
    pub fn source_column(self) -> &'static str {
        match self {
            Dimension::Quarter | Dimension::Year | Dimension::Month => indicators::PERIOD,
            Dimension::Region => indicators::REGION,
            Dimension::SubRegion => indicators::SUB_REGION,
            Dimension::Facility => indicators::FACILITY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Quarter => "quarter",
            Dimension::Year => "year",
            Dimension::Month => "month",
            Dimension::Region => "region",
            Dimension::SubRegion => "sub-region",
            Dimension::Facility => "facility",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Distinct values available for selection, sorted ascending per dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    values: BTreeMap<Dimension, Vec<String>>,
    // period label -> (quarter label, year label)
    periods: BTreeMap<String, (String, String)>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut sets: BTreeMap<Dimension, BTreeSet<String>> = BTreeMap::new();
        let mut periods = BTreeMap::new();
        for dim in Dimension::ALL {
            if !dataset.has_column(dim.source_column()) {
                continue;
            }
            let set = sets.entry(dim).or_default();
            for record in dataset.records() {
                set.insert(dim.value_of(record).unwrap_or(BLANK).to_string());
            }
        }
        if dataset.has_column(indicators::PERIOD) {
            for record in dataset.records() {
                let label = record.period_label().unwrap_or(BLANK);
                periods.entry(label.to_string()).or_insert_with(|| {
                    (
                        record.period.quarter.label().to_string(),
                        record.period.year.label().to_string(),
                    )
                });
            }
        }
        let values = sets
            .into_iter()
            .map(|(dim, set)| (dim, set.into_iter().collect()))
            .collect();
        Self { values, periods }
    }

    pub fn values(&self, dim: Dimension) -> &[String] {
        self.values.get(&dim).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Months (period labels) consistent with the selection's quarters and years.
    pub fn month_candidates(&self, selection: &FilterSelection) -> Vec<String> {
        self.periods
            .iter()
            .filter(|(_, (quarter, year))| {
                selection.accepts(Dimension::Quarter, Some(quarter.as_str()))
                    && selection.accepts(Dimension::Year, Some(year.as_str()))
            })
            .map(|(label, _)| label.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    selected: BTreeMap<Dimension, BTreeSet<String>>,
}

impl FilterSelection {
    /// Selection with no constraints: every dimension passes everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every available value selected on every dimension, blank buckets
    /// included, so the result keeps every record.
    pub fn all(options: &FilterOptions) -> Self {
        let selected = Dimension::ALL
            .into_iter()
            .map(|d| (d, options.values(d).iter().cloned().collect()))
            .collect();
        Self { selected }
    }

    pub fn with<I, S>(mut self, dim: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(dim, values);
        self
    }

    pub fn set<I, S>(&mut self, dim: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected
            .insert(dim, values.into_iter().map(Into::into).collect());
    }

    pub fn clear(&mut self, dim: Dimension) {
        self.selected.remove(&dim);
    }

    pub fn values(&self, dim: Dimension) -> Option<&BTreeSet<String>> {
        self.selected.get(&dim)
    }

    pub fn count(&self, dim: Dimension) -> usize {
        self.selected.get(&dim).map_or(0, BTreeSet::len)
    }

    pub fn accepts(&self, dim: Dimension, value: Option<&str>) -> bool {
        match self.selected.get(&dim) {
            None => true,
            Some(set) if set.is_empty() => true,
            Some(set) => set.contains(value.unwrap_or(BLANK)),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        Dimension::ALL
            .into_iter()
            .all(|d| self.accepts(d, d.value_of(record)))
    }

    /// Drop selected months that are not candidates under the current
    /// quarter and year selection. A month selection emptied this way falls
    /// back to the full candidate list.
    pub fn constrain_months(&mut self, options: &FilterOptions) {
        let candidates: BTreeSet<String> = options.month_candidates(self).into_iter().collect();
        let months = self.selected.entry(Dimension::Month).or_default();
        months.retain(|m| candidates.contains(m));
        if months.is_empty() {
            *months = candidates;
        }
    }
}

/// Read-only projection of a dataset through a selection.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    source: &'a Dataset,
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn unfiltered(source: &'a Dataset) -> Self {
        Self {
            source,
            records: source.records().iter().collect(),
        }
    }

    pub fn source(&self) -> &'a Dataset {
        self.source
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.source.has_column(column)
    }
}

pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let records: Vec<&Record> = dataset
        .records()
        .iter()
        .filter(|r| selection.matches(r))
        .collect();
    debug!(kept = records.len(), total = dataset.len(), "filter applied");
    FilteredView {
        source: dataset,
        records,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
    pub quarters: usize,
    pub years: usize,
    pub months: usize,
    pub regions: usize,
    pub sub_regions: usize,
    pub facilities: usize,
}

impl FilterSummary {
    pub fn new(view: &FilteredView<'_>, selection: &FilterSelection) -> Self {
        Self {
            shown: view.len(),
            total: view.source().len(),
            quarters: selection.count(Dimension::Quarter),
            years: selection.count(Dimension::Year),
            months: selection.count(Dimension::Month),
            regions: selection.count(Dimension::Region),
            sub_regions: selection.count(Dimension::SubRegion),
            facilities: selection.count(Dimension::Facility),
        }
    }

    pub fn is_narrowed(&self) -> bool {
        self.shown < self.total
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} of {} records shown",
            format_int(self.shown),
            format_int(self.total)
        )?;
        write!(
            f,
            "{} quarter(s), {} year(s), {} month(s), {} region(s), {} sub-region(s), {} facility(s)",
            self.quarters, self.years, self.months, self.regions, self.sub_regions, self.facilities
        )
    }
}
