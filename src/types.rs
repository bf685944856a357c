use crate::indicators;
use crate::period::Period;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tabled::Tabled;

/// A loaded but not yet normalized table: header row plus text cells.
///
/// Every row has exactly `headers.len()` cells; the loader rejects anything
/// ragged before a `RawTable` is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One facility-month row after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Non-blank descriptor cells, kept verbatim.
    pub descriptors: BTreeMap<String, String>,
    /// Every indicator column of the dataset, coerced to a number.
    pub indicators: HashMap<String, f64>,
    pub period: Period,
}

impl Record {
    pub fn descriptor(&self, column: &str) -> Option<&str> {
        self.descriptors.get(column).map(String::as_str)
    }

    /// Indicator value, or 0 when the column is absent.
    pub fn value(&self, column: &str) -> f64 {
        self.indicators.get(column).copied().unwrap_or(0.0)
    }

    pub fn period_label(&self) -> Option<&str> {
        self.descriptor(indicators::PERIOD)
    }

    pub fn region(&self) -> Option<&str> {
        self.descriptor(indicators::REGION)
    }

    pub fn sub_region(&self) -> Option<&str> {
        self.descriptor(indicators::SUB_REGION)
    }

    pub fn facility(&self) -> Option<&str> {
        self.descriptor(indicators::FACILITY)
    }
}

/// Normalized table: ordered records sharing one column schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub(crate) fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Self { headers, records }
    }

    /// Source header order, derived columns excluded.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn indicator_columns(&self) -> impl Iterator<Item = &str> {
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|h| !indicators::is_descriptor(h))
    }

    pub fn is_indicator(&self, column: &str) -> bool {
        !indicators::is_descriptor(column) && self.has_column(column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Adequate,
    Moderate,
    Critical,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Band::Adequate => "Adequate",
            Band::Moderate => "Moderate",
            Band::Critical => "Critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percentage {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<Band>,
}

/// Output of one named cascade computation.
///
/// The first percentage is the headline figure; `band` classifies it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeResult {
    pub title: String,
    pub stages: Vec<Stage>,
    pub percentages: Vec<Percentage>,
    pub band: Option<Band>,
}

impl CascadeResult {
    pub fn labels(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.stages.iter().map(|s| s.value).collect()
    }

    pub fn stage(&self, label: &str) -> Option<f64> {
        self.stages.iter().find(|s| s.label == label).map(|s| s.value)
    }

    pub fn percentage(&self, label: &str) -> Option<f64> {
        self.percentages
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.value)
    }

    pub fn headline(&self) -> Option<f64> {
        self.percentages.first().map(|p| p.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: String,
    pub comprehensive: f64,
    pub spoke: f64,
}

/// Per-period mean reporting rates for comprehensive and spoke sites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportingTrend {
    pub points: Vec<TrendPoint>,
    pub target: f64,
    pub comprehensive: Percentage,
    pub spoke: Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyIndicators {
    pub anc_hiv_testing: f64,
    pub ld_hiv_testing: f64,
    pub hbv_testing: f64,
    pub hcv_testing: f64,
    pub eid_coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub filtered_records: usize,
    pub total_records: usize,
    pub total_anc_clients: f64,
    pub total_hiv_positive: f64,
    pub total_deliveries: f64,
    pub eid_samples: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StageRow {
    #[serde(rename = "Cascade")]
    #[tabled(rename = "Cascade")]
    pub cascade: String,
    #[serde(rename = "Stage")]
    #[tabled(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PercentageRow {
    #[serde(rename = "Cascade")]
    #[tabled(rename = "Cascade")]
    pub cascade: String,
    #[serde(rename = "Measure")]
    #[tabled(rename = "Measure")]
    pub measure: String,
    #[serde(rename = "Percent")]
    #[tabled(rename = "Percent")]
    pub percent: String,
    #[serde(rename = "Band")]
    #[tabled(rename = "Band")]
    pub band: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "Comprehensive")]
    #[tabled(rename = "Comprehensive")]
    pub comprehensive: String,
    #[serde(rename = "Spoke")]
    #[tabled(rename = "Spoke")]
    pub spoke: String,
}
