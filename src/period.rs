// Period classification: reporting-period label -> (quarter, calendar year).
//
// The quarter comes from matching the whole label against the twelve English
// month names, exactly and case-sensitively. Anything else, including labels
// like "March 2023", lands in the Unknown Quarter bucket. The year is the
// first "20dd" run anywhere in the label.
use chrono::Month;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

pub const UNKNOWN_QUARTER: &str = "Unknown Quarter";
pub const UNKNOWN_YEAR: &str = "Unknown Year";

static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"20[0-9]{2}").expect("year pattern is a valid regex"));

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Quarter {
    #[serde(rename = "Quarter 1")]
    Q1,
    #[serde(rename = "Quarter 2")]
    Q2,
    #[serde(rename = "Quarter 3")]
    Q3,
    #[serde(rename = "Quarter 4")]
    Q4,
    #[serde(rename = "Unknown Quarter")]
    Unknown,
}

impl Quarter {
    pub fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "Quarter 1",
            Quarter::Q2 => "Quarter 2",
            Quarter::Q3 => "Quarter 3",
            Quarter::Q4 => "Quarter 4",
            Quarter::Unknown => UNKNOWN_QUARTER,
        }
    }

    pub fn of_month(month: Month) -> Self {
        match month.number_from_month() {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Year {
    Known(String),
    Unknown,
}

impl Year {
    pub fn label(&self) -> &str {
        match self {
            Year::Known(y) => y,
            Year::Unknown => UNKNOWN_YEAR,
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Year {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Derived time attributes of a record, computed once at load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub quarter: Quarter,
    pub year: Year,
}

impl Period {
    pub fn classify(label: &str) -> Self {
        Period {
            quarter: quarter_from_month(label),
            year: extract_year(label),
        }
    }

    /// Period of a record that carries no period label at all.
    pub fn unknown() -> Self {
        Period {
            quarter: Quarter::Unknown,
            year: Year::Unknown,
        }
    }
}

/// Exact, case-sensitive lookup of an English month name.
pub fn month_from_name(name: &str) -> Option<Month> {
    MONTHS.iter().copied().find(|m| m.name() == name)
}

pub fn quarter_from_month(name: &str) -> Quarter {
    month_from_name(name).map_or(Quarter::Unknown, Quarter::of_month)
}

pub fn extract_year(label: &str) -> Year {
    YEAR_PATTERN
        .find(label)
        .map_or(Year::Unknown, |m| Year::Known(m.as_str().to_string()))
}
