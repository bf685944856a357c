// Program cascades: funnel stages and coverage ratios over aggregated sums.
//
// Every function here is a pure function of an `Aggregator`. Stages come back
// in display order; the first percentage is the headline and is the one the
// cascade's band classifies.
use crate::aggregate::{percentage, Aggregator};
use crate::indicators as col;
use crate::types::{Band, CascadeResult, Percentage, ReportingTrend, Stage, TrendPoint};

/// Reference line drawn on the reporting-rate chart.
pub const REPORTING_TARGET: f64 = 90.0;

/// Lower bounds (inclusive) of the adequate and moderate bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandThresholds {
    pub adequate: f64,
    pub moderate: f64,
}

impl BandThresholds {
    pub const STANDARD: BandThresholds = BandThresholds {
        adequate: 90.0,
        moderate: 70.0,
    };

    /// Pass/fail at a single cut-off; nothing is ever moderate.
    pub const fn two_tier(cutoff: f64) -> Self {
        BandThresholds {
            adequate: cutoff,
            moderate: cutoff,
        }
    }

    pub fn classify(&self, pct: f64) -> Band {
        if pct >= self.adequate {
            Band::Adequate
        } else if pct >= self.moderate {
            Band::Moderate
        } else {
            Band::Critical
        }
    }
}

pub fn classify(pct: f64) -> Band {
    BandThresholds::STANDARD.classify(pct)
}

fn stages(pairs: &[(&str, f64)]) -> Vec<Stage> {
    pairs
        .iter()
        .map(|(label, value)| Stage {
            label: label.to_string(),
            value: *value,
        })
        .collect()
}

fn banded(label: &str, value: f64, thresholds: BandThresholds) -> Percentage {
    Percentage {
        label: label.to_string(),
        value,
        band: Some(thresholds.classify(value)),
    }
}

fn plain(label: &str, value: f64) -> Percentage {
    Percentage {
        label: label.to_string(),
        value,
        band: None,
    }
}

fn result(title: &str, stages: Vec<Stage>, percentages: Vec<Percentage>) -> CascadeResult {
    let band = percentages.first().and_then(|p| p.band);
    CascadeResult {
        title: title.to_string(),
        stages,
        percentages,
        band,
    }
}

/// Generic two-term comparison: denominator stage, numerator stage, coverage.
pub fn comparison(
    agg: &Aggregator<'_>,
    title: &str,
    numerator_col: &str,
    denominator_col: &str,
    numerator_label: &str,
    denominator_label: &str,
) -> CascadeResult {
    let numerator = agg.sum(numerator_col);
    let denominator = agg.sum(denominator_col);
    result(
        title,
        stages(&[(denominator_label, denominator), (numerator_label, numerator)]),
        vec![banded(
            "Coverage",
            percentage(numerator, denominator),
            BandThresholds::STANDARD,
        )],
    )
}

pub fn anc_hiv_testing(agg: &Aggregator<'_>) -> CascadeResult {
    let clients = agg.sum(col::ANC_CLIENTS);
    let tested = agg.sum(col::HIV_TESTED_ANC);
    result(
        "ANC HIV Testing Coverage",
        stages(&[("ANC Clients", clients), ("HIV Tested (ANC)", tested)]),
        vec![banded(
            "Testing Rate",
            percentage(tested, clients),
            BandThresholds::STANDARD,
        )],
    )
}

pub fn anc_treatment(agg: &Aggregator<'_>) -> CascadeResult {
    let positive = agg.sum(col::HIV_POSITIVE_ANC);
    let early = agg.sum(col::ART_ANC_EARLY);
    let late = agg.sum(col::ART_ANC_LATE);
    let total = early + late;
    result(
        "ANC Treatment Cascade",
        stages(&[
            ("HIV Positive (ANC)", positive),
            ("ART <36wks", early),
            ("ART >36wks", late),
            ("Total ART", total),
        ]),
        vec![
            banded(
                "Total ART Coverage",
                percentage(total, positive),
                BandThresholds::STANDARD,
            ),
            banded(
                "Early ART (<36wks)",
                percentage(early, positive),
                BandThresholds::two_tier(80.0),
            ),
            plain("Late ART (>36wks)", percentage(late, positive)),
        ],
    )
}

pub fn labour_delivery(agg: &Aggregator<'_>) -> CascadeResult {
    let tested = agg.sum(col::HIV_TESTED_LD);
    let positive = agg.sum(col::HIV_POSITIVE_LD);
    let treated = agg.sum(col::ART_LABOUR);
    result(
        "Labour & Delivery Cascade",
        stages(&[
            ("L&D Tested", tested),
            ("L&D Positive", positive),
            ("L&D ART", treated),
        ]),
        vec![
            banded(
                "ART Coverage",
                percentage(treated, positive),
                BandThresholds::STANDARD,
            ),
            plain("Positivity", percentage(positive, tested)),
        ],
    )
}

pub fn previously_known(agg: &Aggregator<'_>) -> CascadeResult {
    let known = agg.sum(col::PREVIOUSLY_KNOWN_POSITIVE);
    let already = agg.sum(col::ART_ALREADY);
    result(
        "Previously Known HIV+ Women",
        stages(&[("Previously Known HIV+", known), ("Already on ART", already)]),
        vec![banded(
            "ART Coverage",
            percentage(already, known),
            BandThresholds::STANDARD,
        )],
    )
}

pub fn hub_spoke_referral(agg: &Aggregator<'_>) -> CascadeResult {
    let referred = agg.sum(col::REFERRED_TO_HUB);
    let initiated = agg.sum(col::INITIATED_AT_HUB);
    result(
        "Hub & Spoke Referral System",
        stages(&[("Referred to Hub", referred), ("Initiated at Hub", initiated)]),
        vec![banded(
            "Completion Rate",
            percentage(initiated, referred),
            BandThresholds::STANDARD,
        )],
    )
}

pub fn early_infant_diagnosis(agg: &Aggregator<'_>) -> CascadeResult {
    let samples = agg.sum(col::EID_SAMPLES);
    let negative = agg.sum(col::EID_NEGATIVE);
    let positive = agg.sum(col::EID_POSITIVE);
    let received = negative + positive;
    result(
        "EID Cascade",
        stages(&[
            ("Samples Taken", samples),
            ("Results Received", received),
            ("Negative", negative),
            ("Positive", positive),
        ]),
        vec![
            banded(
                "Result Coverage",
                percentage(received, samples),
                BandThresholds::STANDARD,
            ),
            plain("Positivity", percentage(positive, received)),
        ],
    )
}

/// Raw ART initiation table; no ratio is derived from it.
pub fn comprehensive_art(agg: &Aggregator<'_>) -> CascadeResult {
    let already = agg.sum(col::ART_ALREADY);
    let early = agg.sum(col::ART_ANC_EARLY);
    let late = agg.sum(col::ART_ANC_LATE);
    let labour = agg.sum(col::ART_LABOUR);
    let postpartum = agg.sum(col::ART_POSTPARTUM);
    let total_new = early + late + labour + postpartum;
    result(
        "Comprehensive ART Initiation",
        stages(&[
            ("Already on ART", already),
            ("ART <36wks", early),
            ("ART >36wks", late),
            ("ART Labour", labour),
            ("ART Postpartum", postpartum),
            ("Total New ART", total_new),
            ("Total ART", total_new + already),
        ]),
        Vec::new(),
    )
}

pub fn hbv_testing(agg: &Aggregator<'_>) -> CascadeResult {
    comparison(
        agg,
        "HBV Testing Coverage",
        col::HBV_TESTED,
        col::ANC_CLIENTS,
        "HBV Tested",
        "ANC Clients",
    )
}

pub fn hcv_testing(agg: &Aggregator<'_>) -> CascadeResult {
    comparison(
        agg,
        "HCV Testing Coverage",
        col::HCV_TESTED,
        col::ANC_CLIENTS,
        "HCV Tested",
        "ANC Clients",
    )
}

pub fn syphilis_testing(agg: &Aggregator<'_>) -> CascadeResult {
    comparison(
        agg,
        "Syphilis Testing Coverage",
        col::SYPHILIS_TESTED,
        col::ANC_CLIENTS,
        "Syphilis Tested",
        "ANC Clients",
    )
}

pub fn syphilis_treatment(agg: &Aggregator<'_>) -> CascadeResult {
    comparison(
        agg,
        "Syphilis Treatment Coverage",
        col::SYPHILIS_TREATED,
        col::SYPHILIS_POSITIVE,
        "Treated",
        "Syphilis Positive",
    )
}

pub fn delivery_coverage(agg: &Aggregator<'_>) -> CascadeResult {
    comparison(
        agg,
        "Delivery Coverage for HIV+ Women",
        col::DELIVERIES_HIV_POSITIVE,
        col::DELIVERIES_TOTAL,
        "HIV+ Deliveries",
        "Total Deliveries",
    )
}

/// Mean reporting rate per period label for comprehensive and spoke sites.
///
/// `None` when the dataset has no period column.
pub fn reporting_trend(agg: &Aggregator<'_>) -> Option<ReportingTrend> {
    let groups = agg.grouped_means(
        col::PERIOD,
        &[col::REPORTING_RATE_COMPREHENSIVE, col::REPORTING_RATE_SPOKE],
    )?;
    let points = groups
        .into_iter()
        .map(|(period, means)| TrendPoint {
            period,
            comprehensive: means[0],
            spoke: means[1],
        })
        .collect();
    let target = BandThresholds::two_tier(REPORTING_TARGET);
    Some(ReportingTrend {
        points,
        target: REPORTING_TARGET,
        comprehensive: banded(
            "Comprehensive Sites",
            agg.mean(col::REPORTING_RATE_COMPREHENSIVE),
            target,
        ),
        spoke: banded("Spoke Sites", agg.mean(col::REPORTING_RATE_SPOKE), target),
    })
}
