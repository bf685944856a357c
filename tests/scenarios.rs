use pmtct_report::cascades;
use pmtct_report::filter::{self, FilterOptions, FilterSelection, FilteredView};
use pmtct_report::indicators as col;
use pmtct_report::loader::{load_csv_reader, normalize};
use pmtct_report::period::{Period, UNKNOWN_QUARTER, UNKNOWN_YEAR};
use pmtct_report::{Aggregator, Band, Dataset, Dimension};

fn dataset(header: &[&str], rows: &[&[&str]]) -> Dataset {
    let quote = |s: &str| format!("\"{s}\"");
    let mut text = header.iter().map(|h| quote(h)).collect::<Vec<_>>().join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.iter().map(|c| quote(c)).collect::<Vec<_>>().join(","));
        text.push('\n');
    }
    normalize(&load_csv_reader(text.as_bytes()).expect("loads")).expect("normalizes")
}

#[test]
fn anc_testing_at_ninety_percent_is_adequate() {
    let ds = dataset(
        &["periodname", col::ANC_CLIENTS, col::HIV_TESTED_ANC],
        &[&["March 2023", "100", "90"]],
    );
    let view = FilteredView::unfiltered(&ds);
    let r = cascades::anc_hiv_testing(&Aggregator::new(&view));
    assert_eq!(r.labels(), ["ANC Clients", "HIV Tested (ANC)"]);
    assert_eq!(r.values(), vec![100.0, 90.0]);
    assert_eq!(r.headline(), Some(90.0));
    assert_eq!(r.band, Some(Band::Adequate));
}

#[test]
fn anc_testing_with_nobody_tested_is_critical() {
    let ds = dataset(
        &["periodname", col::ANC_CLIENTS, col::HIV_TESTED_ANC],
        &[&["March 2023", "100", "0"]],
    );
    let view = FilteredView::unfiltered(&ds);
    let r = cascades::anc_hiv_testing(&Aggregator::new(&view));
    assert_eq!(r.headline(), Some(0.0));
    assert_eq!(r.band, Some(Band::Critical));
}

#[test]
fn anc_treatment_total_art_coverage() {
    let ds = dataset(
        &[
            "periodname",
            col::HIV_POSITIVE_ANC,
            col::ART_ANC_EARLY,
            col::ART_ANC_LATE,
        ],
        &[&["March 2023", "50", "30", "10"]],
    );
    let view = FilteredView::unfiltered(&ds);
    let r = cascades::anc_treatment(&Aggregator::new(&view));
    assert_eq!(r.stage("Total ART"), Some(40.0));
    assert_eq!(r.percentage("Total ART Coverage"), Some(80.0));
    assert_eq!(r.band, Some(Band::Moderate));
}

#[test]
fn unrecognized_period_stays_selectable() {
    let period = Period::classify("Unknown-format-xyz");
    assert_eq!(period.quarter.label(), UNKNOWN_QUARTER);
    assert_eq!(period.year.label(), UNKNOWN_YEAR);

    let ds = dataset(
        &["periodname", "orgunitlevel1", col::ANC_CLIENTS],
        &[
            &["Unknown-format-xyz", "Lagos", "5"],
            &["March", "Lagos", "7"],
            &["April", "", "11"],
        ],
    );
    let options = FilterOptions::from_dataset(&ds);
    assert_eq!(
        options.values(Dimension::Quarter),
        ["Quarter 1", "Quarter 2", UNKNOWN_QUARTER]
    );
    let view = filter::apply(&ds, &FilterSelection::all(&options));
    assert_eq!(view.len(), 3);
    assert_eq!(Aggregator::new(&view).sum(col::ANC_CLIENTS), 23.0);

    let only_unknown = FilterSelection::new().with(Dimension::Quarter, [UNKNOWN_QUARTER]);
    let view = filter::apply(&ds, &only_unknown);
    assert_eq!(view.len(), 1);
    assert_eq!(Aggregator::new(&view).sum(col::ANC_CLIENTS), 5.0);
}

#[test]
fn reporting_trend_averages_within_a_period() {
    let ds = dataset(
        &[
            "periodname",
            col::REPORTING_RATE_COMPREHENSIVE,
            col::REPORTING_RATE_SPOKE,
        ],
        &[
            &["January 2023", "85", "60"],
            &["January 2023", "95", "80"],
            &["February 2023", "100", "100"],
        ],
    );
    let view = FilteredView::unfiltered(&ds);
    let trend = cascades::reporting_trend(&Aggregator::new(&view)).expect("has periods");
    let january = trend
        .points
        .iter()
        .find(|p| p.period == "January 2023")
        .expect("January present");
    assert_eq!(january.comprehensive, 90.0);
    assert_eq!(january.spoke, 70.0);
    assert_eq!(trend.points.len(), 2);
    assert_eq!(trend.target, 90.0);
    assert_eq!(trend.spoke.band, Some(Band::Critical));
}

#[test]
fn reporting_trend_is_unavailable_without_period_column() {
    let ds = dataset(
        &["orgunitlevel1", col::REPORTING_RATE_COMPREHENSIVE, col::ANC_CLIENTS, col::HIV_TESTED_ANC],
        &[&["Lagos", "85", "10", "10"]],
    );
    let view = FilteredView::unfiltered(&ds);
    let agg = Aggregator::new(&view);
    assert!(cascades::reporting_trend(&agg).is_none());
    assert_eq!(cascades::anc_hiv_testing(&agg).headline(), Some(100.0));
}
