use crate::aggregate::{percentage, Aggregator};
use crate::cascades;
use crate::filter::{FilterSelection, FilterSummary, FilteredView};
use crate::indicators as col;
use crate::types::{
    CascadeResult, KeyIndicators, PercentageRow, ReportingTrend, StageRow, SummaryStats,
    TrendRow,
};
use crate::util::{format_number, format_percent};
use serde::Serialize;

/// Everything the dashboard shows for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub filter: FilterSummary,
    pub key_indicators: KeyIndicators,
    pub cascades: Vec<CascadeResult>,
    /// `None` when the dataset has no period column.
    pub reporting_trend: Option<ReportingTrend>,
    pub summary: SummaryStats,
}

fn total_hiv_positive(agg: &Aggregator<'_>) -> f64 {
    agg.sum_all(&[
        col::HIV_POSITIVE_ANC,
        col::HIV_POSITIVE_LD,
        col::PREVIOUSLY_KNOWN_POSITIVE,
    ])
}

pub fn key_indicators(agg: &Aggregator<'_>) -> KeyIndicators {
    let clients = agg.sum(col::ANC_CLIENTS);
    KeyIndicators {
        anc_hiv_testing: percentage(agg.sum(col::HIV_TESTED_ANC), clients),
        // L&D testing is reported against new ANC clients, not deliveries.
        ld_hiv_testing: percentage(agg.sum(col::HIV_TESTED_LD), clients),
        hbv_testing: percentage(agg.sum(col::HBV_TESTED), clients),
        hcv_testing: percentage(agg.sum(col::HCV_TESTED), clients),
        // Denominator is all HIV+ women (ANC + L&D + previously known), not
        // expected HIV-exposed infants. Pending review with the programme team.
        eid_coverage: percentage(agg.sum(col::EID_SAMPLES), total_hiv_positive(agg)),
    }
}

pub fn summary_stats(agg: &Aggregator<'_>, total_records: usize) -> SummaryStats {
    SummaryStats {
        filtered_records: agg.record_count(),
        total_records,
        total_anc_clients: agg.sum(col::ANC_CLIENTS),
        total_hiv_positive: total_hiv_positive(agg),
        total_deliveries: agg.sum(col::DELIVERIES_TOTAL),
        eid_samples: agg.sum(col::EID_SAMPLES),
    }
}

/// Every flat cascade in dashboard order; the reporting trend is separate.
pub fn all_cascades(agg: &Aggregator<'_>) -> Vec<CascadeResult> {
    vec![
        cascades::anc_hiv_testing(agg),
        cascades::anc_treatment(agg),
        cascades::labour_delivery(agg),
        cascades::previously_known(agg),
        cascades::comprehensive_art(agg),
        cascades::hbv_testing(agg),
        cascades::hcv_testing(agg),
        cascades::syphilis_testing(agg),
        cascades::syphilis_treatment(agg),
        cascades::delivery_coverage(agg),
        cascades::early_infant_diagnosis(agg),
        cascades::hub_spoke_referral(agg),
    ]
}

pub fn generate_dashboard(view: &FilteredView<'_>, selection: &FilterSelection) -> DashboardReport {
    let agg = Aggregator::new(view);
    DashboardReport {
        filter: FilterSummary::new(view, selection),
        key_indicators: key_indicators(&agg),
        cascades: all_cascades(&agg),
        reporting_trend: cascades::reporting_trend(&agg),
        summary: summary_stats(&agg, view.source().len()),
    }
}

pub fn stage_rows(results: &[CascadeResult]) -> Vec<StageRow> {
    results
        .iter()
        .flat_map(|r| {
            r.stages.iter().map(move |s| StageRow {
                cascade: r.title.clone(),
                stage: s.label.clone(),
                value: format_number(s.value, 0),
            })
        })
        .collect()
}

pub fn percentage_rows(results: &[CascadeResult]) -> Vec<PercentageRow> {
    results
        .iter()
        .flat_map(|r| {
            r.percentages.iter().map(move |p| PercentageRow {
                cascade: r.title.clone(),
                measure: p.label.clone(),
                percent: format_percent(p.value),
                band: p.band.map(|b| b.to_string()).unwrap_or_default(),
            })
        })
        .collect()
}

pub fn trend_rows(trend: &ReportingTrend) -> Vec<TrendRow> {
    trend
        .points
        .iter()
        .map(|p| TrendRow {
            period: p.period.clone(),
            comprehensive: format_percent(p.comprehensive),
            spoke: format_percent(p.spoke),
        })
        .collect()
}
