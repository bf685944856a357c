// Entry point and interactive console flow.
//
// - Option [1] loads and normalizes the CSV export named in the settings.
// - Option [2] narrows the data by time period and geography.
// - Option [3] prints every cascade and writes the JSON/CSV report files.
// - Option [4] clears all filters.
// - Option [5] exports the filtered records as CSV.
use once_cell::sync::Lazy;
use pmtct_report::filter::Dimension;
use pmtct_report::settings::Settings;
use pmtct_report::{loader, output, reports, util, Session};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

// One session per process: the dataset is loaded once and reports can be
// regenerated as often as the filters change.
static APP_STATE: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::new()));

fn session() -> MutexGuard<'static, Session> {
    APP_STATE.lock().unwrap_or_else(|e| e.into_inner())
}

fn read_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    read_line("Enter choice: ")
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ")
            .to_uppercase()
            .as_str()
        {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(settings: &Settings) {
    match loader::load_dataset(&settings.input_path) {
        Ok((dataset, report)) => {
            println!(
                "Data loaded successfully: {} records, {} indicator columns",
                util::format_int(report.total_rows),
                util::format_int(report.indicator_columns)
            );
            if report.coerced_cells > 0 {
                println!(
                    "Note: {} non-numeric indicator cells were treated as 0.",
                    util::format_int(report.coerced_cells)
                );
            }
            println!();
            session().replace_dataset(dataset);
        }
        Err(e) => {
            error!(error = %e, path = %settings.input_path.display(), "load failed");
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Parse a comma-separated answer into option values. Entries may be the
/// value itself or its 1-based number in the printed list.
fn parse_picks(answer: &str, candidates: &[String]) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<usize>() {
            Ok(n) if (1..=candidates.len()).contains(&n) => Some(candidates[n - 1].clone()),
            _ => candidates.iter().find(|c| c.as_str() == s).cloned(),
        })
        .collect()
}

fn handle_filters() {
    let mut state = session();
    let Some(options) = state.options() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let mut selection = state.selection().clone();

    for dim in Dimension::ALL {
        let candidates = match dim {
            Dimension::Month => options.month_candidates(&selection),
            _ => options.values(dim).to_vec(),
        };
        if candidates.is_empty() {
            continue;
        }
        println!("Select {}(s) [blank = all]:", dim);
        for (i, c) in candidates.iter().enumerate() {
            println!("  [{}] {}", i + 1, c);
        }
        let picks = parse_picks(&read_line("> "), &candidates);
        if picks.is_empty() {
            selection.clear(dim);
        } else {
            selection.set(dim, picks);
        }
    }
    if selection.count(Dimension::Month) > 0 {
        selection.constrain_months(&options);
    }
    state.set_selection(selection);
    drop(state);

    if let Some(report) = session().dashboard() {
        println!("\n{}\n", report.filter);
    }
}

fn handle_clear_filters() {
    session().clear_filters();
    println!("Filters cleared.\n");
}

fn handle_generate_reports(settings: &Settings) {
    let Some(report) = session().dashboard() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    if report.filter.is_narrowed() {
        println!("Filter Summary:\n{}\n", report.filter);
    }

    let k = &report.key_indicators;
    println!("Key Performance Indicators (Coverage %)");
    println!("  ANC HIV Testing: {}", util::format_percent(k.anc_hiv_testing));
    println!("  L&D HIV Testing: {}", util::format_percent(k.ld_hiv_testing));
    println!("  HBV Testing:     {}", util::format_percent(k.hbv_testing));
    println!("  HCV Testing:     {}", util::format_percent(k.hcv_testing));
    println!("  EID Coverage:    {}\n", util::format_percent(k.eid_coverage));

    let stages = reports::stage_rows(&report.cascades);
    let percentages = reports::percentage_rows(&report.cascades);
    println!("Cascade Stages");
    output::preview_table_rows(&stages, stages.len());
    println!("Coverage and Bands");
    output::preview_table_rows(&percentages, percentages.len());

    match &report.reporting_trend {
        Some(trend) => {
            println!("Reporting Rate Trends (target {}%)", trend.target);
            output::preview_table_rows(&reports::trend_rows(trend), trend.points.len());
            println!(
                "{}: {} ({})",
                trend.comprehensive.label,
                util::format_percent(trend.comprehensive.value),
                trend.comprehensive.band.map(|b| b.to_string()).unwrap_or_default()
            );
            println!(
                "{}: {} ({})\n",
                trend.spoke.label,
                util::format_percent(trend.spoke.value),
                trend.spoke.band.map(|b| b.to_string()).unwrap_or_default()
            );
        }
        None => println!("No period data available for trend analysis\n"),
    }

    let s = &report.summary;
    println!("Data Summary");
    println!(
        "  Filtered records: {} of {}",
        util::format_int(s.filtered_records),
        util::format_int(s.total_records)
    );
    println!("  Total ANC clients: {}", util::format_number(s.total_anc_clients, 0));
    println!("  Total HIV+ women: {}", util::format_number(s.total_hiv_positive, 0));
    println!("  Total deliveries: {}", util::format_number(s.total_deliveries, 0));
    println!("  EID samples: {}\n", util::format_number(s.eid_samples, 0));

    let writes = [
        ("cascade_stages.csv", output::write_csv(settings.output_path("cascade_stages.csv"), &stages)),
        (
            "cascade_coverage.csv",
            output::write_csv(settings.output_path("cascade_coverage.csv"), &percentages),
        ),
        (
            "dashboard_summary.json",
            output::write_json(settings.output_path("dashboard_summary.json"), &report),
        ),
    ];
    for (name, result) in writes {
        match result {
            Ok(()) => println!("(Exported to {})", settings.output_path(name).display()),
            Err(e) => {
                warn!(file = name, error = %e, "write failed");
                eprintln!("Write error: {}", e);
            }
        }
    }
    println!();
}

fn handle_export(settings: &Settings) {
    let path = settings.output_path("pmtct_filtered_data.csv");
    let result = session().with_view(|view| {
        output::export_filtered_csv(&path, view, settings.include_period_columns)
            .map(|()| view.len())
    });
    match result {
        None => println!("Error: No data loaded. Please load the CSV file first (option 1).\n"),
        Some(Ok(rows)) => println!(
            "Exported {} filtered records to {}\n",
            util::format_int(rows),
            path.display()
        ),
        Some(Err(e)) => eprintln!("Write error: {}\n", e),
    }
}

fn main() {
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Ignoring invalid settings: {}", e);
            Settings::default()
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    loop {
        println!("PMTCT Dashboard:");
        println!("[1] Load the file");
        println!("[2] Set filters");
        println!("[3] Generate Reports");
        println!("[4] Clear filters");
        println!("[5] Export filtered data\n");
        match read_choice().as_str() {
            "1" => handle_load(&settings),
            "2" => handle_filters(),
            "3" => {
                println!();
                handle_generate_reports(&settings);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "4" => handle_clear_filters(),
            "5" => handle_export(&settings),
            _ => println!("Invalid choice. Please enter 1 to 5.\n"),
        }
    }
}
