// Entry point and high-level CLI flow.
//
// - Option [1] loads the report export (and the project registry and PM
//   roster when present), printing diagnostics.
// - Option [2] generates the four report tables, per-project score
//   history and a JSON summary.
// - After generating reports, the user can go back to the selection menu or
//   exit.
use chrono::{Local, NaiveDate};
use health_report::compliance::evaluate_compliance_for;
use health_report::config::EngineConfig;
use health_report::types::{Project, Report};
use health_report::util::{self, is_well_formed_period};
use health_report::{delta, latest, loader, logging, output, reports, tally};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

const REPORTS_FILE: &str = "project_reports.csv";
const PROJECTS_FILE: &str = "projects.csv";
const PM_ROSTER_FILE: &str = "project_managers.csv";
const CONFIG_FILE: &str = "engine_config.json";

// Loaded once, reused for every report generation in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    reports: Option<Vec<Report>>,
    projects: Vec<Project>,
    pm_roster: Vec<String>,
    config: EngineConfig,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load the reports, registry, roster and config.
fn handle_load() {
    let config = match EngineConfig::load(CONFIG_FILE) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "falling back to default engine config");
            EngineConfig::default()
        }
    };

    let (data, load_report) = match loader::load_reports(REPORTS_FILE) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %e, path = REPORTS_FILE, "failed to load reports");
            eprintln!("Failed to load file: {}\n", e);
            return;
        }
    };

    let projects = if Path::new(PROJECTS_FILE).exists() {
        loader::load_projects(PROJECTS_FILE).unwrap_or_else(|e| {
            warn!(error = %e, path = PROJECTS_FILE, "ignoring unreadable project registry");
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let pm_roster = if Path::new(PM_ROSTER_FILE).exists() {
        loader::load_pm_roster(PM_ROSTER_FILE).unwrap_or_else(|e| {
            warn!(error = %e, path = PM_ROSTER_FILE, "ignoring unreadable PM roster");
            Vec::new()
        })
    } else {
        Vec::new()
    };

    println!(
        "Processing dataset... ({} rows read, {} reports loaded)",
        util::format_int(load_report.total_rows),
        util::format_int(load_report.loaded_rows)
    );
    println!(
        "Note: {} rows skipped due to parse/validation errors.",
        util::format_int(load_report.parse_errors + load_report.skipped_rows)
    );
    if load_report.malformed_periods > 0 {
        println!(
            "Info: {} reports carry a malformed reporting period.",
            util::format_int(load_report.malformed_periods)
        );
    }
    if load_report.unrecognized_ratings > 0 {
        println!(
            "Info: {} unrecognized rating values treated as N.A.",
            util::format_int(load_report.unrecognized_ratings)
        );
    }
    if !projects.is_empty() {
        println!("Info: {} projects in registry.", util::format_int(projects.len()));
    }
    if !pm_roster.is_empty() {
        println!("Info: {} managers on the PM roster.", util::format_int(pm_roster.len()));
    }
    println!();

    let mut state = state();
    state.reports = Some(data);
    state.projects = projects;
    state.pm_roster = pm_roster;
    state.config = config;
}

/// Most recent well-formed period in the data, as the first day of its month.
fn latest_period(data: &[Report]) -> Option<(String, NaiveDate)> {
    let period = data
        .iter()
        .filter_map(|r| r.reporting_period.as_deref())
        .filter(|p| is_well_formed_period(p))
        .max()?;
    let first = NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d").ok()?;
    Some((period.to_string(), first))
}

fn save<T: serde::Serialize>(path: &str, rows: &[T]) {
    if let Err(e) = output::write_csv(path, rows) {
        error!(error = %e, path, "write failed");
        eprintln!("Write error: {}", e);
    }
}

/// Handle option [2]: generate all reports and the JSON summary.
///
/// Writes four CSV files and a JSON summary, and prints Markdown previews of
/// each table to the console.
fn handle_generate_reports() {
    let (data, projects, pm_roster, config) = {
        let state = state();
        (
            state.reports.clone(),
            state.projects.clone(),
            state.pm_roster.clone(),
            state.config.clone(),
        )
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    println!("Generating reports...");
    println!("Outputs saved to individual files...\n");

    let r1 = reports::generate_latest_table(&data, &projects);
    let file1 = "latest_reports.csv";
    save(file1, &r1);
    let note1 = Some("Best overall score first");
    output::preview_table(1, "Latest Report per Project", note1, &r1, 5);
    println!("(Full table exported to {})\n", file1);

    let r2 = reports::generate_trend_table(&data);
    let file2 = "project_trends.csv";
    save(file2, &r2);
    let note2 = Some("Latest two reports per project");
    output::preview_table(2, "Period-over-Period Movement", note2, &r2, 6);
    println!("(Full table exported to {})\n", file2);

    let (current_period, reference) = match latest_period(&data) {
        Some(p) => p,
        None => {
            let today = Local::now().date_naive();
            (today.format("%Y-%m").to_string(), today)
        }
    };
    let periods = util::recent_periods(reference, config.recent_period_count);
    info!(?periods, "evaluating compliance");
    let compliance = evaluate_compliance_for(&pm_roster, &data, &projects, &periods, &config);
    let r3 = reports::generate_compliance_table(&compliance);
    let file3 = "pm_compliance.csv";
    save(file3, &r3);
    let note3 = format!("Last {} reporting periods", periods.len());
    let title3 = "Project Manager Submission Compliance";
    output::preview_table(3, title3, Some(note3.as_str()), &r3, 5);
    println!("(Full table exported to {})\n", file3);

    let in_period = tally::reports_in_period(&data, &current_period);
    let entries = tally::tally_underperformance(in_period, &config);
    let r4 = reports::generate_underperformance_table(&entries);
    let file4 = "underperformance.csv";
    save(file4, &r4);
    let note4 = format!("Reporting period {}", util::format_period(&current_period));
    output::preview_table(4, "Underperforming KPIs", Some(note4.as_str()), &r4, 6);
    println!("(Full table exported to {})\n", file4);

    let missing = latest::missing_for_period(&data, &projects, &current_period);
    if !missing.is_empty() {
        println!(
            "Missing reports for {}: {}\n",
            util::format_period(&current_period),
            missing.join(", ")
        );
    }

    let history: BTreeMap<&str, Vec<delta::TrendPoint>> = delta::group_by_project(&data)
        .into_keys()
        .map(|name| (name, delta::score_history(&data, name)))
        .collect();
    if let Err(e) = output::write_json("project_history.json", &history) {
        error!(error = %e, "write failed");
        eprintln!("Write error: {}", e);
    }

    let summary = reports::generate_summary(&data, &projects, &compliance);
    if let Err(e) = output::write_json("summary.json", &summary) {
        error!(error = %e, "write failed");
        eprintln!("Write error: {}", e);
    }
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"avg_overall_score\": {}, \"avg_compliance\": {}}}\n",
        util::format_score(summary.avg_overall_score, 2),
        util::format_number(summary.avg_compliance, 2)
    );
}

fn main() {
    logging::init();
    loop {
        println!("Project Health Reports:");
        println!("[1] Load the file");
        println!("[2] Generate Reports\n");
        match read_choice().as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}
