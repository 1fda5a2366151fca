// Entry point and CLI flow.
//
// One-shot subcommands cover scripted use (dashboard, report, export). The
// `menu` subcommand keeps a roster loaded and lets the user switch
// departments and generate reports repeatedly in one run.
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use surgical_report::error::AppResult;
use surgical_report::output::{export_view, render_dashboard};
use surgical_report::util::format_int;
use surgical_report::{
    generate_report, load_roster, report_file_name, AnalyticsConfig, DepartmentView, Roster,
};
use tracing::{error, Level};

#[derive(Parser)]
#[command(name = "surgical-report")]
#[command(about = "Surgical department roster analytics and PDF reports", long_about = None)]
struct Cli {
    /// JSON file overriding analytics settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List departments and their staff counts
    Departments {
        /// Roster CSV file
        input: PathBuf,
    },

    /// Print the dashboard for one department
    Dashboard {
        /// Roster CSV file
        input: PathBuf,

        /// Department to show
        #[arg(short, long)]
        department: String,
    },

    /// Write the PDF report for one department
    Report {
        /// Roster CSV file
        input: PathBuf,

        /// Department to report on
        #[arg(short, long)]
        department: String,

        /// Output file (default: <department>_report.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the projected tables as CSV plus summary.json
    Export {
        /// Roster CSV file
        input: PathBuf,

        /// Department to export
        #[arg(short, long)]
        department: String,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Interactive menu
    Menu {
        /// Roster CSV file to load at start
        input: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_load_summary(roster: &Roster) {
    let report = &roster.report;
    println!(
        "Processing dataset... ({} rows read, {} loaded, {} departments)",
        format_int(report.total_rows),
        format_int(report.loaded_rows),
        format_int(roster.departments().len())
    );
    if report.parse_errors + report.blank_department > 0 {
        println!(
            "Note: {} rows skipped ({} unreadable, {} without department).",
            format_int(report.parse_errors + report.blank_department),
            format_int(report.parse_errors),
            format_int(report.blank_department)
        );
    }
    if report.unparsed_cells > 0 {
        println!(
            "Note: {} non-numeric cells counted as zero.",
            format_int(report.unparsed_cells)
        );
    }
    if !report.missing_columns.is_empty() {
        let names: Vec<&str> = report.missing_columns.iter().map(|w| w.column.as_str()).collect();
        println!("Missing optional columns (shown as N/A): {}", names.join(", "));
    }
    println!();
}

/// Generate the report fully in memory, then write it. A failed generation
/// leaves no file behind.
fn write_report(view: &DepartmentView, output: Option<&Path>) -> AppResult<PathBuf> {
    let rendered = generate_report(&view.tables, Local::now().date_naive())?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(report_file_name(view.department())));
    std::fs::write(&path, &rendered.bytes).map_err(surgical_report::error::OutputError::from)?;
    println!(
        "Report saved to {} ({} pages).",
        path.display(),
        rendered.pages
    );
    Ok(path)
}

fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };

    match cli.command {
        Commands::Departments { input } => {
            let roster = load_roster(&input)?;
            print_load_summary(&roster);
            for (department, staff) in roster.department_sizes() {
                println!("{:<30} {:>6} staff", department, format_int(staff));
            }
        }
        Commands::Dashboard { input, department } => {
            let roster = load_roster(&input)?;
            let view = DepartmentView::build(&roster, &department, &config)?;
            println!("{}", render_dashboard(&view, &config));
        }
        Commands::Report {
            input,
            department,
            output,
        } => {
            let roster = load_roster(&input)?;
            let view = DepartmentView::build(&roster, &department, &config)?;
            write_report(&view, output.as_deref())?;
        }
        Commands::Export {
            input,
            department,
            out_dir,
        } => {
            let roster = load_roster(&input)?;
            let view = DepartmentView::build(&roster, &department, &config)?;
            for path in export_view(&view, &out_dir)? {
                println!("Wrote {}", path.display());
            }
        }
        Commands::Menu { input } => run_menu(input, &config),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ----------------------------------------------------------------------------
// Interactive menu
// ----------------------------------------------------------------------------

/// Loaded roster and the view of the selected department. The view is
/// dropped whenever the roster changes.
#[derive(Default)]
struct Session {
    roster: Option<Roster>,
    view: Option<DepartmentView>,
}

fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn handle_load(session: &mut Session, path: &Path) {
    match load_roster(path) {
        Ok(roster) => {
            print_load_summary(&roster);
            session.roster = Some(roster);
            session.view = None;
        }
        Err(e) => println!("Failed to load file: {}\n", e),
    }
}

fn handle_select(session: &mut Session, config: &AnalyticsConfig) {
    let Some(roster) = &session.roster else {
        println!("Error: No data loaded. Please load a roster first (option 1).\n");
        return;
    };
    let departments = roster.departments();
    for (i, d) in departments.iter().enumerate() {
        println!("[{}] {}", i + 1, d);
    }
    let Some(choice) = prompt("Department (number or name): ") else {
        return;
    };
    let department = match choice.parse::<usize>() {
        Ok(n) if (1..=departments.len()).contains(&n) => departments[n - 1].clone(),
        _ => choice,
    };
    match DepartmentView::build(roster, &department, config) {
        Ok(view) => {
            println!("Selected {} ({} staff).\n", department, view.metrics.total_staff);
            session.view = Some(view);
        }
        Err(e) => println!("{}\n", e),
    }
}

fn selected(session: &Session) -> Option<&DepartmentView> {
    if session.view.is_none() {
        println!("Error: No department selected (option 2).\n");
    }
    session.view.as_ref()
}

fn run_menu(input: Option<PathBuf>, config: &AnalyticsConfig) {
    let mut session = Session::default();
    if let Some(path) = input {
        handle_load(&mut session, &path);
    }
    loop {
        println!("Select an option:");
        println!("[1] Load a roster file");
        println!("[2] Select department");
        println!("[3] Show dashboard");
        println!("[4] Generate PDF report");
        println!("[5] Export tables");
        println!("[0] Exit\n");
        let Some(choice) = prompt("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => {
                if let Some(path) = prompt("Roster CSV path: ").filter(|p| !p.is_empty()) {
                    handle_load(&mut session, Path::new(&path));
                }
            }
            "2" => handle_select(&mut session, config),
            "3" => {
                if let Some(view) = selected(&session) {
                    println!("{}", render_dashboard(view, config));
                }
            }
            "4" => {
                if let Some(view) = selected(&session) {
                    if let Err(e) = write_report(view, None) {
                        println!("PDF generation failed: {}\n", e);
                    }
                }
            }
            "5" => {
                if let Some(view) = selected(&session) {
                    let dir = prompt("Output directory [.]: ").unwrap_or_default();
                    let dir = if dir.is_empty() { ".".to_string() } else { dir };
                    match export_view(view, Path::new(&dir)) {
                        Ok(paths) => println!("Wrote {} files to {}.\n", paths.len(), dir),
                        Err(e) => println!("Export failed: {}\n", e),
                    }
                }
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-5.\n"),
        }
    }
}
