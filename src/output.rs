use crate::charts::{ProportionChart, RankedBars};
use crate::config::AnalyticsConfig;
use crate::error::OutputError;
use crate::projector::TableData;
use crate::types::{Category, Measure};
use crate::util::{fmt_measure, fmt_money, format_number};
use crate::view::DepartmentView;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};
use tracing::info;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), OutputError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

#[derive(Serialize)]
struct StaffExportRow<'a> {
    #[serde(rename = "Degree Group")]
    degree_group: Category,
    #[serde(rename = "Staff Name")]
    staff_name: &'a str,
    #[serde(rename = "Contract Type")]
    contract_type: &'a str,
}

/// Write every projected table of `view` as CSV plus `summary.json` into
/// `dir`. Returns the written paths.
pub fn export_view(view: &DepartmentView, dir: &Path) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir)?;
    let tables = &view.tables;
    let mut written = Vec::new();

    let staff: Vec<StaffExportRow> = tables
        .rosters
        .iter()
        .flat_map(|r| {
            r.entries.iter().map(move |e| StaffExportRow {
                degree_group: r.category,
                staff_name: &e.staff_name,
                contract_type: &e.contract_type,
            })
        })
        .collect();

    let path = dir.join("staff_by_degree.csv");
    write_csv(&path, &staff)?;
    written.push(path);
    let path = dir.join("performance.csv");
    write_csv(&path, &tables.performance)?;
    written.push(path);
    let path = dir.join("operation_source.csv");
    write_csv(&path, &tables.operation_source)?;
    written.push(path);
    let path = dir.join("operation_value.csv");
    write_csv(&path, &tables.operation_value)?;
    written.push(path);
    let path = dir.join("financial.csv");
    write_csv(&path, &tables.financial)?;
    written.push(path);
    let path = dir.join("summary.json");
    write_json(&path, &view.summary())?;
    written.push(path);

    info!(department = view.department(), files = written.len(), dir = %dir.display(), "exported tables");
    Ok(written)
}

/// Markdown table of `data`, limited to `max_rows` body rows (0 = all).
pub fn table_string(data: &TableData, max_rows: usize) -> String {
    if data.rows.is_empty() {
        return "(no rows)\n".to_string();
    }
    let take = if max_rows == 0 { data.rows.len() } else { max_rows };
    let mut builder = Builder::default();
    builder.push_record(data.headers.clone());
    for row in data.rows.iter().take(take) {
        builder.push_record(row.clone());
    }
    let mut out = builder.build().with(Style::markdown()).to_string();
    out.push('\n');
    if take < data.rows.len() {
        let _ = writeln!(out, "({} more rows)", data.rows.len() - take);
    }
    out
}

fn cards(cards: &[(&str, String)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(cards.iter().map(|(label, _)| label.to_string()));
    builder.push_record(cards.iter().map(|(_, value)| value.clone()));
    let mut out = builder.build().with(Style::rounded()).to_string();
    out.push('\n');
    out
}

fn count_with_pct(count: Option<usize>, pct: f64) -> String {
    match count {
        Some(c) => format!("{} ({:.1}%)", c, pct),
        None => "N/A".to_string(),
    }
}

fn count_or_na(count: Option<usize>) -> String {
    count.map_or_else(|| "N/A".to_string(), |c| c.to_string())
}

fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value.abs() / max) * width as f64).round() as usize;
    "#".repeat(len.min(width))
}

pub fn proportion_string(chart: &ProportionChart, width: usize) -> String {
    let mut out = format!("{}\n", chart.title);
    for s in &chart.slices {
        let _ = writeln!(
            out,
            "  {:<10} {:<width$} {} ({:.1}%)",
            s.label,
            bar(s.share, 1.0, width),
            fmt_measure(&s.value),
            s.share * 100.0,
            width = width
        );
    }
    out
}

pub fn ranked_string(chart: &RankedBars, width: usize) -> String {
    let mut out = format!("{}\n", chart.title);
    let max = chart.bars.iter().map(|b| b.value.abs()).fold(0.0, f64::max);
    let label_width = chart.bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    for b in &chart.bars {
        let sign = if b.value < 0.0 { "-" } else { "" };
        let _ = writeln!(
            out,
            "  {:<lw$} {:<10} {}{:<width$} {}",
            b.label,
            format!("[{}]", b.category),
            sign,
            bar(b.value, max, width),
            fmt_measure(&b.value),
            lw = label_width,
            width = width
        );
    }
    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n== {} ==\n", title);
}

/// The whole dashboard for one department as terminal text.
pub fn render_dashboard(view: &DepartmentView, config: &AnalyticsConfig) -> String {
    let m = &view.metrics;
    let present = |measure: Measure| view.slice.columns.has(measure);
    let total = |measure: Measure, value: f64| {
        if present(measure) {
            format_number(value, 0)
        } else {
            "N/A".to_string()
        }
    };
    let money = |measure: Measure, value: f64| {
        if present(measure) {
            fmt_money(value)
        } else {
            "N/A".to_string()
        }
    };

    let mut out = format!("Surgical Department Analytics - {}\n", view.department());

    section(&mut out, "Manpower Overview");
    out.push_str(&cards(&[
        ("Total Staff", m.total_staff.to_string()),
        ("Contracted", count_with_pct(m.contracted, m.contracted_pct)),
        ("General", count_with_pct(m.general, m.general_pct)),
    ]));

    section(&mut out, "Staff Breakdown by Degree");
    for roster in &view.tables.rosters {
        let _ = writeln!(out, "{}s", roster.category);
        out.push_str(&cards(&[
            ("Total", roster.total().to_string()),
            ("Contracted", count_or_na(roster.contracted())),
            ("General", count_or_na(roster.general())),
        ]));
        out.push_str(&table_string(&roster.table(), config.preview_rows));
        out.push('\n');
    }

    section(&mut out, "Performance Metrics");
    out.push_str(&cards(&[
        ("Total Hours", total(Measure::TotalHours, m.total_hours)),
        ("Opened Clinics", total(Measure::OpenedClinics, m.total_clinics)),
        ("Total Visits", total(Measure::TotalVisits, m.total_visits)),
        ("Total Operations", total(Measure::TotalOperations, m.total_operations)),
    ]));

    section(&mut out, "Operations Overview");
    out.push_str(&proportion_string(&view.charts.operation_source, config.chart_width));
    out.push('\n');
    out.push_str(&proportion_string(&view.charts.operation_value, config.chart_width));

    section(&mut out, "Financial Performance");
    let net = if present(Measure::Net) {
        format!("{} ({:.1}%)", fmt_money(m.total_net), m.net_to_income_pct)
    } else {
        "N/A".to_string()
    };
    out.push_str(&cards(&[
        ("Total Salary", money(Measure::Salary, m.total_salary)),
        ("Total Income", money(Measure::Income, m.total_income)),
        ("Net Income", net),
    ]));

    section(&mut out, "Staff Performance Analytics");
    for chart in view.charts.ranked() {
        out.push_str(&ranked_string(chart, config.chart_width));
        out.push('\n');
    }

    section(&mut out, "Detailed Tables");
    for data in [
        view.tables.performance_data(),
        view.tables.operation_source_data(),
        view.tables.operation_value_data(),
        view.tables.financial_data(),
    ] {
        let _ = writeln!(out, "{}", data.title);
        out.push_str(&table_string(&data, config.preview_rows));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::surgery_roster;

    fn surgery_view() -> DepartmentView {
        DepartmentView::build(&surgery_roster(), "Surgery", &AnalyticsConfig::default()).unwrap()
    }

    #[test]
    fn test_dashboard_shows_example_metrics() {
        let text = render_dashboard(&surgery_view(), &AnalyticsConfig::default());
        assert!(text.contains("1 (50.0%)"));
        assert!(text.contains("Consultants"));
        assert!(text.contains("Residents"));
        assert!(!text.contains("Specialists"));
        assert!(text.contains("1.00"));
        assert!(text.contains("2.00"));
    }

    #[test]
    fn test_dashboard_marks_missing_measures() {
        let text = render_dashboard(&surgery_view(), &AnalyticsConfig::default());
        // Salary, income, net and visits are not in the example upload.
        assert!(text.contains("N/A"));
        assert!(text.contains("150"));
    }

    #[test]
    fn test_table_string_limits_rows() {
        let data = TableData {
            title: "t".into(),
            headers: vec!["A".into()],
            rows: vec![vec!["1".into()], vec!["2".into()], vec!["3".into()]],
        };
        let text = table_string(&data, 2);
        assert!(text.contains("| 1 |"));
        assert!(!text.contains("| 3 |"));
        assert!(text.contains("(1 more rows)"));
    }

    #[test]
    fn test_bar_scales_to_width() {
        assert_eq!(bar(5.0, 10.0, 10), "#####");
        assert_eq!(bar(-10.0, 10.0, 4), "####");
        assert_eq!(bar(3.0, 0.0, 10), "");
    }

    #[test]
    fn test_export_writes_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_view(&surgery_view(), dir.path()).unwrap();
        assert_eq!(written.len(), 6);
        let perf = std::fs::read_to_string(dir.path().join("performance.csv")).unwrap();
        let mut lines = perf.lines();
        assert_eq!(
            lines.next(),
            Some("Staff Name,Degree,Total Hours,Opened Clinics,Total Visits,Total Operations,Avg. Clinics,Avg. Operations")
        );
        assert_eq!(lines.next(), Some("A,Consultant Surgeon,100.0,10.0,0.0,20.0,1.0,2.0"));
        let staff = std::fs::read_to_string(dir.path().join("staff_by_degree.csv")).unwrap();
        assert!(staff.contains("Consultant,A,Contracted"));
        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(summary["metrics"]["contracted"], 1);
    }
}
