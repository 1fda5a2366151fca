use crate::classify::classify_degree;
use crate::columns::{canonical_headers, normalize_headers, require_column};
use crate::error::LoadResult;
use crate::types::{
    ColumnPresence, Measure, Measures, MissingMeasureWarning, RawRow, RosterRow,
    DEPARTMENT_COLUMN,
};
use crate::util::parse_f64_safe;
use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

const STAFF_NAME_COLUMN: &str = "staff name";
const DEGREE_COLUMN: &str = "degree";
const CONTRACT_COLUMN: &str = "Contract type";

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub blank_department: usize,
    pub unparsed_cells: usize,
    pub missing_columns: Vec<MissingMeasureWarning>,
}

/// The whole upload after normalization and classification.
#[derive(Debug, Clone)]
pub struct Roster {
    pub rows: Vec<RosterRow>,
    pub columns: ColumnPresence,
    pub report: LoadReport,
}

impl Roster {
    /// Distinct department keys, sorted.
    pub fn departments(&self) -> Vec<String> {
        self.department_sizes().into_keys().collect()
    }

    pub fn department_sizes(&self) -> BTreeMap<String, usize> {
        let mut sizes = BTreeMap::new();
        for row in &self.rows {
            *sizes.entry(row.department.clone()).or_insert(0) += 1;
        }
        sizes
    }
}

pub fn load_roster<P: AsRef<Path>>(path: P) -> LoadResult<Roster> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading roster");
    let file = File::open(path)?;
    load_roster_from_reader(file)
}

pub fn load_roster_from_reader<R: Read>(reader: R) -> LoadResult<Roster> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = normalize_headers(rdr.headers()?);
    require_column(&headers, DEPARTMENT_COLUMN)?;
    let canonical = canonical_headers(&headers);
    for header in &canonical.dropped {
        warn!(header = %header, "ignoring repeated column, keeping the first one");
    }
    let headers = canonical.record;
    rdr.set_headers(headers.clone());

    let columns = detect_columns(&headers);
    let missing_columns = missing_columns(&columns);
    for warning in &missing_columns {
        warn!("{}", warning);
    }

    let mut report = LoadReport {
        missing_columns,
        ..LoadReport::default()
    };
    let mut rows = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "skipping unreadable row");
                report.parse_errors += 1;
                continue;
            }
        };

        let department = match trimmed(raw.department.as_deref()) {
            Some(d) => d,
            None => {
                report.blank_department += 1;
                continue;
            }
        };

        let mut measures = Measures::default();
        for measure in Measure::ALL {
            let cell = raw.measure(measure);
            match parse_f64_safe(cell) {
                Some(v) => measures.set(measure, v),
                None => {
                    if cell.is_some_and(|c| !c.trim().is_empty()) {
                        report.unparsed_cells += 1;
                    }
                }
            }
        }

        rows.push(RosterRow {
            department,
            name: trimmed(raw.staff_name.as_deref()).unwrap_or_default(),
            degree: trimmed(raw.degree.as_deref()).unwrap_or_default(),
            contract: trimmed(raw.contract_type.as_deref()),
            category: classify_degree(raw.degree.as_deref()),
            measures,
        });
    }

    report.loaded_rows = rows.len();
    info!(
        total = report.total_rows,
        loaded = report.loaded_rows,
        parse_errors = report.parse_errors,
        "roster loaded"
    );
    Ok(Roster { rows, columns, report })
}

fn trimmed(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn detect_columns(headers: &StringRecord) -> ColumnPresence {
    let has = |name: &str| headers.iter().any(|h| h == name);
    ColumnPresence {
        staff_name: has(STAFF_NAME_COLUMN),
        degree: has(DEGREE_COLUMN),
        contract_type: has(CONTRACT_COLUMN),
        measures: Measure::ALL
            .into_iter()
            .filter(|m| m.headers().iter().any(|&h| has(h)))
            .collect(),
    }
}

fn missing_columns(columns: &ColumnPresence) -> Vec<MissingMeasureWarning> {
    let mut missing: Vec<&str> = Vec::new();
    if !columns.staff_name {
        missing.push(STAFF_NAME_COLUMN);
    }
    if !columns.degree {
        missing.push(DEGREE_COLUMN);
    }
    if !columns.contract_type {
        missing.push(CONTRACT_COLUMN);
    }
    missing.extend(
        Measure::ALL
            .into_iter()
            .filter(|m| !columns.has(*m))
            .map(Measure::column),
    );
    missing
        .into_iter()
        .map(|column| MissingMeasureWarning { column: column.to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::types::Category;

    fn load(csv: &str) -> Roster {
        load_roster_from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_missing_department_column_is_schema_error() {
        let err = load_roster_from_reader("dept,staff name\nSurgery,A\n".as_bytes()).unwrap_err();
        match err {
            LoadError::Schema(e) => assert_eq!(e.column, "department"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_headers_are_normalized_before_lookup() {
        let roster = load(" department ,staff   name,total  hours\nSurgery,A,12\n");
        assert_eq!(roster.rows.len(), 1);
        assert_eq!(roster.rows[0].name, "A");
        assert_eq!(roster.rows[0].measure(Measure::TotalHours), 12.0);
        assert!(roster.columns.staff_name);
        assert!(roster.columns.has(Measure::TotalHours));
    }

    #[test]
    fn test_every_measure_header_is_read() {
        for measure in Measure::ALL {
            for header in measure.headers() {
                let csv = format!("department,{header}\nSurgery,7\n");
                let roster = load(&csv);
                assert_eq!(roster.rows[0].measure(measure), 7.0, "header {header}");
                assert!(roster.columns.has(measure));
            }
        }
    }

    #[test]
    fn test_absent_and_blank_measures_default_to_zero() {
        let roster = load("department,staff name,opened clinic,opr_low\nSurgery,A,,N/A\n");
        let row = &roster.rows[0];
        assert_eq!(row.measure(Measure::OpenedClinics), 0.0);
        assert_eq!(row.measure(Measure::Low), 0.0);
        assert_eq!(row.measure(Measure::Salary), 0.0);
        assert_eq!(roster.report.unparsed_cells, 1);
        assert!(!roster.columns.has(Measure::Salary));
    }

    #[test]
    fn test_missing_columns_are_reported_not_fatal() {
        let roster = load("department\nSurgery\n");
        let missing: Vec<&str> = roster
            .report
            .missing_columns
            .iter()
            .map(|w| w.column.as_str())
            .collect();
        assert!(missing.contains(&"staff name"));
        assert!(missing.contains(&"Contract type"));
        assert!(missing.contains(&"opr_elective"));
        assert_eq!(missing.len(), 3 + Measure::COUNT);
        assert_eq!(roster.rows[0].category, Category::Other);
    }

    #[test]
    fn test_rows_without_department_are_skipped() {
        let roster = load("department,staff name\nSurgery,A\n ,B\nUrology,C\n");
        assert_eq!(roster.report.total_rows, 3);
        assert_eq!(roster.report.blank_department, 1);
        assert_eq!(roster.departments(), vec!["Surgery", "Urology"]);
    }

    #[test]
    fn test_degree_is_classified_once_at_load() {
        let roster = load(
            "department,staff name,degree,Contract type\n\
             Surgery,A,Consultant Surgeon,Contracted\n\
             Surgery,B,resident,General\n",
        );
        assert_eq!(roster.rows[0].category, Category::Consultant);
        assert_eq!(roster.rows[1].category, Category::Resident);
        assert!(roster.rows[0].is_contract("Contracted"));
        assert!(roster.columns.contract_type);
    }

    #[test]
    fn test_header_and_alias_together_keep_every_row() {
        let roster = load("department,staff name,Net,net income\nSurgery,A,5,7\nSurgery,B,1,2\n");
        assert_eq!(roster.report.loaded_rows, 2);
        assert_eq!(roster.report.parse_errors, 0);
        assert_eq!(roster.rows[0].measure(Measure::Net), 5.0);
        assert_eq!(roster.rows[1].measure(Measure::Net), 1.0);
        assert!(roster.columns.has(Measure::Net));
    }

    #[test]
    fn test_headers_equal_after_normalization_keep_the_first() {
        let roster = load("department,total hours,total  hours\nSurgery,5,7\n");
        assert_eq!(roster.report.loaded_rows, 1);
        assert_eq!(roster.rows[0].measure(Measure::TotalHours), 5.0);
    }

    #[test]
    fn test_contract_alias_pair_reads_first_column() {
        let roster = load(
            "department,contract type,Contract type\nSurgery,Contracted,General\n",
        );
        assert_eq!(roster.rows.len(), 1);
        assert!(roster.rows[0].is_contract("Contracted"));
        assert!(roster.columns.contract_type);
    }

    #[test]
    fn test_department_sizes_counts_rows() {
        let roster = load("department\nB\nA\nB\n");
        let sizes = roster.department_sizes();
        assert_eq!(sizes.get("A"), Some(&1));
        assert_eq!(sizes.get("B"), Some(&2));
    }
}
