use crate::aggregate::{DepartmentSlice, CONTRACTED, GENERAL};
use crate::config::AnalyticsConfig;
use crate::types::{
    Category, FinancialRow, Measure, OperationSourceRow, OperationValueRow, PerformanceRow,
    RosterEntry, RosterRow,
};
use crate::util::round2;
use tabled::Tabled;

/// Headers plus display cells. Shared input of the terminal tables and the
/// PDF renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn from_tabled<T: Tabled>(title: &str, rows: &[T]) -> Self {
        Self {
            title: title.to_string(),
            headers: T::headers().into_iter().map(|h| h.into_owned()).collect(),
            rows: rows
                .iter()
                .map(|r| r.fields().into_iter().map(|f| f.into_owned()).collect())
                .collect(),
        }
    }
}

/// Staff list of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRoster {
    pub category: Category,
    /// Whether the upload carries a contract column.
    pub with_contract: bool,
    pub entries: Vec<RosterEntry>,
}

impl CategoryRoster {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn contract_count(&self, kind: &str) -> Option<usize> {
        self.with_contract
            .then(|| self.entries.iter().filter(|e| e.contract_type == kind).count())
    }

    pub fn contracted(&self) -> Option<usize> {
        self.contract_count(CONTRACTED)
    }

    pub fn general(&self) -> Option<usize> {
        self.contract_count(GENERAL)
    }

    pub fn table(&self) -> TableData {
        let mut headers = vec!["Staff Name".to_string()];
        if self.with_contract {
            headers.push("Contract Type".to_string());
        }
        let rows = self
            .entries
            .iter()
            .map(|e| {
                let mut cells = vec![e.staff_name.clone()];
                if self.with_contract {
                    cells.push(e.contract_type.clone());
                }
                cells
            })
            .collect();
        TableData {
            title: format!("{}s", self.category),
            headers,
            rows,
        }
    }
}

/// Every table of one department view, derived from one slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedTables {
    pub department: String,
    /// Non-empty categories only, in presentation order.
    pub rosters: Vec<CategoryRoster>,
    pub performance: Vec<PerformanceRow>,
    pub operation_source: Vec<OperationSourceRow>,
    pub operation_value: Vec<OperationValueRow>,
    pub financial: Vec<FinancialRow>,
}

impl ProjectedTables {
    pub fn project(slice: &DepartmentSlice, config: &AnalyticsConfig) -> Self {
        let sorted = sort_by_category(&slice.rows);
        let rosters = Category::ALL
            .into_iter()
            .map(|c| category_roster(&sorted, c, slice.columns.contract_type))
            .filter(|r| !r.entries.is_empty())
            .collect();
        Self {
            department: slice.department.clone(),
            rosters,
            performance: performance_table(&sorted, config.period_divisor),
            operation_source: operation_source_table(&sorted),
            operation_value: operation_value_table(&sorted),
            financial: financial_table(&sorted),
        }
    }

    pub fn roster(&self, category: Category) -> Option<&CategoryRoster> {
        self.rosters.iter().find(|r| r.category == category)
    }

    pub fn performance_data(&self) -> TableData {
        TableData::from_tabled("Overall Performance", &self.performance)
    }

    pub fn operation_source_data(&self) -> TableData {
        TableData::from_tabled("Operation Source", &self.operation_source)
    }

    pub fn operation_value_data(&self) -> TableData {
        TableData::from_tabled("Operation Value", &self.operation_value)
    }

    pub fn financial_data(&self) -> TableData {
        TableData::from_tabled("Financial Performance", &self.financial)
    }
}

/// Stable sort by category precedence; rows within a category keep their
/// upload order.
pub fn sort_by_category(rows: &[RosterRow]) -> Vec<RosterRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|r| r.category);
    sorted
}

pub fn category_roster(rows: &[RosterRow], category: Category, with_contract: bool) -> CategoryRoster {
    CategoryRoster {
        category,
        with_contract,
        entries: rows
            .iter()
            .filter(|r| r.category == category)
            .map(|r| RosterEntry {
                staff_name: r.name.clone(),
                contract_type: r.contract.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

pub fn performance_table(rows: &[RosterRow], divisor: f64) -> Vec<PerformanceRow> {
    rows.iter()
        .map(|r| {
            let clinics = r.measure(Measure::OpenedClinics);
            let operations = r.measure(Measure::TotalOperations);
            PerformanceRow {
                staff_name: r.name.clone(),
                degree: r.degree.clone(),
                category: r.category,
                total_hours: r.measure(Measure::TotalHours),
                opened_clinics: clinics,
                total_visits: r.measure(Measure::TotalVisits),
                total_operations: operations,
                avg_clinics: round2(clinics / divisor),
                avg_operations: round2(operations / divisor),
            }
        })
        .collect()
}

pub fn operation_source_table(rows: &[RosterRow]) -> Vec<OperationSourceRow> {
    rows.iter()
        .map(|r| OperationSourceRow {
            staff_name: r.name.clone(),
            degree: r.degree.clone(),
            category: r.category,
            elective: r.measure(Measure::Elective),
            emergency: r.measure(Measure::Emergency),
            total_operations: r.measure(Measure::TotalOperations),
        })
        .collect()
}

pub fn operation_value_table(rows: &[RosterRow]) -> Vec<OperationValueRow> {
    rows.iter()
        .map(|r| OperationValueRow {
            staff_name: r.name.clone(),
            degree: r.degree.clone(),
            category: r.category,
            high: r.measure(Measure::High),
            moderate: r.measure(Measure::Moderate),
            low: r.measure(Measure::Low),
            total_operations: r.measure(Measure::TotalOperations),
        })
        .collect()
}

pub fn financial_table(rows: &[RosterRow]) -> Vec<FinancialRow> {
    rows.iter()
        .map(|r| FinancialRow {
            staff_name: r.name.clone(),
            degree: r.degree.clone(),
            category: r.category,
            total_salary: r.measure(Measure::Salary),
            total_income: r.measure(Measure::Income),
            net_income: r.measure(Measure::Net),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::{roster, row, surgery_roster};
    use crate::types::{ColumnPresence, Measures};
    use proptest::prelude::*;

    fn surgery_tables() -> ProjectedTables {
        let slice = DepartmentSlice::from_roster(&surgery_roster(), "Surgery");
        ProjectedTables::project(&slice, &AnalyticsConfig::default())
    }

    #[test]
    fn test_surgery_example_averages_use_fixed_divisor() {
        let tables = surgery_tables();
        let a = &tables.performance[0];
        assert_eq!(a.staff_name, "A");
        assert_eq!(a.avg_clinics, 1.0);
        assert_eq!(a.avg_operations, 2.0);
        let b = &tables.performance[1];
        assert_eq!(b.avg_clinics, 0.5);
        assert_eq!(b.avg_operations, 0.5);

        let data = tables.performance_data();
        assert_eq!(data.rows[0][6], "1.00");
        assert_eq!(data.rows[0][7], "2.00");
    }

    #[test]
    fn test_configured_divisor_changes_averages() {
        let slice = DepartmentSlice::from_roster(&surgery_roster(), "Surgery");
        let config = AnalyticsConfig { period_divisor: 3.0, ..AnalyticsConfig::default() };
        let tables = ProjectedTables::project(&slice, &config);
        assert_eq!(tables.performance[0].avg_clinics, 3.33);
        assert_eq!(tables.performance[0].avg_operations, 6.67);
    }

    #[test]
    fn test_rosters_skip_empty_categories() {
        let tables = surgery_tables();
        let cats: Vec<Category> = tables.rosters.iter().map(|r| r.category).collect();
        assert_eq!(cats, vec![Category::Consultant, Category::Resident]);
        let consultants = tables.roster(Category::Consultant).unwrap();
        assert_eq!(consultants.total(), 1);
        assert_eq!(consultants.contracted(), Some(1));
        assert_eq!(consultants.general(), Some(0));
    }

    #[test]
    fn test_roster_table_drops_contract_column_when_absent() {
        let rows = vec![row("S", "A", "Resident", None, Measures::default())];
        let with = category_roster(&rows, Category::Resident, true).table();
        assert_eq!(with.headers, vec!["Staff Name", "Contract Type"]);
        let without = category_roster(&rows, Category::Resident, false);
        assert_eq!(without.table().headers, vec!["Staff Name"]);
        assert_eq!(without.table().rows, vec![vec!["A".to_string()]]);
        assert_eq!(without.contracted(), None);
        assert_eq!(without.table().title, "Residents");
    }

    #[test]
    fn test_table_headers_use_presentation_labels() {
        let tables = surgery_tables();
        assert_eq!(
            tables.performance_data().headers,
            vec![
                "Staff Name",
                "Degree",
                "Total Hours",
                "Opened Clinics",
                "Total Visits",
                "Total Operations",
                "Avg. Clinics",
                "Avg. Operations"
            ]
        );
        assert_eq!(
            tables.operation_source_data().headers,
            vec!["Staff Name", "Degree", "Elective", "Emergency", "Total Operations"]
        );
        assert_eq!(
            tables.operation_value_data().headers,
            vec!["Staff Name", "Degree", "High", "Moderate", "Low", "Total Operations"]
        );
        assert_eq!(
            tables.financial_data().headers,
            vec!["Staff Name", "Degree", "Total Salary", "Total Income", "Net Income"]
        );
    }

    #[test]
    fn test_sort_places_categories_in_precedence_order() {
        let rows = vec![
            row("S", "o1", "Nurse", None, Measures::default()),
            row("S", "r1", "Resident", None, Measures::default()),
            row("S", "c1", "Consultant", None, Measures::default()),
            row("S", "s1", "Specialist", None, Measures::default()),
            row("S", "r2", "resident 2", None, Measures::default()),
            row("S", "c2", "consultant 2", None, Measures::default()),
        ];
        let names: Vec<String> = sort_by_category(&rows).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["c1", "c2", "s1", "r1", "r2", "o1"]);
    }

    fn degree_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "Consultant",
            "Specialist",
            "Resident",
            "Registrar",
            "consultant specialist",
            "",
        ])
    }

    proptest! {
        #[test]
        fn prop_category_sort_is_stable_and_total(
            specs in prop::collection::vec((degree_strategy(), 0u32..50), 0..30)
        ) {
            let rows: Vec<RosterRow> = specs
                .iter()
                .enumerate()
                .map(|(i, (degree, ops))| {
                    let m = Measures::default().with(Measure::TotalOperations, *ops as f64);
                    row("S", &format!("n{i}"), degree, None, m)
                })
                .collect();
            let once = sort_by_category(&rows);
            prop_assert_eq!(sort_by_category(&once), once.clone());
            prop_assert!(once.windows(2).all(|w| w[0].category <= w[1].category));
            for category in Category::ALL {
                let original: Vec<&str> = rows.iter().filter(|r| r.category == category).map(|r| r.name.as_str()).collect();
                let sorted: Vec<&str> = once.iter().filter(|r| r.category == category).map(|r| r.name.as_str()).collect();
                prop_assert_eq!(original, sorted);
            }
        }

        #[test]
        fn prop_total_operations_agree_across_tables(
            specs in prop::collection::vec((degree_strategy(), 0u32..500, 0u32..500), 1..25)
        ) {
            let rows: Vec<RosterRow> = specs
                .iter()
                .enumerate()
                .map(|(i, (degree, ops, clinics))| {
                    let m = Measures::default()
                        .with(Measure::TotalOperations, *ops as f64)
                        .with(Measure::OpenedClinics, *clinics as f64);
                    row("S", &format!("n{i}"), degree, None, m)
                })
                .collect();
            let slice = DepartmentSlice::from_roster(&roster(rows, ColumnPresence::complete()), "S");
            let tables = ProjectedTables::project(&slice, &AnalyticsConfig::default());
            prop_assert_eq!(tables.performance.len(), tables.operation_source.len());
            prop_assert_eq!(tables.performance.len(), tables.operation_value.len());
            for ((p, s), v) in tables
                .performance
                .iter()
                .zip(&tables.operation_source)
                .zip(&tables.operation_value)
            {
                prop_assert_eq!(&p.staff_name, &s.staff_name);
                prop_assert_eq!(&p.staff_name, &v.staff_name);
                prop_assert_eq!(p.total_operations, s.total_operations);
                prop_assert_eq!(p.total_operations, v.total_operations);
            }
        }
    }
}
