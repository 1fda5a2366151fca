//! Department slicing and aggregate metrics.
//!
//! Measures were defaulted to zero at load time, so every function here is
//! total: missing columns sum to zero and zero denominators give zero.

use crate::loader::Roster;
use crate::types::{Category, ColumnPresence, Measure, RosterRow};
use serde::Serialize;

pub const CONTRACTED: &str = "Contracted";
pub const GENERAL: &str = "General";

/// Sum of `measure` over `rows`. A column absent from the upload
/// contributes zero.
pub fn safe_sum(rows: &[RosterRow], measure: Measure) -> f64 {
    rows.iter().map(|r| r.measure(measure)).sum()
}

/// `part` as a percentage of `whole`; zero when `whole` is zero.
pub fn percent(part: f64, whole: f64) -> f64 {
    ratio(part, whole) * 100.0
}

/// `num / den`; zero when `den` is zero.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// The rows of one department, copied out of the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentSlice {
    pub department: String,
    pub rows: Vec<RosterRow>,
    pub columns: ColumnPresence,
}

impl DepartmentSlice {
    pub fn from_roster(roster: &Roster, department: &str) -> Self {
        Self {
            department: department.to_string(),
            rows: roster
                .rows
                .iter()
                .filter(|r| r.department == department)
                .cloned()
                .collect(),
            columns: roster.columns.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn group(&self, category: Category) -> CategoryGroup {
        CategoryGroup {
            category,
            rows: self
                .rows
                .iter()
                .filter(|r| r.category == category)
                .cloned()
                .collect(),
        }
    }

    /// Contract count, or `None` when the upload has no contract column.
    pub fn contract_count(&self, kind: &str) -> Option<usize> {
        contract_count(&self.rows, &self.columns, kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: Category,
    pub rows: Vec<RosterRow>,
}

fn contract_count(rows: &[RosterRow], columns: &ColumnPresence, kind: &str) -> Option<usize> {
    columns
        .contract_type
        .then(|| rows.iter().filter(|r| r.is_contract(kind)).count())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub total: usize,
    pub contracted: Option<usize>,
    pub general: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateMetrics {
    pub total_staff: usize,
    pub contracted: Option<usize>,
    pub general: Option<usize>,
    pub contracted_pct: f64,
    pub general_pct: f64,
    pub total_hours: f64,
    pub total_clinics: f64,
    pub total_visits: f64,
    pub total_operations: f64,
    pub elective: f64,
    pub emergency: f64,
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
    pub total_salary: f64,
    pub total_income: f64,
    pub total_net: f64,
    pub net_to_income_pct: f64,
    /// Non-empty categories only, in presentation order.
    pub categories: Vec<CategoryCount>,
}

impl AggregateMetrics {
    pub fn compute(slice: &DepartmentSlice) -> Self {
        let rows = &slice.rows;
        let total_staff = rows.len();
        let contracted = slice.contract_count(CONTRACTED);
        let general = slice.contract_count(GENERAL);
        let staff = total_staff as f64;
        let total_income = safe_sum(rows, Measure::Income);
        let total_net = safe_sum(rows, Measure::Net);

        let categories = Category::ALL
            .into_iter()
            .map(|category| slice.group(category))
            .filter(|group| !group.rows.is_empty())
            .map(|group| CategoryCount {
                category: group.category,
                total: group.rows.len(),
                contracted: contract_count(&group.rows, &slice.columns, CONTRACTED),
                general: contract_count(&group.rows, &slice.columns, GENERAL),
            })
            .collect();

        Self {
            total_staff,
            contracted,
            general,
            contracted_pct: percent(contracted.unwrap_or(0) as f64, staff),
            general_pct: percent(general.unwrap_or(0) as f64, staff),
            total_hours: safe_sum(rows, Measure::TotalHours),
            total_clinics: safe_sum(rows, Measure::OpenedClinics),
            total_visits: safe_sum(rows, Measure::TotalVisits),
            total_operations: safe_sum(rows, Measure::TotalOperations),
            elective: safe_sum(rows, Measure::Elective),
            emergency: safe_sum(rows, Measure::Emergency),
            high: safe_sum(rows, Measure::High),
            moderate: safe_sum(rows, Measure::Moderate),
            low: safe_sum(rows, Measure::Low),
            total_salary: safe_sum(rows, Measure::Salary),
            total_income,
            total_net,
            net_to_income_pct: percent(total_net, total_income),
            categories,
        }
    }

    pub fn category(&self, category: Category) -> Option<&CategoryCount> {
        self.categories.iter().find(|c| c.category == category)
    }
}
