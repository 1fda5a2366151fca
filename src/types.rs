use crate::util::{fmt_avg, fmt_measure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tabled::Tabled;

/// Header of the only column every upload must carry.
pub const DEPARTMENT_COLUMN: &str = "department";

/// One CSV row after header canonicalization. Every column is optional here;
/// the loader decides what an absent or blank cell means.
#[derive(Debug, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "department")]
    pub department: Option<String>,
    #[serde(rename = "staff name")]
    pub staff_name: Option<String>,
    #[serde(rename = "degree")]
    pub degree: Option<String>,
    #[serde(rename = "Contract type")]
    pub contract_type: Option<String>,
    #[serde(rename = "total hours")]
    pub total_hours: Option<String>,
    #[serde(rename = "opened clinic")]
    pub opened_clinic: Option<String>,
    #[serde(rename = "Total visits")]
    pub total_visits: Option<String>,
    #[serde(rename = "Operation total number")]
    pub operation_total: Option<String>,
    #[serde(rename = "opr_elective")]
    pub opr_elective: Option<String>,
    #[serde(rename = "opr_emergency")]
    pub opr_emergency: Option<String>,
    #[serde(rename = "opr_high")]
    pub opr_high: Option<String>,
    #[serde(rename = "opr_moderate")]
    pub opr_moderate: Option<String>,
    #[serde(rename = "opr_low")]
    pub opr_low: Option<String>,
    #[serde(rename = "total slary")]
    pub total_salary: Option<String>,
    #[serde(rename = "total income")]
    pub total_income: Option<String>,
    #[serde(rename = "Net")]
    pub net: Option<String>,
}

impl RawRow {
    pub fn measure(&self, measure: Measure) -> Option<&str> {
        let cell = match measure {
            Measure::TotalHours => &self.total_hours,
            Measure::OpenedClinics => &self.opened_clinic,
            Measure::TotalVisits => &self.total_visits,
            Measure::TotalOperations => &self.operation_total,
            Measure::Elective => &self.opr_elective,
            Measure::Emergency => &self.opr_emergency,
            Measure::High => &self.opr_high,
            Measure::Moderate => &self.opr_moderate,
            Measure::Low => &self.opr_low,
            Measure::Salary => &self.total_salary,
            Measure::Income => &self.total_income,
            Measure::Net => &self.net,
        };
        cell.as_deref()
    }
}

/// Staff category derived from the free-text degree. Declaration order is
/// the presentation order used by every projected table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Consultant,
    Specialist,
    Resident,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Consultant,
        Category::Specialist,
        Category::Resident,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Consultant => "Consultant",
            Category::Specialist => "Specialist",
            Category::Resident => "Resident",
            Category::Other => "Other",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Numeric columns recognized in an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Measure {
    TotalHours,
    OpenedClinics,
    TotalVisits,
    TotalOperations,
    Elective,
    Emergency,
    High,
    Moderate,
    Low,
    Salary,
    Income,
    Net,
}

impl Measure {
    pub const COUNT: usize = 12;

    pub const ALL: [Measure; Measure::COUNT] = [
        Measure::TotalHours,
        Measure::OpenedClinics,
        Measure::TotalVisits,
        Measure::TotalOperations,
        Measure::Elective,
        Measure::Emergency,
        Measure::High,
        Measure::Moderate,
        Measure::Low,
        Measure::Salary,
        Measure::Income,
        Measure::Net,
    ];

    /// Accepted headers, canonical name first. Must agree with the serde
    /// attributes on [`RawRow`].
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Measure::TotalHours => &["total hours"],
            Measure::OpenedClinics => &["opened clinic"],
            Measure::TotalVisits => &["Total visits"],
            Measure::TotalOperations => &["Operation total number"],
            Measure::Elective => &["opr_elective"],
            Measure::Emergency => &["opr_emergency"],
            Measure::High => &["opr_high"],
            Measure::Moderate => &["opr_moderate"],
            Measure::Low => &["opr_low"],
            Measure::Salary => &["total slary", "total salary"],
            Measure::Income => &["total income"],
            Measure::Net => &["Net", "net income"],
        }
    }

    pub fn column(self) -> &'static str {
        self.headers()[0]
    }
}

/// Measures of one row with the default-to-zero policy already applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measures([f64; Measure::COUNT]);

impl Measures {
    pub fn get(&self, measure: Measure) -> f64 {
        self.0[measure as usize]
    }

    pub fn set(&mut self, measure: Measure, value: f64) {
        self.0[measure as usize] = value;
    }

    pub fn with(mut self, measure: Measure, value: f64) -> Self {
        self.set(measure, value);
        self
    }
}

/// One staff member's record.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    pub department: String,
    pub name: String,
    pub degree: String,
    pub contract: Option<String>,
    pub category: Category,
    pub measures: Measures,
}

impl RosterRow {
    pub fn measure(&self, measure: Measure) -> f64 {
        self.measures.get(measure)
    }

    pub fn is_contract(&self, kind: &str) -> bool {
        self.contract.as_deref() == Some(kind)
    }
}

/// Which optional columns were present in the upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPresence {
    pub staff_name: bool,
    pub degree: bool,
    pub contract_type: bool,
    pub measures: BTreeSet<Measure>,
}

impl ColumnPresence {
    pub fn has(&self, measure: Measure) -> bool {
        self.measures.contains(&measure)
    }

    /// Every recognized column present, as produced by a complete upload.
    pub fn complete() -> Self {
        ColumnPresence {
            staff_name: true,
            degree: true,
            contract_type: true,
            measures: Measure::ALL.into_iter().collect(),
        }
    }
}

/// A recognized optional column absent from the upload. Non-fatal: sums
/// over it are zero and metric cards show "N/A".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingMeasureWarning {
    pub column: String,
}

impl fmt::Display for MissingMeasureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "optional column '{}' is missing; treated as zero", self.column)
    }
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct PerformanceRow {
    #[serde(rename = "Staff Name")]
    #[tabled(rename = "Staff Name")]
    pub staff_name: String,
    #[serde(rename = "Degree")]
    #[tabled(rename = "Degree")]
    pub degree: String,
    #[serde(skip)]
    #[tabled(skip)]
    pub category: Category,
    #[serde(rename = "Total Hours")]
    #[tabled(rename = "Total Hours", display_with = "fmt_measure")]
    pub total_hours: f64,
    #[serde(rename = "Opened Clinics")]
    #[tabled(rename = "Opened Clinics", display_with = "fmt_measure")]
    pub opened_clinics: f64,
    #[serde(rename = "Total Visits")]
    #[tabled(rename = "Total Visits", display_with = "fmt_measure")]
    pub total_visits: f64,
    #[serde(rename = "Total Operations")]
    #[tabled(rename = "Total Operations", display_with = "fmt_measure")]
    pub total_operations: f64,
    #[serde(rename = "Avg. Clinics")]
    #[tabled(rename = "Avg. Clinics", display_with = "fmt_avg")]
    pub avg_clinics: f64,
    #[serde(rename = "Avg. Operations")]
    #[tabled(rename = "Avg. Operations", display_with = "fmt_avg")]
    pub avg_operations: f64,
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct OperationSourceRow {
    #[serde(rename = "Staff Name")]
    #[tabled(rename = "Staff Name")]
    pub staff_name: String,
    #[serde(rename = "Degree")]
    #[tabled(rename = "Degree")]
    pub degree: String,
    #[serde(skip)]
    #[tabled(skip)]
    pub category: Category,
    #[serde(rename = "Elective")]
    #[tabled(rename = "Elective", display_with = "fmt_measure")]
    pub elective: f64,
    #[serde(rename = "Emergency")]
    #[tabled(rename = "Emergency", display_with = "fmt_measure")]
    pub emergency: f64,
    #[serde(rename = "Total Operations")]
    #[tabled(rename = "Total Operations", display_with = "fmt_measure")]
    pub total_operations: f64,
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct OperationValueRow {
    #[serde(rename = "Staff Name")]
    #[tabled(rename = "Staff Name")]
    pub staff_name: String,
    #[serde(rename = "Degree")]
    #[tabled(rename = "Degree")]
    pub degree: String,
    #[serde(skip)]
    #[tabled(skip)]
    pub category: Category,
    #[serde(rename = "High")]
    #[tabled(rename = "High", display_with = "fmt_measure")]
    pub high: f64,
    #[serde(rename = "Moderate")]
    #[tabled(rename = "Moderate", display_with = "fmt_measure")]
    pub moderate: f64,
    #[serde(rename = "Low")]
    #[tabled(rename = "Low", display_with = "fmt_measure")]
    pub low: f64,
    #[serde(rename = "Total Operations")]
    #[tabled(rename = "Total Operations", display_with = "fmt_measure")]
    pub total_operations: f64,
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct FinancialRow {
    #[serde(rename = "Staff Name")]
    #[tabled(rename = "Staff Name")]
    pub staff_name: String,
    #[serde(rename = "Degree")]
    #[tabled(rename = "Degree")]
    pub degree: String,
    #[serde(skip)]
    #[tabled(skip)]
    pub category: Category,
    #[serde(rename = "Total Salary")]
    #[tabled(rename = "Total Salary", display_with = "fmt_measure")]
    pub total_salary: f64,
    #[serde(rename = "Total Income")]
    #[tabled(rename = "Total Income", display_with = "fmt_measure")]
    pub total_income: f64,
    #[serde(rename = "Net Income")]
    #[tabled(rename = "Net Income", display_with = "fmt_measure")]
    pub net_income: f64,
}

/// Entry of a per-category roster table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RosterEntry {
    #[serde(rename = "Staff Name")]
    pub staff_name: String,
    #[serde(rename = "Contract Type")]
    pub contract_type: String,
}
