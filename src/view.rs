use crate::aggregate::{AggregateMetrics, DepartmentSlice};
use crate::charts::ChartSet;
use crate::config::AnalyticsConfig;
use crate::error::{AppError, AppResult};
use crate::loader::Roster;
use crate::projector::ProjectedTables;
use serde::Serialize;
use tracing::info;

/// Everything derived for the selected department. Rebuilt from scratch on
/// every selection; never patched.
#[derive(Debug, Clone)]
pub struct DepartmentView {
    pub slice: DepartmentSlice,
    pub metrics: AggregateMetrics,
    pub tables: ProjectedTables,
    pub charts: ChartSet,
}

impl DepartmentView {
    pub fn build(roster: &Roster, department: &str, config: &AnalyticsConfig) -> AppResult<Self> {
        let slice = DepartmentSlice::from_roster(roster, department);
        if slice.is_empty() {
            return Err(AppError::UnknownDepartment {
                department: department.to_string(),
            });
        }
        let metrics = AggregateMetrics::compute(&slice);
        let tables = ProjectedTables::project(&slice, config);
        let charts = ChartSet::build(&slice, &metrics);
        info!(department, staff = metrics.total_staff, "department view built");
        Ok(Self {
            slice,
            metrics,
            tables,
            charts,
        })
    }

    pub fn department(&self) -> &str {
        &self.slice.department
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary {
            department: self.department(),
            metrics: &self.metrics,
            charts: &self.charts,
        }
    }
}

/// JSON export of the scalar metrics and chart series.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub department: &'a str,
    pub metrics: &'a AggregateMetrics,
    pub charts: &'a ChartSet,
}
