//! Surgical department roster analytics.
//!
//! Reads a staff roster CSV, derives per-department metrics and tables, and
//! renders a printable PDF report.
//!
//! ```text
//! CSV ─▶ loader (columns, classify) ─▶ Roster
//!          └─▶ DepartmentSlice ─▶ aggregate / projector / charts ─▶ DepartmentView
//!                                                   └─▶ report::compose ─▶ report::pdf
//! ```

pub mod aggregate;
pub mod charts;
pub mod classify;
pub mod columns;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod projector;
pub mod report;
pub mod theme;
pub mod types;
pub mod util;
pub mod view;

pub use aggregate::{percent, ratio, safe_sum, AggregateMetrics, DepartmentSlice};
pub use classify::classify_degree;
pub use columns::normalize_header;
pub use config::AnalyticsConfig;
pub use error::{AppError, LoadError, ReportGenerationError, SchemaError};
pub use loader::{load_roster, load_roster_from_reader, Roster};
pub use projector::ProjectedTables;
pub use report::{generate_report, report_file_name};
pub use types::Category;
pub use view::DepartmentView;
