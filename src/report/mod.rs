//! Report composition.
//!
//! [`compose`] turns one department's projected tables into an ordered
//! [`ReportDocument`]; [`pdf::render`] lays that document out on landscape A4
//! pages. Generation is all-or-nothing: callers get complete PDF bytes or a
//! [`ReportGenerationError`].

pub mod pdf;

use crate::error::{ReportGenerationError, ReportResult};
use crate::projector::{ProjectedTables, TableData};
use chrono::NaiveDate;
use tracing::info;

const MM_PER_INCH: f32 = 25.4;

/// Table layouts with fixed column widths, so the printed layout does not
/// depend on the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    RosterWithContract,
    RosterNameOnly,
    Performance,
    OperationSource,
    OperationValue,
    Financial,
}

impl TableKind {
    pub fn column_widths_in(self) -> &'static [f32] {
        match self {
            TableKind::RosterWithContract => &[4.0, 2.0],
            TableKind::RosterNameOnly => &[6.0],
            TableKind::Performance => &[1.5, 1.0, 0.8, 0.8, 0.8, 0.8, 0.8, 0.8],
            TableKind::OperationSource => &[2.0, 1.5, 1.2, 1.2, 1.4],
            TableKind::OperationValue => &[2.0, 1.5, 1.0, 1.0, 1.0, 1.4],
            TableKind::Financial => &[2.0, 1.5, 1.5, 1.5, 1.5],
        }
    }

    pub fn column_widths_mm(self) -> Vec<f32> {
        self.column_widths_in()
            .iter()
            .map(|w| w * MM_PER_INCH)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledTable {
    pub kind: TableKind,
    pub data: TableData,
}

impl StyledTable {
    pub fn new(kind: TableKind, data: TableData) -> Self {
        Self { kind, data }
    }

    pub fn validate(&self) -> ReportResult<()> {
        let title = &self.data.title;
        let columns = self.data.headers.len();
        if columns == 0 {
            return Err(ReportGenerationError::MalformedTable {
                title: title.clone(),
                message: "no columns".to_string(),
            });
        }
        if columns != self.kind.column_widths_in().len() {
            return Err(ReportGenerationError::MalformedTable {
                title: title.clone(),
                message: format!(
                    "{} columns but layout {:?} defines {}",
                    columns,
                    self.kind,
                    self.kind.column_widths_in().len()
                ),
            });
        }
        if self.data.rows.is_empty() {
            return Err(ReportGenerationError::EmptyTable { title: title.clone() });
        }
        if let Some((i, row)) = self
            .data
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns)
        {
            return Err(ReportGenerationError::MalformedTable {
                title: title.clone(),
                message: format!("row {} has {} cells, expected {}", i + 1, row.len(), columns),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Caption(String),
    Heading(String),
    SubHeading(String),
    Table(StyledTable),
    /// Vertical gap in millimetres.
    Spacer(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub page_break_before: bool,
    pub blocks: Vec<Block>,
}

impl Section {
    fn new(page_break_before: bool) -> Self {
        Self {
            page_break_before,
            blocks: Vec::new(),
        }
    }

    fn push(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub sections: Vec<Section>,
}

impl ReportDocument {
    pub fn tables(&self) -> impl Iterator<Item = &StyledTable> {
        self.sections
            .iter()
            .flat_map(|s| s.blocks.iter())
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
    }

    pub fn validate(&self) -> ReportResult<()> {
        self.tables().try_for_each(StyledTable::validate)
    }
}

fn count_label(count: Option<usize>) -> String {
    count.map_or_else(|| "N/A".to_string(), |c| c.to_string())
}

/// Build the five-part report for one department.
pub fn compose(tables: &ProjectedTables, generated_on: NaiveDate) -> ReportResult<ReportDocument> {
    if tables.performance.is_empty() {
        return Err(ReportGenerationError::EmptyDepartment {
            department: tables.department.clone(),
        });
    }
    let title = format!("Surgical Department Report - {}", tables.department);

    let title_section = Section::new(false)
        .push(Block::Title(title.clone()))
        .push(Block::Caption(format!("Generated on {}", generated_on.format("%Y-%m-%d"))));

    let mut breakdown = Section::new(false).push(Block::Heading("Staff Breakdown by Degree".into()));
    for roster in tables.rosters.iter().filter(|r| r.total() > 0) {
        let kind = if roster.with_contract {
            TableKind::RosterWithContract
        } else {
            TableKind::RosterNameOnly
        };
        breakdown = breakdown
            .push(Block::SubHeading(format!(
                "{}s - Total: {} | Contracted: {} | General: {}",
                roster.category,
                roster.total(),
                count_label(roster.contracted()),
                count_label(roster.general()),
            )))
            .push(Block::Table(StyledTable::new(kind, roster.table())))
            .push(Block::Spacer(5.0));
    }

    let performance = Section::new(true)
        .push(Block::Heading("Overall Performance".into()))
        .push(Block::Table(StyledTable::new(
            TableKind::Performance,
            tables.performance_data(),
        )));

    let operations = Section::new(true)
        .push(Block::Heading("Operations Overview".into()))
        .push(Block::SubHeading("Operation Source".into()))
        .push(Block::Table(StyledTable::new(
            TableKind::OperationSource,
            tables.operation_source_data(),
        )))
        .push(Block::Spacer(5.0))
        .push(Block::SubHeading("Operation Value".into()))
        .push(Block::Table(StyledTable::new(
            TableKind::OperationValue,
            tables.operation_value_data(),
        )));

    let financial = Section::new(true)
        .push(Block::Heading("Financial Performance".into()))
        .push(Block::Table(StyledTable::new(
            TableKind::Financial,
            tables.financial_data(),
        )));

    Ok(ReportDocument {
        title,
        sections: vec![title_section, breakdown, performance, operations, financial],
    })
}

/// Compose and render in one step. Works on a private copy of the tables.
pub fn generate_report(tables: &ProjectedTables, generated_on: NaiveDate) -> ReportResult<pdf::RenderedReport> {
    let tables = tables.clone();
    let document = compose(&tables, generated_on)?;
    let rendered = pdf::render(&document)?;
    info!(
        department = %tables.department,
        pages = rendered.pages,
        bytes = rendered.bytes.len(),
        "report generated"
    );
    Ok(rendered)
}

/// Download name for a department's report. Path separators are replaced so
/// the name stays a single file.
pub fn report_file_name(department: &str) -> String {
    let safe: String = department
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("{}_report.pdf", safe)
}
