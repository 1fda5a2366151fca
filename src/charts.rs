//! Chart series for the dashboard: two proportion charts for the operation
//! mix and three ranked staff bars. Colors come from [`THEME`].

use crate::aggregate::{ratio, AggregateMetrics, DepartmentSlice};
use crate::projector::sort_by_category;
use crate::theme::THEME;
use crate::types::{Category, Measure};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    /// Fraction of the chart total in `0.0..=1.0`; zero when the total is zero.
    pub share: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionChart {
    pub title: String,
    pub slices: Vec<Slice>,
}

impl ProportionChart {
    fn new(title: &str, parts: &[(&str, f64)], colors: &[crate::theme::Rgb8]) -> Self {
        let total: f64 = parts.iter().map(|(_, v)| v).sum();
        Self {
            title: title.to_string(),
            slices: parts
                .iter()
                .zip(colors)
                .map(|((label, value), color)| Slice {
                    label: label.to_string(),
                    value: *value,
                    share: ratio(*value, total),
                    color: color.hex(),
                })
                .collect(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.slices.iter().map(|s| s.value).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub category: Category,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBars {
    pub title: String,
    pub measure: Measure,
    /// Ascending by value.
    pub bars: Vec<Bar>,
}

impl RankedBars {
    /// Bars over the category-sorted slice, then stably re-sorted ascending
    /// by the charted measure.
    pub fn new(title: &str, slice: &DepartmentSlice, measure: Measure) -> Self {
        let mut bars: Vec<Bar> = sort_by_category(&slice.rows)
            .into_iter()
            .map(|r| Bar {
                value: r.measure(measure),
                color: THEME.category_color(r.category).hex(),
                category: r.category,
                label: r.name,
            })
            .collect();
        bars.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
        Self {
            title: title.to_string(),
            measure,
            bars,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub operation_source: ProportionChart,
    pub operation_value: ProportionChart,
    pub clinics: RankedBars,
    pub operations: RankedBars,
    pub net_income: RankedBars,
}

impl ChartSet {
    pub fn build(slice: &DepartmentSlice, metrics: &AggregateMetrics) -> Self {
        Self {
            operation_source: ProportionChart::new(
                "Operation Source",
                &[("Elective", metrics.elective), ("Emergency", metrics.emergency)],
                &THEME.operation_source,
            ),
            operation_value: ProportionChart::new(
                "Operation Value",
                &[
                    ("High", metrics.high),
                    ("Moderate", metrics.moderate),
                    ("Low", metrics.low),
                ],
                &THEME.operation_value,
            ),
            clinics: RankedBars::new("Clinics by Staff", slice, Measure::OpenedClinics),
            operations: RankedBars::new("Operations by Staff", slice, Measure::TotalOperations),
            net_income: RankedBars::new("Net Income by Staff", slice, Measure::Net),
        }
    }

    pub fn ranked(&self) -> [&RankedBars; 3] {
        [&self.clinics, &self.operations, &self.net_income]
    }
}
