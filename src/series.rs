use log::warn;

use crate::error::MalformedMetricValue;
use crate::field::{Dimension, Metric};
use crate::record::{normalize_text, SurveyRecord};

/// Which metric to plot and which university/degree to hold fixed.
///
/// With neither constraint set the whole dataset contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesQuery {
    pub metric: Metric,
    pub university: Option<String>,
    pub degree: Option<String>,
}

impl SeriesQuery {
    pub fn new(metric: Metric) -> Self {
        SeriesQuery {
            metric,
            university: None,
            degree: None,
        }
    }

    pub fn university(mut self, university: impl Into<String>) -> Self {
        self.university = Some(university.into());
        self
    }

    pub fn degree(mut self, degree: impl Into<String>) -> Self {
        self.degree = Some(degree.into());
        self
    }

    pub fn is_constrained(&self) -> bool {
        self.university.is_some() || self.degree.is_some()
    }

    fn matches(&self, record: &SurveyRecord) -> bool {
        matches_text(record, Dimension::University, self.university.as_deref())
            && matches_text(record, Dimension::Degree, self.degree.as_deref())
    }
}

fn matches_text(record: &SurveyRecord, dimension: Dimension, wanted: Option<&str>) -> bool {
    match (wanted, record.text(dimension)) {
        (None, _) => true,
        (Some(wanted), Some(actual)) => normalize_text(wanted) == actual,
        (Some(_), None) => false,
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// Padded bounds for a chart's value axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DisplayRange {
    pub lower: f64,
    pub upper: f64,
}

/// Extracted points, plus the cells that had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub metric: Metric,
    pub points: Vec<SeriesPoint>,
    pub rejected: Vec<MalformedMetricValue>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// `None` for an empty series; there is nothing to scale.
    pub fn display_range(&self) -> Option<DisplayRange> {
        display_range(self.metric, &self.values())
    }

    /// Puts the points in chronological order. Points sharing a year keep
    /// their input order.
    pub fn sort_by_year(&mut self) {
        self.points.sort_by_key(|p| p.year);
    }

    /// Earliest and latest year in the series.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let min = self.points.iter().map(|p| p.year).min()?;
        let max = self.points.iter().map(|p| p.year).max()?;
        Some((min, max))
    }
}

/// `(year, value)` pairs for `query.metric`, in the order of `records`.
///
/// Records matching the query whose cell has no numeric reading are left
/// out and reported in [`Series::rejected`].
pub fn extract_series(records: &[SurveyRecord], query: &SeriesQuery) -> Series {
    let mut points = Vec::new();
    let mut rejected = Vec::new();

    for record in records.iter().filter(|r| query.matches(r)) {
        let cell = record.metric(query.metric);
        match cell.as_number() {
            Some(value) => points.push(SeriesPoint {
                year: record.year,
                value,
            }),
            None => {
                let malformed = MalformedMetricValue {
                    metric: query.metric,
                    year: record.year,
                    university: normalize_text(&record.university).into_owned(),
                    raw: cell.to_string(),
                };
                warn!(
                    "event=malformed_metric module=series status=skipped metric={} year={} raw={:?}",
                    query.metric.key(),
                    record.year,
                    malformed.raw
                );
                rejected.push(malformed);
            }
        }
    }

    Series {
        metric: query.metric,
        points,
        rejected,
    }
}

/// `[max(0, min - pad), min(cap, max + pad)]` over `values`, with the pad
/// and cap chosen by the metric's kind. `None` when `values` is empty.
pub fn display_range(metric: Metric, values: &[f64]) -> Option<DisplayRange> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    let pad = metric.axis_padding();
    Some(DisplayRange {
        lower: (min - pad).max(0.0),
        upper: (max + pad).min(metric.axis_cap()),
    })
}
