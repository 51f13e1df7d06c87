use std::fmt;
use std::str::FromStr;

use crate::error::ParseFieldError;

/// Categorical columns that can carry a multi-select filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Year,
    University,
    School,
    Degree,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::University,
        Dimension::School,
        Dimension::Degree,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Year => "year",
            Dimension::University => "university",
            Dimension::School => "school",
            Dimension::Degree => "degree",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Field::from(*self).header())
    }
}

impl FromStr for Dimension {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.key() == s.trim())
            .ok_or_else(|| ParseFieldError(s.to_string()))
    }
}

/// Whether a metric is a percentage or an amount in dollars.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MetricKind {
    Rate,
    Currency,
}

/// The eight numeric survey columns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    EmploymentRateOverall,
    EmploymentRateFtPerm,
    BasicMonthlyMean,
    BasicMonthlyMedian,
    GrossMonthlyMean,
    GrossMonthlyMedian,
    GrossMonthly25Percentile,
    GrossMonthly75Percentile,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::EmploymentRateOverall,
        Metric::EmploymentRateFtPerm,
        Metric::BasicMonthlyMean,
        Metric::BasicMonthlyMedian,
        Metric::GrossMonthlyMean,
        Metric::GrossMonthlyMedian,
        Metric::GrossMonthly25Percentile,
        Metric::GrossMonthly75Percentile,
    ];

    /// Column name used by the dataset files.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::EmploymentRateOverall => "employment_rate_overall",
            Metric::EmploymentRateFtPerm => "employment_rate_ft_perm",
            Metric::BasicMonthlyMean => "basic_monthly_mean",
            Metric::BasicMonthlyMedian => "basic_monthly_median",
            Metric::GrossMonthlyMean => "gross_monthly_mean",
            Metric::GrossMonthlyMedian => "gross_monthly_median",
            Metric::GrossMonthly25Percentile => "gross_mthly_25_percentile",
            Metric::GrossMonthly75Percentile => "gross_mthly_75_percentile",
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::EmploymentRateOverall | Metric::EmploymentRateFtPerm => MetricKind::Rate,
            _ => MetricKind::Currency,
        }
    }

    /// Padding added on both sides of a chart's value axis.
    pub fn axis_padding(&self) -> f64 {
        match self.kind() {
            MetricKind::Rate => 5.0,
            MetricKind::Currency => 500.0,
        }
    }

    /// Upper limit of a chart's value axis.
    pub fn axis_cap(&self) -> f64 {
        match self.kind() {
            MetricKind::Rate => 100.0,
            MetricKind::Currency => 100_000.0,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Field::Metric(*self).header())
    }
}

impl FromStr for Metric {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key() == s.trim())
            .ok_or_else(|| ParseFieldError(s.to_string()))
    }
}

/// Any column of the survey table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Year,
    University,
    School,
    Degree,
    Metric(Metric),
}

impl Field {
    /// Table columns in display order.
    pub const ALL: [Field; 12] = [
        Field::Year,
        Field::University,
        Field::School,
        Field::Degree,
        Field::Metric(Metric::EmploymentRateOverall),
        Field::Metric(Metric::EmploymentRateFtPerm),
        Field::Metric(Metric::BasicMonthlyMean),
        Field::Metric(Metric::BasicMonthlyMedian),
        Field::Metric(Metric::GrossMonthlyMean),
        Field::Metric(Metric::GrossMonthlyMedian),
        Field::Metric(Metric::GrossMonthly25Percentile),
        Field::Metric(Metric::GrossMonthly75Percentile),
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::Year => Dimension::Year.key(),
            Field::University => Dimension::University.key(),
            Field::School => Dimension::School.key(),
            Field::Degree => Dimension::Degree.key(),
            Field::Metric(metric) => metric.key(),
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::University => "University",
            Field::School => "School",
            Field::Degree => "Degree",
            Field::Metric(Metric::EmploymentRateOverall) => "Overall Employment Rate (%)",
            Field::Metric(Metric::EmploymentRateFtPerm) => {
                "Full-Time Permanent Employment Rate (%)"
            }
            Field::Metric(Metric::BasicMonthlyMean) => "Basic Monthly Salary - Mean (S$)",
            Field::Metric(Metric::BasicMonthlyMedian) => "Basic Monthly Salary - Median (S$)",
            Field::Metric(Metric::GrossMonthlyMean) => "Gross Monthly Salary - Mean (S$)",
            Field::Metric(Metric::GrossMonthlyMedian) => "Gross Monthly Salary - Median (S$)",
            Field::Metric(Metric::GrossMonthly25Percentile) => {
                "Gross Monthly Salary - 25th Percentile (S$)"
            }
            Field::Metric(Metric::GrossMonthly75Percentile) => {
                "Gross Monthly Salary - 75th Percentile (S$)"
            }
        }
    }
}

impl From<Dimension> for Field {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Year => Field::Year,
            Dimension::University => Field::University,
            Dimension::School => Field::School,
            Dimension::Degree => Field::Degree,
        }
    }
}

impl From<Metric> for Field {
    fn from(metric: Metric) -> Self {
        Field::Metric(metric)
    }
}

impl FromStr for Field {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.key() == s.trim())
            .ok_or_else(|| ParseFieldError(s.to_string()))
    }
}
