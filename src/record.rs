use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::{Dimension, Field, Metric};

/// Raw content of a metric cell, as it appears in the dataset file.
///
/// Rates are sometimes published as strings such as `"91.5%"`, and a few
/// cells hold placeholders like `"na"`; they are kept verbatim here and
/// normalised on read by [`MetricValue::as_number`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric reading of the cell.
    ///
    /// A string ending in `%` has the suffix stripped and the leading integer
    /// of the remainder parsed, so any fraction is truncated (`"91.5%"` is
    /// `91`). Other strings must parse as a plain number. Returns `None` when
    /// the cell has no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(v) => Some(*v as f64),
            MetricValue::Decimal(v) => v.is_finite().then_some(*v),
            MetricValue::Text(s) => {
                let s = s.trim();
                match s.strip_suffix('%') {
                    Some(body) => parse_leading_integer(body).map(|v| v as f64),
                    None => s.parse::<f64>().ok().filter(|v| v.is_finite()),
                }
            }
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{v}"),
            MetricValue::Decimal(v) => write!(f, "{v}"),
            MetricValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Integer(value)
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        MetricValue::Integer(i64::from(value))
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Decimal(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

// Leading optional sign and digits, ignoring whatever follows.
fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Replaces embedded line breaks with single spaces.
pub fn normalize_text(s: &str) -> Cow<'_, str> {
    if s.contains(['\n', '\r']) {
        Cow::Owned(s.replace("\r\n", " ").replace(['\n', '\r'], " "))
    } else {
        Cow::Borrowed(s)
    }
}

/// Value of a categorical column, ordered numerically for years and
/// lexicographically for text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DimensionValue {
    Year(i32),
    Text(String),
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DimensionValue::Year(year) => write!(f, "{year}"),
            DimensionValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i32> for DimensionValue {
    fn from(year: i32) -> Self {
        DimensionValue::Year(year)
    }
}

impl From<&str> for DimensionValue {
    fn from(value: &str) -> Self {
        DimensionValue::Text(normalize_text(value).into_owned())
    }
}

impl From<String> for DimensionValue {
    fn from(value: String) -> Self {
        DimensionValue::from(value.as_str())
    }
}

/// One row of the graduate employment survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub year: i32,
    pub university: String,
    pub school: String,
    pub degree: String,
    pub employment_rate_overall: MetricValue,
    pub employment_rate_ft_perm: MetricValue,
    pub basic_monthly_mean: MetricValue,
    pub basic_monthly_median: MetricValue,
    pub gross_monthly_mean: MetricValue,
    pub gross_monthly_median: MetricValue,
    #[serde(rename = "gross_mthly_25_percentile")]
    pub gross_monthly_25_percentile: MetricValue,
    #[serde(rename = "gross_mthly_75_percentile")]
    pub gross_monthly_75_percentile: MetricValue,
}

impl SurveyRecord {
    /// Text of a string column with line breaks normalised. `None` for
    /// the year column.
    pub fn text(&self, dimension: Dimension) -> Option<Cow<'_, str>> {
        match dimension {
            Dimension::Year => None,
            Dimension::University => Some(normalize_text(&self.university)),
            Dimension::School => Some(normalize_text(&self.school)),
            Dimension::Degree => Some(normalize_text(&self.degree)),
        }
    }

    pub fn dimension_value(&self, dimension: Dimension) -> DimensionValue {
        match self.text(dimension) {
            Some(text) => DimensionValue::Text(text.into_owned()),
            None => DimensionValue::Year(self.year),
        }
    }

    pub fn metric(&self, metric: Metric) -> &MetricValue {
        match metric {
            Metric::EmploymentRateOverall => &self.employment_rate_overall,
            Metric::EmploymentRateFtPerm => &self.employment_rate_ft_perm,
            Metric::BasicMonthlyMean => &self.basic_monthly_mean,
            Metric::BasicMonthlyMedian => &self.basic_monthly_median,
            Metric::GrossMonthlyMean => &self.gross_monthly_mean,
            Metric::GrossMonthlyMedian => &self.gross_monthly_median,
            Metric::GrossMonthly25Percentile => &self.gross_monthly_25_percentile,
            Metric::GrossMonthly75Percentile => &self.gross_monthly_75_percentile,
        }
    }

    /// Display text of any column.
    pub fn cell(&self, field: Field) -> String {
        match field {
            Field::Year => self.year.to_string(),
            Field::University => normalize_text(&self.university).into_owned(),
            Field::School => normalize_text(&self.school).into_owned(),
            Field::Degree => normalize_text(&self.degree).into_owned(),
            Field::Metric(metric) => self.metric(metric).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_strings_truncate_to_integer() {
        assert_eq!(MetricValue::from("91.5%").as_number(), Some(91.0));
        assert_eq!(MetricValue::from(" 88%").as_number(), Some(88.0));
        assert_eq!(MetricValue::from("-3%").as_number(), Some(-3.0));
        assert_eq!(MetricValue::from("na%").as_number(), None);
        assert_eq!(MetricValue::from("%").as_number(), None);
    }

    #[test]
    fn numbers_are_used_as_is() {
        assert_eq!(MetricValue::from(3_450).as_number(), Some(3450.0));
        assert_eq!(MetricValue::from(97.4).as_number(), Some(97.4));
        assert_eq!(MetricValue::from("97.4").as_number(), Some(97.4));
        assert_eq!(MetricValue::from("na").as_number(), None);
    }

    #[test]
    fn line_breaks_become_spaces() {
        assert_eq!(
            normalize_text("Nanyang Technological\nUniversity"),
            "Nanyang Technological University"
        );
        assert_eq!(normalize_text("a\r\nb"), "a b");
        assert!(matches!(normalize_text("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn metric_cells_deserialize_from_numbers_and_strings() {
        let json = serde_json::json!({
            "year": 2020,
            "university": "Singapore Management\nUniversity",
            "school": "School of Law",
            "degree": "Bachelor of Laws",
            "employment_rate_overall": "91.5%",
            "employment_rate_ft_perm": 88.2,
            "basic_monthly_mean": 4500,
            "basic_monthly_median": 4400,
            "gross_monthly_mean": 4700,
            "gross_monthly_median": 4600,
            "gross_mthly_25_percentile": "na",
            "gross_mthly_75_percentile": 5200
        });
        let record: SurveyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.employment_rate_overall, MetricValue::from("91.5%"));
        assert_eq!(record.employment_rate_ft_perm, MetricValue::Decimal(88.2));
        assert_eq!(record.basic_monthly_mean, MetricValue::Integer(4500));
        assert_eq!(
            record.cell(Field::University),
            "Singapore Management University"
        );
        assert_eq!(
            record.dimension_value(Dimension::Year),
            DimensionValue::Year(2020)
        );
        assert_eq!(record.cell(Field::Metric(Metric::GrossMonthly25Percentile)), "na");
    }
}
