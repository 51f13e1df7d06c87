use std::collections::BTreeSet;

use crate::field::{Dimension, Field};
use crate::record::{DimensionValue, SurveyRecord};

/// Sorted distinct values of `dimension` across `records`.
///
/// Text values are compared after line-break normalisation, so
/// `"A\nB"` and `"A B"` collapse into one entry.
pub fn distinct_values(records: &[SurveyRecord], dimension: Dimension) -> Vec<DimensionValue> {
    records
        .iter()
        .map(|r| r.dimension_value(dimension))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn distinct_years(records: &[SurveyRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The loaded survey with its distinct values computed once.
pub struct SurveyDataSet {
    records: Vec<SurveyRecord>,
    years: Vec<i32>,
    universities: Vec<DimensionValue>,
    schools: Vec<DimensionValue>,
    degrees: Vec<DimensionValue>,
}

impl SurveyDataSet {
    pub fn new(records: Vec<SurveyRecord>) -> Self {
        let years = distinct_years(&records);
        let universities = distinct_values(&records, Dimension::University);
        let schools = distinct_values(&records, Dimension::School);
        let degrees = distinct_values(&records, Dimension::Degree);
        SurveyDataSet {
            records,
            years,
            universities,
            schools,
            degrees,
        }
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    pub fn columns(&self) -> Vec<Field> {
        Vec::from(Field::ALL)
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Distinct values of a text dimension; years come back as
    /// [`DimensionValue::Year`] built on the fly.
    pub fn values(&self, dimension: Dimension) -> Vec<DimensionValue> {
        match dimension {
            Dimension::Year => self.years.iter().copied().map(DimensionValue::Year).collect(),
            Dimension::University => self.universities.clone(),
            Dimension::School => self.schools.clone(),
            Dimension::Degree => self.degrees.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{record, survey};

    #[test]
    fn years_are_distinct_and_ascending() {
        assert_eq!(distinct_years(&survey()), vec![2018, 2019, 2020]);
        assert_eq!(
            distinct_values(&survey(), Dimension::Year),
            vec![
                DimensionValue::Year(2018),
                DimensionValue::Year(2019),
                DimensionValue::Year(2020)
            ]
        );
    }

    #[test]
    fn text_values_are_sorted_lexicographically() {
        let universities = distinct_values(&survey(), Dimension::University);
        assert_eq!(
            universities,
            vec!["NTU".into(), "NUS".into(), "SMU".into()] as Vec<DimensionValue>
        );
    }

    #[test]
    fn embedded_newlines_collapse_with_spaced_form() {
        let records = vec![
            record(2020, "Singapore Management\nUniversity", "Law", "LLB", 90, 5000),
            record(2021, "Singapore Management University", "Law", "LLB", 91, 5100),
        ];
        assert_eq!(
            distinct_values(&records, Dimension::University),
            vec![DimensionValue::Text(
                "Singapore Management University".to_string()
            )]
        );
    }

    #[test]
    fn empty_input_yields_no_values() {
        assert!(distinct_values(&[], Dimension::Degree).is_empty());
        assert!(distinct_years(&[]).is_empty());
        let dataset = SurveyDataSet::new(Vec::new());
        assert!(dataset.is_empty());
        assert!(dataset.values(Dimension::School).is_empty());
    }

    #[test]
    fn dataset_caches_dimension_values() {
        let dataset = SurveyDataSet::new(survey());
        assert_eq!(dataset.len(), 7);
        assert_eq!(dataset.years(), &[2018, 2019, 2020]);
        assert_eq!(dataset.values(Dimension::School).len(), 4);
        assert_eq!(dataset.columns().len(), 12);
    }
}
