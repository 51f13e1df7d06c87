use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::dataset::distinct_values;
use crate::error::InvalidYearRange;
use crate::field::Dimension;
use crate::record::{DimensionValue, SurveyRecord};

/// Inclusive span of survey years. Construction rejects an end before the
/// start, so a `YearRange` reaching the filter engine is always valid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, InvalidYearRange> {
        if end < start {
            return Err(InvalidYearRange { start, end });
        }
        Ok(YearRange { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Every integer year in the range, whether or not the dataset has it.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

/// Year choices for an end-year picker: years before `start` are disabled.
pub fn end_year_choices(years: &[i32], start: i32) -> Vec<(i32, bool)> {
    years.iter().map(|&year| (year, year >= start)).collect()
}

/// Per-dimension allowed-value sets.
///
/// A dimension without an entry is unconstrained; a dimension whose set is
/// empty rejects every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    allowed: BTreeMap<Dimension, BTreeSet<DimensionValue>>,
}

impl FilterState {
    pub fn new() -> Self {
        FilterState::default()
    }

    /// Every dimension seeded with all of its values, so nothing is
    /// excluded yet but each predicate can be narrowed by toggling.
    pub fn unfiltered(records: &[SurveyRecord]) -> Self {
        let allowed = Dimension::ALL
            .into_iter()
            .map(|d| (d, distinct_values(records, d).into_iter().collect()))
            .collect();
        FilterState { allowed }
    }

    pub fn allowed(&self, dimension: Dimension) -> Option<&BTreeSet<DimensionValue>> {
        self.allowed.get(&dimension)
    }

    pub fn is_selected(&self, dimension: Dimension, value: &DimensionValue) -> bool {
        self.allowed
            .get(&dimension)
            .map_or(true, |set| set.contains(value))
    }

    /// Adds `value` to the dimension's set if absent, removes it otherwise.
    /// Toggling an unconstrained dimension starts an empty set first.
    pub fn toggle(&mut self, dimension: Dimension, value: DimensionValue) {
        let set = self.allowed.entry(dimension).or_default();
        if !set.remove(&value) {
            set.insert(value);
        }
    }

    pub fn set<I>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = DimensionValue>,
    {
        self.allowed.insert(dimension, values.into_iter().collect());
    }

    /// Drops the dimension's predicate altogether.
    pub fn clear(&mut self, dimension: Dimension) {
        self.allowed.remove(&dimension);
    }

    /// Replaces the year predicate with the literal years of `range`.
    pub fn set_year_range(&mut self, range: YearRange) {
        self.set(Dimension::Year, range.years().map(DimensionValue::Year));
    }

    pub fn accepts(&self, record: &SurveyRecord) -> bool {
        self.allowed
            .iter()
            .all(|(dimension, set)| set.contains(&record.dimension_value(*dimension)))
    }
}

/// Records passing every configured predicate, in input order.
pub fn apply_filters<'a>(
    records: &'a [SurveyRecord],
    filters: &FilterState,
) -> Vec<&'a SurveyRecord> {
    let kept: Vec<&SurveyRecord> = records.iter().filter(|r| filters.accepts(r)).collect();
    debug!(
        "event=apply_filters module=filter status=ok input={} kept={} predicates={}",
        records.len(),
        kept.len(),
        filters.allowed.len()
    );
    kept
}
