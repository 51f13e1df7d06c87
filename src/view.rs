use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use log::debug;

use crate::dataset::SurveyDataSet;
use crate::field::{Dimension, Field};
use crate::filter::{apply_filters, FilterState, YearRange};
use crate::page::{clamp_page_index, page, page_count, Page};
use crate::record::{DimensionValue, SurveyRecord};
use crate::sort::{apply_sort, next_sort, SortOrder};

/// Table configuration held by the UI, and the rows derived from it.
///
/// Every mutator re-derives the filtered and sorted rows and pulls the page
/// index back onto the last page if the result shrank.
pub struct TableView<'d> {
    dataset: &'d SurveyDataSet,
    filters: FilterState,
    year_range: Option<YearRange>,
    sort: Option<SortOrder>,
    page_index: usize,
    page_size: NonZeroUsize,
    hidden: BTreeSet<Field>,
    rows: Vec<&'d SurveyRecord>,
}

impl<'d> TableView<'d> {
    pub fn new(dataset: &'d SurveyDataSet, page_size: NonZeroUsize) -> Self {
        let mut filters = FilterState::unfiltered(dataset.records());
        let year_range = match (dataset.years().first(), dataset.years().last()) {
            (Some(&first), Some(&last)) => YearRange::new(first, last).ok(),
            _ => None,
        };
        if let Some(range) = year_range {
            filters.set_year_range(range);
        }
        let mut view = TableView {
            dataset,
            filters,
            year_range,
            sort: None,
            page_index: 0,
            page_size,
            hidden: BTreeSet::new(),
            rows: Vec::new(),
        };
        view.refresh_rows();
        view
    }

    pub fn dataset(&self) -> &'d SurveyDataSet {
        self.dataset
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn year_range(&self) -> Option<YearRange> {
        self.year_range
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Filtered and sorted rows across all pages.
    pub fn rows(&self) -> &[&'d SurveyRecord] {
        &self.rows
    }

    pub fn current_page(&self) -> Page<'_, &'d SurveyRecord> {
        page(&self.rows, self.page_index, self.page_size)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.rows.len(), self.page_size)
    }

    pub fn toggle(&mut self, dimension: Dimension, value: DimensionValue) {
        self.filters.toggle(dimension, value);
        self.refresh_rows();
    }

    /// Moves the start year. An end year left behind is pulled forward so
    /// the range never inverts.
    pub fn set_start_year(&mut self, start: i32) {
        let end = self.year_range.map_or(start, |r| r.end().max(start));
        self.apply_year_range(start, end);
    }

    /// Moves the end year. Years before the start are not selectable and
    /// leave the range unchanged; returns whether the choice was applied.
    pub fn set_end_year(&mut self, end: i32) -> bool {
        let start = self.year_range.map_or(end, |r| r.start());
        if end < start {
            return false;
        }
        self.apply_year_range(start, end);
        true
    }

    /// Steps the start year through the dataset's years.
    pub fn shift_start_year(&mut self, forward: bool) {
        let Some(range) = self.year_range else {
            return;
        };
        if let Some(year) = step_year(self.dataset.years(), range.start(), forward) {
            self.set_start_year(year);
        }
    }

    /// Steps the end year through the dataset's years at or after the start.
    pub fn shift_end_year(&mut self, forward: bool) {
        let Some(range) = self.year_range else {
            return;
        };
        let selectable: Vec<i32> = self
            .dataset
            .years()
            .iter()
            .copied()
            .filter(|&y| y >= range.start())
            .collect();
        if let Some(year) = step_year(&selectable, range.end(), forward) {
            self.set_end_year(year);
        }
    }

    fn apply_year_range(&mut self, start: i32, end: i32) {
        if let Ok(range) = YearRange::new(start, end) {
            self.year_range = Some(range);
            self.filters.set_year_range(range);
            self.refresh_rows();
        }
    }

    /// Header click: ascending, then descending, then unsorted.
    pub fn cycle_sort(&mut self, field: Field) {
        self.sort = next_sort(self.sort, field);
        self.refresh_rows();
    }

    pub fn next_page(&mut self) {
        if self.current_page().has_next {
            self.page_index += 1;
        }
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
        self.refresh_rows();
    }

    pub fn is_visible(&self, field: Field) -> bool {
        !self.hidden.contains(&field)
    }

    pub fn toggle_column(&mut self, field: Field) {
        if !self.hidden.remove(&field) {
            self.hidden.insert(field);
        }
    }

    pub fn visible_columns(&self) -> Vec<Field> {
        self.dataset
            .columns()
            .into_iter()
            .filter(|f| self.is_visible(*f))
            .collect()
    }

    fn refresh_rows(&mut self) {
        let filtered = apply_filters(self.dataset.records(), &self.filters);
        self.rows = apply_sort(filtered, self.sort);
        self.page_index = clamp_page_index(self.page_index, self.rows.len(), self.page_size);
        debug!(
            "event=refresh_rows module=view status=ok rows={} page={} page_size={}",
            self.rows.len(),
            self.page_index,
            self.page_size
        );
    }
}

fn step_year(years: &[i32], current: i32, forward: bool) -> Option<i32> {
    let position = years.iter().position(|&y| y == current)?;
    if forward {
        years.get(position + 1).copied()
    } else {
        position.checked_sub(1).and_then(|p| years.get(p).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{record, survey};

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn many(count: i32) -> SurveyDataSet {
        SurveyDataSet::new(
            (0..count)
                .map(|i| record(2015 + i % 5, "NUS", "Computing", &format!("Degree {i}"), 90, 4000))
                .collect(),
        )
    }

    #[test]
    fn starts_unfiltered_over_the_full_year_span() {
        let dataset = SurveyDataSet::new(survey());
        let view = TableView::new(&dataset, size(10));
        assert_eq!(view.rows().len(), 7);
        assert_eq!(view.year_range(), YearRange::new(2018, 2020).ok());
        assert_eq!(view.page_count(), 1);
    }

    #[test]
    fn end_year_cannot_precede_start() {
        let dataset = SurveyDataSet::new(survey());
        let mut view = TableView::new(&dataset, size(10));
        view.set_start_year(2019);
        assert!(!view.set_end_year(2018));
        assert_eq!(view.year_range(), YearRange::new(2019, 2020).ok());
        assert_eq!(view.rows().len(), 4);
    }

    #[test]
    fn moving_start_past_end_pulls_end_along() {
        let dataset = SurveyDataSet::new(survey());
        let mut view = TableView::new(&dataset, size(10));
        assert!(view.set_end_year(2018));
        view.shift_start_year(true);
        assert_eq!(view.year_range(), YearRange::new(2019, 2019).ok());
        assert!(view.rows().iter().all(|r| r.year == 2019));
    }

    #[test]
    fn end_year_steps_only_through_selectable_years() {
        let dataset = SurveyDataSet::new(survey());
        let mut view = TableView::new(&dataset, size(10));
        view.set_start_year(2019);
        view.shift_end_year(false);
        assert_eq!(view.year_range(), YearRange::new(2019, 2019).ok());
        view.shift_end_year(false);
        assert_eq!(view.year_range(), YearRange::new(2019, 2019).ok());
    }

    #[test]
    fn page_index_clamps_when_rows_shrink() {
        let dataset = many(25);
        let mut view = TableView::new(&dataset, size(10));
        view.next_page();
        view.next_page();
        view.next_page();
        assert_eq!(view.page_index(), 2);
        assert_eq!(view.current_page().rows.len(), 5);

        view.set_start_year(2018);
        assert_eq!(view.rows().len(), 10);
        assert_eq!(view.page_index(), 0);
        assert!(!view.current_page().has_next);
    }

    #[test]
    fn sorting_cycles_and_reorders_rows() {
        let dataset = SurveyDataSet::new(survey());
        let mut view = TableView::new(&dataset, size(10));
        view.cycle_sort(Field::Year);
        assert_eq!(view.rows().first().map(|r| r.year), Some(2018));
        view.cycle_sort(Field::Year);
        assert_eq!(view.rows().first().map(|r| r.year), Some(2020));
        view.cycle_sort(Field::Year);
        assert_eq!(view.sort(), None);
        assert_eq!(view.rows().first().map(|r| r.year), Some(2019));
    }

    #[test]
    fn toggled_value_drops_matching_rows() {
        let dataset = SurveyDataSet::new(survey());
        let mut view = TableView::new(&dataset, size(10));
        view.toggle(Dimension::University, "NTU".into());
        assert_eq!(view.rows().len(), 4);
        view.toggle(Dimension::University, "NTU".into());
        assert_eq!(view.rows().len(), 7);
    }

    #[test]
    fn hidden_columns_are_skipped() {
        let dataset = SurveyDataSet::new(survey());
        let mut view = TableView::new(&dataset, size(10));
        view.toggle_column(Field::School);
        assert!(!view.is_visible(Field::School));
        assert_eq!(view.visible_columns().len(), 11);
        view.toggle_column(Field::School);
        assert_eq!(view.visible_columns().len(), 12);
    }

    #[test]
    fn empty_dataset_has_one_empty_page() {
        let dataset = SurveyDataSet::new(Vec::new());
        let mut view = TableView::new(&dataset, size(10));
        view.shift_start_year(true);
        assert_eq!(view.year_range(), None);
        assert!(view.current_page().rows.is_empty());
        assert_eq!(view.page_count(), 1);
    }
}
