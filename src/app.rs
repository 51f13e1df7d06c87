use std::num::NonZeroUsize;

use crossterm::event::KeyCode;

use crate::dataset::SurveyDataSet;
use crate::field::{Dimension, Field, Metric};
use crate::record::DimensionValue;
use crate::series::{extract_series, Series, SeriesQuery};
use crate::view::TableView;

const PAGE_SIZE_STEP: usize = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Table,
    Graph,
}

impl From<MenuItem> for usize {
    fn from(input: MenuItem) -> usize {
        match input {
            MenuItem::Table => 0,
            MenuItem::Graph => 1,
        }
    }
}

/// Dimensions with a checklist on the table tab; years use the range picker.
const CHECKLIST_DIMENSIONS: [Dimension; 3] =
    [Dimension::University, Dimension::School, Dimension::Degree];

/// Chart builder selections. `None` for university or degree means the
/// constraint is left out of the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBuilder {
    pub metric: Metric,
    pub university: Option<usize>,
    pub degree: Option<usize>,
}

pub struct App<'d> {
    pub active_menu_item: MenuItem,
    pub view: TableView<'d>,
    pub checklist: usize,
    pub checklist_cursor: usize,
    pub column_cursor: usize,
    pub chart: ChartBuilder,
    pub series: Series,
    universities: Vec<DimensionValue>,
    degrees: Vec<DimensionValue>,
}

impl<'d> App<'d> {
    pub fn new(dataset: &'d SurveyDataSet, page_size: NonZeroUsize) -> Self {
        let universities = dataset.values(Dimension::University);
        let degrees = dataset.values(Dimension::Degree);
        let chart = ChartBuilder {
            metric: Metric::ALL[0],
            university: (!universities.is_empty()).then_some(0),
            degree: (!degrees.is_empty()).then_some(0),
        };
        let mut app = App {
            active_menu_item: MenuItem::Table,
            view: TableView::new(dataset, page_size),
            checklist: 0,
            checklist_cursor: 0,
            column_cursor: 0,
            series: Series {
                metric: chart.metric,
                points: Vec::new(),
                rejected: Vec::new(),
            },
            chart,
            universities,
            degrees,
        };
        app.refresh_series();
        app
    }

    pub fn checklist_dimension(&self) -> Dimension {
        CHECKLIST_DIMENSIONS[self.checklist]
    }

    /// Values shown in the active checklist with their selection state.
    pub fn checklist_items(&self) -> Vec<(DimensionValue, bool)> {
        let dimension = self.checklist_dimension();
        self.view
            .dataset()
            .values(dimension)
            .into_iter()
            .map(|v| {
                let selected = self.view.filters().is_selected(dimension, &v);
                (v, selected)
            })
            .collect()
    }

    pub fn column_under_cursor(&self) -> Field {
        Field::ALL[self.column_cursor]
    }

    pub fn query(&self) -> SeriesQuery {
        SeriesQuery {
            metric: self.chart.metric,
            university: self
                .chart
                .university
                .and_then(|i| self.universities.get(i))
                .map(ToString::to_string),
            degree: self
                .chart
                .degree
                .and_then(|i| self.degrees.get(i))
                .map(ToString::to_string),
        }
    }

    /// Handles one key press; returns `false` once the user asked to quit.
    pub fn on_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('t') => self.active_menu_item = MenuItem::Table,
            KeyCode::Char('g') => self.active_menu_item = MenuItem::Graph,
            _ => match self.active_menu_item {
                MenuItem::Table => self.on_table_key(code),
                MenuItem::Graph => self.on_graph_key(code),
            },
        }
        true
    }

    fn on_table_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab => {
                self.checklist = (self.checklist + 1) % CHECKLIST_DIMENSIONS.len();
                self.checklist_cursor = 0;
            }
            KeyCode::Up => self.checklist_cursor = self.checklist_cursor.saturating_sub(1),
            KeyCode::Down => {
                let len = self.checklist_items().len();
                if self.checklist_cursor + 1 < len {
                    self.checklist_cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let dimension = self.checklist_dimension();
                if let Some(value) = self
                    .view
                    .dataset()
                    .values(dimension)
                    .into_iter()
                    .nth(self.checklist_cursor)
                {
                    self.view.toggle(dimension, value);
                }
            }
            KeyCode::Char('[') => self.view.shift_start_year(false),
            KeyCode::Char(']') => self.view.shift_start_year(true),
            KeyCode::Char('{') => self.view.shift_end_year(false),
            KeyCode::Char('}') => self.view.shift_end_year(true),
            KeyCode::Left => self.column_cursor = self.column_cursor.saturating_sub(1),
            KeyCode::Right => {
                if self.column_cursor + 1 < Field::ALL.len() {
                    self.column_cursor += 1;
                }
            }
            KeyCode::Char('s') => self.view.cycle_sort(self.column_under_cursor()),
            KeyCode::Char('v') => self.view.toggle_column(self.column_under_cursor()),
            KeyCode::Char('n') | KeyCode::PageDown => self.view.next_page(),
            KeyCode::Char('p') | KeyCode::PageUp => self.view.previous_page(),
            KeyCode::Char('+') => {
                let size = self.view.page_size().get() + PAGE_SIZE_STEP;
                if let Some(size) = NonZeroUsize::new(size) {
                    self.view.set_page_size(size);
                }
            }
            KeyCode::Char('-') => {
                let size = self.view.page_size().get().saturating_sub(PAGE_SIZE_STEP);
                if let Some(size) = NonZeroUsize::new(size) {
                    self.view.set_page_size(size);
                }
            }
            _ => {}
        }
    }

    fn on_graph_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('m') => self.chart.metric = cycle_metric(self.chart.metric, true),
            KeyCode::Char('M') => self.chart.metric = cycle_metric(self.chart.metric, false),
            KeyCode::Char('u') => {
                self.chart.university =
                    cycle_choice(self.chart.university, self.universities.len(), true)
            }
            KeyCode::Char('U') => {
                self.chart.university =
                    cycle_choice(self.chart.university, self.universities.len(), false)
            }
            KeyCode::Char('d') => {
                self.chart.degree = cycle_choice(self.chart.degree, self.degrees.len(), true)
            }
            KeyCode::Char('D') => {
                self.chart.degree = cycle_choice(self.chart.degree, self.degrees.len(), false)
            }
            _ => return,
        }
        self.refresh_series();
    }

    fn refresh_series(&mut self) {
        let mut series = extract_series(self.view.dataset().records(), &self.query());
        series.sort_by_year();
        self.series = series;
    }
}

fn cycle_metric(metric: Metric, forward: bool) -> Metric {
    let len = Metric::ALL.len();
    let position = Metric::ALL.iter().position(|m| *m == metric).unwrap_or(0);
    let next = if forward {
        (position + 1) % len
    } else {
        (position + len - 1) % len
    };
    Metric::ALL[next]
}

// Cycles through `None` ("any") followed by each index.
fn cycle_choice(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let slots = len + 1;
    let slot = current.map_or(0, |i| i + 1);
    let next = if forward {
        (slot + 1) % slots
    } else {
        (slot + slots - 1) % slots
    };
    next.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{record, survey};

    fn app(dataset: &SurveyDataSet) -> App<'_> {
        App::new(dataset, NonZeroUsize::new(5).unwrap())
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let dataset = SurveyDataSet::new(survey());
        let mut app = app(&dataset);
        assert!(app.on_key(KeyCode::Char('g')));
        assert_eq!(app.active_menu_item, MenuItem::Graph);
        assert!(!app.on_key(KeyCode::Char('q')));
    }

    #[test]
    fn space_toggles_value_under_cursor() {
        let dataset = SurveyDataSet::new(survey());
        let mut app = app(&dataset);
        app.on_key(KeyCode::Down);
        app.on_key(KeyCode::Char(' '));
        let items = app.checklist_items();
        assert_eq!(items[1], (DimensionValue::from("NUS"), false));
        assert_eq!(app.view.rows().len(), 4);
    }

    #[test]
    fn tab_switches_checklist_dimension() {
        let dataset = SurveyDataSet::new(survey());
        let mut app = app(&dataset);
        app.on_key(KeyCode::Tab);
        assert_eq!(app.checklist_dimension(), Dimension::School);
        app.on_key(KeyCode::Tab);
        app.on_key(KeyCode::Tab);
        assert_eq!(app.checklist_dimension(), Dimension::University);
    }

    #[test]
    fn sort_and_visibility_follow_column_cursor() {
        let dataset = SurveyDataSet::new(survey());
        let mut app = app(&dataset);
        app.on_key(KeyCode::Right);
        app.on_key(KeyCode::Char('s'));
        assert_eq!(app.view.sort().map(|s| s.field), Some(Field::University));
        app.on_key(KeyCode::Char('v'));
        assert!(!app.view.is_visible(Field::University));
    }

    #[test]
    fn page_size_never_drops_to_zero() {
        let dataset = SurveyDataSet::new(survey());
        let mut app = app(&dataset);
        app.on_key(KeyCode::Char('-'));
        assert_eq!(app.view.page_size().get(), 5);
        app.on_key(KeyCode::Char('+'));
        assert_eq!(app.view.page_size().get(), 10);
    }

    #[test]
    fn chart_builder_defaults_to_first_choices() {
        let dataset = SurveyDataSet::new(survey());
        let app = app(&dataset);
        let query = app.query();
        assert_eq!(query.metric, Metric::EmploymentRateOverall);
        assert_eq!(query.university.as_deref(), Some("NTU"));
        assert_eq!(query.degree.as_deref(), Some("Accountancy"));
        assert!(app.series.is_empty());
    }

    #[test]
    fn graph_keys_rebuild_the_series() {
        let dataset = SurveyDataSet::new(survey());
        let mut app = app(&dataset);
        app.on_key(KeyCode::Char('g'));
        app.on_key(KeyCode::Char('d'));
        app.on_key(KeyCode::Char('d'));
        assert_eq!(app.query().degree.as_deref(), Some("Civil Engineering"));
        assert_eq!(app.series.points.len(), 2);
        app.on_key(KeyCode::Char('m'));
        assert_eq!(app.series.metric, Metric::EmploymentRateFtPerm);
    }

    #[test]
    fn choices_cycle_through_any() {
        assert_eq!(cycle_choice(Some(1), 2, true), None);
        assert_eq!(cycle_choice(None, 2, true), Some(0));
        assert_eq!(cycle_choice(None, 2, false), Some(1));
        assert_eq!(cycle_choice(Some(0), 0, true), None);
        assert_eq!(
            cycle_metric(Metric::EmploymentRateOverall, false),
            Metric::GrossMonthly75Percentile
        );
    }

    #[test]
    fn chart_plots_years_in_order_whatever_the_file_order() {
        let dataset = SurveyDataSet::new(vec![
            record(2020, "NUS", "Computing", "Computer Science", 91, 4600),
            record(2018, "NUS", "Computing", "Computer Science", 89, 4200),
            record(2019, "NUS", "Computing", "Computer Science", 90, 4400),
        ]);
        let app = app(&dataset);
        let years: Vec<i32> = app.series.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2018, 2019, 2020]);
        assert_eq!(app.series.values(), vec![89.0, 90.0, 91.0]);
    }
}
