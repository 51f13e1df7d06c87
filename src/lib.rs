//! Query core and terminal front end for the Graduate Employment Survey.
//!
//! The core (`dataset`, `filter`, `sort`, `page`, `series`) is a set of pure
//! functions over an immutable slice of [`SurveyRecord`]s. `view` and `app`
//! hold the state a UI keeps between key presses and re-run the core after
//! every change; `ui` draws it with `tui`.

pub mod app;
pub mod dataset;
pub mod error;
pub mod field;
pub mod filter;
pub mod logging;
pub mod page;
pub mod reader;
pub mod record;
pub mod series;
pub mod sort;
pub mod ui;
pub mod view;

#[cfg(test)]
mod fixtures;

pub use app::{App, ChartBuilder, MenuItem};
pub use dataset::{distinct_values, distinct_years, SurveyDataSet};
pub use error::{InvalidYearRange, LoadError, LoggingError, MalformedMetricValue, ParseFieldError};
pub use field::{Dimension, Field, Metric, MetricKind};
pub use filter::{apply_filters, end_year_choices, FilterState, YearRange};
pub use logging::init_logging;
pub use page::{clamp_page_index, page, page_count, Page};
pub use reader::{read_csv, read_dataset, read_json, write_csv};
pub use record::{normalize_text, DimensionValue, MetricValue, SurveyRecord};
pub use series::{display_range, extract_series, DisplayRange, Series, SeriesPoint, SeriesQuery};
pub use sort::{apply_sort, compare_field, next_sort, sort_by, Direction, SortOrder};
pub use view::TableView;
