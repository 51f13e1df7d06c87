use std::cmp::Ordering;

use crate::field::{Dimension, Field};
use crate::record::SurveyRecord;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A column and direction. An absent `SortOrder` leaves rows in filter
/// order, which is not the same as sorting by any column.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: Field,
    pub direction: Direction,
}

impl SortOrder {
    pub fn ascending(field: Field) -> Self {
        SortOrder {
            field,
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: Field) -> Self {
        SortOrder {
            field,
            direction: Direction::Descending,
        }
    }
}

/// Cycles a column header the way a clickable sort toggle does:
/// unsorted, ascending, descending, unsorted again. Picking a different
/// column starts it ascending.
pub fn next_sort(current: Option<SortOrder>, field: Field) -> Option<SortOrder> {
    match current {
        Some(order) if order.field == field => match order.direction {
            Direction::Ascending => Some(SortOrder::descending(field)),
            Direction::Descending => None,
        },
        _ => Some(SortOrder::ascending(field)),
    }
}

/// Total order on one column. Metric cells compare by their numeric
/// reading; cells without one sort after every number.
pub fn compare_field(a: &SurveyRecord, b: &SurveyRecord, field: Field) -> Ordering {
    match field {
        Field::Year => a.year.cmp(&b.year),
        Field::University => compare_text(a, b, Dimension::University),
        Field::School => compare_text(a, b, Dimension::School),
        Field::Degree => compare_text(a, b, Dimension::Degree),
        Field::Metric(metric) => {
            match (a.metric(metric).as_number(), b.metric(metric).as_number()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
    }
}

fn compare_text(a: &SurveyRecord, b: &SurveyRecord, dimension: Dimension) -> Ordering {
    a.text(dimension).cmp(&b.text(dimension))
}

/// Stable sort; rows comparing equal keep their input order.
pub fn sort_by<'a>(
    mut records: Vec<&'a SurveyRecord>,
    field: Field,
    direction: Direction,
) -> Vec<&'a SurveyRecord> {
    records.sort_by(|a, b| {
        let ordering = compare_field(a, b, field);
        match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
    records
}

/// Applies `order` if present, otherwise returns `records` untouched.
pub fn apply_sort<'a>(
    records: Vec<&'a SurveyRecord>,
    order: Option<SortOrder>,
) -> Vec<&'a SurveyRecord> {
    match order {
        Some(order) => sort_by(records, order.field, order.direction),
        None => records,
    }
}
