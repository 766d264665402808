//! Month grid generation: the day cells a calendar view shows for one month,
//! padded with days from the neighbouring months to fill whole weeks.

use chrono::Weekday;
use serde::Serialize;
use std::fmt;

use super::{CalendarDate, WeekdayConvention};

/// One visible position in a month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: CalendarDate,
    pub in_current_month: bool,
}

impl DayCell {
    /// Text for the cell, e.g. `%-d` for the bare day number
    pub fn label(&self, pattern: &str) -> Result<String, fmt::Error> {
        self.date.format(pattern)
    }

    pub fn is_filler(&self) -> bool {
        !self.in_current_month
    }
}

/// The cells of one month, whole weeks only, in ascending date order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month_start: CalendarDate,
    month_end: CalendarDate,
    convention: WeekdayConvention,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn month_start(&self) -> CalendarDate {
        self.month_start
    }

    pub fn month_end(&self) -> CalendarDate {
        self.month_end
    }

    pub fn convention(&self) -> WeekdayConvention {
        self.convention
    }

    /// Rows of seven cells
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks_exact(7)
    }

    /// Column headers matching the grid's columns
    pub fn weekday_header(&self) -> [Weekday; 7] {
        self.convention.weekdays()
    }

    /// Cells belonging to the target month
    pub fn month_days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter(|c| c.in_current_month)
    }

    /// Filler days from the previous month
    pub fn leading_filler(&self) -> &[DayCell] {
        let n = self.cells.iter().take_while(|c| c.is_filler()).count();
        &self.cells[..n]
    }

    /// Filler days from the next month
    pub fn trailing_filler(&self) -> &[DayCell] {
        let n = self.cells.iter().rev().take_while(|c| c.is_filler()).count();
        &self.cells[self.cells.len() - n..]
    }

    /// The cell showing `date`, if it is on this grid
    pub fn cell_for(&self, date: &CalendarDate) -> Option<&DayCell> {
        let first = self.cells.first()?;
        let offset = usize::try_from(date.days_since(&first.date)).ok()?;
        self.cells.get(offset)
    }
}

impl<'a> IntoIterator for &'a MonthGrid {
    type Item = &'a DayCell;
    type IntoIter = std::slice::Iter<'a, DayCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Compute the grid for the month containing `reference`.
///
/// Only the year and month of `reference` matter. The grid starts on the
/// convention's first weekday on or before the 1st and ends on its last
/// weekday on or after the month's final day, so its length is always a
/// multiple of seven (35 or 42 for most months, 28 for a February that
/// starts exactly on the first column).
pub fn build_month_grid(reference: CalendarDate, convention: WeekdayConvention) -> MonthGrid {
    let month_start = reference.first_day_of_month();
    let month_end = reference.last_day_of_month();
    let grid_start = month_start.start_of_week_containing(convention);
    let grid_end = month_end.end_of_week_containing(convention);

    let total = grid_end.days_since(&grid_start) + 1;
    let cells: Vec<DayCell> = (0..total)
        .map(|offset| {
            let date = grid_start.shift_days(offset);
            DayCell {
                date,
                in_current_month: date.is_same_month(&month_start),
            }
        })
        .collect();

    tracing::debug!(
        "Built grid for {}-{:02} ({} cells, week starts {})",
        month_start.year(),
        month_start.month(),
        cells.len(),
        convention
    );

    MonthGrid {
        month_start,
        month_end,
        convention,
        cells,
    }
}
