use std::fmt;

use crate::calendar::{build_month_grid, CalendarDate, DayCell, MonthGrid, WeekdayConvention};

/// Navigation and selection state for a month view.
///
/// Holds the month being shown and the selected day; the grid is rebuilt
/// whenever the shown month changes.
#[derive(Debug, Clone)]
pub struct CalendarView {
    current_month: CalendarDate,
    selected: CalendarDate,
    convention: WeekdayConvention,
    grid: MonthGrid,
}

impl CalendarView {
    /// Show the month containing `reference`, with `reference` selected
    pub fn new(reference: CalendarDate, convention: WeekdayConvention) -> Self {
        Self {
            current_month: reference,
            selected: reference,
            convention,
            grid: build_month_grid(reference, convention),
        }
    }

    pub fn current_month(&self) -> CalendarDate {
        self.current_month
    }

    pub fn selected(&self) -> CalendarDate {
        self.selected
    }

    pub fn convention(&self) -> WeekdayConvention {
        self.convention
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn next_month(&mut self) -> bool {
        self.shift_months(1)
    }

    pub fn previous_month(&mut self) -> bool {
        self.shift_months(-1)
    }

    /// Move the shown month by `n` months. The selection is kept.
    /// Returns false (and changes nothing) past the supported year range.
    pub fn shift_months(&mut self, n: i32) -> bool {
        let Some(month) = self.current_month.checked_add_months(n) else {
            tracing::warn!("Cannot move {} months from {}: out of range", n, self.current_month);
            return false;
        };

        tracing::debug!("Showing month of {} (was {})", month, self.current_month);
        self.current_month = month;
        self.grid = build_month_grid(month, self.convention);
        true
    }

    /// Select a day. Only days of the shown month can be selected; filler
    /// days and dates off the grid are ignored.
    pub fn select(&mut self, date: CalendarDate) -> bool {
        if !date.is_same_month(&self.current_month) {
            tracing::debug!("Ignoring selection of {} outside the shown month", date);
            return false;
        }

        self.selected = date;
        true
    }

    pub fn is_selected(&self, cell: &DayCell) -> bool {
        cell.date.is_same_day(&self.selected)
    }

    /// Header text for the shown month, e.g. `%B %Y` gives "February 2021"
    pub fn title(&self, pattern: &str) -> Result<String, fmt::Error> {
        self.current_month.format(pattern)
    }
}
