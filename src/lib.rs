//! Month-grid generation for calendar views.
//!
//! [`build_month_grid`] turns any date into the whole weeks a month view
//! shows, padded with filler days from the neighbouring months. Rendering
//! and input handling are left to the host; [`CalendarView`] keeps the small
//! amount of navigation/selection state a host usually needs.

pub mod calendar;
pub mod config;
pub mod view;

pub use calendar::{
    build_month_grid, CalendarDate, DayCell, InvalidDateError, InvalidWeekdayError, MonthGrid,
    WeekdayConvention,
};
pub use view::CalendarView;
