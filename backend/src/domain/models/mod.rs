pub mod calendar_date;

pub use calendar_date::{CalendarDate, CalendarDateError};
