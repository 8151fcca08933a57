//! View logic of the training facility administration tool: calendar grids,
//! week views, stat counts, dormitory occupancy and form validation over rows
//! already fetched from the backend.

pub mod agenda;
pub mod calendar;
pub mod config;
pub mod dormitory;
pub mod error;
pub mod record;
pub mod render;

pub use calendar::{build, CalendarGrid, GridCell, MonthIndex};
pub use error::{Error, ErrorKind, Result};
pub use record::Dated;
